//! Board Repository
//!
//! SQLite-backed implementation for Board CRUD operations.
//! Listing derives each board's task count from its lists' cards.

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::{Board, BoardPatch, DomainError, DomainResult, Entity, Filter};
use super::db::{require, SharedConnection};
use super::query;
use super::traits::Repository;

const COLUMNS: &[&str] = &["id", "company_id", "title", "created_by", "created_at"];

const SELECT_BOARD: &str = "SELECT b.id, b.company_id, b.title, b.created_by, b.members, b.created_at,
        (SELECT COUNT(*) FROM cards c JOIN lists l ON c.list_id = l.id WHERE l.board_id = b.id)
     FROM boards b";

/// SQLite implementation of Board repository
pub struct BoardRepository {
    conn: SharedConnection,
}

impl BoardRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

fn row_to_board(row: &Row) -> rusqlite::Result<Board> {
    let members: String = row.get(4)?;
    Ok(Board {
        id: row.get(0)?,
        company_id: row.get(1)?,
        title: row.get(2)?,
        created_by: row.get(3)?,
        members: serde_json::from_str(&members).unwrap_or_default(),
        created_at: row.get(5)?,
        task_count: row.get(6)?,
    })
}

fn select_board(conn: &Connection, id: u32) -> DomainResult<Option<Board>> {
    let query = format!("{} WHERE b.id = ?1", SELECT_BOARD);
    Ok(conn.query_row(&query, params![id], row_to_board).optional()?)
}

fn members_json(members: &[String]) -> DomainResult<String> {
    serde_json::to_string(members).map_err(|e| DomainError::Internal(e.to_string()))
}

#[async_trait]
impl Repository<Board> for BoardRepository {
    async fn create(&self, entity: &Board) -> DomainResult<Board> {
        if entity.title.trim().is_empty() {
            return Err(DomainError::InvalidInput("Title is required".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        conn.execute(
            "INSERT INTO boards (company_id, title, created_by, members, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entity.company_id,
                entity.title,
                entity.created_by,
                members_json(&entity.members)?,
                entity.created_at
            ],
        )?;

        let mut created = entity.clone();
        created.id = conn.last_insert_rowid() as u32;
        created.task_count = 0;
        Ok(created)
    }

    async fn find_by_id(&self, id: &u32) -> DomainResult<Option<Board>> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;
        select_board(conn, *id)
    }

    async fn list(&self, filter: &Filter) -> DomainResult<Vec<Board>> {
        let sql_filter = query::compile(filter, COLUMNS)?;
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let query = format!("{}{}", SELECT_BOARD, sql_filter.clause);
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(sql_filter.params.iter()), row_to_board)?;
        let boards = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(boards)
    }

    async fn update(&self, id: &u32, patch: &BoardPatch) -> DomainResult<Board> {
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(DomainError::InvalidInput("Title cannot be empty".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let mut board = select_board(conn, *id)?
            .ok_or_else(|| DomainError::not_found::<Board>(id))?;
        board.apply_patch(patch);

        conn.execute(
            "UPDATE boards SET title = ?1, members = ?2 WHERE id = ?3",
            params![board.title, members_json(&board.members)?, board.id],
        )?;
        Ok(board)
    }

    async fn delete(&self, id: &u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        // Manual cascade: subtasks, cards and lists under the board go first
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM subtasks WHERE card_id IN (
                SELECT c.id FROM cards c JOIN lists l ON c.list_id = l.id WHERE l.board_id = ?1
            )",
            params![id],
        )?;
        tx.execute(
            "DELETE FROM cards WHERE list_id IN (SELECT id FROM lists WHERE board_id = ?1)",
            params![id],
        )?;
        tx.execute("DELETE FROM lists WHERE board_id = ?1", params![id])?;
        tx.execute("DELETE FROM boards WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(())
    }
}
