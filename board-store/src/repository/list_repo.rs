//! List Repository
//!
//! SQLite-backed implementation for List CRUD operations.

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::{Board, DomainError, DomainResult, Entity, Filter, List, ListPatch};
use super::db::{require, SharedConnection};
use super::positioning::{next_position_in, RankedTable};
use super::query;
use super::traits::Repository;

const COLUMNS: &[&str] = &["id", "board_id", "title", "order"];

const SELECT_LIST: &str = "SELECT id, board_id, title, \"order\" FROM lists";

/// SQLite implementation of List repository
pub struct ListRepository {
    conn: SharedConnection,
}

impl ListRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl RankedTable for ListRepository {
    const TABLE: &'static str = "lists";
    const PARENT_COLUMN: &'static str = "board_id";

    fn connection(&self) -> &SharedConnection {
        &self.conn
    }
}

fn row_to_list(row: &Row) -> rusqlite::Result<List> {
    Ok(List {
        id: row.get(0)?,
        board_id: row.get(1)?,
        title: row.get(2)?,
        order: row.get(3)?,
    })
}

fn select_list(conn: &Connection, id: u32) -> DomainResult<Option<List>> {
    let query = format!("{} WHERE id = ?1", SELECT_LIST);
    Ok(conn.query_row(&query, params![id], row_to_list).optional()?)
}

fn board_exists(conn: &Connection, board_id: u32) -> DomainResult<bool> {
    let found: Option<u32> = conn
        .query_row("SELECT id FROM boards WHERE id = ?1", params![board_id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

#[async_trait]
impl Repository<List> for ListRepository {
    async fn create(&self, entity: &List) -> DomainResult<List> {
        if entity.title.trim().is_empty() {
            return Err(DomainError::InvalidInput("Title is required".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        if !board_exists(conn, entity.board_id)? {
            return Err(DomainError::not_found::<Board>(&entity.board_id));
        }

        let order = if entity.order < 0 {
            next_position_in(conn, Self::TABLE, Self::PARENT_COLUMN, entity.board_id)?
        } else {
            entity.order
        };

        conn.execute(
            "INSERT INTO lists (board_id, title, \"order\", updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![entity.board_id, entity.title, order, chrono::Utc::now().timestamp_millis()],
        )?;

        let mut created = entity.clone();
        created.id = conn.last_insert_rowid() as u32;
        created.order = order;
        Ok(created)
    }

    async fn find_by_id(&self, id: &u32) -> DomainResult<Option<List>> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;
        select_list(conn, *id)
    }

    async fn list(&self, filter: &Filter) -> DomainResult<Vec<List>> {
        let sql_filter = query::compile(filter, COLUMNS)?;
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let query = format!("{}{}", SELECT_LIST, sql_filter.clause);
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(sql_filter.params.iter()), row_to_list)?;
        let lists = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    async fn update(&self, id: &u32, patch: &ListPatch) -> DomainResult<List> {
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(DomainError::InvalidInput("Title cannot be empty".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let mut list = select_list(conn, *id)?
            .ok_or_else(|| DomainError::not_found::<List>(id))?;
        list.apply_patch(patch);

        conn.execute(
            "UPDATE lists SET title = ?1, \"order\" = ?2, updated_at = ?3 WHERE id = ?4",
            params![list.title, list.order, chrono::Utc::now().timestamp_millis(), list.id],
        )?;
        Ok(list)
    }

    async fn delete(&self, id: &u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM subtasks WHERE card_id IN (SELECT id FROM cards WHERE list_id = ?1)",
            params![id],
        )?;
        tx.execute("DELETE FROM cards WHERE list_id = ?1", params![id])?;
        tx.execute("DELETE FROM lists WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(())
    }
}
