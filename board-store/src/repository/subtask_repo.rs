//! Subtask Repository

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::{Card, DomainError, DomainResult, Entity, Filter, Subtask, SubtaskPatch};
use super::db::{require, SharedConnection};
use super::positioning::{next_position_in, RankedTable};
use super::query;
use super::traits::Repository;

const COLUMNS: &[&str] = &["id", "card_id", "title", "completed", "order"];

const SELECT_SUBTASK: &str = "SELECT id, card_id, title, completed, \"order\" FROM subtasks";

/// SQLite implementation of Subtask repository
pub struct SubtaskRepository {
    conn: SharedConnection,
}

impl SubtaskRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl RankedTable for SubtaskRepository {
    const TABLE: &'static str = "subtasks";
    const PARENT_COLUMN: &'static str = "card_id";

    fn connection(&self) -> &SharedConnection {
        &self.conn
    }
}

fn row_to_subtask(row: &Row) -> rusqlite::Result<Subtask> {
    Ok(Subtask {
        id: row.get(0)?,
        card_id: row.get(1)?,
        title: row.get(2)?,
        completed: row.get::<_, i32>(3)? != 0,
        order: row.get(4)?,
    })
}

fn select_subtask(conn: &Connection, id: u32) -> DomainResult<Option<Subtask>> {
    let query = format!("{} WHERE id = ?1", SELECT_SUBTASK);
    Ok(conn.query_row(&query, params![id], row_to_subtask).optional()?)
}

#[async_trait]
impl Repository<Subtask> for SubtaskRepository {
    async fn create(&self, entity: &Subtask) -> DomainResult<Subtask> {
        if entity.title.trim().is_empty() {
            return Err(DomainError::InvalidInput("Title is required".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let card: Option<u32> = conn
            .query_row("SELECT id FROM cards WHERE id = ?1", params![entity.card_id], |row| row.get(0))
            .optional()?;
        if card.is_none() {
            return Err(DomainError::not_found::<Card>(&entity.card_id));
        }

        let order = if entity.order < 0 {
            next_position_in(conn, Self::TABLE, Self::PARENT_COLUMN, entity.card_id)?
        } else {
            entity.order
        };

        conn.execute(
            "INSERT INTO subtasks (card_id, title, completed, \"order\", updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entity.card_id,
                entity.title,
                entity.completed as i32,
                order,
                chrono::Utc::now().timestamp_millis()
            ],
        )?;

        let mut created = entity.clone();
        created.id = conn.last_insert_rowid() as u32;
        created.order = order;
        Ok(created)
    }

    async fn find_by_id(&self, id: &u32) -> DomainResult<Option<Subtask>> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;
        select_subtask(conn, *id)
    }

    async fn list(&self, filter: &Filter) -> DomainResult<Vec<Subtask>> {
        let sql_filter = query::compile(filter, COLUMNS)?;
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let query = format!("{}{}", SELECT_SUBTASK, sql_filter.clause);
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(sql_filter.params.iter()), row_to_subtask)?;
        let subtasks = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(subtasks)
    }

    async fn update(&self, id: &u32, patch: &SubtaskPatch) -> DomainResult<Subtask> {
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(DomainError::InvalidInput("Title cannot be empty".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let mut subtask = select_subtask(conn, *id)?
            .ok_or_else(|| DomainError::not_found::<Subtask>(id))?;
        subtask.apply_patch(patch);

        conn.execute(
            "UPDATE subtasks SET title = ?1, completed = ?2, \"order\" = ?3, updated_at = ?4 WHERE id = ?5",
            params![
                subtask.title,
                subtask.completed as i32,
                subtask.order,
                chrono::Utc::now().timestamp_millis(),
                subtask.id
            ],
        )?;
        Ok(subtask)
    }

    async fn delete(&self, id: &u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;
        conn.execute("DELETE FROM subtasks WHERE id = ?1", params![id])?;
        Ok(())
    }
}
