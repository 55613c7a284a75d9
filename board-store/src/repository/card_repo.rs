//! Card Repository
//!
//! SQLite-backed implementation for Card CRUD operations.
//! Assignees are stored as a JSON array of user ids.

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::{
    Card, CardPatch, DomainError, DomainResult, Entity, Filter, List, TaskStatus,
};
use super::db::{require, SharedConnection};
use super::positioning::{next_position_in, RankedTable};
use super::query;
use super::traits::Repository;

const COLUMNS: &[&str] = &["id", "list_id", "title", "status", "created_by", "created_at", "order"];

const SELECT_CARD: &str = "SELECT id, list_id, title, description, status, assigned_to, created_by, created_at, \"order\"
     FROM cards";

/// SQLite implementation of Card repository
pub struct CardRepository {
    conn: SharedConnection,
}

impl CardRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl RankedTable for CardRepository {
    const TABLE: &'static str = "cards";
    const PARENT_COLUMN: &'static str = "list_id";

    fn connection(&self) -> &SharedConnection {
        &self.conn
    }
}

fn row_to_card(row: &Row) -> rusqlite::Result<Card> {
    let status: String = row.get(4)?;
    let assigned_to: String = row.get(5)?;
    Ok(Card {
        id: row.get(0)?,
        list_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: TaskStatus::from_str(&status),
        assigned_to: serde_json::from_str(&assigned_to).unwrap_or_default(),
        created_by: row.get(6)?,
        created_at: row.get(7)?,
        order: row.get(8)?,
    })
}

fn select_card(conn: &Connection, id: u32) -> DomainResult<Option<Card>> {
    let query = format!("{} WHERE id = ?1", SELECT_CARD);
    Ok(conn.query_row(&query, params![id], row_to_card).optional()?)
}

fn list_exists(conn: &Connection, list_id: u32) -> DomainResult<bool> {
    let found: Option<u32> = conn
        .query_row("SELECT id FROM lists WHERE id = ?1", params![list_id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn assignees_json(assigned_to: &[String]) -> DomainResult<String> {
    serde_json::to_string(assigned_to).map_err(|e| DomainError::Internal(e.to_string()))
}

#[async_trait]
impl Repository<Card> for CardRepository {
    async fn create(&self, entity: &Card) -> DomainResult<Card> {
        if entity.title.trim().is_empty() {
            return Err(DomainError::InvalidInput("Title is required".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        if !list_exists(conn, entity.list_id)? {
            return Err(DomainError::not_found::<List>(&entity.list_id));
        }

        let order = if entity.order < 0 {
            next_position_in(conn, Self::TABLE, Self::PARENT_COLUMN, entity.list_id)?
        } else {
            entity.order
        };

        conn.execute(
            "INSERT INTO cards (list_id, title, description, status, assigned_to, created_by, created_at, \"order\", updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entity.list_id,
                entity.title,
                entity.description,
                entity.status.as_str(),
                assignees_json(&entity.assigned_to)?,
                entity.created_by,
                entity.created_at,
                order,
                chrono::Utc::now().timestamp_millis()
            ],
        )?;

        let mut created = entity.clone();
        created.id = conn.last_insert_rowid() as u32;
        created.order = order;
        Ok(created)
    }

    async fn find_by_id(&self, id: &u32) -> DomainResult<Option<Card>> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;
        select_card(conn, *id)
    }

    async fn list(&self, filter: &Filter) -> DomainResult<Vec<Card>> {
        let sql_filter = query::compile(filter, COLUMNS)?;
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let query = format!("{}{}", SELECT_CARD, sql_filter.clause);
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(sql_filter.params.iter()), row_to_card)?;
        let cards = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    async fn update(&self, id: &u32, patch: &CardPatch) -> DomainResult<Card> {
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(DomainError::InvalidInput("Title cannot be empty".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let mut card = select_card(conn, *id)?
            .ok_or_else(|| DomainError::not_found::<Card>(id))?;
        card.apply_patch(patch);

        conn.execute(
            "UPDATE cards SET list_id = ?1, title = ?2, description = ?3, status = ?4, assigned_to = ?5,
                    \"order\" = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                card.list_id,
                card.title,
                card.description,
                card.status.as_str(),
                assignees_json(&card.assigned_to)?,
                card.order,
                chrono::Utc::now().timestamp_millis(),
                card.id
            ],
        )?;
        Ok(card)
    }

    async fn delete(&self, id: &u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM subtasks WHERE card_id = ?1", params![id])?;
        tx.execute("DELETE FROM cards WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(())
    }
}
