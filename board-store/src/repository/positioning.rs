//! Positioning Operations
//!
//! Operations for managing sibling ranks of lists, cards and subtasks.

use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::domain::DomainResult;
use super::db::{require, SharedConnection};
use super::traits::PositioningOperations;

/// A table whose rows are ranked by `"order"` under a parent column
pub trait RankedTable {
    const TABLE: &'static str;
    const PARENT_COLUMN: &'static str;

    fn connection(&self) -> &SharedConnection;
}

/// `max(order) + 1` under `parent_id`, or 0 when the parent has no children
pub(super) fn next_position_in(
    conn: &Connection,
    table: &str,
    parent_column: &str,
    parent_id: u32,
) -> DomainResult<i32> {
    let query = format!(
        "SELECT COALESCE(MAX(\"order\"), -1) + 1 FROM {} WHERE {} = ?1",
        table, parent_column
    );
    Ok(conn.query_row(&query, params![parent_id], |row| row.get(0))?)
}

/// Renumber the children of `parent_id` to 0..n-1, keeping their current sequence
pub(super) fn reindex_in(
    conn: &Connection,
    table: &str,
    parent_column: &str,
    parent_id: u32,
) -> DomainResult<()> {
    let ids: Vec<u32> = {
        let query = format!(
            "SELECT id FROM {} WHERE {} = ?1 ORDER BY \"order\", id",
            table, parent_column
        );
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params![parent_id], |row| row.get(0))?;
        rows.collect::<Result<_, _>>()?
    };

    let update = format!("UPDATE {} SET \"order\" = ?1, updated_at = ?2 WHERE id = ?3", table);
    let now = chrono::Utc::now().timestamp_millis();
    for (new_pos, id) in ids.iter().enumerate() {
        conn.execute(&update, params![new_pos as i32, now, *id])?;
    }
    Ok(())
}

#[async_trait]
impl<R> PositioningOperations for R
where
    R: RankedTable + Send + Sync,
{
    async fn next_position(&self, parent_id: u32) -> DomainResult<i32> {
        let guard = self.connection().lock().await;
        let conn = require(&guard)?;
        next_position_in(conn, R::TABLE, R::PARENT_COLUMN, parent_id)
    }

    async fn reindex(&self, parent_id: u32) -> DomainResult<()> {
        let guard = self.connection().lock().await;
        let conn = require(&guard)?;
        reindex_in(conn, R::TABLE, R::PARENT_COLUMN, parent_id)
    }
}
