//! Member Repository
//!
//! Cache of identity-provider users. `create` is an upsert keyed by the
//! provider's user id, so repeated sign-ins refresh the profile and
//! `last_seen` instead of failing.

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::{DomainError, DomainResult, Entity, Filter, Member, MemberPatch};
use super::db::{require, SharedConnection};
use super::query;
use super::traits::Repository;

const COLUMNS: &[&str] = &["id", "company_id", "username", "last_seen"];

const SELECT_MEMBER: &str = "SELECT id, company_id, username, name, avatar, last_seen FROM members";

/// SQLite implementation of Member repository
pub struct MemberRepository {
    conn: SharedConnection,
}

impl MemberRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

fn row_to_member(row: &Row) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        company_id: row.get(1)?,
        username: row.get(2)?,
        name: row.get(3)?,
        avatar: row.get(4)?,
        last_seen: row.get(5)?,
    })
}

fn select_member(conn: &Connection, id: &str) -> DomainResult<Option<Member>> {
    let query = format!("{} WHERE id = ?1", SELECT_MEMBER);
    Ok(conn.query_row(&query, params![id], row_to_member).optional()?)
}

#[async_trait]
impl Repository<Member> for MemberRepository {
    async fn create(&self, entity: &Member) -> DomainResult<Member> {
        if entity.id.is_empty() || entity.company_id.is_empty() || entity.username.is_empty() {
            return Err(DomainError::InvalidInput(
                "Member requires id, company and username".to_string(),
            ));
        }
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        conn.execute(
            "INSERT INTO members (id, company_id, username, name, avatar, last_seen)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                company_id = excluded.company_id,
                username = excluded.username,
                name = excluded.name,
                avatar = excluded.avatar,
                last_seen = excluded.last_seen",
            params![
                entity.id,
                entity.company_id,
                entity.username,
                entity.name,
                entity.avatar,
                entity.last_seen
            ],
        )?;
        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: &String) -> DomainResult<Option<Member>> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;
        select_member(conn, id)
    }

    async fn list(&self, filter: &Filter) -> DomainResult<Vec<Member>> {
        let sql_filter = query::compile(filter, COLUMNS)?;
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let query = format!("{}{}", SELECT_MEMBER, sql_filter.clause);
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(sql_filter.params.iter()), row_to_member)?;
        let members = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    async fn update(&self, id: &String, patch: &MemberPatch) -> DomainResult<Member> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;

        let mut member = select_member(conn, id)?
            .ok_or_else(|| DomainError::not_found::<Member>(id))?;
        member.apply_patch(patch);

        conn.execute(
            "UPDATE members SET username = ?1, name = ?2, avatar = ?3, last_seen = ?4 WHERE id = ?5",
            params![member.username, member.name, member.avatar, member.last_seen, member.id],
        )?;
        Ok(member)
    }

    async fn delete(&self, id: &String) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = require(&guard)?;
        conn.execute("DELETE FROM members WHERE id = ?1", params![id])?;
        Ok(())
    }
}
