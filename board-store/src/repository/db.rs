//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};
use super::{BoardRepository, CardRepository, ListRepository, MemberRepository, SubtaskRepository};

/// Connection slot shared by every repository
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
    pub path: PathBuf,
}

/// One repository per entity, all on the same connection
#[derive(Clone)]
pub struct Repositories {
    pub boards: Arc<BoardRepository>,
    pub lists: Arc<ListRepository>,
    pub cards: Arc<CardRepository>,
    pub subtasks: Arc<SubtaskRepository>,
    pub members: Arc<MemberRepository>,
}

impl DbState {
    /// Create an empty (uninitialized) state for `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            path,
        }
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            boards: Arc::new(BoardRepository::new(self.conn.clone())),
            lists: Arc::new(ListRepository::new(self.conn.clone())),
            cards: Arc::new(CardRepository::new(self.conn.clone())),
            subtasks: Arc::new(SubtaskRepository::new(self.conn.clone())),
            members: Arc::new(MemberRepository::new(self.conn.clone())),
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

/// Borrow the live connection out of a locked slot
pub(crate) fn require(slot: &Option<Connection>) -> DomainResult<&Connection> {
    slot.as_ref()
        .ok_or_else(|| DomainError::Internal("Database not initialized".to_string()))
}

/// Initialize database with path. `":memory:"` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = Connection::open(db_path)
        .map_err(|e| format!("Failed to open {}: {}", db_path.display(), e))?;

    run_migrations(&conn)?;
    log::info!("Database ready at {}", db_path.display());

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(names) = stmt.query_map([], |row| row.get::<_, String>(1)) else {
        return false;
    };
    let found = names.flatten().any(|name| name == column);
    found
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS boards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            company_id TEXT NOT NULL,
            title TEXT NOT NULL,
            created_by TEXT,
            members TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            board_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            "order" INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER
        );
        CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            list_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'not_started',
            assigned_to TEXT NOT NULL DEFAULT '[]',
            created_by TEXT,
            created_at INTEGER NOT NULL,
            "order" INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER
        );
        CREATE TABLE IF NOT EXISTS subtasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            card_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            "order" INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER
        );
        CREATE TABLE IF NOT EXISTS members (
            id TEXT PRIMARY KEY,
            company_id TEXT NOT NULL,
            username TEXT NOT NULL,
            name TEXT,
            avatar TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_boards_company ON boards(company_id);
        CREATE INDEX IF NOT EXISTS idx_lists_board ON lists(board_id);
        CREATE INDEX IF NOT EXISTS idx_cards_list ON cards(list_id);
        CREATE INDEX IF NOT EXISTS idx_subtasks_card ON subtasks(card_id);
        "#,
    )
    .map_err(|e| e.to_string())?;

    // Member cache rows written before presence tracking have no last_seen
    if !column_exists(conn, "members", "last_seen") {
        conn.execute("ALTER TABLE members ADD COLUMN last_seen INTEGER NOT NULL DEFAULT 0", [])
            .map_err(|e| format!("Failed to add last_seen: {}", e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_add_last_seen_once() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE members (id TEXT PRIMARY KEY, company_id TEXT NOT NULL, username TEXT NOT NULL, name TEXT, avatar TEXT);",
        )
        .unwrap();
        assert!(column_exists(&conn, "members", "username"));
        assert!(!column_exists(&conn, "members", "last_seen"));
        assert!(!column_exists(&conn, "nope", "id"));

        run_migrations(&conn).unwrap();
        assert!(column_exists(&conn, "members", "last_seen"));
        // Re-running finds the column and leaves it alone
        run_migrations(&conn).unwrap();
    }
}
