//! Board Store
//!
//! Layered architecture:
//! - domain: Core entities, filters and errors
//! - repository: Record store boundary with SQLite and in-memory backends

use std::path::{Path, PathBuf};

pub mod domain;
pub mod repository;

pub use domain::*;
pub use repository::{
    init_db, BoardRepository, CardRepository, DbState, ListRepository, MemberRepository,
    MemoryRepository, PositioningOperations, RankedTable, Repositories, Repository,
    SharedConnection, SubtaskRepository,
};

/// Database file name inside the data directory
pub const DB_FILE: &str = "taskboard.db";

/// Database path for a data directory
pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE)
}

/// Install the rolling file logger under `<data_dir>/logs`
pub fn init_logging(data_dir: &Path) -> Result<(), String> {
    rolling_logger::init_logger(data_dir.join("logs"), "TaskBoard")
}

/// Open (creating if needed) the database in `data_dir`
pub async fn open(data_dir: &Path) -> Result<DbState, String> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| format!("Failed to create {}: {}", data_dir.display(), e))?;

    match init_db(&db_path(data_dir)).await {
        Ok(state) => {
            let _ = rolling_logger::info("Database init success");
            Ok(state)
        }
        Err(e) => {
            let _ = rolling_logger::error(&format!("Database init failed: {}", e));
            Err(e)
        }
    }
}
