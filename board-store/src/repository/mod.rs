//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod query;
mod positioning;
mod board_repo;
mod list_repo;
mod card_repo;
mod subtask_repo;
mod member_repo;
mod memory;

#[cfg(test)]
mod tests;

pub use traits::{PositioningOperations, Repository};
pub use db::{init_db, DbState, Repositories, SharedConnection};
pub use positioning::RankedTable;
pub use board_repo::BoardRepository;
pub use list_repo::ListRepository;
pub use card_repo::CardRepository;
pub use subtask_repo::SubtaskRepository;
pub use member_repo::MemberRepository;
pub use memory::MemoryRepository;
