//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO storage dependencies.

mod entity;
mod filter;
mod board;
mod list;
mod card;
mod subtask;
mod member;

pub use entity::{Entity, DomainError, DomainResult, APPEND};
pub use filter::{Condition, FieldValue, Filter, OrderBy};
pub use board::{Board, BoardPatch};
pub use list::{List, ListPatch};
pub use card::{Card, CardPatch, TaskStatus};
pub use subtask::{Subtask, SubtaskPatch};
pub use member::{Member, MemberPatch};
