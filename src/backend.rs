//! Persistence Adapter
//!
//! One `Repository` per entity behind trait objects, so the store runs
//! against SQLite, the in-memory store or a test double alike.

use std::sync::Arc;

use board_store::{
    Board, Card, Entity, List, Member, MemoryRepository, Repositories, Repository, Subtask,
};

#[derive(Clone)]
pub struct Backend {
    pub boards: Arc<dyn Repository<Board>>,
    pub lists: Arc<dyn Repository<List>>,
    pub cards: Arc<dyn Repository<Card>>,
    pub subtasks: Arc<dyn Repository<Subtask>>,
    pub members: Arc<dyn Repository<Member>>,
}

impl Backend {
    /// Everything in memory, nothing persisted
    pub fn memory() -> Self {
        Self {
            boards: Arc::new(MemoryRepository::<Board>::new()),
            lists: Arc::new(MemoryRepository::<List>::new()),
            cards: Arc::new(MemoryRepository::<Card>::new()),
            subtasks: Arc::new(MemoryRepository::<Subtask>::new()),
            members: Arc::new(MemoryRepository::<Member>::new()),
        }
    }
}

impl From<Repositories> for Backend {
    fn from(repos: Repositories) -> Self {
        Self {
            boards: repos.boards,
            lists: repos.lists,
            cards: repos.cards,
            subtasks: repos.subtasks,
            members: repos.members,
        }
    }
}

/// Entities the backend stores
pub trait Persisted: Entity {
    fn repository(backend: &Backend) -> &Arc<dyn Repository<Self>>;
}

macro_rules! persisted {
    ($entity:ty, $field:ident) => {
        impl Persisted for $entity {
            fn repository(backend: &Backend) -> &Arc<dyn Repository<Self>> {
                &backend.$field
            }
        }
    };
}

persisted!(Board, boards);
persisted!(List, lists);
persisted!(Card, cards);
persisted!(Subtask, subtasks);
persisted!(Member, members);
