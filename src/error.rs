//! Store Errors

use board_store::DomainError;

/// Failures of store actions. The user-visible side of each failure is
/// already reported through the notifier by the time it is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("No active session")]
    NoSession,
    #[error("Not permitted: {0}")]
    NotPermitted(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not in cache: {0}")]
    NotCached(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
