use async_trait::async_trait;

use super::{DomainError, UserId};
use crate::meal::Meal;
use crate::streak::StreakRecord;

/// A write scope over one user's diary.
///
/// Every write issued through a transaction becomes visible on `commit` and is
/// discarded on `rollback` or drop. Implementations hold a per-user exclusion
/// for the whole lifetime of the transaction, so the read-modify-write of the
/// active streak record never interleaves with another scope of the same user.
#[async_trait]
pub trait DiaryTransaction: Send {
    /// The user this scope is bound to
    fn user_id(&self) -> &UserId;

    async fn insert_meal(&mut self, meal: &Meal) -> Result<(), DomainError>;

    /// Find the scoped user's active streak record.
    ///
    /// More than one active record is reported as `StateCorruption`.
    async fn find_active_streak(&mut self) -> Result<Option<StreakRecord>, DomainError>;

    async fn insert_streak(&mut self, record: &StreakRecord) -> Result<(), DomainError>;

    /// Update `count`/`active` of an existing record by id
    async fn update_streak(&mut self, record: &StreakRecord) -> Result<(), DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}

/// Unit of Work for managing per-user transactional boundaries
#[async_trait]
pub trait DiaryUnitOfWork: Send + Sync {
    /// Begin a write scope for `user_id`.
    ///
    /// Waits for any other open scope of the same user. Scopes of different
    /// users never wait on each other here.
    async fn begin(&self, user_id: &UserId) -> Result<Box<dyn DiaryTransaction>, DomainError>;
}

/// Reject rows that belong to another user than the one a scope is bound to.
pub fn ensure_same_user(scope: &UserId, owner: &UserId, what: &str) -> Result<(), DomainError> {
    if scope != owner {
        return Err(DomainError::Validation(format!(
            "{} belongs to user {} but the write scope is bound to user {}",
            what, owner, scope
        )));
    }
    Ok(())
}
