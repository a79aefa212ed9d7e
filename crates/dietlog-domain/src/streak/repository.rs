use async_trait::async_trait;

use super::StreakRecord;
use crate::shared::{DomainError, UserId};

/// Read side of the streak record store.
///
/// Writes go through a `DiaryTransaction` so they always run inside a
/// per-user write scope.
#[async_trait]
pub trait StreakRepository: Send + Sync {
    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StreakRecord>, DomainError>;

    /// Maximum `count` over every record of the user, active or closed.
    /// Returns 0 for a user without records.
    async fn max_count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError>;

    /// All episodes of a user, oldest first
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<StreakRecord>, DomainError>;
}
