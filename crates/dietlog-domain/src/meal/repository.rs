use async_trait::async_trait;

use super::{Meal, MealCounts};
use crate::shared::{DomainError, MealId, Page, PageRequest, UserId};

/// Meal persistence outside of the streak write scope.
///
/// Inserting a meal goes through `DiaryTransaction::insert_meal` so the meal
/// and its streak update commit together.
#[async_trait]
pub trait MealRepository: Send + Sync {
    /// Find a meal owned by `user_id`
    async fn find_by_id(&self, id: &MealId, user_id: &UserId)
        -> Result<Option<Meal>, DomainError>;

    /// Page through a user's meals, most recent first
    async fn list_by_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Meal>, DomainError>;

    async fn update(&self, meal: &Meal) -> Result<(), DomainError>;

    /// Delete a meal owned by `user_id`. Returns false when nothing matched.
    async fn delete(&self, id: &MealId, user_id: &UserId) -> Result<bool, DomainError>;

    async fn count_by_user(&self, user_id: &UserId) -> Result<MealCounts, DomainError>;
}
