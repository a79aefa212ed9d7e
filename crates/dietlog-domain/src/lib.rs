// Domain layer - Pure business logic
// No dependencies on infrastructure or application layers

pub mod meal;
pub mod shared;
pub mod streak;

// Re-exports for convenience
pub use shared::{DomainError, MealId, StreakId, UserId};
