pub mod meal_repo;
pub mod streak_repo;

pub(crate) mod rows;

pub use meal_repo::SqliteMealRepository;
pub use streak_repo::SqliteStreakRepository;
