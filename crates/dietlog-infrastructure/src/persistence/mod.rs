pub mod repositories;

mod database;
mod error_mapper;
mod unit_of_work;
mod user_locks;

pub use database::Database;
pub use error_mapper::RepositoryErrorMapper;
pub use unit_of_work::{SqliteDiaryTransaction, SqliteDiaryUnitOfWork};
pub use user_locks::{UserLockGuard, UserLockRegistry};
