#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dietlog_domain::meal::Meal;
use dietlog_domain::shared::UserId;
use dietlog_infrastructure::persistence::{Database, SqliteDiaryUnitOfWork, UserLockRegistry};
use sqlx::SqlitePool;

/// Migrated private in-memory database
pub async fn setup_in_memory_db() -> SqlitePool {
    let db = Database::in_memory().await.expect("open in-memory db");
    db.run_migrations().await.expect("run migrations");
    db.pool().clone()
}

pub fn unit_of_work(pool: &SqlitePool) -> SqliteDiaryUnitOfWork {
    SqliteDiaryUnitOfWork::new(
        Arc::new(pool.clone()),
        UserLockRegistry::new(),
        Duration::from_secs(5),
    )
}

pub fn meal_at(user_id: &UserId, name: &str, within_diet: bool, eaten_at: DateTime<Utc>) -> Meal {
    Meal::new(
        user_id.clone(),
        name.to_string(),
        String::new(),
        eaten_at,
        within_diet,
    )
    .expect("valid meal")
}
