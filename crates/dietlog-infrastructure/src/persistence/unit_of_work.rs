use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction as SqlxTransaction};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::repositories::rows::{count_to_db, single_active, StreakRow};
use super::{RepositoryErrorMapper, UserLockGuard, UserLockRegistry};
use dietlog_domain::meal::Meal;
use dietlog_domain::shared::transaction::{ensure_same_user, DiaryTransaction, DiaryUnitOfWork};
use dietlog_domain::shared::{DomainError, UserId};
use dietlog_domain::streak::StreakRecord;

/// SQLite implementation of the diary Unit of Work.
///
/// A scope holds the user's in-process lock and a `BEGIN IMMEDIATE`
/// transaction, which takes the database write lock up front so two
/// scopes never deadlock upgrading from a read.
pub struct SqliteDiaryUnitOfWork {
    pool: Arc<SqlitePool>,
    locks: Arc<UserLockRegistry>,
    lock_timeout: Duration,
}

impl SqliteDiaryUnitOfWork {
    pub fn new(pool: Arc<SqlitePool>, locks: Arc<UserLockRegistry>, lock_timeout: Duration) -> Self {
        Self {
            pool,
            locks,
            lock_timeout,
        }
    }
}

#[async_trait]
impl DiaryUnitOfWork for SqliteDiaryUnitOfWork {
    async fn begin(&self, user_id: &UserId) -> Result<Box<dyn DiaryTransaction>, DomainError> {
        let started = Instant::now();
        let guard = self.locks.acquire(user_id, self.lock_timeout).await?;

        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Begin diary transaction"))?;

        debug!(
            user_id = %user_id,
            waited_ms = started.elapsed().as_millis() as u64,
            "Diary transaction started"
        );

        Ok(Box::new(SqliteDiaryTransaction {
            tx,
            user_id: user_id.clone(),
            _guard: guard,
        }))
    }
}

/// One user's open write scope.
///
/// Field order matters: the transaction is dropped (and rolled back) before
/// the user lock is released.
pub struct SqliteDiaryTransaction {
    tx: SqlxTransaction<'static, Sqlite>,
    user_id: UserId,
    _guard: UserLockGuard,
}

#[async_trait]
impl DiaryTransaction for SqliteDiaryTransaction {
    fn user_id(&self) -> &UserId {
        &self.user_id
    }

    async fn insert_meal(&mut self, meal: &Meal) -> Result<(), DomainError> {
        ensure_same_user(&self.user_id, meal.user_id(), "Meal")?;

        let query = r#"
            INSERT INTO meals (
                id, user_id, name, description, eaten_at, within_diet, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#;

        sqlx::query(query)
            .bind(meal.id().as_str())
            .bind(meal.user_id().as_str())
            .bind(meal.name())
            .bind(meal.description())
            .bind(meal.eaten_at())
            .bind(meal.is_within_diet())
            .bind(meal.created_at())
            .bind(meal.updated_at())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Insert meal"))?;

        Ok(())
    }

    async fn find_active_streak(&mut self) -> Result<Option<StreakRecord>, DomainError> {
        let query = r#"
            SELECT id, user_id, count, active, started_at, updated_at
            FROM diet_streaks
            WHERE user_id = ?1 AND active = 1
            LIMIT 2
        "#;

        let rows: Vec<StreakRow> = sqlx::query_as(query)
            .bind(self.user_id.as_str())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find active streak"))?;

        single_active(&self.user_id, rows)
    }

    async fn insert_streak(&mut self, record: &StreakRecord) -> Result<(), DomainError> {
        ensure_same_user(&self.user_id, record.user_id(), "Streak")?;

        let query = r#"
            INSERT INTO diet_streaks (id, user_id, count, active, started_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#;

        let result = sqlx::query(query)
            .bind(record.id().as_str())
            .bind(record.user_id().as_str())
            .bind(count_to_db(record)?)
            .bind(record.is_active())
            .bind(record.started_at())
            .bind(record.updated_at())
            .execute(&mut *self.tx)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let mapped = RepositoryErrorMapper::map_sqlx_error(e, "Insert streak");
                if RepositoryErrorMapper::is_unique_violation(&mapped) && record.is_active() {
                    warn!(user_id = %self.user_id, "Second active streak rejected by the store");
                    return Err(DomainError::StateCorruption(format!(
                        "User {} already has an active streak",
                        self.user_id
                    )));
                }
                Err(mapped)
            }
        }
    }

    async fn update_streak(&mut self, record: &StreakRecord) -> Result<(), DomainError> {
        ensure_same_user(&self.user_id, record.user_id(), "Streak")?;

        // Closed episodes are history; only the active row may change.
        let query = r#"
            UPDATE diet_streaks
            SET count = ?1, active = ?2, updated_at = ?3
            WHERE id = ?4 AND user_id = ?5 AND active = 1
        "#;

        let result = sqlx::query(query)
            .bind(count_to_db(record)?)
            .bind(record.is_active())
            .bind(record.updated_at())
            .bind(record.id().as_str())
            .bind(self.user_id.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Update streak"))?;

        if result.rows_affected() != 1 {
            return Err(DomainError::StateCorruption(format!(
                "Streak {} is not an active record of user {}",
                record.id(),
                self.user_id
            )));
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let SqliteDiaryTransaction {
            tx,
            user_id,
            _guard,
        } = *self;

        tx.commit()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Commit diary transaction"))?;

        debug!(user_id = %user_id, "Diary transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        let SqliteDiaryTransaction {
            tx,
            user_id,
            _guard,
        } = *self;

        tx.rollback()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Rollback diary transaction"))?;

        debug!(user_id = %user_id, "Diary transaction rolled back");
        Ok(())
    }
}
