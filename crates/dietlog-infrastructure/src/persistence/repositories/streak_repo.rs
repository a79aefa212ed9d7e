use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::rows::{single_active, StreakRow};
use crate::persistence::RepositoryErrorMapper;
use dietlog_domain::shared::{DomainError, UserId};
use dietlog_domain::streak::{StreakRecord, StreakRepository};

pub struct SqliteStreakRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteStreakRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StreakRepository for SqliteStreakRepository {
    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StreakRecord>, DomainError> {
        let query = r#"
            SELECT id, user_id, count, active, started_at, updated_at
            FROM diet_streaks
            WHERE user_id = ?1 AND active = 1
            LIMIT 2
        "#;

        let rows: Vec<StreakRow> = sqlx::query_as(query)
            .bind(user_id.as_str())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find active streak by user"))?;

        single_active(user_id, rows)
    }

    async fn max_count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let query = r#"
            SELECT COALESCE(MAX(count), 0)
            FROM diet_streaks
            WHERE user_id = ?1
        "#;

        let (max,): (i64,) = sqlx::query_as(query)
            .bind(user_id.as_str())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find longest streak"))?;

        u64::try_from(max).map_err(|_| {
            DomainError::DataIntegrity(format!(
                "User {} has a negative streak count ({})",
                user_id, max
            ))
        })
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<StreakRecord>, DomainError> {
        let query = r#"
            SELECT id, user_id, count, active, started_at, updated_at
            FROM diet_streaks
            WHERE user_id = ?1
            ORDER BY started_at ASC, rowid ASC
        "#;

        let rows: Vec<StreakRow> = sqlx::query_as(query)
            .bind(user_id.as_str())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "List streaks by user"))?;

        rows.into_iter().map(StreakRow::try_into_record).collect()
    }
}
