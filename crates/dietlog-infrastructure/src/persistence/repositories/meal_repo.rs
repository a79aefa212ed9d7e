use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

use super::rows::MealRow;
use crate::persistence::RepositoryErrorMapper;
use dietlog_domain::meal::{Meal, MealCounts, MealRepository};
use dietlog_domain::shared::{DomainError, MealId, Page, PageRequest, UserId};

pub struct SqliteMealRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteMealRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

fn to_count(value: i64, what: &str) -> Result<u64, DomainError> {
    u64::try_from(value)
        .map_err(|_| DomainError::DataIntegrity(format!("Negative {} count: {}", what, value)))
}

#[async_trait]
impl MealRepository for SqliteMealRepository {
    async fn find_by_id(
        &self,
        id: &MealId,
        user_id: &UserId,
    ) -> Result<Option<Meal>, DomainError> {
        let query = r#"
            SELECT id, user_id, name, description, eaten_at, within_diet, created_at, updated_at
            FROM meals
            WHERE id = ?1 AND user_id = ?2
        "#;

        let row: Option<MealRow> = sqlx::query_as(query)
            .bind(id.as_str())
            .bind(user_id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find meal by ID"))?;

        Ok(row.map(MealRow::into_meal))
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Meal>, DomainError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meals WHERE user_id = ?1")
            .bind(user_id.as_str())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Count meals"))?;

        let query = r#"
            SELECT id, user_id, name, description, eaten_at, within_diet, created_at, updated_at
            FROM meals
            WHERE user_id = ?1
            ORDER BY eaten_at DESC, created_at DESC
            LIMIT ?2 OFFSET ?3
        "#;

        let offset = i64::try_from(page.offset()).map_err(|_| {
            DomainError::InvalidInput(format!("Page {} is out of range", page.current_page()))
        })?;

        let rows: Vec<MealRow> = sqlx::query_as(query)
            .bind(user_id.as_str())
            .bind(i64::from(page.page_size()))
            .bind(offset)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "List meals by user"))?;

        let items = rows.into_iter().map(MealRow::into_meal).collect();
        Ok(Page::new(items, page, to_count(total, "meal")?))
    }

    async fn update(&self, meal: &Meal) -> Result<(), DomainError> {
        let query = r#"
            UPDATE meals
            SET name = ?1, description = ?2, eaten_at = ?3, within_diet = ?4, updated_at = ?5
            WHERE id = ?6 AND user_id = ?7
        "#;

        let result = sqlx::query(query)
            .bind(meal.name())
            .bind(meal.description())
            .bind(meal.eaten_at())
            .bind(meal.is_within_diet())
            .bind(meal.updated_at())
            .bind(meal.id().as_str())
            .bind(meal.user_id().as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Update meal"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MealNotFound(meal.id().to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &MealId, user_id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM meals WHERE id = ?1 AND user_id = ?2")
            .bind(id.as_str())
            .bind(user_id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Delete meal"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<MealCounts, DomainError> {
        let query = r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN within_diet = 1 THEN 1 ELSE 0 END), 0)
            FROM meals
            WHERE user_id = ?1
        "#;

        let (total, within): (i64, i64) = sqlx::query_as(query)
            .bind(user_id.as_str())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Count meals by diet"))?;

        Ok(MealCounts {
            total: to_count(total, "meal")?,
            within_diet: to_count(within, "within-diet meal")?,
        })
    }
}
