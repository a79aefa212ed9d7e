use chrono::{DateTime, Utc};
use sqlx::FromRow;

use dietlog_domain::meal::Meal;
use dietlog_domain::shared::{DomainError, MealId, StreakId, UserId};
use dietlog_domain::streak::StreakRecord;

#[derive(FromRow)]
pub(crate) struct StreakRow {
    id: String,
    user_id: String,
    count: i64,
    active: bool,
    started_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StreakRow {
    pub(crate) fn try_into_record(self) -> Result<StreakRecord, DomainError> {
        let count = u64::try_from(self.count).map_err(|_| {
            DomainError::DataIntegrity(format!(
                "Streak {} has a negative count ({})",
                self.id, self.count
            ))
        })?;

        Ok(StreakRecord::restore(
            StreakId::from_string(&self.id),
            UserId::from_string(&self.user_id),
            count,
            self.active,
            self.started_at,
            self.updated_at,
        ))
    }
}

/// Convert a lookup of active rows, rejecting more than one
pub(crate) fn single_active(
    user_id: &UserId,
    rows: Vec<StreakRow>,
) -> Result<Option<StreakRecord>, DomainError> {
    if rows.len() > 1 {
        return Err(DomainError::StateCorruption(format!(
            "User {} has {} active streak records",
            user_id,
            rows.len()
        )));
    }

    rows.into_iter().next().map(StreakRow::try_into_record).transpose()
}

pub(crate) fn count_to_db(record: &StreakRecord) -> Result<i64, DomainError> {
    i64::try_from(record.count()).map_err(|_| {
        DomainError::DataIntegrity(format!(
            "Streak {} count {} does not fit the store",
            record.id(),
            record.count()
        ))
    })
}

#[derive(FromRow)]
pub(crate) struct MealRow {
    id: String,
    user_id: String,
    name: String,
    description: String,
    eaten_at: DateTime<Utc>,
    within_diet: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl MealRow {
    pub(crate) fn into_meal(self) -> Meal {
        Meal::restore(
            MealId::from_string(&self.id),
            UserId::from_string(&self.user_id),
            self.name,
            self.description,
            self.eaten_at,
            self.within_diet,
            self.created_at,
            self.updated_at,
        )
    }
}
