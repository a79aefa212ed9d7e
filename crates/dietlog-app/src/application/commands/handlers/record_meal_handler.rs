use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::meal_commands::*;
use crate::application::dtos::{MealDto, StreakDto};
use crate::application::services::StreakTracker;
use crate::application::utils::user_id_from;
use dietlog_domain::meal::Meal;
use dietlog_domain::shared::transaction::{DiaryTransaction, DiaryUnitOfWork};
use dietlog_domain::shared::DomainError;
use dietlog_domain::streak::StreakTransition;

/// Record meal command handler
///
/// The meal insert and the streak write share one diary transaction, so a
/// failed streak update also discards the meal.
pub struct RecordMealCommandHandler {
    uow: Arc<dyn DiaryUnitOfWork>,
    tracker: Arc<StreakTracker>,
}

impl RecordMealCommandHandler {
    pub fn new(uow: Arc<dyn DiaryUnitOfWork>, tracker: Arc<StreakTracker>) -> Self {
        Self { uow, tracker }
    }

    async fn write(
        &self,
        tx: &mut dyn DiaryTransaction,
        meal: &Meal,
    ) -> Result<StreakTransition, DomainError> {
        tx.insert_meal(meal).await?;
        self.tracker.apply_within(tx, meal.is_within_diet()).await
    }
}

#[async_trait]
impl CommandHandler<RecordMealCommand> for RecordMealCommandHandler {
    type Result = RecordMealResult;

    async fn handle(&self, cmd: RecordMealCommand) -> Result<Self::Result, DomainError> {
        info!("Handling RecordMealCommand for user: {}", cmd.user_id);

        // 1. Build the meal aggregate
        let user_id = user_id_from(&cmd.user_id)?;
        let meal = Meal::new(
            user_id.clone(),
            cmd.name,
            cmd.description.unwrap_or_default(),
            cmd.eaten_at.unwrap_or_else(Utc::now),
            cmd.within_diet,
        )?;

        // 2. Open the user's write scope
        let mut tx = self.uow.begin(&user_id).await?;

        // 3. Insert the meal and apply the streak transition
        let written = self.write(tx.as_mut(), &meal).await;
        let transition = match written {
            Ok(transition) => transition,
            Err(e) => {
                warn!(
                    "Recording meal {} for user {} failed: {}",
                    meal.id(),
                    user_id,
                    e.format_with_code()
                );
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback for user {} failed: {}", user_id, rollback_err);
                }
                return Err(e);
            }
        };

        // 4. Commit both writes together
        tx.commit().await?;

        info!(
            "Meal recorded: {} ({}) for user {} - streak {} at {}",
            meal.name(),
            meal.id(),
            user_id,
            transition.kind(),
            transition.record().count()
        );

        Ok(RecordMealResult {
            meal: MealDto::from(&meal),
            streak: StreakDto::from(transition.record()),
            streak_change: transition.kind().to_string(),
        })
    }
}
