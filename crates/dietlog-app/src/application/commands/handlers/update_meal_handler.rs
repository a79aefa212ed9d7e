use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::meal_commands::*;
use crate::application::dtos::MealDto;
use crate::application::utils::{meal_id_from, user_id_from};
use dietlog_domain::meal::{MealChanges, MealRepository};
use dietlog_domain::shared::DomainError;

/// Update meal command handler
///
/// Streak history is left as recorded, even when `within_diet` flips.
pub struct UpdateMealCommandHandler {
    meal_repo: Arc<dyn MealRepository>,
}

impl UpdateMealCommandHandler {
    pub fn new(meal_repo: Arc<dyn MealRepository>) -> Self {
        Self { meal_repo }
    }
}

#[async_trait]
impl CommandHandler<UpdateMealCommand> for UpdateMealCommandHandler {
    type Result = UpdateMealResult;

    async fn handle(&self, cmd: UpdateMealCommand) -> Result<Self::Result, DomainError> {
        info!("Handling UpdateMealCommand for meal: {}", cmd.meal_id);

        let user_id = user_id_from(&cmd.user_id)?;
        let meal_id = meal_id_from(&cmd.meal_id)?;

        let mut meal = self
            .meal_repo
            .find_by_id(&meal_id, &user_id)
            .await?
            .ok_or_else(|| DomainError::MealNotFound(meal_id.to_string()))?;

        meal.apply_changes(MealChanges {
            name: cmd.name,
            description: cmd.description,
            eaten_at: cmd.eaten_at,
            within_diet: cmd.within_diet,
        })?;

        self.meal_repo.update(&meal).await?;

        info!("Meal updated successfully: {}", meal.id());

        Ok(UpdateMealResult {
            meal: MealDto::from(&meal),
        })
    }
}
