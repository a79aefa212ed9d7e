use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::meal_commands::*;
use crate::application::utils::{meal_id_from, user_id_from};
use dietlog_domain::meal::MealRepository;
use dietlog_domain::shared::DomainError;

/// Delete meal command handler
pub struct DeleteMealCommandHandler {
    meal_repo: Arc<dyn MealRepository>,
}

impl DeleteMealCommandHandler {
    pub fn new(meal_repo: Arc<dyn MealRepository>) -> Self {
        Self { meal_repo }
    }
}

#[async_trait]
impl CommandHandler<DeleteMealCommand> for DeleteMealCommandHandler {
    type Result = DeleteMealResult;

    async fn handle(&self, cmd: DeleteMealCommand) -> Result<Self::Result, DomainError> {
        info!("Handling DeleteMealCommand for meal: {}", cmd.meal_id);

        let user_id = user_id_from(&cmd.user_id)?;
        let meal_id = meal_id_from(&cmd.meal_id)?;

        if !self.meal_repo.delete(&meal_id, &user_id).await? {
            return Err(DomainError::MealNotFound(meal_id.to_string()));
        }

        info!("Meal deleted: {}", meal_id);

        Ok(DeleteMealResult { success: true })
    }
}
