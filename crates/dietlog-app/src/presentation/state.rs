use std::sync::Arc;

use crate::application::commands::handlers::*;
use crate::application::queries::{DietStatusQueries, MealQueries};
use crate::application::services::StreakTracker;
use dietlog_domain::meal::MealRepository;
use dietlog_domain::shared::transaction::DiaryUnitOfWork;
use dietlog_domain::streak::StreakRepository;

/// Command handlers container
pub struct CommandHandlers {
    pub record_meal: Arc<RecordMealCommandHandler>,
    pub update_meal: Arc<UpdateMealCommandHandler>,
    pub delete_meal: Arc<DeleteMealCommandHandler>,
}

pub struct Queries {
    pub meals: Arc<MealQueries>,
    pub status: Arc<DietStatusQueries>,
}

pub struct AppState {
    pub command_handlers: CommandHandlers,
    pub queries: Queries,
    pub streak_tracker: Arc<StreakTracker>,
}

impl AppState {
    /// Wire handlers and queries over one diary store
    pub fn new(
        uow: Arc<dyn DiaryUnitOfWork>,
        streak_repo: Arc<dyn StreakRepository>,
        meal_repo: Arc<dyn MealRepository>,
    ) -> Self {
        let streak_tracker = Arc::new(StreakTracker::new(uow.clone(), streak_repo));

        let command_handlers = CommandHandlers {
            record_meal: Arc::new(RecordMealCommandHandler::new(
                uow,
                streak_tracker.clone(),
            )),
            update_meal: Arc::new(UpdateMealCommandHandler::new(meal_repo.clone())),
            delete_meal: Arc::new(DeleteMealCommandHandler::new(meal_repo.clone())),
        };

        let queries = Queries {
            meals: Arc::new(MealQueries::new(meal_repo.clone())),
            status: Arc::new(DietStatusQueries::new(meal_repo, streak_tracker.clone())),
        };

        Self {
            command_handlers,
            queries,
            streak_tracker,
        }
    }
}
