use log::info;
use std::sync::Arc;

use crate::application::dtos::{DietStatusDto, StreakDto, StreakSummaryDto};
use crate::application::services::StreakTracker;
use crate::application::utils::user_id_from;
use dietlog_domain::meal::MealRepository;
use dietlog_domain::shared::DomainError;
use dietlog_domain::streak::StreakDomainService;

/// Derived diet statistics of a user.
///
/// Every figure is recomputed from the stored meals and streak records.
pub struct DietStatusQueries {
    meal_repo: Arc<dyn MealRepository>,
    tracker: Arc<StreakTracker>,
}

impl DietStatusQueries {
    pub fn new(meal_repo: Arc<dyn MealRepository>, tracker: Arc<StreakTracker>) -> Self {
        Self { meal_repo, tracker }
    }

    pub async fn get_status(&self, user_id: &str) -> Result<DietStatusDto, DomainError> {
        let user_id = user_id_from(user_id)?;

        let (counts, current_streak, longest_streak) = futures::try_join!(
            self.meal_repo.count_by_user(&user_id),
            self.tracker.current_streak(&user_id),
            self.tracker.longest_streak(&user_id),
        )?;

        let dto = DietStatusDto {
            user_id: user_id.to_string(),
            total_meals: counts.total,
            within_diet: counts.within_diet,
            outside_diet: counts.outside_diet(),
            within_diet_percentage: counts.within_diet_percentage(),
            current_streak,
            longest_streak,
        };

        info!(
            "[status] user_id={} total={} within={} current={} longest={}",
            dto.user_id, dto.total_meals, dto.within_diet, dto.current_streak, dto.longest_streak
        );

        Ok(dto)
    }

    pub async fn get_streak_summary(&self, user_id: &str) -> Result<StreakSummaryDto, DomainError> {
        let user_id = user_id_from(user_id)?;
        let episodes = self.tracker.episodes(&user_id).await?;

        let current_streak = episodes
            .iter()
            .find(|e| e.is_active())
            .map(|e| e.count())
            .unwrap_or(0);

        Ok(StreakSummaryDto {
            user_id: user_id.to_string(),
            current_streak,
            longest_streak: StreakDomainService::longest(&episodes),
            episodes: episodes.iter().map(StreakDto::from).collect(),
        })
    }
}
