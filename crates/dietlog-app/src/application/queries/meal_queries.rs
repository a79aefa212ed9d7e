use log::info;
use std::sync::Arc;

use crate::application::dtos::MealDto;
use crate::application::utils::{meal_id_from, user_id_from};
use dietlog_domain::meal::MealRepository;
use dietlog_domain::shared::{DomainError, Page, PageRequest};

pub struct MealQueries {
    meal_repo: Arc<dyn MealRepository>,
}

impl MealQueries {
    pub fn new(meal_repo: Arc<dyn MealRepository>) -> Self {
        Self { meal_repo }
    }

    /// Get one meal owned by the user
    pub async fn get_meal(&self, user_id: &str, meal_id: &str) -> Result<MealDto, DomainError> {
        let user_id = user_id_from(user_id)?;
        let meal_id = meal_id_from(meal_id)?;

        self.meal_repo
            .find_by_id(&meal_id, &user_id)
            .await?
            .map(MealDto::from)
            .ok_or_else(|| DomainError::MealNotFound(meal_id.to_string()))
    }

    /// Page through the user's meals, most recent first
    pub async fn list_meals(
        &self,
        user_id: &str,
        current_page: u32,
        page_size: u32,
    ) -> Result<Page<MealDto>, DomainError> {
        let user_id = user_id_from(user_id)?;
        let request = PageRequest::new(current_page, page_size)?;

        let page = self.meal_repo.list_by_user(&user_id, request).await?;

        info!(
            "[meals] list user_id={} page={}/{} total={}",
            user_id, page.pagination.current_page, page.pagination.last_page, page.pagination.total
        );

        Ok(page.map(MealDto::from))
    }
}
