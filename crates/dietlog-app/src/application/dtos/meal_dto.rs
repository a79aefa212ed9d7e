use serde::{Deserialize, Serialize};

use dietlog_domain::meal::Meal;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealDto {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub eaten_at: String, // RFC 3339
    pub within_diet: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<&Meal> for MealDto {
    fn from(meal: &Meal) -> Self {
        Self {
            id: meal.id().to_string(),
            user_id: meal.user_id().to_string(),
            name: meal.name().to_string(),
            description: meal.description().to_string(),
            eaten_at: meal.eaten_at().to_rfc3339(),
            within_diet: meal.is_within_diet(),
            created_at: meal.created_at().to_rfc3339(),
            updated_at: meal.updated_at().map(|t| t.to_rfc3339()),
        }
    }
}

impl From<Meal> for MealDto {
    fn from(meal: Meal) -> Self {
        Self::from(&meal)
    }
}
