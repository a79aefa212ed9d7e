mod diet_status_queries;
mod meal_queries;

pub use diet_status_queries::DietStatusQueries;
pub use meal_queries::MealQueries;
