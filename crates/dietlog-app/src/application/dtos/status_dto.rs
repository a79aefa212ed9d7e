use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietStatusDto {
    pub user_id: String,
    pub total_meals: u64,
    pub within_diet: u64,
    pub outside_diet: u64,
    pub within_diet_percentage: f64, // 0.0 - 100.0
    pub current_streak: u64,
    pub longest_streak: u64,
}
