use serde::{Deserialize, Serialize};

/// Meal totals of one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealCounts {
    pub total: u64,
    pub within_diet: u64,
}

impl MealCounts {
    pub fn outside_diet(&self) -> u64 {
        self.total.saturating_sub(self.within_diet)
    }

    /// Share of on-diet meals in percent, 0 when nothing was logged
    pub fn within_diet_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.within_diet as f64 / self.total as f64 * 100.0
    }
}
