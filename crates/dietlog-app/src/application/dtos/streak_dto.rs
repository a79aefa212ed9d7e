use serde::{Deserialize, Serialize};

use dietlog_domain::streak::StreakRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakDto {
    pub id: String,
    pub count: u64,
    pub active: bool,
    pub started_at: String,
    pub updated_at: String,
}

impl From<&StreakRecord> for StreakDto {
    fn from(record: &StreakRecord) -> Self {
        Self {
            id: record.id().to_string(),
            count: record.count(),
            active: record.is_active(),
            started_at: record.started_at().to_rfc3339(),
            updated_at: record.updated_at().to_rfc3339(),
        }
    }
}

/// Streak overview of one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakSummaryDto {
    pub user_id: String,
    pub current_streak: u64,
    pub longest_streak: u64,
    pub episodes: Vec<StreakDto>, // oldest first
}
