use chrono::{DateTime, Utc};

use crate::application::commands::command_handler::Command;
use crate::application::dtos::{MealDto, StreakDto};

/// Record meal command
#[derive(Debug, Clone)]
pub struct RecordMealCommand {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub eaten_at: Option<DateTime<Utc>>, // defaults to now
    pub within_diet: bool,
}

impl Command for RecordMealCommand {}

/// Record meal command result
#[derive(Debug, Clone, serde::Serialize)]
pub struct RecordMealResult {
    pub meal: MealDto,
    pub streak: StreakDto,
    pub streak_change: String, // "opened", "extended", "closed", "unchanged"
}

/// Update meal command
#[derive(Debug, Clone)]
pub struct UpdateMealCommand {
    pub user_id: String,
    pub meal_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub eaten_at: Option<DateTime<Utc>>,
    pub within_diet: Option<bool>,
}

impl Command for UpdateMealCommand {}

/// Update meal command result
#[derive(Debug, Clone, serde::Serialize)]
pub struct UpdateMealResult {
    pub meal: MealDto,
}

/// Delete meal command
#[derive(Debug, Clone)]
pub struct DeleteMealCommand {
    pub user_id: String,
    pub meal_id: String,
}

impl Command for DeleteMealCommand {}

/// Delete meal command result
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeleteMealResult {
    pub success: bool,
}
