use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dietlog")]
#[command(about = "Diet diary: log meals and follow your on-diet streak")]
#[command(version)]
pub struct Cli {
    #[arg(long, short, help = "User the diary belongs to")]
    pub user: String,

    #[arg(long, help = "Database file (overrides DIETLOG_DB_PATH)")]
    pub db: Option<PathBuf>,

    #[arg(long, help = "Pretty-print JSON output")]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Record a meal and update the diet streak")]
    Record {
        #[arg(help = "Meal name")]
        name: String,
        #[arg(long, help = "Free-form description")]
        description: Option<String>,
        #[arg(long, help = "When the meal was eaten (RFC 3339, defaults to now)")]
        eaten_at: Option<DateTime<Utc>>,
        #[arg(long, help = "The meal was outside the diet")]
        off_diet: bool,
    },

    #[command(about = "Show one meal")]
    Show {
        #[arg(help = "Meal ID")]
        id: String,
    },

    #[command(about = "List meals, most recent first")]
    List {
        #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
        page: u32,
        #[arg(long, default_value_t = 10, help = "Meals per page (1-100)")]
        per_page: u32,
    },

    #[command(about = "Edit a meal (streak history is kept as recorded)")]
    Update {
        #[arg(help = "Meal ID")]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        eaten_at: Option<DateTime<Utc>>,
        #[arg(long, help = "true or false")]
        within_diet: Option<bool>,
    },

    #[command(about = "Delete a meal")]
    Delete {
        #[arg(help = "Meal ID")]
        id: String,
    },

    #[command(about = "Meal totals with current and longest streak")]
    Status,

    #[command(about = "Streak episodes, oldest first")]
    Streak,
}
