use serde::Serialize;
use serde_json::Value;

use crate::application::commands::{
    CommandHandler, DeleteMealCommand, RecordMealCommand, UpdateMealCommand,
};
use crate::application::ResultExt;
use crate::presentation::cli::Commands;
use crate::presentation::error::CommandError;
use crate::presentation::state::AppState;

fn to_json<T: Serialize>(value: &T) -> Result<Value, CommandError> {
    serde_json::to_value(value)
        .to_infra_err()
        .map_err(CommandError::from)
}

/// Run one CLI command for `user_id` and return its JSON result
pub async fn execute(
    command: Commands,
    user_id: &str,
    state: &AppState,
) -> Result<Value, CommandError> {
    let handlers = &state.command_handlers;
    let queries = &state.queries;

    match command {
        Commands::Record {
            name,
            description,
            eaten_at,
            off_diet,
        } => {
            let result = handlers
                .record_meal
                .handle(RecordMealCommand {
                    user_id: user_id.to_string(),
                    name,
                    description,
                    eaten_at,
                    within_diet: !off_diet,
                })
                .await?;
            to_json(&result)
        }
        Commands::Show { id } => to_json(&queries.meals.get_meal(user_id, &id).await?),
        Commands::List { page, per_page } => {
            to_json(&queries.meals.list_meals(user_id, page, per_page).await?)
        }
        Commands::Update {
            id,
            name,
            description,
            eaten_at,
            within_diet,
        } => {
            let result = handlers
                .update_meal
                .handle(UpdateMealCommand {
                    user_id: user_id.to_string(),
                    meal_id: id,
                    name,
                    description,
                    eaten_at,
                    within_diet,
                })
                .await?;
            to_json(&result)
        }
        Commands::Delete { id } => {
            let result = handlers
                .delete_meal
                .handle(DeleteMealCommand {
                    user_id: user_id.to_string(),
                    meal_id: id,
                })
                .await?;
            to_json(&result)
        }
        Commands::Status => to_json(&queries.status.get_status(user_id).await?),
        Commands::Streak => to_json(&queries.status.get_streak_summary(user_id).await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::bootstrap::build_in_memory_state;
    use dietlog_infrastructure::memory::InMemoryDiaryStore;
    use std::sync::Arc;

    fn record(name: &str, off_diet: bool) -> Commands {
        Commands::Record {
            name: name.to_string(),
            description: None,
            eaten_at: None,
            off_diet,
        }
    }

    #[tokio::test]
    async fn test_record_then_status() {
        let state = build_in_memory_state(Arc::new(InMemoryDiaryStore::default()));

        let recorded = execute(record("Salad", false), "alice", &state)
            .await
            .unwrap();
        assert_eq!(recorded["streak"]["count"], 1);
        assert_eq!(recorded["streak_change"], "opened");

        let status = execute(Commands::Status, "alice", &state).await.unwrap();
        assert_eq!(status["total_meals"], 1);
        assert_eq!(status["longest_streak"], 1);
    }

    #[tokio::test]
    async fn test_show_unknown_meal_is_user_facing_error() {
        let state = build_in_memory_state(Arc::new(InMemoryDiaryStore::default()));

        let err = execute(Commands::Show { id: "nope".into() }, "alice", &state)
            .await
            .unwrap_err();

        assert_eq!(err.code, 2001);
        assert_eq!(err.message, "No meal with the id nope has been found.");
    }

    #[tokio::test]
    async fn test_list_rejects_oversized_page() {
        let state = build_in_memory_state(Arc::new(InMemoryDiaryStore::default()));

        let err = execute(
            Commands::List {
                page: 1,
                per_page: 500,
            },
            "alice",
            &state,
        )
        .await
        .unwrap_err();

        assert!(!err.recoverable);
        assert_eq!(err.code, 6002);
    }
}
