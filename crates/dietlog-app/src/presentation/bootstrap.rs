use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::presentation::error::CommandError;
use crate::presentation::state::AppState;
use dietlog_domain::meal::MealRepository;
use dietlog_domain::shared::transaction::DiaryUnitOfWork;
use dietlog_domain::shared::DomainError;
use dietlog_domain::streak::StreakRepository;
use dietlog_infrastructure::config::DatabaseConfig;
use dietlog_infrastructure::memory::InMemoryDiaryStore;
use dietlog_infrastructure::persistence::{
    repositories::{SqliteMealRepository, SqliteStreakRepository},
    Database, SqliteDiaryUnitOfWork, UserLockRegistry,
};

/// Database settings from `DIETLOG_*` variables, `--db` taking precedence
pub fn resolve_config<F>(db: Option<PathBuf>, lookup: F) -> Result<DatabaseConfig, CommandError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = DatabaseConfig::from_lookup(lookup)?;
    Ok(match db {
        Some(path) => config.with_path(path),
        None => config,
    })
}

/// Open the SQLite diary, migrate it and wire the application
pub async fn build_app_state(config: &DatabaseConfig) -> Result<AppState, DomainError> {
    info!("Database path: {}", config.path.display());

    let started_at = Instant::now();
    let database = Database::new(config).await?;
    info!(
        "✓ Database connection established ({}ms)",
        started_at.elapsed().as_millis()
    );

    let started_at = Instant::now();
    database.run_migrations().await?;
    info!(
        "✓ Migrations completed ({}ms)",
        started_at.elapsed().as_millis()
    );

    let pool = Arc::new(database.pool().clone());

    let uow = Arc::new(SqliteDiaryUnitOfWork::new(
        pool.clone(),
        UserLockRegistry::new(),
        config.lock_timeout,
    )) as Arc<dyn DiaryUnitOfWork>;
    let streak_repo =
        Arc::new(SqliteStreakRepository::new(pool.clone())) as Arc<dyn StreakRepository>;
    let meal_repo = Arc::new(SqliteMealRepository::new(pool)) as Arc<dyn MealRepository>;

    Ok(AppState::new(uow, streak_repo, meal_repo))
}

/// Wire the application over a process-local store
pub fn build_in_memory_state(store: Arc<InMemoryDiaryStore>) -> AppState {
    AppState::new(store.clone(), store.clone(), store)
}
