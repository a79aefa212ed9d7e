#![allow(dead_code)]

use std::time::Duration;

use dietlog_infrastructure::config::DatabaseConfig;
use dietlog_lib::presentation::bootstrap::build_app_state;
use dietlog_lib::presentation::state::AppState;
use tempfile::TempDir;

/// App state over a fresh SQLite file. Keep the `TempDir` alive for the test.
pub async fn setup_file_state(max_connections: u32) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = DatabaseConfig {
        path: dir.path().join("diary.db"),
        max_connections,
        acquire_timeout: Duration::from_secs(30),
        busy_timeout: Duration::from_secs(30),
        lock_timeout: Duration::from_secs(30),
    };

    let state = build_app_state(&config).await.expect("build app state");
    (dir, state)
}
