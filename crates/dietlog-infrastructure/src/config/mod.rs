use std::path::PathBuf;
use std::time::Duration;

use dietlog_domain::shared::DomainError;

pub const ENV_DB_PATH: &str = "DIETLOG_DB_PATH";
pub const ENV_DB_MAX_CONNECTIONS: &str = "DIETLOG_DB_MAX_CONNECTIONS";
pub const ENV_DB_ACQUIRE_TIMEOUT_SECS: &str = "DIETLOG_DB_ACQUIRE_TIMEOUT_SECS";
pub const ENV_DB_BUSY_TIMEOUT_SECS: &str = "DIETLOG_DB_BUSY_TIMEOUT_SECS";
pub const ENV_LOCK_TIMEOUT_SECS: &str = "DIETLOG_LOCK_TIMEOUT_SECS";
pub const ENV_LOG_DIR: &str = "DIETLOG_LOG_DIR";

/// Configuration of the SQLite store and the per-user write scopes
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file location
    pub path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Max wait for a pooled connection
    pub acquire_timeout: Duration,

    /// SQLite busy handler timeout for locked database files
    pub busy_timeout: Duration,

    /// Max wait for another write scope of the same user to finish
    pub lock_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_data_dir().join(database_filename()),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
            lock_timeout: Duration::from_secs(10),
        }
    }
}

impl DatabaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `DIETLOG_*` environment variables
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            config.path = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_DB_MAX_CONNECTIONS) {
            config.max_connections = parse_positive(ENV_DB_MAX_CONNECTIONS, &value)?;
        }
        if let Some(value) = lookup(ENV_DB_ACQUIRE_TIMEOUT_SECS) {
            config.acquire_timeout = parse_secs(ENV_DB_ACQUIRE_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_DB_BUSY_TIMEOUT_SECS) {
            config.busy_timeout = parse_secs(ENV_DB_BUSY_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_LOCK_TIMEOUT_SECS) {
            config.lock_timeout = parse_secs(ENV_LOCK_TIMEOUT_SECS, &value)?;
        }

        Ok(config)
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }
}

/// Directory for rolling log files, `DIETLOG_LOG_DIR` or `<data dir>/dietlog/logs`
pub fn log_dir_from_env() -> PathBuf {
    std::env::var(ENV_LOG_DIR)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| default_data_dir().join("logs"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dietlog")
}

fn database_filename() -> &'static str {
    if cfg!(debug_assertions) {
        "dietlog-dev.db"
    } else {
        "dietlog.db"
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u32, DomainError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DomainError::InvalidInput(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration, DomainError> {
    parse_positive(key, value).map(|secs| Duration::from_secs(u64::from(secs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.lock_timeout, Duration::from_secs(10));
        assert!(config.path.ends_with(database_filename()));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/diary.db"),
            (ENV_DB_MAX_CONNECTIONS, "2"),
            (ENV_LOCK_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();

        assert_eq!(config.path, PathBuf::from("/tmp/diary.db"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.lock_timeout, Duration::from_secs(3));
        assert_eq!(config.acquire_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = DatabaseConfig::from_lookup(lookup_from(&[(ENV_DB_MAX_CONNECTIONS, "0")]));
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));

        let result =
            DatabaseConfig::from_lookup(lookup_from(&[(ENV_DB_BUSY_TIMEOUT_SECS, "soon")]));
        assert!(result.is_err());
    }
}
