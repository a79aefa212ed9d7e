use dietlog_domain::shared::DomainError;
use sqlx::error::DatabaseError;
use sqlx::migrate::MigrateError;
use tracing::warn;

/// Translates sqlx failures into domain errors
pub struct RepositoryErrorMapper;

// Primary SQLite result codes; extended codes carry them in the low byte.
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;

impl RepositoryErrorMapper {
    pub fn map_sqlx_error(error: sqlx::Error, context: &str) -> DomainError {
        let mapped = match &error {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_) => {
                DomainError::StoreUnavailable(format!("{}: {}", context, error))
            }
            sqlx::Error::Database(db) if Self::is_busy(db.as_ref()) => {
                DomainError::StoreUnavailable(format!("{}: {}", context, error))
            }
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::DataIntegrity(format!("{}: {}", context, error))
            }
            sqlx::Error::Database(db) if db.is_check_violation() => {
                DomainError::DataIntegrity(format!("{}: {}", context, error))
            }
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_) => {
                DomainError::Serialization(format!("{}: {}", context, error))
            }
            _ => DomainError::Repository(format!("{}: {}", context, error)),
        };

        warn!(context, error = %error, code = mapped.code().code(), "Database operation failed");
        mapped
    }

    pub fn map_migrate_error(error: MigrateError, context: &str) -> DomainError {
        match error {
            MigrateError::Execute(inner) => Self::map_sqlx_error(inner, context),
            other => DomainError::Infrastructure(format!("{}: {}", context, other)),
        }
    }

    pub fn is_unique_violation(error: &DomainError) -> bool {
        matches!(error, DomainError::DataIntegrity(msg) if msg.contains("UNIQUE"))
    }

    fn is_busy(db: &dyn DatabaseError) -> bool {
        db.code()
            .and_then(|code| code.parse::<i64>().ok())
            .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
            .unwrap_or(false)
    }
}
