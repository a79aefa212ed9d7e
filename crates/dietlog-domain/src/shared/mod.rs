use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod pagination;
pub mod transaction;

pub use pagination::{Page, PageRequest, Pagination};
pub use transaction::{DiaryTransaction, DiaryUnitOfWork};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn from_string(s: &str) -> Self {
                Self(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(UserId);
define_id!(MealId);
define_id!(StreakId);

/// Error codes for structured error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Resource Not Found (2xxx)
    MealNotFound = 2001,

    // Streak state (3xxx)
    StreakStateCorruption = 3001,

    // Data & Persistence (4xxx)
    RepositoryError = 4001,
    StoreUnavailable = 4002,
    DataIntegrityError = 4003,
    SerializationError = 4004,

    // Infrastructure (5xxx)
    InfrastructureError = 5001,

    // Validation (6xxx)
    ValidationError = 6001,
    InvalidInput = 6002,
}

impl ErrorCode {
    /// Get error code as integer
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorCode::MealNotFound | ErrorCode::ValidationError | ErrorCode::InvalidInput => {
                ErrorSeverity::Info
            }

            ErrorCode::StoreUnavailable => ErrorSeverity::Warning,

            ErrorCode::DataIntegrityError
            | ErrorCode::RepositoryError
            | ErrorCode::SerializationError
            | ErrorCode::InfrastructureError => ErrorSeverity::Error,

            ErrorCode::StreakStateCorruption => ErrorSeverity::Critical,
        }
    }

    /// Check if error is recoverable
    ///
    /// Recoverable errors may succeed when the caller retries; this layer never retries.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorCode::StoreUnavailable)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Meal not found: {0}")]
    MealNotFound(String),

    #[error("Streak state corruption: {0}")]
    StateCorruption(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DomainError {
    /// Get error code
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::MealNotFound(_) => ErrorCode::MealNotFound,
            DomainError::StateCorruption(_) => ErrorCode::StreakStateCorruption,
            DomainError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            DomainError::Repository(_) => ErrorCode::RepositoryError,
            DomainError::Infrastructure(_) => ErrorCode::InfrastructureError,
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::DataIntegrity(_) => ErrorCode::DataIntegrityError,
            DomainError::InvalidInput(_) => ErrorCode::InvalidInput,
            DomainError::Serialization(_) => ErrorCode::SerializationError,
        }
    }

    /// Get error message
    pub fn message(&self) -> &str {
        match self {
            DomainError::MealNotFound(msg)
            | DomainError::StateCorruption(msg)
            | DomainError::StoreUnavailable(msg)
            | DomainError::Repository(msg)
            | DomainError::Infrastructure(msg)
            | DomainError::Validation(msg)
            | DomainError::DataIntegrity(msg)
            | DomainError::InvalidInput(msg)
            | DomainError::Serialization(msg) => msg,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        self.code().severity()
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }

    /// Format error with code
    pub fn format_with_code(&self) -> String {
        format!("[{}] {}", self.code().code(), self)
    }

    /// Message safe to show an end user. Storage details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            DomainError::MealNotFound(id) => format!("No meal with the id {} has been found.", id),
            DomainError::Validation(msg) | DomainError::InvalidInput(msg) => msg.clone(),
            _ => "It was not possible to record the meal due to an error. Try again later."
                .to_string(),
        }
    }

    /// Re-tag a failure that happened inside a streak write scope.
    ///
    /// Unreachable-store errors keep their tag; anything else means the
    /// lookup-or-create sequence did not converge.
    pub fn into_state_corruption(self, context: &str) -> DomainError {
        match self {
            DomainError::StoreUnavailable(_) | DomainError::StateCorruption(_) => self,
            other => DomainError::StateCorruption(format!("{}: {}", context, other)),
        }
    }
}
