use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, StreakId, UserId};

/// One streak episode of a user.
///
/// While `active`, the record accumulates on-diet meals. Once closed it is an
/// immutable piece of history that only feeds the longest-streak aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    id: StreakId,
    user_id: UserId,
    count: u64,
    active: bool,
    started_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StreakRecord {
    /// Open a fresh active episode with a zero count
    pub fn open(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: StreakId::new(),
            user_id,
            count: 0,
            active: true,
            started_at: now,
            updated_at: now,
        }
    }

    /// Restore a record from persistence
    pub fn restore(
        id: StreakId,
        user_id: UserId,
        count: u64,
        active: bool,
        started_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            count,
            active,
            started_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &StreakId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Count one more on-diet meal
    pub fn extend(&mut self) -> Result<(), DomainError> {
        if !self.active {
            return Err(DomainError::DataIntegrity(format!(
                "Streak {} is closed and cannot be extended",
                self.id
            )));
        }

        self.count = self.count.checked_add(1).ok_or_else(|| {
            DomainError::DataIntegrity(format!("Streak {} count overflow", self.id))
        })?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Freeze the episode. The count is kept as history.
    pub fn close(&mut self) -> Result<(), DomainError> {
        if !self.active {
            return Err(DomainError::DataIntegrity(format!(
                "Streak {} is already closed",
                self.id
            )));
        }

        self.active = false;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Per-user streak state as seen through the active record lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakState {
    NoActiveStreak,
    Active { count: u64 },
}

impl StreakState {
    pub fn from_active(active: Option<&StreakRecord>) -> Self {
        match active {
            Some(record) if record.is_active() => StreakState::Active {
                count: record.count(),
            },
            _ => StreakState::NoActiveStreak,
        }
    }

    /// Length of the in-progress episode, 0 when there is none
    pub fn current_count(&self) -> u64 {
        match self {
            StreakState::NoActiveStreak => 0,
            StreakState::Active { count } => *count,
        }
    }
}
