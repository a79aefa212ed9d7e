use super::{StreakRecord, StreakState};
use crate::shared::transaction::ensure_same_user;
use crate::shared::{DomainError, UserId};

/// Outcome of applying one meal to a user's streak.
///
/// Each variant names the single write the caller has to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreakTransition {
    /// A new active record to insert
    Opened(StreakRecord),
    /// The active record gained one meal; update it
    Extended(StreakRecord),
    /// The active record was deactivated; update it
    Closed(StreakRecord),
    /// Off-diet meal on a zero-count episode; nothing to write
    Unchanged(StreakRecord),
}

impl StreakTransition {
    pub fn record(&self) -> &StreakRecord {
        match self {
            StreakTransition::Opened(record)
            | StreakTransition::Extended(record)
            | StreakTransition::Closed(record)
            | StreakTransition::Unchanged(record) => record,
        }
    }

    pub fn into_record(self) -> StreakRecord {
        match self {
            StreakTransition::Opened(record)
            | StreakTransition::Extended(record)
            | StreakTransition::Closed(record)
            | StreakTransition::Unchanged(record) => record,
        }
    }

    /// State of the user after the write is persisted
    pub fn resulting_state(&self) -> StreakState {
        StreakState::from_active(Some(self.record()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StreakTransition::Opened(_) => "opened",
            StreakTransition::Extended(_) => "extended",
            StreakTransition::Closed(_) => "closed",
            StreakTransition::Unchanged(_) => "unchanged",
        }
    }
}

/// Domain service for diet streak rules
/// Contains pure domain logic without infrastructure dependencies
pub struct StreakDomainService;

impl StreakDomainService {
    /// Apply a recorded meal to the user's active record.
    ///
    /// A missing active record is lazily opened and returned as `Opened`
    /// already carrying the meal's effect, so a call never needs both an
    /// insert and an update. An off-diet meal on a zero-count episode leaves
    /// it open, which means zero-count closed episodes are never produced.
    pub fn apply_meal(
        user_id: &UserId,
        active: Option<StreakRecord>,
        within_diet: bool,
    ) -> Result<StreakTransition, DomainError> {
        match active {
            None => {
                let mut record = StreakRecord::open(user_id.clone());
                if within_diet {
                    record.extend()?;
                }
                Ok(StreakTransition::Opened(record))
            }
            Some(mut record) => {
                ensure_same_user(user_id, record.user_id(), "Active streak")?;
                if !record.is_active() {
                    return Err(DomainError::StateCorruption(format!(
                        "Streak {} was returned as active but is closed",
                        record.id()
                    )));
                }

                if within_diet {
                    record.extend()?;
                    Ok(StreakTransition::Extended(record))
                } else if record.count() == 0 {
                    Ok(StreakTransition::Unchanged(record))
                } else {
                    record.close()?;
                    Ok(StreakTransition::Closed(record))
                }
            }
        }
    }

    /// Longest streak over a set of episodes
    pub fn longest(records: &[StreakRecord]) -> u64 {
        records.iter().map(StreakRecord::count).max().unwrap_or(0)
    }
}
