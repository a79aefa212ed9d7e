use std::sync::Arc;
use tracing::{debug, info, warn};

use dietlog_domain::shared::transaction::{DiaryTransaction, DiaryUnitOfWork};
use dietlog_domain::shared::{DomainError, UserId};
use dietlog_domain::streak::{
    StreakDomainService, StreakRecord, StreakRepository, StreakState, StreakTransition,
};

/// Keeps every user's diet streak in step with the meals they record.
///
/// Writes run inside a per-user diary transaction. Reads go straight to the
/// streak repository and take no lock.
pub struct StreakTracker {
    uow: Arc<dyn DiaryUnitOfWork>,
    streak_repo: Arc<dyn StreakRepository>,
}

impl StreakTracker {
    pub fn new(uow: Arc<dyn DiaryUnitOfWork>, streak_repo: Arc<dyn StreakRepository>) -> Self {
        Self { uow, streak_repo }
    }

    /// Apply one recorded meal in a write scope of its own.
    ///
    /// Returns the record as persisted. For an off-diet meal that closed an
    /// episode this is the closed record.
    pub async fn on_meal_recorded(
        &self,
        user_id: &UserId,
        within_diet: bool,
    ) -> Result<StreakRecord, DomainError> {
        let mut tx = self.uow.begin(user_id).await?;

        let applied = self.apply_within(tx.as_mut(), within_diet).await;
        let transition = match applied {
            Ok(transition) => transition,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(user_id = %user_id, error = %rollback_err, "Streak rollback failed");
                }
                return Err(e);
            }
        };

        tx.commit()
            .await
            .map_err(|e| e.into_state_corruption("Commit streak write"))?;

        Ok(transition.into_record())
    }

    /// Apply one meal inside a caller-owned transaction.
    ///
    /// Performs at most one write. The caller commits or rolls back.
    pub async fn apply_within(
        &self,
        tx: &mut dyn DiaryTransaction,
        within_diet: bool,
    ) -> Result<StreakTransition, DomainError> {
        let user_id = tx.user_id().clone();

        let active = tx
            .find_active_streak()
            .await
            .map_err(|e| e.into_state_corruption("Find active streak"))?;
        let previous = StreakState::from_active(active.as_ref());

        let transition = StreakDomainService::apply_meal(&user_id, active, within_diet)
            .map_err(|e| e.into_state_corruption("Apply meal to streak"))?;

        let written = match &transition {
            StreakTransition::Opened(record) => tx.insert_streak(record).await,
            StreakTransition::Extended(record) | StreakTransition::Closed(record) => {
                tx.update_streak(record).await
            }
            StreakTransition::Unchanged(_) => Ok(()),
        };
        written.map_err(|e| {
            warn!(
                user_id = %user_id,
                transition = transition.kind(),
                error = %e,
                "Streak write failed"
            );
            e.into_state_corruption("Persist streak transition")
        })?;

        match &transition {
            StreakTransition::Closed(record) => info!(
                user_id = %user_id,
                streak_id = %record.id(),
                count = record.count(),
                "Diet streak closed"
            ),
            _ => debug!(
                user_id = %user_id,
                transition = transition.kind(),
                previous = ?previous,
                current = ?transition.resulting_state(),
                "Diet streak updated"
            ),
        }

        Ok(transition)
    }

    /// Maximum count over every episode of the user, 0 without history
    pub async fn longest_streak(&self, user_id: &UserId) -> Result<u64, DomainError> {
        self.streak_repo.max_count_by_user(user_id).await
    }

    pub async fn current_streak(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let active = self.streak_repo.find_active_by_user(user_id).await?;
        Ok(StreakState::from_active(active.as_ref()).current_count())
    }

    /// Every episode of the user, oldest first
    pub async fn episodes(&self, user_id: &UserId) -> Result<Vec<StreakRecord>, DomainError> {
        self.streak_repo.list_by_user(user_id).await
    }
}
