//! Process-local diary store.
//!
//! Implements the same seams as the SQLite store. Write scopes take the user
//! lock from a `UserLockRegistry` and stage their writes; `commit` applies
//! the whole batch under one write lock of the shared state.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::persistence::{UserLockGuard, UserLockRegistry};
use dietlog_domain::meal::{Meal, MealCounts, MealRepository};
use dietlog_domain::shared::transaction::{ensure_same_user, DiaryTransaction, DiaryUnitOfWork};
use dietlog_domain::shared::{DomainError, MealId, Page, PageRequest, UserId};
use dietlog_domain::streak::{StreakRecord, StreakRepository};

#[derive(Default)]
struct DiaryState {
    meals: HashMap<MealId, Meal>,
    // Insertion order is the episode order
    streaks: Vec<StreakRecord>,
}

impl DiaryState {
    fn streaks_of<'a>(&'a self, user_id: &'a UserId) -> impl Iterator<Item = &'a StreakRecord> {
        self.streaks.iter().filter(move |s| s.user_id() == user_id)
    }
}

pub struct InMemoryDiaryStore {
    state: Arc<RwLock<DiaryState>>,
    locks: Arc<UserLockRegistry>,
    lock_timeout: Duration,
    offline: Arc<AtomicBool>,
}

impl Default for InMemoryDiaryStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl InMemoryDiaryStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(DiaryState::default())),
            locks: UserLockRegistry::new(),
            lock_timeout,
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulate an unreachable store. Every call fails with `StoreUnavailable`
    /// while set, including commits of scopes that are already open.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Insert a streak record as-is, skipping the one-active-record check
    pub async fn seed_streak(&self, record: StreakRecord) {
        self.state.write().await.streaks.push(record);
    }

    pub fn lock_registry(&self) -> &Arc<UserLockRegistry> {
        &self.locks
    }

    fn ensure_online(&self) -> Result<(), DomainError> {
        check_online(&self.offline)
    }
}

fn check_online(offline: &AtomicBool) -> Result<(), DomainError> {
    if offline.load(Ordering::SeqCst) {
        return Err(DomainError::StoreUnavailable(
            "In-memory diary store is offline".to_string(),
        ));
    }
    Ok(())
}

fn single_active<'a>(
    user_id: &UserId,
    records: impl Iterator<Item = &'a StreakRecord>,
) -> Result<Option<StreakRecord>, DomainError> {
    let active: Vec<&StreakRecord> = records.filter(|s| s.is_active()).collect();
    if active.len() > 1 {
        return Err(DomainError::StateCorruption(format!(
            "User {} has {} active streak records",
            user_id,
            active.len()
        )));
    }
    Ok(active.first().map(|s| (*s).clone()))
}

#[async_trait]
impl DiaryUnitOfWork for InMemoryDiaryStore {
    async fn begin(&self, user_id: &UserId) -> Result<Box<dyn DiaryTransaction>, DomainError> {
        self.ensure_online()?;
        let guard = self.locks.acquire(user_id, self.lock_timeout).await?;

        Ok(Box::new(InMemoryDiaryTransaction {
            state: Arc::clone(&self.state),
            offline: Arc::clone(&self.offline),
            user_id: user_id.clone(),
            staged: Vec::new(),
            _guard: guard,
        }))
    }
}

enum StagedWrite {
    InsertMeal(Meal),
    InsertStreak(StreakRecord),
    UpdateStreak(StreakRecord),
}

pub struct InMemoryDiaryTransaction {
    state: Arc<RwLock<DiaryState>>,
    offline: Arc<AtomicBool>,
    user_id: UserId,
    staged: Vec<StagedWrite>,
    _guard: UserLockGuard,
}

impl InMemoryDiaryTransaction {
    /// Committed streaks of the scoped user with staged writes layered on top
    async fn streak_view(&self) -> Vec<StreakRecord> {
        let mut view: Vec<StreakRecord> = {
            let state = self.state.read().await;
            state.streaks_of(&self.user_id).cloned().collect()
        };

        for write in &self.staged {
            match write {
                StagedWrite::InsertStreak(record) => view.push(record.clone()),
                StagedWrite::UpdateStreak(record) => {
                    if let Some(slot) = view.iter_mut().find(|s| s.id() == record.id()) {
                        *slot = record.clone();
                    }
                }
                StagedWrite::InsertMeal(_) => {}
            }
        }

        view
    }
}

#[async_trait]
impl DiaryTransaction for InMemoryDiaryTransaction {
    fn user_id(&self) -> &UserId {
        &self.user_id
    }

    async fn insert_meal(&mut self, meal: &Meal) -> Result<(), DomainError> {
        check_online(&self.offline)?;
        ensure_same_user(&self.user_id, meal.user_id(), "Meal")?;

        self.staged.push(StagedWrite::InsertMeal(meal.clone()));
        Ok(())
    }

    async fn find_active_streak(&mut self) -> Result<Option<StreakRecord>, DomainError> {
        check_online(&self.offline)?;
        let view = self.streak_view().await;
        single_active(&self.user_id, view.iter())
    }

    async fn insert_streak(&mut self, record: &StreakRecord) -> Result<(), DomainError> {
        check_online(&self.offline)?;
        ensure_same_user(&self.user_id, record.user_id(), "Streak")?;

        let view = self.streak_view().await;
        if view.iter().any(|s| s.id() == record.id()) {
            return Err(DomainError::DataIntegrity(format!(
                "Streak {} already exists",
                record.id()
            )));
        }
        if record.is_active() && view.iter().any(|s| s.is_active()) {
            warn!(user_id = %self.user_id, "Second active streak rejected by the store");
            return Err(DomainError::StateCorruption(format!(
                "User {} already has an active streak",
                self.user_id
            )));
        }

        self.staged.push(StagedWrite::InsertStreak(record.clone()));
        Ok(())
    }

    async fn update_streak(&mut self, record: &StreakRecord) -> Result<(), DomainError> {
        check_online(&self.offline)?;
        ensure_same_user(&self.user_id, record.user_id(), "Streak")?;

        let view = self.streak_view().await;
        let target_is_active = view
            .iter()
            .any(|s| s.id() == record.id() && s.is_active());
        if !target_is_active {
            return Err(DomainError::StateCorruption(format!(
                "Streak {} is not an active record of user {}",
                record.id(),
                self.user_id
            )));
        }

        self.staged.push(StagedWrite::UpdateStreak(record.clone()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let InMemoryDiaryTransaction {
            state,
            offline,
            user_id,
            staged,
            _guard,
        } = *self;

        check_online(&offline)?;

        let mut state = state.write().await;

        // Validate before applying anything so a failed commit leaves no trace
        for write in &staged {
            if let StagedWrite::InsertMeal(meal) = write {
                if state.meals.contains_key(meal.id()) {
                    return Err(DomainError::DataIntegrity(format!(
                        "Meal {} already exists",
                        meal.id()
                    )));
                }
            }
        }

        let writes = staged.len();
        for write in staged {
            match write {
                StagedWrite::InsertMeal(meal) => {
                    state.meals.insert(meal.id().clone(), meal);
                }
                StagedWrite::InsertStreak(record) => state.streaks.push(record),
                StagedWrite::UpdateStreak(record) => {
                    if let Some(slot) = state.streaks.iter_mut().find(|s| s.id() == record.id()) {
                        *slot = record;
                    }
                }
            }
        }

        debug!(user_id = %user_id, writes, "In-memory diary transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        debug!(
            user_id = %self.user_id,
            discarded = self.staged.len(),
            "In-memory diary transaction rolled back"
        );
        Ok(())
    }
}

#[async_trait]
impl StreakRepository for InMemoryDiaryStore {
    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StreakRecord>, DomainError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        single_active(user_id, state.streaks_of(user_id))
    }

    async fn max_count_by_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state
            .streaks_of(user_id)
            .map(StreakRecord::count)
            .max()
            .unwrap_or(0))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<StreakRecord>, DomainError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state.streaks_of(user_id).cloned().collect())
    }
}

#[async_trait]
impl MealRepository for InMemoryDiaryStore {
    async fn find_by_id(
        &self,
        id: &MealId,
        user_id: &UserId,
    ) -> Result<Option<Meal>, DomainError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state
            .meals
            .get(id)
            .filter(|m| m.user_id() == user_id)
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<Meal>, DomainError> {
        self.ensure_online()?;
        let state = self.state.read().await;

        let mut meals: Vec<&Meal> = state
            .meals
            .values()
            .filter(|m| m.user_id() == user_id)
            .collect();
        meals.sort_by(|a, b| {
            b.eaten_at()
                .cmp(&a.eaten_at())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        });

        let total = meals.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = meals
            .into_iter()
            .skip(offset)
            .take(page.page_size() as usize)
            .cloned()
            .collect();

        Ok(Page::new(items, page, total))
    }

    async fn update(&self, meal: &Meal) -> Result<(), DomainError> {
        self.ensure_online()?;
        let mut state = self.state.write().await;

        match state.meals.get_mut(meal.id()) {
            Some(existing) if existing.user_id() == meal.user_id() => {
                *existing = meal.clone();
                Ok(())
            }
            _ => Err(DomainError::MealNotFound(meal.id().to_string())),
        }
    }

    async fn delete(&self, id: &MealId, user_id: &UserId) -> Result<bool, DomainError> {
        self.ensure_online()?;
        let mut state = self.state.write().await;

        let owned = state
            .meals
            .get(id)
            .is_some_and(|m| m.user_id() == user_id);
        if owned {
            state.meals.remove(id);
        }
        Ok(owned)
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<MealCounts, DomainError> {
        self.ensure_online()?;
        let state = self.state.read().await;

        let mut counts = MealCounts::default();
        for meal in state.meals.values().filter(|m| m.user_id() == user_id) {
            counts.total += 1;
            if meal.is_within_diet() {
                counts.within_diet += 1;
            }
        }
        Ok(counts)
    }
}
