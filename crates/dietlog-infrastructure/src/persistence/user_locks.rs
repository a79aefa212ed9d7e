use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use dietlog_domain::shared::{DomainError, UserId};

/// Per-user async mutexes.
///
/// Scopes of the same user queue on one mutex; distinct users never share
/// one. An entry is evicted once the last guard or waiter for it is gone.
#[derive(Default)]
pub struct UserLockRegistry {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLockRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Wait for the user's lock, giving up after `timeout`
    pub async fn acquire(
        self: &Arc<Self>,
        user_id: &UserId,
        timeout: Duration,
    ) -> Result<UserLockGuard, DomainError> {
        let lock = self.lock_for(user_id);

        let acquired = tokio::time::timeout(timeout, lock.lock_owned()).await;
        let guard = match acquired {
            Ok(guard) => guard,
            Err(_) => {
                self.evict_if_unused(user_id);
                return Err(DomainError::StoreUnavailable(format!(
                    "Timed out after {}ms waiting for the write scope of user {}",
                    timeout.as_millis(),
                    user_id
                )));
            }
        };

        debug!(user_id = %user_id, "Acquired user write scope");

        Ok(UserLockGuard {
            guard: Some(guard),
            user_id: user_id.clone(),
            registry: Arc::clone(self),
        })
    }

    /// Number of users with a live lock entry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn lock_for(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // Clones are only taken under the shard lock held by `entry`, so a count
    // of 1 seen under `remove_if` means nobody else can still reach the mutex.
    fn evict_if_unused(&self, user_id: &UserId) {
        self.locks
            .remove_if(user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Held for the lifetime of one write scope
pub struct UserLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    user_id: UserId,
    registry: Arc<UserLockRegistry>,
}

impl UserLockGuard {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        // Release the mutex first so its Arc clone is gone before eviction.
        self.guard.take();
        self.registry.evict_if_unused(&self.user_id);
        debug!(user_id = %self.user_id, "Released user write scope");
    }
}
