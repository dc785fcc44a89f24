use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use stash_core::User;
use stash_storage::{NewUser, StorageError, StorageResult, UserStore};
use time::OffsetDateTime;

/// In-memory user store.
///
/// Username lookups are case-insensitive; uniqueness is enforced the
/// same way. Id assignment follows the record store's atomic-counter
/// discipline.
#[derive(Debug)]
pub struct InMemoryUserStore {
    data: Arc<PapayaHashMap<u64, User>>,
    next_id: AtomicU64,
}

impl InMemoryUserStore {
    /// Creates an empty user store; the first assigned id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: u64) -> StorageResult<Option<User>> {
        let guard = self.data.pin();
        Ok(guard.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let guard = self.data.pin();
        Ok(guard
            .iter()
            .map(|(_, user)| user)
            .find(|user| user.username_matches(username))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> StorageResult<User> {
        if self.exists_by_username(&user.username).await? {
            return Err(StorageError::duplicate_username(user.username));
        }

        let created = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: OffsetDateTime::now_utc(),
        };
        let guard = self.data.pin();
        guard.insert(created.id, created.clone());
        Ok(created)
    }

    async fn exists_by_username(&self, username: &str) -> StorageResult<bool> {
        let guard = self.data.pin();
        Ok(guard
            .iter()
            .any(|(_, user)| user.username_matches(username)))
    }
}
