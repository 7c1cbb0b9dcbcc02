//! In-memory user store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use rollcall_core::{Email, UserId};

use super::{RepositoryError, UserStore};
use crate::models::User;

/// Process-local user store.
///
/// The uniqueness check and the write in [`UserStore::save`] happen under one
/// lock, so concurrent saves for the same email cannot both succeed.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<UserId, User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, User>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().get(&id).cloned())
    }

    async fn save(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = self.lock();

        if users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(RepositoryError::Conflict(user.email.to_string()));
        }

        let stored = match users.get(&user.id) {
            Some(existing) => User {
                created_at: existing.created_at,
                updated_at: Utc::now(),
                ..user.clone()
            },
            None => user.clone(),
        };

        users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.lock().len() as u64)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rollcall_core::UserRole;

    use super::*;
    use crate::models::NewUser;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: Email::parse(email).unwrap(),
            password_hash: "digest".to_owned(),
            name: "Test".to_owned(),
            role: UserRole::Officer,
        }
    }

    #[tokio::test]
    async fn test_create_does_not_persist() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("a@x.com"));

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.find_by_id(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_find() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("a@x.com"));
        let saved = store.save(&user).await.unwrap();

        assert_eq!(saved, user);
        assert_eq!(store.count().await.unwrap(), 1);

        let by_email = store.find_by_email(&user.email).await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
        let by_id = store.find_by_id(user.id).await.unwrap();
        assert_eq!(by_id.map(|u| u.email), Some(user.email));
    }

    #[tokio::test]
    async fn test_find_by_email_is_exact() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("a@x.com"));
        store.save(&user).await.unwrap();

        let other = Email::parse("A@x.com").unwrap();
        assert!(store.find_by_email(&other).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.save(&store.create(new_user("a@x.com"))).await.unwrap();

        let err = store
            .save(&store.create(new_user("a@x.com")))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(ref e) if e == "a@x.com"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_existing_updates_in_place() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("a@x.com"));
        let first = store.save(&user).await.unwrap();

        let renamed = User {
            name: "Renamed".to_owned(),
            ..first.clone()
        };
        let second = store.save(&renamed).await.unwrap();

        assert_eq!(second.name, "Renamed");
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
