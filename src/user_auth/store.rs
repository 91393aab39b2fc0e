//! Credential store adapter.
//!
//! The trait is the only mutation surface the auth core sees: account
//! creation and purchase append. Emails are expected already normalized.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::models::{NewUser, PurchaseOutcome, User};
use crate::error::StoreError;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;

    /// Insert a new account. Fails with `DuplicateEmail` when the email is
    /// taken, including when a concurrent insert won the race.
    async fn create(&self, record: NewUser) -> Result<User, StoreError>;

    /// Append `book_id` to the user's purchases unless already present.
    /// Fails with `NotFound` for an unknown user.
    async fn append_purchase(&self, user_id: i64, book_id: i64)
    -> Result<PurchaseOutcome, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

// ============================================================================
// In-memory implementation
// ============================================================================

#[derive(Default)]
struct UserTable {
    next_id: i64,
    users: BTreeMap<i64, User>,
    email_index: HashMap<String, i64>,
}

/// Process-local store used in development mode and tests.
///
/// One lock guards the table and the email index, so check-then-insert and
/// purchase read-modify-write are single critical sections.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<UserTable>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let table = self.inner.read().await;
        Ok(table
            .email_index
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&user_id).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.email_index.contains_key(email))
    }

    async fn create(&self, record: NewUser) -> Result<User, StoreError> {
        let mut table = self.inner.write().await;
        if table.email_index.contains_key(&record.email) {
            return Err(StoreError::DuplicateEmail);
        }

        table.next_id += 1;
        let user = User {
            user_id: table.next_id,
            name: record.name,
            email: record.email,
            password_digest: record.password_digest,
            role: record.role,
            purchased_book_ids: Vec::new(),
            created_at: Utc::now(),
        };
        table.email_index.insert(user.email.clone(), user.user_id);
        table.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn append_purchase(
        &self,
        user_id: i64,
        book_id: i64,
    ) -> Result<PurchaseOutcome, StoreError> {
        let mut table = self.inner.write().await;
        let user = table.users.get_mut(&user_id).ok_or(StoreError::NotFound)?;

        if user.owns_purchase(book_id) {
            return Ok(PurchaseOutcome::AlreadyOwned(user.clone()));
        }
        user.purchased_book_ids.push(book_id);
        Ok(PurchaseOutcome::Appended(user.clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
