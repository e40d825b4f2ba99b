//! Mutex-guarded `AccountRepository` with unique email addresses.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{AccountRepository, AccountRepositoryError, StoredCredentials};
use crate::domain::{Account, AccountId, EmailAddress, PasswordHash, Role};

/// Account storage held in memory, in registration order.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    rows: Mutex<Vec<StoredCredentials>>,
}

impl InMemoryAccountRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<StoredCredentials>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(
        &self,
        account: &Account,
        password_hash: &PasswordHash,
    ) -> Result<(), AccountRepositoryError> {
        let mut rows = self.rows();
        if rows.iter().any(|row| row.account.email() == account.email()) {
            return Err(AccountRepositoryError::duplicate_email(
                account.email().to_string(),
            ));
        }
        rows.push(StoredCredentials {
            account: account.clone(),
            password_hash: password_hash.clone(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self
            .rows()
            .iter()
            .find(|row| row.account.id() == id)
            .map(|row| row.account.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        Ok(self
            .rows()
            .iter()
            .find(|row| row.account.email() == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError> {
        Ok(self.rows().iter().map(|row| row.account.clone()).collect())
    }

    async fn any_with_role(&self, role: Role) -> Result<bool, AccountRepositoryError> {
        Ok(self.rows().iter().any(|row| row.account.role() == role))
    }

    async fn update_role(
        &self,
        id: AccountId,
        role: Role,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut rows = self.rows();
        let Some(row) = rows.iter_mut().find(|row| row.account.id() == id) else {
            return Ok(None);
        };
        row.account = row.account.clone().with_role(role);
        Ok(Some(row.account.clone()))
    }

    async fn delete(&self, id: AccountId) -> Result<bool, AccountRepositoryError> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|row| row.account.id() != id);
        Ok(rows.len() < before)
    }
}
