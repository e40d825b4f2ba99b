//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, EmailAddress, PasswordHash, Role};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "an account already exists for {email}",
    }
}

/// Account together with its stored credential, for authentication only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account the credential belongs to.
    pub account: Account,
    /// Encoded password hash.
    pub password_hash: PasswordHash,
}

/// Storage for accounts and their credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account with its credential.
    async fn insert(
        &self,
        account: &Account,
        password_hash: &PasswordHash,
    ) -> Result<(), AccountRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fetch an account and its credential by email.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError>;

    /// Every account, oldest first.
    async fn list(&self) -> Result<Vec<Account>, AccountRepositoryError>;

    /// Whether at least one account holds `role`.
    async fn any_with_role(&self, role: Role) -> Result<bool, AccountRepositoryError>;

    /// Change an account's role, returning the updated account.
    async fn update_role(
        &self,
        id: AccountId,
        role: Role,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Remove an account. Returns `false` when it did not exist.
    async fn delete(&self, id: AccountId) -> Result<bool, AccountRepositoryError>;
}
