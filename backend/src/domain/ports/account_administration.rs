//! Driving port for account management.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Caller, Error, Registration, Role};

/// Use-case port for registering, listing, re-roling, and removing accounts.
///
/// Every operation is restricted to administrators.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountAdministration: Send + Sync {
    /// Create an account.
    async fn register(&self, caller: &Caller, registration: Registration)
    -> Result<Account, Error>;

    /// Every account, oldest first, without credentials.
    async fn list(&self, caller: &Caller) -> Result<Vec<Account>, Error>;

    /// Change an account's role.
    async fn update_role(&self, caller: &Caller, id: AccountId, role: Role)
    -> Result<Account, Error>;

    /// Remove an account.
    async fn delete(&self, caller: &Caller, id: AccountId) -> Result<(), Error>;
}
