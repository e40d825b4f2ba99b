//! Driving ports for authentication and per-request identity resolution.
//!
//! Inbound adapters call these without knowing the backing infrastructure,
//! which keeps handler tests free of persistence wiring.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, Caller, Error, LoginCredentials};

/// Use-case port for exchanging credentials for an account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Account, Error>;
}

/// Use-case port turning a session's account id into a caller context.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallerResolver: Send + Sync {
    /// Current identity and role for `account_id`, or `None` when the account
    /// no longer exists.
    async fn resolve(&self, account_id: AccountId) -> Result<Option<Caller>, Error>;

    /// Full account for `account_id`, or `None` when it no longer exists.
    async fn current_account(&self, account_id: AccountId) -> Result<Option<Account>, Error>;
}
