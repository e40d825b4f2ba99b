//! Identity and account management.
//!
//! [`AccountService`] authenticates credentials, resolves the caller behind a
//! session on every request, and implements the admin-only account
//! operations. Password hashing runs on Tokio's blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::domain::authorization::{ACCOUNT_ADMINS, require_role};
use crate::domain::ports::{
    AccountAdministration, AccountRepository, AccountRepositoryError, CallerResolver,
    LoginService, PasswordHashError, PasswordHasher,
};
use crate::domain::{
    Account, AccountId, Caller, Error, LoginCredentials, PasswordHash, Registration, Role,
};

/// Message for any failed login, whichever part was wrong.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password";

/// Password hashed once per service and verified against on unknown emails.
const DECOY_PASSWORD: &str = "daybook-decoy-password";

fn map_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            error!(%message, "account repository unavailable");
            Error::service_unavailable("Account storage is unavailable")
        }
        AccountRepositoryError::Query { message } => {
            error!(%message, "account repository query failed");
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateEmail { .. } => Error::conflict("User already exists")
            .with_details(json!({ "field": "email", "code": "duplicate_email" })),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    error!(%error, "password hashing failed");
    Error::internal(error.to_string())
}

fn user_not_found() -> Error {
    Error::not_found("User not found")
}

/// Account service implementing the identity driving ports.
#[derive(Clone)]
pub struct AccountService<R, H> {
    accounts: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    decoy: Arc<OnceCell<PasswordHash>>,
}

impl<R, H> AccountService<R, H> {
    /// Create a service over an account repository and a password hasher.
    pub fn new(accounts: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            hasher,
            clock,
            decoy: Arc::new(OnceCell::new()),
        }
    }
}

impl<R, H> AccountService<R, H>
where
    R: AccountRepository,
    H: PasswordHasher + 'static,
{
    async fn hash(&self, password: &str) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let secret = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(secret.as_str()))
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing task failed");
                Error::internal("password hashing task failed")
            })?
            .map_err(map_hash_error)
    }

    async fn verify(&self, password: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let secret = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(secret.as_str(), &hash))
            .await
            .map_err(|err| {
                error!(error = %err, "password verification task failed");
                Error::internal("password verification task failed")
            })?
            .map_err(map_hash_error)
    }

    /// Spend one verification on a hash from this service's own hasher so an
    /// unknown email costs the same as a wrong password.
    async fn verify_decoy(&self, password: &str) -> Result<(), Error> {
        let decoy = self
            .decoy
            .get_or_try_init(|| self.hash(DECOY_PASSWORD))
            .await?
            .clone();
        self.verify(password, decoy).await.map(drop)
    }

    async fn create_account(&self, registration: &Registration) -> Result<Account, Error> {
        let password_hash = self.hash(registration.password()).await?;
        let account = Account::new(
            AccountId::random(),
            registration.name().clone(),
            registration.email().clone(),
            registration.role(),
            self.clock.utc(),
        );
        self.accounts
            .insert(&account, &password_hash)
            .await
            .map_err(map_repository_error)?;
        Ok(account)
    }

    /// Create the first administrator when no admin account exists yet.
    ///
    /// Returns the new account, or `None` when an admin was already present.
    /// The registration's role is ignored; the account is always an admin.
    pub async fn bootstrap_admin(&self, registration: Registration) -> Result<Option<Account>, Error> {
        let has_admin = self
            .accounts
            .any_with_role(Role::Admin)
            .await
            .map_err(map_repository_error)?;
        if has_admin {
            return Ok(None);
        }
        let account = self
            .create_account(&registration.with_role(Role::Admin))
            .await?;
        info!(account_id = %account.id(), "bootstrap administrator created");
        Ok(Some(account))
    }
}

#[async_trait]
impl<R, H> LoginService for AccountService<R, H>
where
    R: AccountRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Account, Error> {
        let stored = self
            .accounts
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?;
        let Some(found) = stored else {
            self.verify_decoy(credentials.password()).await?;
            warn!("login attempt for unknown account");
            return Err(Error::unauthorized(INVALID_LOGIN_MESSAGE));
        };
        let account_id = found.account.id();
        if self
            .verify(credentials.password(), found.password_hash)
            .await?
        {
            info!(%account_id, "login succeeded");
            Ok(found.account)
        } else {
            warn!(%account_id, "login rejected: wrong password");
            Err(Error::unauthorized(INVALID_LOGIN_MESSAGE))
        }
    }
}

#[async_trait]
impl<R, H> CallerResolver for AccountService<R, H>
where
    R: AccountRepository,
    H: PasswordHasher + 'static,
{
    async fn resolve(&self, account_id: AccountId) -> Result<Option<Caller>, Error> {
        Ok(self
            .current_account(account_id)
            .await?
            .map(|account| account.caller()))
    }

    async fn current_account(&self, account_id: AccountId) -> Result<Option<Account>, Error> {
        self.accounts
            .find_by_id(account_id)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R, H> AccountAdministration for AccountService<R, H>
where
    R: AccountRepository,
    H: PasswordHasher + 'static,
{
    async fn register(
        &self,
        caller: &Caller,
        registration: Registration,
    ) -> Result<Account, Error> {
        require_role(ACCOUNT_ADMINS, Some(caller))?;
        let account = self.create_account(&registration).await?;
        info!(
            account_id = %account.id(),
            role = %account.role(),
            registered_by = %caller.account_id,
            "account registered"
        );
        Ok(account)
    }

    async fn list(&self, caller: &Caller) -> Result<Vec<Account>, Error> {
        require_role(ACCOUNT_ADMINS, Some(caller))?;
        self.accounts.list().await.map_err(map_repository_error)
    }

    async fn update_role(
        &self,
        caller: &Caller,
        id: AccountId,
        role: Role,
    ) -> Result<Account, Error> {
        require_role(ACCOUNT_ADMINS, Some(caller))?;
        let account = self
            .accounts
            .update_role(id, role)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(user_not_found)?;
        info!(account_id = %id, %role, changed_by = %caller.account_id, "account role changed");
        Ok(account)
    }

    async fn delete(&self, caller: &Caller, id: AccountId) -> Result<(), Error> {
        require_role(ACCOUNT_ADMINS, Some(caller))?;
        let removed = self
            .accounts
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(user_not_found());
        }
        info!(account_id = %id, deleted_by = %caller.account_id, "account deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
