//! Builders wiring repositories, services, and HTTP state.
//!
//! PostgreSQL repositories are used when a pool is available; otherwise the
//! in-memory adapters back every port and data is lost on restart.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use daybook::domain::ports::{AccountRepository, ChecklistRepository};
use daybook::domain::{AccountService, ChecklistService, Error, Registration};
use daybook::inbound::http::state::HttpState;
use daybook::outbound::memory::{InMemoryAccountRepository, InMemoryChecklistRepository};
use daybook::outbound::password::Argon2PasswordHasher;
use daybook::outbound::persistence::{DbPool, DieselAccountRepository, DieselChecklistRepository};

/// Build services over `accounts` and `checklists`, creating the bootstrap
/// administrator first when one is configured.
async fn assemble<A, C>(
    accounts: Arc<A>,
    checklists: Arc<C>,
    clock: Arc<dyn Clock>,
    bootstrap: Option<Registration>,
) -> Result<HttpState, Error>
where
    A: AccountRepository + 'static,
    C: ChecklistRepository + 'static,
{
    let account_service = Arc::new(AccountService::new(
        accounts,
        Arc::new(Argon2PasswordHasher::new()),
        clock.clone(),
    ));
    if let Some(registration) = bootstrap {
        match account_service.bootstrap_admin(registration).await? {
            Some(admin) => info!(email = %admin.email(), "created bootstrap administrator"),
            None => info!("administrator already present; bootstrap skipped"),
        }
    }
    let checklist_service = Arc::new(ChecklistService::new(checklists, clock));
    Ok(HttpState::new(
        account_service.clone(),
        account_service.clone(),
        account_service,
        checklist_service.clone(),
        checklist_service,
    ))
}

/// Build HTTP state for the configured storage.
pub async fn build_http_state(
    pool: Option<DbPool>,
    bootstrap: Option<Registration>,
) -> Result<HttpState, Error> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match pool {
        Some(pool) => {
            assemble(
                Arc::new(DieselAccountRepository::new(pool.clone())),
                Arc::new(DieselChecklistRepository::new(pool)),
                clock,
                bootstrap,
            )
            .await
        }
        None => {
            warn!("no database configured; checklists are kept in memory only");
            assemble(
                Arc::new(InMemoryAccountRepository::new()),
                Arc::new(InMemoryChecklistRepository::new()),
                clock,
                bootstrap,
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybook::domain::{LoginCredentials, Role};
    use rstest::rstest;

    fn admin_registration() -> Registration {
        Registration::try_from_parts("Chef", "chef@example.com", "kitchen-secret", None)
            .expect("valid registration")
    }

    #[rstest]
    #[tokio::test]
    async fn bootstrap_admin_can_log_in_to_memory_storage() {
        let state = build_http_state(None, Some(admin_registration()))
            .await
            .expect("state builds");

        let credentials = LoginCredentials::try_from_parts("chef@example.com", "kitchen-secret")
            .expect("credentials shape");
        let account = state
            .login
            .authenticate(&credentials)
            .await
            .expect("bootstrap login");

        assert_eq!(account.role(), Role::Admin);
        let caller = state
            .callers
            .resolve(account.id())
            .await
            .expect("resolve")
            .expect("caller present");
        assert_eq!(state.accounts.list(&caller).await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn without_bootstrap_no_accounts_exist() {
        let state = build_http_state(None, None).await.expect("state builds");

        let credentials = LoginCredentials::try_from_parts("chef@example.com", "kitchen-secret")
            .expect("credentials shape");
        let error = state
            .login
            .authenticate(&credentials)
            .await
            .expect_err("no accounts yet");

        assert_eq!(error.message(), "Invalid email or password");
    }
}
