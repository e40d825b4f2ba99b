//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountAdministration, CallerResolver, ChecklistCommand, ChecklistQuery, LoginService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential checks for `POST /auth/login`.
    pub login: Arc<dyn LoginService>,
    /// Session account id to caller resolution, run on every request.
    pub callers: Arc<dyn CallerResolver>,
    /// Admin-only account management.
    pub accounts: Arc<dyn AccountAdministration>,
    /// Checklist create, update, and delete.
    pub checklists: Arc<dyn ChecklistCommand>,
    /// Checklist reads.
    pub checklists_query: Arc<dyn ChecklistQuery>,
}

impl HttpState {
    /// Bundle port implementations.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use daybook::domain::{AccountService, ChecklistService};
    /// use daybook::inbound::http::state::HttpState;
    /// use daybook::outbound::memory::{InMemoryAccountRepository, InMemoryChecklistRepository};
    /// use daybook::outbound::password::Argon2PasswordHasher;
    /// use mockable::DefaultClock;
    ///
    /// let accounts = Arc::new(AccountService::new(
    ///     Arc::new(InMemoryAccountRepository::new()),
    ///     Arc::new(Argon2PasswordHasher::new()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let checklists = Arc::new(ChecklistService::new(
    ///     Arc::new(InMemoryChecklistRepository::new()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(
    ///     accounts.clone(),
    ///     accounts.clone(),
    ///     accounts,
    ///     checklists.clone(),
    ///     checklists,
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        callers: Arc<dyn CallerResolver>,
        accounts: Arc<dyn AccountAdministration>,
        checklists: Arc<dyn ChecklistCommand>,
        checklists_query: Arc<dyn ChecklistQuery>,
    ) -> Self {
        Self {
            login,
            callers,
            accounts,
            checklists,
            checklists_query,
        }
    }
}
