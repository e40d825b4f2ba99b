//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use mockable::Clock;

use crate::domain::ports::{AccountRepository, PasswordHasher};
use crate::domain::{
    Account, AccountId, AccountService, ChecklistService, DisplayName, EmailAddress, Role,
};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryAccountRepository, InMemoryChecklistRepository};
use crate::test_support::{PlainTextHasher, SteppingClock};

/// Password given to every seeded account.
pub const TEST_PASSWORD: &str = "correct horse";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Copy the session cookie out of a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// In-memory services behind a real [`HttpState`].
pub struct TestHarness {
    pub state: HttpState,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub checklists: Arc<InMemoryChecklistRepository>,
    pub clock: Arc<SteppingClock>,
}

impl TestHarness {
    pub fn new() -> Self {
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let checklists = Arc::new(InMemoryChecklistRepository::new());
        let clock = Arc::new(SteppingClock::at_opening());
        let account_service = Arc::new(AccountService::new(
            accounts.clone(),
            Arc::new(PlainTextHasher),
            clock.clone(),
        ));
        let checklist_service = Arc::new(ChecklistService::new(checklists.clone(), clock.clone()));
        let state = HttpState::new(
            account_service.clone(),
            account_service.clone(),
            account_service,
            checklist_service.clone(),
            checklist_service,
        );
        Self {
            state,
            accounts,
            checklists,
            clock,
        }
    }

    /// Store an account whose password is [`TEST_PASSWORD`].
    pub async fn seed_account(&self, role: Role, email: &str) -> Account {
        let account = Account::new(
            AccountId::random(),
            DisplayName::new(email.split('@').next().unwrap_or(email)).expect("name"),
            EmailAddress::new(email).expect("email"),
            role,
            self.clock.utc(),
        );
        let hash = PlainTextHasher.hash(TEST_PASSWORD).expect("hash");
        self.accounts
            .insert(&account, &hash)
            .await
            .expect("seed account");
        account
    }

    /// Actix app with the session middleware and every `/api/v1` route.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(test_session_middleware())
            .service(web::scope("/api/v1").configure(configure))
    }
}

/// Log in as `email` and return the session cookie.
pub async fn login_and_get_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
) -> Cookie<'static> {
    let login_req = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(&LoginRequest {
            email: email.into(),
            password: TEST_PASSWORD.into(),
        })
        .to_request();
    let login_res = actix_test::call_service(app, login_req).await;
    assert!(login_res.status().is_success(), "login failed for {email}");
    session_cookie(&login_res)
}
