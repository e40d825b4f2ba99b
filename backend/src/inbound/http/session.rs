//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie holds only the account id. The caller's role is re-read through
//! [`CallerResolver`] on every request, so role changes and account deletion
//! take effect immediately.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::CallerResolver;
use crate::domain::{AccountId, Caller, Error};

pub(crate) const ACCOUNT_ID_KEY: &str = "account_id";

/// Message for requests without a usable session.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "Not authenticated";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh session for `account_id`, discarding any previous state.
    pub fn persist_account(&self, account_id: AccountId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCOUNT_ID_KEY, account_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the session and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Account id stored in the session, if present and well formed.
    pub fn account_id(&self) -> Result<Option<AccountId>, Error> {
        let raw = self
            .0
            .get::<String>(ACCOUNT_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match AccountId::new(&value) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid account id in session cookie");
                None
            }
        }))
    }

    /// Resolve the current caller or fail with `401 Unauthorized`.
    ///
    /// A session naming an account that no longer exists is purged.
    pub async fn require_caller(&self, callers: &dyn CallerResolver) -> Result<Caller, Error> {
        let Some(account_id) = self.account_id()? else {
            return Err(Error::unauthorized(NOT_AUTHENTICATED_MESSAGE));
        };
        match callers.resolve(account_id).await? {
            Some(caller) => Ok(caller),
            None => {
                warn!(%account_id, "session refers to a deleted account");
                self.purge();
                Err(Error::unauthorized(NOT_AUTHENTICATED_MESSAGE))
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
