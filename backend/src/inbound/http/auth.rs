//! Authentication handlers.
//!
//! ```text
//! POST /api/v1/auth/login {"email":"sam@example.com","password":"secret"}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/me
//! POST /api/v1/auth/register {"name":"Sam","email":"sam@example.com","password":"secret!!","role":"editor"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::authorization::{ACCOUNT_ADMINS, require_role};
use crate::domain::{Account, Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{NOT_AUTHENTICATED_MESSAGE, SessionContext};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{credentials_error, parse_role};

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "sam@example.com")]
    pub email: String,
    pub password: String,
}

/// Registration body for `POST /api/v1/auth/register`.
///
/// `role` defaults to `viewer` when omitted.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Sam Cook")]
    pub name: String,
    #[schema(example = "sam@example.com")]
    pub email: String,
    pub password: String,
    #[serde(default)]
    #[schema(example = "editor")]
    pub role: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let role = value.role.as_deref().map(parse_role).transpose()?;
        Self::try_from_parts(&value.name, &value.email, &value.password, role)
            .map_err(credentials_error)
    }
}

/// Authenticate and establish a session.
///
/// The response carries the account so clients can render role-dependent
/// views without a second request.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = Account,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid email or password", body = Error),
        (status = 503, description = "Storage unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<Account>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(credentials_error)?;
    let account = state.login.authenticate(&credentials).await?;
    session.persist_account(account.id())?;
    Ok(web::Json(account))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Return the account behind the current session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = Account),
        (status = 401, description = "Not authenticated", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Account>> {
    let caller = session.require_caller(state.callers.as_ref()).await?;
    state
        .callers
        .current_account(caller.account_id)
        .await?
        .map(web::Json)
        .ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED_MESSAGE))
}

/// Create an account. Administrators only.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Invalid request or email already registered", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(state.callers.as_ref()).await?;
    require_role(ACCOUNT_ADMINS, Some(&caller))?;
    let registration = Registration::try_from(payload.into_inner())?;
    let account = state.accounts.register(&caller, registration).await?;
    Ok(HttpResponse::Created().json(account))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
