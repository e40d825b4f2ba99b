//! Account administration handlers. Every route requires the admin role,
//! checked before the path or body is validated.
//!
//! ```text
//! GET /api/v1/users
//! PATCH /api/v1/users/{id}/role {"role":"editor"}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{delete, get, patch, web};
use serde::{Deserialize, Serialize};

use crate::domain::authorization::{ACCOUNT_ADMINS, require_role};
use crate::domain::{Account, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AccountEnvelope, MessageResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_account_id, parse_role};

/// Body for `PATCH /api/v1/users/{id}/role`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RoleUpdateRequest {
    #[schema(example = "editor")]
    pub role: String,
}

/// List every account, oldest first.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use daybook::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Accounts", body = [Account]),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Account>>> {
    let caller = session.require_caller(state.callers.as_ref()).await?;
    let accounts = state.accounts.list(&caller).await?;
    Ok(web::Json(accounts))
}

/// Change an account's role.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/role",
    params(("id" = String, Path, description = "Account id")),
    request_body = RoleUpdateRequest,
    responses(
        (status = 200, description = "Role updated", body = AccountEnvelope),
        (status = 400, description = "Invalid id or role", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUserRole"
)]
#[patch("/users/{id}/role")]
pub async fn update_user_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RoleUpdateRequest>,
) -> ApiResult<web::Json<AccountEnvelope>> {
    let caller = session.require_caller(state.callers.as_ref()).await?;
    require_role(ACCOUNT_ADMINS, Some(&caller))?;
    let id = parse_account_id(&path)?;
    let role = parse_role(&payload.role)?;
    let user = state.accounts.update_role(&caller, id, role).await?;
    Ok(web::Json(AccountEnvelope {
        message: "User role updated".to_owned(),
        user,
    }))
}

/// Remove an account. Checklists it authored are kept.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account removed", body = MessageResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let caller = session.require_caller(state.callers.as_ref()).await?;
    require_role(ACCOUNT_ADMINS, Some(&caller))?;
    let id = parse_account_id(&path)?;
    state.accounts.delete(&caller, id).await?;
    Ok(web::Json(MessageResponse::new("User deleted successfully")))
}
