//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1` together with the
//! health probes, the domain schemas returned by them, and the session cookie
//! security scheme. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use crate::domain::{Account, ChecklistContent, ChecklistRecord, Error, ErrorCode, Role};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::schemas::{AccountEnvelope, ChecklistEnvelope, MessageResponse};
use crate::inbound::http::users::RoleUpdateRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the checklist API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Daybook checklist API",
        description = "Daily opening, closing, and kitchen checks with role-based access."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::auth::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::update_user_role,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::checklists::create_checklist,
        crate::inbound::http::checklists::list_checklists,
        crate::inbound::http::checklists::get_checklist_by_date,
        crate::inbound::http::checklists::update_checklist,
        crate::inbound::http::checklists::delete_checklist,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Account,
        Role,
        ChecklistRecord,
        ChecklistContent,
        ChecklistEnvelope,
        AccountEnvelope,
        MessageResponse,
        LoginRequest,
        RegisterRequest,
        RoleUpdateRequest,
    )),
    tags(
        (name = "auth", description = "Session login, logout, and registration"),
        (name = "users", description = "Account administration"),
        (name = "checklists", description = "Daily checklist records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
