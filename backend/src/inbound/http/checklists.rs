//! Checklist handlers.
//!
//! ```text
//! POST /api/v1/checklist {"date":"2024-05-01","name":"Alex","openingChecks":[...]}
//! GET /api/v1/checklist
//! GET /api/v1/checklist/2024-05-01
//! PUT /api/v1/checklist/{id} {"closingComment":"all clean"}
//! DELETE /api/v1/checklist/{id}
//! ```
//!
//! Bodies deserialize into [`ChecklistPayload`], which rejects unknown keys
//! before the handler runs; coercion and ownership rules are applied by the
//! checklist service. Routes taking an id check the writer role before
//! parsing it.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::authorization::{CHECKLIST_WRITERS, require_role};
use crate::domain::{ChecklistContent, ChecklistPayload, ChecklistRecord, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ChecklistEnvelope, MessageResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_checklist_date, parse_checklist_id};

/// Record the checklist for a day that has none yet.
#[utoipa::path(
    post,
    path = "/api/v1/checklist",
    request_body = ChecklistContent,
    responses(
        (status = 201, description = "Checklist created", body = ChecklistEnvelope),
        (status = 400, description = "Invalid payload, or a checklist already exists for the date", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Role may not write checklists", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["checklists"],
    operation_id = "createChecklist"
)]
#[post("/checklist")]
pub async fn create_checklist(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChecklistPayload>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller(state.callers.as_ref()).await?;
    let checklist = state.checklists.create(&caller, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ChecklistEnvelope {
        message: "Created".to_owned(),
        checklist,
    }))
}

/// Every checklist, newest date first.
#[utoipa::path(
    get,
    path = "/api/v1/checklist",
    responses(
        (status = 200, description = "Checklists", body = [ChecklistRecord]),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["checklists"],
    operation_id = "listChecklists"
)]
#[get("/checklist")]
pub async fn list_checklists(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ChecklistRecord>>> {
    let caller = session.require_caller(state.callers.as_ref()).await?;
    let records = state.checklists_query.list_all(&caller).await?;
    Ok(web::Json(records))
}

/// The checklist recorded for one day.
#[utoipa::path(
    get,
    path = "/api/v1/checklist/{date}",
    params(("date" = String, Path, description = "Day in YYYY-MM-DD form", example = "2024-05-01")),
    responses(
        (status = 200, description = "Checklist", body = ChecklistRecord),
        (status = 400, description = "Malformed date", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 404, description = "No checklist for the date", body = Error)
    ),
    tags = ["checklists"],
    operation_id = "getChecklistByDate"
)]
#[get("/checklist/{date}")]
pub async fn get_checklist_by_date(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ChecklistRecord>> {
    let caller = session.require_caller(state.callers.as_ref()).await?;
    let date = parse_checklist_date(&path)?;
    let record = state.checklists_query.get_by_date(&caller, date).await?;
    Ok(web::Json(record))
}

/// Merge changes onto a checklist the caller created.
///
/// Sections present in the body replace the stored ones; absent sections are
/// kept.
#[utoipa::path(
    put,
    path = "/api/v1/checklist/{id}",
    params(("id" = String, Path, description = "Checklist id")),
    request_body = ChecklistContent,
    responses(
        (status = 200, description = "Checklist updated", body = ChecklistEnvelope),
        (status = 400, description = "Invalid payload, or the new date is taken", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Role may not write checklists", body = Error),
        (status = 404, description = "Checklist not found or not authorized", body = Error)
    ),
    tags = ["checklists"],
    operation_id = "updateChecklist"
)]
#[put("/checklist/{id}")]
pub async fn update_checklist(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ChecklistPayload>,
) -> ApiResult<web::Json<ChecklistEnvelope>> {
    let caller = session.require_caller(state.callers.as_ref()).await?;
    require_role(CHECKLIST_WRITERS, Some(&caller))?;
    let id = parse_checklist_id(&path)?;
    let checklist = state
        .checklists
        .update(&caller, id, payload.into_inner())
        .await?;
    Ok(web::Json(ChecklistEnvelope {
        message: "Updated".to_owned(),
        checklist,
    }))
}

/// Permanently remove a checklist the caller created.
#[utoipa::path(
    delete,
    path = "/api/v1/checklist/{id}",
    params(("id" = String, Path, description = "Checklist id")),
    responses(
        (status = 200, description = "Checklist removed", body = MessageResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 403, description = "Role may not write checklists", body = Error),
        (status = 404, description = "Checklist not found or not authorized", body = Error)
    ),
    tags = ["checklists"],
    operation_id = "deleteChecklist"
)]
#[delete("/checklist/{id}")]
pub async fn delete_checklist(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let caller = session.require_caller(state.callers.as_ref()).await?;
    require_role(CHECKLIST_WRITERS, Some(&caller))?;
    let id = parse_checklist_id(&path)?;
    state.checklists.delete(&caller, id).await?;
    Ok(web::Json(MessageResponse::new("Deleted successfully!")))
}

#[cfg(test)]
#[path = "checklists_tests.rs"]
mod tests;
