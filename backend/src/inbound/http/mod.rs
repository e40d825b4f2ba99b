//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod checklists;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Largest accepted JSON body. A full day's checklist with every section
/// filled stays well under this.
pub const JSON_BODY_LIMIT: usize = 256 * 1024;

/// Register every API route and the JSON extractor configuration.
///
/// Mount under `/api/v1`:
///
/// ```
/// use actix_web::{App, web};
/// use daybook::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(error::json_error_handler),
    )
    .service(auth::login)
    .service(auth::logout)
    .service(auth::me)
    .service(auth::register)
    .service(users::list_users)
    .service(users::update_user_role)
    .service(users::delete_user)
    .service(checklists::create_checklist)
    .service(checklists::list_checklists)
    .service(checklists::get_checklist_by_date)
    .service(checklists::update_checklist)
    .service(checklists::delete_checklist);
}
