//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed checklist and account model, the
//! role-based access rules, and the services implementing the driving ports.
//! Inbound and outbound adapters depend on this module, never the reverse.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - ChecklistRecord — one stored day of checks, keyed by a unique date.
//! - Account and Caller — identities and the role used for access decisions.
//! - ChecklistService and AccountService — implementations of the ports.

pub mod account;
pub mod account_service;
pub mod auth;
pub mod authorization;
pub mod checklist;
pub mod checklist_service;
pub mod error;
pub mod ports;
pub mod role;
pub mod trace_id;

pub use self::account::{Account, AccountId, AccountValidationError, Caller, DisplayName, EmailAddress};
pub use self::account_service::AccountService;
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MIN, PasswordHash, Registration,
};
pub use self::authorization::{AccessDecision, RoleSet, authorize, require_role};
pub use self::checklist::{
    CheckItem, ChecklistContent, ChecklistDate, ChecklistId, ChecklistPatch, ChecklistPayload,
    ChecklistRecord, ChecklistSections, ChecklistValidationError, CookingEntry, DeliveryEntry,
    DishwasherCheck, FridgeComments, FridgeReadings, IncidentEntry, InvalidChecklistDate,
    LooseBool, LooseNumber, LooseText, Period, ServedDish, Uncoercible, ValidationCode,
    WastageEntry,
};
pub use self::checklist_service::ChecklistService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::role::{Role, UnknownRole};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use daybook::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("Not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
