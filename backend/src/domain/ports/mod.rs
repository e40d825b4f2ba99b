//! Domain ports: the hexagonal boundary between services and adapters.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports ([`ChecklistCommand`], [`ChecklistQuery`],
//! [`LoginService`], [`CallerResolver`], [`AccountAdministration`]) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_administration;
mod account_repository;
mod checklist_command;
mod checklist_query;
mod checklist_repository;
mod login_service;
mod password_hasher;

#[cfg(test)]
pub use account_administration::MockAccountAdministration;
pub use account_administration::AccountAdministration;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError, StoredCredentials};
#[cfg(test)]
pub use checklist_command::MockChecklistCommand;
pub use checklist_command::ChecklistCommand;
#[cfg(test)]
pub use checklist_query::MockChecklistQuery;
pub use checklist_query::ChecklistQuery;
#[cfg(test)]
pub use checklist_repository::MockChecklistRepository;
pub use checklist_repository::{ChecklistRepository, ChecklistRepositoryError};
#[cfg(test)]
pub use login_service::{MockCallerResolver, MockLoginService};
pub use login_service::{CallerResolver, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
