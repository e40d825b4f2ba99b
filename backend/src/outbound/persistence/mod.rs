//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel rows and domain types,
//! backed by `diesel-async` connections from a `bb8` pool. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module, and every database error is mapped to the port's error type.
//!
//! # Example
//!
//! ```ignore
//! use daybook::outbound::persistence::{DbPool, DieselChecklistRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/daybook")).await?;
//! let checklists = DieselChecklistRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_checklist_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_checklist_repository::DieselChecklistRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
