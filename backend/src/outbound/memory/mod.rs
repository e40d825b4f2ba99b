//! In-process adapters for the persistence ports.
//!
//! Used when no database URL is configured and by integration tests. State
//! lives behind a mutex so uniqueness checks and writes happen atomically.

mod account_repository;
mod checklist_repository;

pub use account_repository::InMemoryAccountRepository;
pub use checklist_repository::InMemoryChecklistRepository;
