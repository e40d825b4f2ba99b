//! Port abstraction for checklist persistence adapters and their errors.
//!
//! Adapters must enforce date uniqueness atomically (a unique index or an
//! equivalent lock) and report a collision as
//! [`ChecklistRepositoryError::DuplicateDate`]. Ownership-conditioned
//! mutations take the author as part of the match so the check and the write
//! happen in one statement.

use async_trait::async_trait;

use crate::domain::{AccountId, ChecklistDate, ChecklistId, ChecklistRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by checklist repository adapters.
    pub enum ChecklistRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "checklist repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "checklist repository query failed: {message}",
        /// Another record already holds the date.
        DuplicateDate { date: String } => "a checklist already exists for {date}",
    }
}

/// Storage for checklist records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, record: &ChecklistRecord) -> Result<(), ChecklistRepositoryError>;

    /// Fetch a record by identifier.
    async fn find_by_id(
        &self,
        id: ChecklistId,
    ) -> Result<Option<ChecklistRecord>, ChecklistRepositoryError>;

    /// Fetch the record for a calendar date.
    async fn find_by_date(
        &self,
        date: ChecklistDate,
    ) -> Result<Option<ChecklistRecord>, ChecklistRepositoryError>;

    /// Every record, newest date first.
    async fn list_by_date_desc(&self) -> Result<Vec<ChecklistRecord>, ChecklistRepositoryError>;

    /// Overwrite the writable content of the record matching both `record.id()`
    /// and `record.author()`.
    ///
    /// Returns `false` when no such record exists.
    async fn update_owned(&self, record: &ChecklistRecord)
    -> Result<bool, ChecklistRepositoryError>;

    /// Remove the record matching both `id` and `author`.
    ///
    /// Returns `false` when no such record exists.
    async fn delete_owned(
        &self,
        id: ChecklistId,
        author: AccountId,
    ) -> Result<bool, ChecklistRepositoryError>;
}
