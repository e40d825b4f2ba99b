//! Driving port for checklist reads.

use async_trait::async_trait;

use crate::domain::{Caller, ChecklistDate, ChecklistRecord, Error};

/// Use-case port for reading checklists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChecklistQuery: Send + Sync {
    /// The record for `date`, or a not-found error.
    async fn get_by_date(&self, caller: &Caller, date: ChecklistDate)
    -> Result<ChecklistRecord, Error>;

    /// Every record, newest date first.
    async fn list_all(&self, caller: &Caller) -> Result<Vec<ChecklistRecord>, Error>;
}
