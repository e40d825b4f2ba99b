//! Driving port for checklist mutations.
//!
//! Every call carries the server-validated [`Caller`]; implementations apply
//! role gating and ownership rules themselves so the guarantees hold for any
//! inbound adapter.

use async_trait::async_trait;

use crate::domain::{Caller, ChecklistId, ChecklistPayload, ChecklistRecord, Error};

/// Use-case port for creating, updating, and deleting checklists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChecklistCommand: Send + Sync {
    /// Create the record for a date that has none yet.
    async fn create(
        &self,
        caller: &Caller,
        payload: ChecklistPayload,
    ) -> Result<ChecklistRecord, Error>;

    /// Merge `payload` onto a record owned by the caller.
    async fn update(
        &self,
        caller: &Caller,
        id: ChecklistId,
        payload: ChecklistPayload,
    ) -> Result<ChecklistRecord, Error>;

    /// Permanently remove a record owned by the caller.
    async fn delete(&self, caller: &Caller, id: ChecklistId) -> Result<(), Error>;
}
