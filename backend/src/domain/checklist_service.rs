//! Checklist record store.
//!
//! Implements the checklist driving ports on top of a [`ChecklistRepository`].
//! Order of checks for every operation: caller role, payload validation,
//! then data-level rules (date uniqueness, ownership) before storage is
//! touched. Non-owners see the same not-found response as callers asking for
//! a record that does not exist.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::domain::authorization::{CHECKLIST_READERS, CHECKLIST_WRITERS, require_role};
use crate::domain::ports::{
    ChecklistCommand, ChecklistQuery, ChecklistRepository, ChecklistRepositoryError,
};
use crate::domain::{
    Caller, ChecklistDate, ChecklistId, ChecklistPayload, ChecklistRecord,
    ChecklistValidationError, Error,
};

/// Message returned when a date is already taken.
pub const DUPLICATE_DATE_MESSAGE: &str =
    "Checklist already present for this date, kindly delete it if you want to update!";
/// Message returned when a record is absent or not owned by the caller.
pub const NOT_OWNED_MESSAGE: &str = "Checklist not found or not authorized";

fn map_repository_error(error: ChecklistRepositoryError) -> Error {
    match error {
        ChecklistRepositoryError::Connection { message } => {
            error!(%message, "checklist repository unavailable");
            Error::service_unavailable("Checklist storage is unavailable")
        }
        ChecklistRepositoryError::Query { message } => {
            error!(%message, "checklist repository query failed");
            Error::internal(format!("checklist repository error: {message}"))
        }
        ChecklistRepositoryError::DuplicateDate { date } => Error::conflict(DUPLICATE_DATE_MESSAGE)
            .with_details(json!({ "field": "date", "code": "duplicate_date", "date": date })),
    }
}

fn validation_error(err: ChecklistValidationError) -> Error {
    Error::invalid_request(err.message.clone()).with_details(json!({
        "field": err.field,
        "code": err.code,
    }))
}

fn conflict_with(existing: &ChecklistRecord) -> Error {
    let checklist = serde_json::to_value(existing).unwrap_or(Value::Null);
    Error::conflict(DUPLICATE_DATE_MESSAGE).with_details(json!({
        "field": "date",
        "code": "duplicate_date",
        "existingId": existing.id(),
        "checklist": checklist,
    }))
}

fn not_owned() -> Error {
    Error::not_found(NOT_OWNED_MESSAGE)
}

/// Checklist service implementing [`ChecklistCommand`] and [`ChecklistQuery`].
#[derive(Clone)]
pub struct ChecklistService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ChecklistService<R> {
    /// Create a service over `repository`, stamping times from `clock`.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> ChecklistService<R>
where
    R: ChecklistRepository,
{
    /// Build the conflict error for `date`, re-reading the holder so the
    /// caller can offer to delete it.
    async fn conflict_for(&self, date: ChecklistDate) -> Error {
        match self.repository.find_by_date(date).await {
            Ok(Some(existing)) => conflict_with(&existing),
            Ok(None) => map_repository_error(ChecklistRepositoryError::duplicate_date(
                date.to_string(),
            )),
            Err(err) => map_repository_error(err),
        }
    }

    async fn find_owned(
        &self,
        caller: &Caller,
        id: ChecklistId,
    ) -> Result<ChecklistRecord, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .filter(|record| record.is_owned_by(caller.account_id))
            .ok_or_else(not_owned)
    }
}

#[async_trait]
impl<R> ChecklistCommand for ChecklistService<R>
where
    R: ChecklistRepository,
{
    async fn create(
        &self,
        caller: &Caller,
        payload: ChecklistPayload,
    ) -> Result<ChecklistRecord, Error> {
        require_role(CHECKLIST_WRITERS, Some(caller))?;
        let content = payload
            .validate()
            .and_then(|patch| patch.into_new_content())
            .map_err(validation_error)?;

        if let Some(existing) = self
            .repository
            .find_by_date(content.date)
            .await
            .map_err(map_repository_error)?
        {
            return Err(conflict_with(&existing));
        }

        let now = self.clock.utc();
        let date = content.date;
        let record = ChecklistRecord::new(ChecklistId::random(), caller.account_id, content, now, now);
        match self.repository.insert(&record).await {
            Ok(()) => {
                info!(checklist_id = %record.id(), %date, author = %caller.account_id, "checklist created");
                Ok(record)
            }
            Err(ChecklistRepositoryError::DuplicateDate { .. }) => {
                warn!(%date, "concurrent create lost the race for a date");
                Err(self.conflict_for(date).await)
            }
            Err(err) => Err(map_repository_error(err)),
        }
    }

    async fn update(
        &self,
        caller: &Caller,
        id: ChecklistId,
        payload: ChecklistPayload,
    ) -> Result<ChecklistRecord, Error> {
        require_role(CHECKLIST_WRITERS, Some(caller))?;
        let patch = payload.validate().map_err(validation_error)?;
        let current = self.find_owned(caller, id).await?;

        let content = patch.merge_onto(current.content().clone());
        if content.date != current.date() {
            let holder = self
                .repository
                .find_by_date(content.date)
                .await
                .map_err(map_repository_error)?;
            if let Some(existing) = holder.filter(|record| record.id() != id) {
                return Err(conflict_with(&existing));
            }
        }

        let date = content.date;
        let updated = current.with_content(content, self.clock.utc());
        match self.repository.update_owned(&updated).await {
            Ok(true) => {
                info!(checklist_id = %id, author = %caller.account_id, "checklist updated");
                Ok(updated)
            }
            Ok(false) => Err(not_owned()),
            Err(ChecklistRepositoryError::DuplicateDate { .. }) => Err(self.conflict_for(date).await),
            Err(err) => Err(map_repository_error(err)),
        }
    }

    async fn delete(&self, caller: &Caller, id: ChecklistId) -> Result<(), Error> {
        require_role(CHECKLIST_WRITERS, Some(caller))?;
        let removed = self
            .repository
            .delete_owned(id, caller.account_id)
            .await
            .map_err(map_repository_error)?;
        if removed {
            info!(checklist_id = %id, author = %caller.account_id, "checklist deleted");
            Ok(())
        } else {
            Err(not_owned())
        }
    }
}

#[async_trait]
impl<R> ChecklistQuery for ChecklistService<R>
where
    R: ChecklistRepository,
{
    async fn get_by_date(
        &self,
        caller: &Caller,
        date: ChecklistDate,
    ) -> Result<ChecklistRecord, Error> {
        require_role(CHECKLIST_READERS, Some(caller))?;
        self.repository
            .find_by_date(date)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Not found"))
    }

    async fn list_all(&self, caller: &Caller) -> Result<Vec<ChecklistRecord>, Error> {
        require_role(CHECKLIST_READERS, Some(caller))?;
        self.repository
            .list_by_date_desc()
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "checklist_service_tests.rs"]
mod tests;
