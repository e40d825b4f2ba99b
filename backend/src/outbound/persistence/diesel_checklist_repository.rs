//! PostgreSQL-backed `ChecklistRepository` using Diesel.
//!
//! Sub-sections are stored as a single JSONB document next to the indexed
//! columns (`checklist_date`, `author_id`). Date uniqueness is enforced by the
//! `checklists_checklist_date_key` constraint, and ownership-conditioned
//! writes filter on both `id` and `author_id` in one statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ChecklistRepository, ChecklistRepositoryError};
use crate::domain::{
    AccountId, ChecklistContent, ChecklistDate, ChecklistId, ChecklistRecord, ChecklistSections,
};

use super::error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{ChecklistContentUpdate, ChecklistRow, NewChecklistRow};
use super::pool::{DbPool, PoolError};
use super::schema::checklists;

const DATE_CONSTRAINT: &str = "checklists_checklist_date_key";

/// Diesel-backed checklist storage.
#[derive(Clone)]
pub struct DieselChecklistRepository {
    pool: DbPool,
}

impl DieselChecklistRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ChecklistRepositoryError {
    ChecklistRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, date: ChecklistDate) -> ChecklistRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ChecklistRepositoryError::connection(message),
        DieselFailure::UniqueViolation { constraint }
            if constraint.as_deref().is_none_or(|name| name == DATE_CONSTRAINT) =>
        {
            ChecklistRepositoryError::duplicate_date(date.to_string())
        }
        DieselFailure::UniqueViolation { .. } => {
            ChecklistRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => ChecklistRepositoryError::query(message),
    }
}

fn map_read_error(error: diesel::result::Error) -> ChecklistRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ChecklistRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            ChecklistRepositoryError::query("unexpected constraint violation")
        }
        DieselFailure::Query(message) => ChecklistRepositoryError::query(message),
    }
}

fn sections_document(record: &ChecklistRecord) -> Result<serde_json::Value, ChecklistRepositoryError> {
    serde_json::to_value(&record.content().sections)
        .map_err(|err| ChecklistRepositoryError::query(format!("encode sections: {err}")))
}

fn row_to_record(row: ChecklistRow) -> Result<ChecklistRecord, ChecklistRepositoryError> {
    let sections: ChecklistSections = serde_json::from_value(row.sections).map_err(|err| {
        warn!(checklist_id = %row.id, error = %err, "stored checklist sections unreadable");
        ChecklistRepositoryError::query(format!("decode sections: {err}"))
    })?;
    let content = ChecklistContent {
        date: ChecklistDate::new(row.checklist_date),
        name: row.name,
        sections,
    };
    Ok(ChecklistRecord::new(
        ChecklistId::from_uuid(row.id),
        AccountId::from_uuid(row.author_id),
        content,
        row.created_at,
        row.updated_at,
    ))
}

#[async_trait]
impl ChecklistRepository for DieselChecklistRepository {
    async fn insert(&self, record: &ChecklistRecord) -> Result<(), ChecklistRepositoryError> {
        let sections = sections_document(record)?;
        let row = NewChecklistRow {
            id: *record.id().as_uuid(),
            checklist_date: record.date().as_naive(),
            name: &record.content().name,
            author_id: *record.author().as_uuid(),
            sections: &sections,
            created_at: record.created_at(),
            updated_at: record.updated_at(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(checklists::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, record.date()))
    }

    async fn find_by_id(
        &self,
        id: ChecklistId,
    ) -> Result<Option<ChecklistRecord>, ChecklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ChecklistRow> = checklists::table
            .filter(checklists::id.eq(id.as_uuid()))
            .select(ChecklistRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_record).transpose()
    }

    async fn find_by_date(
        &self,
        date: ChecklistDate,
    ) -> Result<Option<ChecklistRecord>, ChecklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ChecklistRow> = checklists::table
            .filter(checklists::checklist_date.eq(date.as_naive()))
            .select(ChecklistRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_record).transpose()
    }

    async fn list_by_date_desc(&self) -> Result<Vec<ChecklistRecord>, ChecklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ChecklistRow> = checklists::table
            .order(checklists::checklist_date.desc())
            .select(ChecklistRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows.into_iter().map(row_to_record).collect()
    }

    async fn update_owned(
        &self,
        record: &ChecklistRecord,
    ) -> Result<bool, ChecklistRepositoryError> {
        let sections = sections_document(record)?;
        let changes = ChecklistContentUpdate {
            checklist_date: record.date().as_naive(),
            name: &record.content().name,
            sections: &sections,
            updated_at: record.updated_at(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(
            checklists::table
                .filter(checklists::id.eq(record.id().as_uuid()))
                .filter(checklists::author_id.eq(record.author().as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, record.date()))?;
        Ok(affected > 0)
    }

    async fn delete_owned(
        &self,
        id: ChecklistId,
        author: AccountId,
    ) -> Result<bool, ChecklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(
            checklists::table
                .filter(checklists::id.eq(id.as_uuid()))
                .filter(checklists::author_id.eq(author.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_read_error)?;
        Ok(affected > 0)
    }
}
