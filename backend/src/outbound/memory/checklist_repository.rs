//! Mutex-guarded `ChecklistRepository` keyed by checklist date.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{ChecklistRepository, ChecklistRepositoryError};
use crate::domain::{AccountId, ChecklistDate, ChecklistId, ChecklistRecord};

/// Checklist storage held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryChecklistRepository {
    records: Mutex<BTreeMap<ChecklistDate, ChecklistRecord>>,
}

impl InMemoryChecklistRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, BTreeMap<ChecklistDate, ChecklistRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn date_key_of(
    records: &BTreeMap<ChecklistDate, ChecklistRecord>,
    id: ChecklistId,
) -> Option<ChecklistDate> {
    records
        .iter()
        .find(|(_, record)| record.id() == id)
        .map(|(date, _)| *date)
}

#[async_trait]
impl ChecklistRepository for InMemoryChecklistRepository {
    async fn insert(&self, record: &ChecklistRecord) -> Result<(), ChecklistRepositoryError> {
        let mut records = self.records();
        if records.contains_key(&record.date()) {
            return Err(ChecklistRepositoryError::duplicate_date(
                record.date().to_string(),
            ));
        }
        records.insert(record.date(), record.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ChecklistId,
    ) -> Result<Option<ChecklistRecord>, ChecklistRepositoryError> {
        Ok(self
            .records()
            .values()
            .find(|record| record.id() == id)
            .cloned())
    }

    async fn find_by_date(
        &self,
        date: ChecklistDate,
    ) -> Result<Option<ChecklistRecord>, ChecklistRepositoryError> {
        Ok(self.records().get(&date).cloned())
    }

    async fn list_by_date_desc(&self) -> Result<Vec<ChecklistRecord>, ChecklistRepositoryError> {
        Ok(self.records().values().rev().cloned().collect())
    }

    async fn update_owned(
        &self,
        record: &ChecklistRecord,
    ) -> Result<bool, ChecklistRepositoryError> {
        let mut records = self.records();
        let Some(current_date) = date_key_of(&records, record.id()) else {
            return Ok(false);
        };
        let owned = records
            .get(&current_date)
            .is_some_and(|stored| stored.author() == record.author());
        if !owned {
            return Ok(false);
        }
        if current_date != record.date() && records.contains_key(&record.date()) {
            return Err(ChecklistRepositoryError::duplicate_date(
                record.date().to_string(),
            ));
        }
        records.remove(&current_date);
        records.insert(record.date(), record.clone());
        Ok(true)
    }

    async fn delete_owned(
        &self,
        id: ChecklistId,
        author: AccountId,
    ) -> Result<bool, ChecklistRepositoryError> {
        let mut records = self.records();
        let owned_date = date_key_of(&records, id)
            .filter(|date| records.get(date).is_some_and(|stored| stored.author() == author));
        Ok(owned_date.is_some_and(|date| records.remove(&date).is_some()))
    }
}
