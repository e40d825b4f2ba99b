//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them to and
//! from domain types.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{accounts, checklists};

/// Row read from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable account row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row read from the checklists table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = checklists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChecklistRow {
    pub id: Uuid,
    pub checklist_date: NaiveDate,
    pub name: String,
    pub author_id: Uuid,
    pub sections: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable checklist row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = checklists)]
pub(crate) struct NewChecklistRow<'a> {
    pub id: Uuid,
    pub checklist_date: NaiveDate,
    pub name: &'a str,
    pub author_id: Uuid,
    pub sections: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable checklist columns. Identity, author, and creation time are fixed.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = checklists)]
pub(crate) struct ChecklistContentUpdate<'a> {
    pub checklist_date: NaiveDate,
    pub name: &'a str,
    pub sections: &'a serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
