//! Daily checklist records.
//!
//! A checklist is one day's food-safety log. The calendar date is the logical
//! key: at most one record exists per date across the whole system. Every
//! sub-section has an explicit shape; the wire payload is parsed and coerced
//! by [`ChecklistPayload`] before a record is built.

mod payload;
mod sections;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::AccountId;

pub use payload::{
    ChecklistPatch, ChecklistPayload, ChecklistValidationError, LooseBool, LooseNumber, LooseText,
    Uncoercible, ValidationCode,
};
pub use sections::{
    CheckItem, ChecklistSections, CookingEntry, DeliveryEntry, DishwasherCheck, FridgeComments,
    FridgeReadings, IncidentEntry, Period, ServedDish, WastageEntry,
};

/// Server-assigned checklist identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistId(Uuid);

impl ChecklistId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ChecklistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ChecklistId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Calendar date a checklist covers, written `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistDate(NaiveDate);

/// Raised when a date string is not a valid `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("date must be a calendar date in YYYY-MM-DD form: {0}")]
pub struct InvalidChecklistDate(pub String);

impl ChecklistDate {
    /// Wrap a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Underlying calendar date.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ChecklistDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for ChecklistDate {
    type Err = InvalidChecklistDate;

    /// Parse strictly: four-digit year, two-digit month and day.
    ///
    /// # Examples
    /// ```
    /// use daybook::domain::ChecklistDate;
    ///
    /// let date: ChecklistDate = "2024-05-01".parse().expect("valid date");
    /// assert_eq!(date.to_string(), "2024-05-01");
    /// assert!("2024-5-1".parse::<ChecklistDate>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let well_formed = raw.len() == 10
            && raw
                .char_indices()
                .all(|(idx, ch)| if idx == 4 || idx == 7 { ch == '-' } else { ch.is_ascii_digit() });
        if !well_formed {
            return Err(InvalidChecklistDate(raw.to_owned()));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| InvalidChecklistDate(raw.to_owned()))
    }
}

/// Everything a caller may write on a checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistContent {
    /// Day the checklist covers.
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub date: ChecklistDate,
    /// Name of the staff member filling the form.
    #[schema(example = "Alex")]
    pub name: String,
    /// Structured sub-sections.
    #[serde(flatten)]
    pub sections: ChecklistSections,
}

/// Persisted checklist.
///
/// `id`, `author`, and `created_at` are fixed when the record is created and
/// never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistRecord {
    #[schema(value_type = String, format = Uuid)]
    id: ChecklistId,
    #[schema(value_type = String, format = Uuid)]
    author: AccountId,
    #[serde(flatten)]
    content: ChecklistContent,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChecklistRecord {
    /// Assemble a record from stored parts.
    #[must_use]
    pub const fn new(
        id: ChecklistId,
        author: AccountId,
        content: ChecklistContent,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author,
            content,
            created_at,
            updated_at,
        }
    }

    /// Record identifier.
    #[must_use]
    pub const fn id(&self) -> ChecklistId {
        self.id
    }

    /// Owning account.
    #[must_use]
    pub const fn author(&self) -> AccountId {
        self.author
    }

    /// Day the record covers.
    #[must_use]
    pub const fn date(&self) -> ChecklistDate {
        self.content.date
    }

    /// Writable content.
    #[must_use]
    pub const fn content(&self) -> &ChecklistContent {
        &self.content
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `account` owns the record.
    #[must_use]
    pub fn is_owned_by(&self, account: AccountId) -> bool {
        self.author == account
    }

    /// Replace the writable content, keeping identity and creation time.
    #[must_use]
    pub fn with_content(self, content: ChecklistContent, updated_at: DateTime<Utc>) -> Self {
        Self {
            content,
            updated_at,
            ..self
        }
    }
}
