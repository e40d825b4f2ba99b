//! Wire payload for creating and updating checklists.
//!
//! The payload is lenient about scalar types (form inputs arrive
//! as strings, numbers, or booleans) and strict about shape: unknown keys are
//! rejected, except for server-managed keys a client may echo back from a
//! fetched record. [`ChecklistPayload::validate`] coerces scalars and checks
//! invariants, reporting the first failure with its JSON path.

use std::collections::HashSet;
use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::sections::{
    CheckItem, ChecklistSections, CookingEntry, DeliveryEntry, DishwasherCheck, FridgeComments,
    FridgeReadings, IncidentEntry, Period, ServedDish, WastageEntry,
};
use super::{ChecklistContent, ChecklistDate};

/// Machine-readable reason a payload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    /// A required value was absent or blank.
    Missing,
    /// The date was not `YYYY-MM-DD`.
    InvalidDate,
    /// A period was not exactly `AM` or `PM`.
    InvalidPeriod,
    /// A period appeared twice in the same section.
    DuplicatePeriod,
    /// A check value could not be read as a boolean.
    InvalidBoolean,
    /// A temperature could not be read as a finite number.
    InvalidNumber,
}

/// First validation failure found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ChecklistValidationError {
    /// JSON path of the offending value, e.g. `dishwasherChecks[1].period`.
    pub field: String,
    /// Failure category.
    pub code: ValidationCode,
    /// Human-readable explanation.
    pub message: String,
}

impl ChecklistValidationError {
    fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    fn missing_date() -> Self {
        Self::new("date", ValidationCode::Missing, "Date is required")
    }

    fn missing_name() -> Self {
        Self::new("name", ValidationCode::Missing, "Name is required")
    }
}

/// Raised when a lenient scalar cannot be coerced to the target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value cannot be coerced")]
pub struct Uncoercible;

/// Free text that may arrive as a string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseText {
    /// Text as sent.
    Text(String),
    /// Number rendered back to text.
    Number(serde_json::Number),
}

impl LooseText {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

fn text(value: Option<LooseText>) -> String {
    value.map(LooseText::into_string).unwrap_or_default()
}

/// Check value that may arrive as a boolean, `0`/`1`, or a yes/no word.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseBool {
    /// JSON boolean.
    Bool(bool),
    /// JSON number; only `0` and `1` are accepted.
    Number(serde_json::Number),
    /// String such as `"true"`, `"no"`, or `"1"`.
    Text(String),
}

impl LooseBool {
    /// Coerce to a boolean. `Ok(None)` means the value was left blank.
    ///
    /// # Examples
    /// ```
    /// use daybook::domain::LooseBool;
    ///
    /// assert_eq!(LooseBool::Text("Yes".into()).coerce(), Ok(Some(true)));
    /// assert_eq!(LooseBool::Text(String::new()).coerce(), Ok(None));
    /// assert!(LooseBool::Text("maybe".into()).coerce().is_err());
    /// ```
    pub fn coerce(&self) -> Result<Option<bool>, Uncoercible> {
        match self {
            Self::Bool(flag) => Ok(Some(*flag)),
            Self::Number(number) => match number.as_i64() {
                Some(0) => Ok(Some(false)),
                Some(1) => Ok(Some(true)),
                _ => Err(Uncoercible),
            },
            Self::Text(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "" => Ok(None),
                "true" | "yes" | "1" | "on" => Ok(Some(true)),
                "false" | "no" | "0" | "off" => Ok(Some(false)),
                _ => Err(Uncoercible),
            },
        }
    }
}

fn flag(
    value: Option<&LooseBool>,
    field: impl FnOnce() -> String,
) -> Result<Option<bool>, ChecklistValidationError> {
    value.map_or(Ok(None), |raw| {
        raw.coerce().map_err(|Uncoercible| {
            ChecklistValidationError::new(
                field(),
                ValidationCode::InvalidBoolean,
                "Value must be a boolean",
            )
        })
    })
}

/// Temperature that may arrive as a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    /// JSON number.
    Number(f64),
    /// Numeric text; blank means unset.
    Text(String),
}

impl LooseNumber {
    /// Coerce to a finite number. `Ok(None)` means the value was left blank.
    pub fn coerce(&self) -> Result<Option<f64>, Uncoercible> {
        let parsed = match self {
            Self::Number(number) => *number,
            Self::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed.parse::<f64>().map_err(|_| Uncoercible)?
            }
        };
        if parsed.is_finite() {
            Ok(Some(parsed))
        } else {
            Err(Uncoercible)
        }
    }
}

fn number(
    value: Option<&LooseNumber>,
    field: impl FnOnce() -> String,
) -> Result<Option<f64>, ChecklistValidationError> {
    value.map_or(Ok(None), |raw| {
        raw.coerce().map_err(|Uncoercible| {
            ChecklistValidationError::new(
                field(),
                ValidationCode::InvalidNumber,
                "Value must be a number",
            )
        })
    })
}

fn period(
    value: Option<&str>,
    field: impl Fn() -> String,
) -> Result<Period, ChecklistValidationError> {
    let Some(raw) = value else {
        return Err(ChecklistValidationError::new(
            field(),
            ValidationCode::Missing,
            "Period is required",
        ));
    };
    Period::parse(raw).ok_or_else(|| {
        ChecklistValidationError::new(
            field(),
            ValidationCode::InvalidPeriod,
            format!("Period must be AM or PM, got {raw:?}"),
        )
    })
}

struct Path<'a>(&'a str, usize, &'a str);

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}].{}", self.0, self.1, self.2)
    }
}

fn at(section: &'static str, index: usize, field: &'static str) -> impl Fn() -> String {
    move || Path(section, index, field).to_string()
}

/// Opening or closing check as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheckItemInput {
    #[serde(default)]
    label: Option<LooseText>,
    #[serde(default)]
    yes: Option<LooseBool>,
    #[serde(default, rename = "_id")]
    _legacy_id: Option<IgnoredAny>,
}

/// Fridge readings bucket as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FridgeReadingsInput {
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    readings: Option<Vec<Option<LooseText>>>,
    #[serde(default, rename = "_id")]
    _legacy_id: Option<IgnoredAny>,
}

/// Fridge remarks as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FridgeCommentsInput {
    #[serde(default, rename = "AM")]
    am: Option<LooseText>,
    #[serde(default, rename = "PM")]
    pm: Option<LooseText>,
}

/// Dishwasher check as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DishwasherInput {
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    time: Option<LooseText>,
    #[serde(default)]
    temp: Option<LooseText>,
    #[serde(default)]
    cleansing_ok: Option<LooseBool>,
    #[serde(default)]
    chemical_sufficient: Option<LooseBool>,
    #[serde(default)]
    closing_check: Option<LooseBool>,
    #[serde(default)]
    initial: Option<LooseText>,
    #[serde(default, rename = "_id")]
    _legacy_id: Option<IgnoredAny>,
}

/// Delivery line as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeliveryInput {
    #[serde(default)]
    supplier: Option<LooseText>,
    #[serde(default)]
    product: Option<LooseText>,
    #[serde(default)]
    time: Option<LooseText>,
    #[serde(default)]
    surf_temp: Option<LooseText>,
    #[serde(default)]
    rejected_if_any: Option<LooseText>,
    #[serde(default)]
    sign: Option<LooseText>,
    #[serde(default, rename = "_id")]
    _legacy_id: Option<IgnoredAny>,
}

/// Cooking line as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CookingInput {
    #[serde(default)]
    item_cooked: Option<LooseText>,
    #[serde(default)]
    end_cooking_temperature: Option<LooseNumber>,
    #[serde(default)]
    time: Option<LooseText>,
    #[serde(default)]
    chilling_method: Option<LooseText>,
    #[serde(default)]
    chilling_duration: Option<LooseText>,
    #[serde(default)]
    end_temperature: Option<LooseNumber>,
    #[serde(default, rename = "_id")]
    _legacy_id: Option<IgnoredAny>,
}

/// Served dish line as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServedDishInput {
    #[serde(default)]
    dish: Option<LooseText>,
    #[serde(default)]
    lunch: Option<LooseText>,
    #[serde(default)]
    dinner: Option<LooseText>,
    #[serde(default, rename = "_id")]
    _legacy_id: Option<IgnoredAny>,
}

/// Wastage line as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WastageInput {
    #[serde(default)]
    item_name: Option<LooseText>,
    #[serde(default)]
    session: Option<LooseText>,
    #[serde(default)]
    reason: Option<LooseText>,
    #[serde(default)]
    quantity: Option<LooseText>,
    #[serde(default)]
    sign: Option<LooseText>,
    #[serde(default, rename = "_id")]
    _legacy_id: Option<IgnoredAny>,
}

/// Incident line as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IncidentInput {
    #[serde(default)]
    nature: Option<LooseText>,
    #[serde(default)]
    action_taken: Option<LooseText>,
    #[serde(default, rename = "_id")]
    _legacy_id: Option<IgnoredAny>,
}

/// Checklist body accepted by create and update.
///
/// Every field is optional at the wire level; create additionally requires
/// `date` and `name` (see [`ChecklistPatch::into_new_content`]).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChecklistPayload {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    opening_checks: Option<Vec<CheckItemInput>>,
    #[serde(default)]
    opening_comment: Option<LooseText>,
    #[serde(default)]
    closing_checks: Option<Vec<CheckItemInput>>,
    #[serde(default)]
    closing_comment: Option<LooseText>,
    #[serde(default)]
    fridge_temps: Option<Vec<FridgeReadingsInput>>,
    #[serde(default)]
    fridge_comments: Option<FridgeCommentsInput>,
    #[serde(default)]
    dishwasher_checks: Option<Vec<DishwasherInput>>,
    #[serde(default)]
    delivery_details: Option<Vec<DeliveryInput>>,
    #[serde(default)]
    cooking_details: Option<Vec<CookingInput>>,
    #[serde(default)]
    served_rows: Option<Vec<ServedDishInput>>,
    #[serde(default)]
    wastage_report: Option<Vec<WastageInput>>,
    #[serde(default)]
    incident_report: Option<Vec<IncidentInput>>,
    // Server-managed keys: accepted so a fetched record can be resubmitted,
    // never read.
    #[serde(default, rename = "id")]
    _id: Option<IgnoredAny>,
    #[serde(default, rename = "_id")]
    _legacy_id: Option<IgnoredAny>,
    #[serde(default, rename = "author")]
    _author: Option<IgnoredAny>,
    #[serde(default, rename = "createdBy")]
    _created_by: Option<IgnoredAny>,
    #[serde(default, rename = "createdAt")]
    _created_at: Option<IgnoredAny>,
    #[serde(default, rename = "updatedAt")]
    _updated_at: Option<IgnoredAny>,
    #[serde(default, rename = "__v")]
    _version: Option<IgnoredAny>,
}

/// Validated payload. `None` means the client did not send that field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChecklistPatch {
    /// New date.
    pub date: Option<ChecklistDate>,
    /// New staff name.
    pub name: Option<String>,
    /// Replacement opening checks.
    pub opening_checks: Option<Vec<CheckItem>>,
    /// Replacement opening remark.
    pub opening_comment: Option<String>,
    /// Replacement closing checks.
    pub closing_checks: Option<Vec<CheckItem>>,
    /// Replacement closing remark.
    pub closing_comment: Option<String>,
    /// Replacement fridge readings.
    pub fridge_temps: Option<Vec<FridgeReadings>>,
    /// Replacement fridge remarks.
    pub fridge_comments: Option<FridgeComments>,
    /// Replacement dishwasher checks.
    pub dishwasher_checks: Option<Vec<DishwasherCheck>>,
    /// Replacement delivery log.
    pub delivery_details: Option<Vec<DeliveryEntry>>,
    /// Replacement cooking log.
    pub cooking_details: Option<Vec<CookingEntry>>,
    /// Replacement served-dish log.
    pub served_rows: Option<Vec<ServedDish>>,
    /// Replacement wastage log.
    pub wastage_report: Option<Vec<WastageEntry>>,
    /// Replacement incident log.
    pub incident_report: Option<Vec<IncidentEntry>>,
}

impl ChecklistPayload {
    /// Coerce scalars and check invariants.
    ///
    /// # Examples
    /// ```
    /// use daybook::domain::ChecklistPayload;
    ///
    /// let payload: ChecklistPayload = serde_json::from_value(serde_json::json!({
    ///     "date": "2024-05-01",
    ///     "name": "Alex",
    ///     "openingChecks": [{ "label": "fridges ok", "yes": "true" }]
    /// }))
    /// .expect("payload parses");
    /// let content = payload.validate().and_then(|patch| patch.into_new_content()).expect("valid");
    /// assert!(content.sections.opening_checks[0].yes);
    /// ```
    pub fn validate(self) -> Result<ChecklistPatch, ChecklistValidationError> {
        let date = self.date.map(|raw| parse_date(&raw)).transpose()?;
        let name = self
            .name
            .map(|raw| {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Err(ChecklistValidationError::missing_name())
                } else {
                    Ok(trimmed.to_owned())
                }
            })
            .transpose()?;

        Ok(ChecklistPatch {
            date,
            name,
            opening_checks: self
                .opening_checks
                .map(|items| check_items("openingChecks", items))
                .transpose()?,
            opening_comment: self.opening_comment.map(LooseText::into_string),
            closing_checks: self
                .closing_checks
                .map(|items| check_items("closingChecks", items))
                .transpose()?,
            closing_comment: self.closing_comment.map(LooseText::into_string),
            fridge_temps: self.fridge_temps.map(fridge_temps).transpose()?,
            fridge_comments: self.fridge_comments.map(|comments| FridgeComments {
                am: text(comments.am),
                pm: text(comments.pm),
            }),
            dishwasher_checks: self.dishwasher_checks.map(dishwasher_checks).transpose()?,
            delivery_details: self.delivery_details.map(|rows| {
                rows.into_iter()
                    .map(|row| DeliveryEntry {
                        supplier: text(row.supplier),
                        product: text(row.product),
                        time: text(row.time),
                        surf_temp: text(row.surf_temp),
                        rejected_if_any: text(row.rejected_if_any),
                        sign: text(row.sign),
                    })
                    .collect()
            }),
            cooking_details: self.cooking_details.map(cooking_details).transpose()?,
            served_rows: self.served_rows.map(|rows| {
                rows.into_iter()
                    .map(|row| ServedDish {
                        dish: text(row.dish),
                        lunch: text(row.lunch),
                        dinner: text(row.dinner),
                    })
                    .collect()
            }),
            wastage_report: self.wastage_report.map(|rows| {
                rows.into_iter()
                    .map(|row| WastageEntry {
                        item_name: text(row.item_name),
                        session: text(row.session),
                        reason: text(row.reason),
                        quantity: text(row.quantity),
                        sign: text(row.sign),
                    })
                    .collect()
            }),
            incident_report: self.incident_report.map(|rows| {
                rows.into_iter()
                    .map(|row| IncidentEntry {
                        nature: text(row.nature),
                        action_taken: text(row.action_taken),
                    })
                    .collect()
            }),
        })
    }
}

impl ChecklistPatch {
    /// Build the content of a new record. `date` and `name` are required;
    /// absent sections are empty.
    pub fn into_new_content(mut self) -> Result<ChecklistContent, ChecklistValidationError> {
        let date = self.date.ok_or_else(ChecklistValidationError::missing_date)?;
        let name = self
            .name
            .take()
            .ok_or_else(ChecklistValidationError::missing_name)?;
        let sections = self.overlay(ChecklistSections::default());
        Ok(ChecklistContent {
            date,
            name,
            sections,
        })
    }

    /// Apply the fields that were sent onto `current`, keeping the rest.
    #[must_use]
    pub fn merge_onto(mut self, current: ChecklistContent) -> ChecklistContent {
        let date = self.date.unwrap_or(current.date);
        let name = self.name.take().unwrap_or(current.name);
        let sections = self.overlay(current.sections);
        ChecklistContent {
            date,
            name,
            sections,
        }
    }

    fn overlay(self, base: ChecklistSections) -> ChecklistSections {
        ChecklistSections {
            opening_checks: self.opening_checks.unwrap_or(base.opening_checks),
            opening_comment: self.opening_comment.unwrap_or(base.opening_comment),
            closing_checks: self.closing_checks.unwrap_or(base.closing_checks),
            closing_comment: self.closing_comment.unwrap_or(base.closing_comment),
            fridge_temps: self.fridge_temps.unwrap_or(base.fridge_temps),
            fridge_comments: self.fridge_comments.unwrap_or(base.fridge_comments),
            dishwasher_checks: self.dishwasher_checks.unwrap_or(base.dishwasher_checks),
            delivery_details: self.delivery_details.unwrap_or(base.delivery_details),
            cooking_details: self.cooking_details.unwrap_or(base.cooking_details),
            served_rows: self.served_rows.unwrap_or(base.served_rows),
            wastage_report: self.wastage_report.unwrap_or(base.wastage_report),
            incident_report: self.incident_report.unwrap_or(base.incident_report),
        }
    }
}

fn parse_date(raw: &str) -> Result<ChecklistDate, ChecklistValidationError> {
    if raw.trim().is_empty() {
        return Err(ChecklistValidationError::missing_date());
    }
    raw.parse().map_err(|_| {
        ChecklistValidationError::new(
            "date",
            ValidationCode::InvalidDate,
            "Date must be a calendar date in YYYY-MM-DD form",
        )
    })
}

fn check_items(
    section: &'static str,
    items: Vec<CheckItemInput>,
) -> Result<Vec<CheckItem>, ChecklistValidationError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let yes = flag(item.yes.as_ref(), at(section, index, "yes"))?;
            Ok(CheckItem {
                label: text(item.label),
                yes: yes.unwrap_or(false),
            })
        })
        .collect()
}

fn fridge_temps(
    buckets: Vec<FridgeReadingsInput>,
) -> Result<Vec<FridgeReadings>, ChecklistValidationError> {
    let mut seen = HashSet::new();
    buckets
        .into_iter()
        .enumerate()
        .map(|(index, bucket)| {
            let field = at("fridgeTemps", index, "time");
            let time = period(bucket.time.as_deref(), &field)?;
            if !seen.insert(time) {
                return Err(duplicate_period(field()));
            }
            let readings = bucket
                .readings
                .unwrap_or_default()
                .into_iter()
                .map(text)
                .collect();
            Ok(FridgeReadings { time, readings })
        })
        .collect()
}

fn dishwasher_checks(
    entries: Vec<DishwasherInput>,
) -> Result<Vec<DishwasherCheck>, ChecklistValidationError> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let field = at("dishwasherChecks", index, "period");
            let checked_period = period(entry.period.as_deref(), &field)?;
            if !seen.insert(checked_period) {
                return Err(duplicate_period(field()));
            }
            Ok(DishwasherCheck {
                period: checked_period,
                cleansing_ok: flag(
                    entry.cleansing_ok.as_ref(),
                    at("dishwasherChecks", index, "cleansingOk"),
                )?,
                chemical_sufficient: flag(
                    entry.chemical_sufficient.as_ref(),
                    at("dishwasherChecks", index, "chemicalSufficient"),
                )?,
                closing_check: flag(
                    entry.closing_check.as_ref(),
                    at("dishwasherChecks", index, "closingCheck"),
                )?,
                time: text(entry.time),
                temp: text(entry.temp),
                initial: text(entry.initial),
            })
        })
        .collect()
}

fn cooking_details(rows: Vec<CookingInput>) -> Result<Vec<CookingEntry>, ChecklistValidationError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            Ok(CookingEntry {
                end_cooking_temperature: number(
                    row.end_cooking_temperature.as_ref(),
                    at("cookingDetails", index, "endCookingTemperature"),
                )?,
                end_temperature: number(
                    row.end_temperature.as_ref(),
                    at("cookingDetails", index, "endTemperature"),
                )?,
                item_cooked: text(row.item_cooked),
                time: text(row.time),
                chilling_method: text(row.chilling_method),
                chilling_duration: text(row.chilling_duration),
            })
        })
        .collect()
}

fn duplicate_period(field: String) -> ChecklistValidationError {
    ChecklistValidationError::new(
        field,
        ValidationCode::DuplicatePeriod,
        "Each period may appear only once",
    )
}
