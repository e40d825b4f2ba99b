//! Typed checklist sub-sections.
//!
//! Field names follow the stored document (camelCase). Absent or empty arrays
//! mean "no data for this section".

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Half of the service day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Period {
    /// Morning service.
    #[serde(rename = "AM")]
    Am,
    /// Evening service.
    #[serde(rename = "PM")]
    Pm,
}

impl Period {
    /// Parse the exact wire spelling, `"AM"` or `"PM"`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "AM" => Some(Self::Am),
            "PM" => Some(Self::Pm),
            _ => None,
        }
    }
}

/// Yes/no line on the opening or closing check list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckItem {
    /// What was checked.
    #[schema(example = "Fridges at temperature")]
    pub label: String,
    /// Whether the check passed.
    pub yes: bool,
}

/// Fridge temperature readings taken during one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FridgeReadings {
    /// Period the readings belong to.
    pub time: Period,
    /// One reading per fridge, in display order. Free text such as `"3"` or
    /// `"-18"`.
    #[serde(default)]
    pub readings: Vec<String>,
}

/// Free-text remarks per fridge reading period.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FridgeComments {
    /// Morning remark.
    #[serde(rename = "AM")]
    pub am: String,
    /// Evening remark.
    #[serde(rename = "PM")]
    pub pm: String,
}

/// Dishwasher check for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishwasherCheck {
    /// Period of the check.
    pub period: Period,
    /// Time the check was taken.
    #[serde(default)]
    pub time: String,
    /// Rinse temperature as written on the form.
    #[serde(default)]
    pub temp: String,
    /// Cleansing cycle satisfactory; `None` when not filled in.
    #[serde(default)]
    pub cleansing_ok: Option<bool>,
    /// Chemicals sufficient; `None` when not filled in.
    #[serde(default)]
    pub chemical_sufficient: Option<bool>,
    /// End-of-day check done; `None` when not filled in.
    #[serde(default)]
    pub closing_check: Option<bool>,
    /// Initials of the person checking.
    #[serde(default)]
    pub initial: String,
}

/// Goods-in log line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryEntry {
    /// Supplier name.
    pub supplier: String,
    /// Product delivered.
    pub product: String,
    /// Delivery time.
    pub time: String,
    /// Surface temperature on arrival.
    pub surf_temp: String,
    /// Rejection note, empty when accepted.
    pub rejected_if_any: String,
    /// Signature of the receiver.
    pub sign: String,
}

/// Cooking and chilling log line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CookingEntry {
    /// Item cooked.
    pub item_cooked: String,
    /// Core temperature at the end of cooking.
    pub end_cooking_temperature: Option<f64>,
    /// Time cooking finished.
    pub time: String,
    /// How the item was chilled.
    pub chilling_method: String,
    /// How long chilling took.
    pub chilling_duration: String,
    /// Temperature at the end of chilling.
    pub end_temperature: Option<f64>,
}

/// Hot-holding log line for a served dish.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ServedDish {
    /// Dish name.
    pub dish: String,
    /// Lunch service time or temperature.
    pub lunch: String,
    /// Dinner service time or temperature.
    pub dinner: String,
}

/// Wastage log line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct WastageEntry {
    /// Item wasted.
    pub item_name: String,
    /// Session in which the waste occurred.
    pub session: String,
    /// Reason for the waste.
    pub reason: String,
    /// Quantity wasted, as written.
    pub quantity: String,
    /// Signature.
    pub sign: String,
}

/// Incident log line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct IncidentEntry {
    /// What happened.
    pub nature: String,
    /// What was done about it.
    pub action_taken: String,
}

/// All sub-sections of a checklist.
///
/// ## Invariants
/// - At most one [`DishwasherCheck`] per [`Period`].
/// - At most one [`FridgeReadings`] bucket per [`Period`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistSections {
    /// Opening checks.
    pub opening_checks: Vec<CheckItem>,
    /// Remark on the opening checks.
    pub opening_comment: String,
    /// Closing checks.
    pub closing_checks: Vec<CheckItem>,
    /// Remark on the closing checks.
    pub closing_comment: String,
    /// Fridge readings per period.
    pub fridge_temps: Vec<FridgeReadings>,
    /// Fridge remarks per period.
    pub fridge_comments: FridgeComments,
    /// Dishwasher checks, one per period.
    pub dishwasher_checks: Vec<DishwasherCheck>,
    /// Deliveries received.
    pub delivery_details: Vec<DeliveryEntry>,
    /// Cooking and chilling log.
    pub cooking_details: Vec<CookingEntry>,
    /// Served dishes.
    pub served_rows: Vec<ServedDish>,
    /// Wastage log.
    pub wastage_report: Vec<WastageEntry>,
    /// Incident log.
    pub incident_report: Vec<IncidentEntry>,
}
