use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Transaction a listing is offered under, or that a client is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Rent,
    Sale,
    Lease,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Rent => write!(f, "Rent"),
            TransactionType::Sale => write!(f, "Sale"),
            TransactionType::Lease => write!(f, "Lease"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FurnishingStatus {
    Fully,
    Semi,
    Unfurnished,
    Any,
}

impl fmt::Display for FurnishingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FurnishingStatus::Fully => write!(f, "Fully"),
            FurnishingStatus::Semi => write!(f, "Semi"),
            FurnishingStatus::Unfurnished => write!(f, "Unfurnished"),
            FurnishingStatus::Any => write!(f, "Any"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyType {
    #[default]
    Flat,
    Villa,
    Commercial,
    Plot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyStatus {
    #[default]
    Available,
    #[serde(rename = "On Hold")]
    OnHold,
    Rented,
    Sold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    East,
    West,
    North,
    South,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ListingSource {
    #[default]
    Direct,
    Broker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    Bachelor,
    Married,
}

/// Sales pipeline stage of a lead, in funnel order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LeadStage {
    #[default]
    New,
    Contacted,
    Shared,
    #[serde(rename = "Site Visit")]
    SiteVisit,
    Negotiation,
    Closed,
    Lost,
}

impl LeadStage {
    pub const ALL: [LeadStage; 7] = [
        LeadStage::New,
        LeadStage::Contacted,
        LeadStage::Shared,
        LeadStage::SiteVisit,
        LeadStage::Negotiation,
        LeadStage::Closed,
        LeadStage::Lost,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReminderType {
    #[default]
    Meeting,
    #[serde(rename = "Site Visit")]
    SiteVisit,
    #[serde(rename = "Follow-up Call")]
    Call,
    #[serde(rename = "Payment Collection")]
    Payment,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReminderStatus {
    #[default]
    Pending,
    Completed,
    Rescheduled,
    Cancelled,
    #[serde(rename = "No-Show")]
    NoShow,
}

/// Treat an explicit `null` the same as a missing collection
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[serde(default)]
    pub address: String,
    #[validate(custom(function = "not_blank"))]
    pub area: String,
    #[validate(custom(function = "not_blank"))]
    pub city: String,
}

/// A listing in a tenant's inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tenant_id: String,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    pub transaction_type: TransactionType,
    pub price: u64,
    #[serde(default)]
    pub negotiable: bool,
    #[serde(default)]
    pub carpet_area: u32,
    #[serde(default)]
    pub built_up_area: u32,
    #[validate(custom(function = "not_blank"))]
    pub bhk: String,
    #[serde(default)]
    pub floor_number: i32,
    #[serde(default)]
    pub total_floors: u32,
    #[serde(default)]
    pub building_name: String,
    #[serde(default)]
    pub facing: Facing,
    #[serde(default)]
    pub age_of_building: u32,
    pub furnishing: FurnishingStatus,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub lift_available: bool,
    #[serde(default)]
    pub power_backup: bool,
    #[serde(default)]
    pub pets_allowed: bool,
    #[serde(default)]
    pub bachelors_allowed: bool,
    #[serde(default)]
    pub availability_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photos: Vec<String>,
    #[validate(nested)]
    pub location: Location,
    #[serde(default)]
    pub listing_source: ListingSource,
    #[serde(default)]
    pub broker_name: Option<String>,
    #[serde(default)]
    pub broker_number: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A client / lead and the requirements used for matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_budget_range"))]
pub struct Client {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tenant_id: String,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profession: Option<String>,
    pub marital_status: MaritalStatus,
    #[serde(default)]
    pub family_size: u32,
    pub requirement: TransactionType,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub preferred_areas: Vec<String>,
    #[serde(default)]
    pub preferred_city: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bhk_preference: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub furnishing_preference: Vec<FurnishingStatus>,
    pub budget_min: u64,
    pub budget_max: u64,
    #[serde(default)]
    pub move_in_date: Option<NaiveDate>,
    #[serde(default)]
    pub lead_stage: LeadStage,
    #[serde(default)]
    pub listing_source: ListingSource,
    #[serde(default)]
    pub broker_name: Option<String>,
    #[serde(default)]
    pub broker_number: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn validate_budget_range(client: &Client) -> Result<(), ValidationError> {
    if client.budget_min > client.budget_max {
        let mut err = ValidationError::new("budget_range");
        err.message = Some("budgetMin must not exceed budgetMax".into());
        return Err(err);
    }
    Ok(())
}

/// A scheduled agent activity. Reminders are plain records: nothing fires them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(default)]
    pub id: String,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub reminder_type: ReminderType,
    #[serde(default)]
    pub status: ReminderStatus,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub notified: bool,
    #[serde(default)]
    pub client_present: Option<bool>,
    #[serde(default)]
    pub owner_present: Option<bool>,
    #[serde(default)]
    pub reschedule_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Reminder {
    /// Record the outcome of the activity and close it
    pub fn complete(&mut self, client_present: bool, owner_present: bool) {
        self.client_present = Some(client_present);
        self.owner_present = Some(owner_present);
        self.status = ReminderStatus::Completed;
        self.is_completed = true;
    }

    /// Flip between completed and pending
    pub fn toggle(&mut self) {
        self.is_completed = !self.is_completed;
        self.status = if self.is_completed {
            ReminderStatus::Completed
        } else {
            ReminderStatus::Pending
        };
    }

    pub fn reschedule(&mut self, time: DateTime<Utc>) {
        self.time = time;
        self.status = ReminderStatus::Rescheduled;
        self.reschedule_count += 1;
    }
}

/// Per-dimension sub-scores of a match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub budget: u32,
    pub area: u32,
    pub bhk: u32,
    pub furnishing: u32,
    pub lifestyle: u32,
    pub availability: u32,
}

impl ScoreBreakdown {
    /// Saturating sum of the sub-scores
    pub fn total(&self) -> u32 {
        [
            self.budget,
            self.area,
            self.bhk,
            self.furnishing,
            self.lifestyle,
            self.availability,
        ]
        .into_iter()
        .fold(0u32, u32::saturating_add)
    }
}

/// Score of one property against one client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub property_id: String,
    pub client_id: String,
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub reasons: Vec<String>,
}

/// A property paired with its score, as returned by a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProperty {
    pub property: Property,
    pub result: MatchResult,
}

/// Scoring weights
///
/// Maxima per dimension plus the two partial credits. The maxima must not
/// sum above 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub budget: u32,
    pub under_budget: u32,
    pub area: u32,
    pub area_fallback: u32,
    pub bhk: u32,
    pub furnishing: u32,
    pub lifestyle: u32,
    pub availability: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            budget: 30,
            under_budget: 20,
            area: 25,
            area_fallback: 10,
            bhk: 15,
            furnishing: 10,
            lifestyle: 10,
            availability: 10,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightsError {
    #[error("weight maxima sum to {0}, must be at most 100")]
    TotalTooHigh(u64),

    #[error("partial credit for {dimension} ({partial}) exceeds its maximum ({max})")]
    PartialExceedsMax {
        dimension: &'static str,
        partial: u32,
        max: u32,
    },
}

impl ScoringWeights {
    /// Sum of the dimension maxima, widened so operator-supplied weights cannot overflow
    pub fn max_total(&self) -> u64 {
        [
            self.budget,
            self.area,
            self.bhk,
            self.furnishing,
            self.lifestyle,
            self.availability,
        ]
        .into_iter()
        .map(u64::from)
        .sum()
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        let total = self.max_total();
        if total > 100 {
            return Err(WeightsError::TotalTooHigh(total));
        }
        if self.under_budget > self.budget {
            return Err(WeightsError::PartialExceedsMax {
                dimension: "budget",
                partial: self.under_budget,
                max: self.budget,
            });
        }
        if self.area_fallback > self.area {
            return Err(WeightsError::PartialExceedsMax {
                dimension: "area",
                partial: self.area_fallback,
                max: self.area,
            });
        }
        Ok(())
    }
}

/// Sanitized tenant identifier, used to namespace every stored blob
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    /// Replace anything that is not ASCII alphanumeric with `_`
    pub fn new(raw: &str) -> Self {
        Self(
            raw.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
