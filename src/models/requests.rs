use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Client, Property};

/// Query string for ranking properties against one client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankQuery {
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Ad hoc scoring of a pair that is not necessarily stored
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScorePairRequest {
    #[validate(nested)]
    pub property: Property,
    #[validate(nested)]
    pub client: Client,
}

/// Quick search query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Structured filters for a smart search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default)]
    pub bhk: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub max_price: Option<u64>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
}

/// Outcome of a completed reminder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteReminderRequest {
    pub client_present: bool,
    pub owner_present: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleReminderRequest {
    pub time: DateTime<Utc>,
}
