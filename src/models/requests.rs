use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::domain::SourcingRequest;

/// Request to preview matches for a sourcing request that is not saved yet
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchPreviewRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "produceType")]
    pub produce_type: String,
    #[validate(range(exclusive_min = 0.0))]
    pub quantity: f64,
    #[serde(default, alias = "organicRequired")]
    pub organic_required: bool,
    #[serde(default, alias = "preferredLocation")]
    pub preferred_location: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl From<MatchPreviewRequest> for SourcingRequest {
    fn from(value: MatchPreviewRequest) -> Self {
        SourcingRequest {
            id: Value::Null,
            client_id: None,
            produce_type: value.produce_type,
            quantity: Some(value.quantity),
            organic_required: Some(value.organic_required),
            preferred_location: value.preferred_location,
            latitude: value.latitude,
            longitude: value.longitude,
            handling_instructions: None,
            dropoff_location: None,
        }
    }
}

/// Query string for the farmer listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmerSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}
