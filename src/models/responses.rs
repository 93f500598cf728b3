use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::domain::{FarmerMatch, SourcingRequest};

/// Response for the match endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub request: SourcingRequest,
    pub matches: Vec<FarmerMatch>,
    pub total_candidates: usize,
}

/// Farmer as shown in the catalog listing, with reference ids resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerListing {
    pub id: Value,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub county: Option<String>,
    pub hub: Option<String>,
    pub produce_types: Vec<String>,
    pub quantity_available: Option<f64>,
    pub acreage: Option<f64>,
    pub organic: bool,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerListResponse {
    pub farmers: Vec<FarmerListing>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
