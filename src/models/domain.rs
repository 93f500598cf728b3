use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Exporter's declared need for a produce type, quantity and location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcingRequest {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub client_id: Option<String>,
    pub produce_type: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub organic_required: Option<bool>,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub handling_instructions: Option<String>,
    #[serde(default)]
    pub dropoff_location: Option<String>,
}

impl SourcingRequest {
    /// Helper to get organic_required as a bool, defaulting to false
    pub fn requires_organic(&self) -> bool {
        self.organic_required.unwrap_or(false)
    }

    /// Request coordinates, only when both halves are present
    pub fn origin(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude, self.longitude)
    }

    /// Preferred location text, ignoring an empty string
    pub fn preferred_location(&self) -> Option<&str> {
        self.preferred_location
            .as_deref()
            .filter(|location| !location.is_empty())
    }
}

/// Farmer catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farmer {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub produce_types: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity_available: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub organic: Option<bool>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub hub_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub acreage: Option<f64>,
}

impl Farmer {
    /// Helper to get organic as a bool, defaulting to false
    pub fn is_organic(&self) -> bool {
        self.organic.unwrap_or(false)
    }

    pub fn position(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude, self.longitude)
    }
}

/// A farmer that passed every filter, with the distance computed for this match
///
/// The distance only exists for the lifetime of a match result; the farmer
/// record itself is left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerMatch {
    #[serde(flatten)]
    pub farmer: Farmer,
    pub distance_km: Option<f64>,
}

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a point only when both coordinates are known
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self { latitude, longitude }),
            _ => None,
        }
    }
}

/// Coerce a loosely typed JSON value into a finite number
///
/// Numbers pass through, strings are trimmed and parsed. Anything else,
/// including `null` and non-finite results, yields `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// Coerce a loosely typed JSON flag into a bool
///
/// Accepts booleans, `"true"`/`"false"` in any case, and numbers (non-zero is
/// true). Anything else yields `None`.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_bool))
}

// Non-array values become None; non-string items are dropped
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}
