// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{coerce_bool, coerce_number, Farmer, FarmerMatch, GeoPoint, SourcingRequest};
pub use requests::{FarmerSearchQuery, MatchPreviewRequest};
pub use responses::{ErrorResponse, FarmerListing, FarmerListResponse, FindMatchesResponse, HealthResponse};
