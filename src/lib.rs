//! Agri Match - farmer matching for exporter sourcing requests
//!
//! This library selects the farmers able to serve a sourcing request by
//! produce type, quantity, organic certification and location, and ranks
//! them by great-circle distance.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchResult, LocationDirectory, distance::haversine_distance};
pub use crate::models::{Farmer, FarmerMatch, SourcingRequest, GeoPoint, FindMatchesResponse};
