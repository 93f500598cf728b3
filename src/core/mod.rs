// Core algorithm exports
pub mod directory;
pub mod distance;
pub mod filters;
pub mod matcher;

pub use directory::{DirectoryError, LocationDirectory};
pub use distance::{haversine_distance, EARTH_RADIUS_KM};
pub use filters::{has_enough_quantity, has_produce, organic_ok, LocationCheck};
pub use matcher::{MatchResult, Matcher, DEFAULT_MAX_DISTANCE_KM};
