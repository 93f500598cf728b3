use std::cmp::Ordering;

use crate::models::{Farmer, FarmerMatch, SourcingRequest};
use crate::core::filters::{has_enough_quantity, has_produce, organic_ok, LocationCheck};

/// Default proximity radius for coordinate matching, in kilometers
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<FarmerMatch>,
    pub total_candidates: usize,
}

/// Selects farmers able to serve a sourcing request
///
/// # Pipeline
/// 1. Produce type membership
/// 2. Quantity available
/// 3. Organic certification
/// 4. Location: proximity, text, or unconstrained
/// 5. Stable sort by distance, undistanced farmers last
#[derive(Debug, Clone)]
pub struct Matcher {
    max_distance_km: f64,
}

impl Matcher {
    pub fn new(max_distance_km: f64) -> Self {
        Self { max_distance_km }
    }

    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }

    /// Find the farmers that can serve a request
    ///
    /// # Arguments
    /// * `request` - The sourcing request to satisfy
    /// * `farmers` - The farmer catalog, as fetched from the store
    ///
    /// # Returns
    /// MatchResult with matches ordered by ascending distance
    pub fn find_matches(&self, request: &SourcingRequest, farmers: Vec<Farmer>) -> MatchResult {
        let total_candidates = farmers.len();

        let mut matches: Vec<FarmerMatch> = farmers
            .into_iter()
            .filter(|farmer| has_produce(farmer, request))
            .filter(|farmer| has_enough_quantity(farmer, request))
            .filter(|farmer| organic_ok(farmer, request))
            .filter_map(|farmer| {
                let check = LocationCheck::resolve(request, &farmer);
                if !check.passes(&farmer, self.max_distance_km) {
                    return None;
                }

                let distance_km = check.distance_km();
                Some(FarmerMatch { farmer, distance_km })
            })
            .collect();

        // sort_by is stable, so equal keys keep their filter order
        matches.sort_by(|a, b| compare_distance(a.distance_km, b.distance_km));

        tracing::debug!(
            "Matched {} of {} farmers for produce {:?}",
            matches.len(),
            total_candidates,
            request.produce_type
        );

        MatchResult {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE_KM)
    }
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
