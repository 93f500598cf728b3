use crate::models::{Farmer, SourcingRequest};

/// How the location constraint applies to one (request, farmer) pair
///
/// Resolved per farmer: proximity is only possible when both sides carry
/// coordinates, otherwise the request's preferred location text is used,
/// and with neither the constraint is dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationCheck<'a> {
    Proximity { distance_km: f64 },
    Text { needle: &'a str },
    Unconstrained,
}

impl<'a> LocationCheck<'a> {
    pub fn resolve(request: &'a SourcingRequest, farmer: &Farmer) -> Self {
        if let (Some(origin), Some(position)) = (request.origin(), farmer.position()) {
            return LocationCheck::Proximity {
                distance_km: origin.distance_km(&position),
            };
        }

        match request.preferred_location() {
            Some(needle) => LocationCheck::Text { needle },
            None => LocationCheck::Unconstrained,
        }
    }

    /// Whether the farmer satisfies this check
    pub fn passes(&self, farmer: &Farmer, max_distance_km: f64) -> bool {
        match self {
            LocationCheck::Proximity { distance_km } => *distance_km <= max_distance_km,
            LocationCheck::Text { needle } => farmer
                .location
                .as_deref()
                .is_some_and(|location| contains_ignore_case(location, needle)),
            LocationCheck::Unconstrained => true,
        }
    }

    /// Distance to annotate the match with, if one was computed
    pub fn distance_km(&self) -> Option<f64> {
        match self {
            LocationCheck::Proximity { distance_km } => Some(*distance_km),
            _ => None,
        }
    }
}

/// The requested produce type is listed by the farmer
#[inline]
pub fn has_produce(farmer: &Farmer, request: &SourcingRequest) -> bool {
    farmer
        .produce_types
        .as_ref()
        .is_some_and(|types| types.iter().any(|t| *t == request.produce_type))
}

/// The farmer can supply the requested quantity
///
/// A quantity that could not be read as a number on either side fails.
#[inline]
pub fn has_enough_quantity(farmer: &Farmer, request: &SourcingRequest) -> bool {
    match (farmer.quantity_available, request.quantity) {
        (Some(available), Some(wanted)) => available >= wanted,
        _ => false,
    }
}

#[inline]
pub fn organic_ok(farmer: &Farmer, request: &SourcingRequest) -> bool {
    !request.requires_organic() || farmer.is_organic()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_farmer(value: serde_json::Value) -> Farmer {
        serde_json::from_value(value).unwrap()
    }

    fn create_test_request(value: serde_json::Value) -> SourcingRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_has_produce() {
        let request = create_test_request(json!({"produce_type": "Mango", "quantity": 10}));

        let listed = create_test_farmer(json!({"produce_types": ["Avocado", "Mango"]}));
        let unlisted = create_test_farmer(json!({"produce_types": ["Avocado"]}));
        let wrong_case = create_test_farmer(json!({"produce_types": ["mango"]}));
        let not_a_list = create_test_farmer(json!({"produce_types": "Mango"}));

        assert!(has_produce(&listed, &request));
        assert!(!has_produce(&unlisted, &request));
        assert!(!has_produce(&wrong_case, &request));
        assert!(!has_produce(&not_a_list, &request));
    }

    #[test]
    fn test_has_enough_quantity() {
        let request = create_test_request(json!({"produce_type": "Mango", "quantity": "500"}));

        let exact = create_test_farmer(json!({"quantity_available": 500}));
        let short = create_test_farmer(json!({"quantity_available": 499.9}));
        let garbled = create_test_farmer(json!({"quantity_available": "plenty"}));
        let missing = create_test_farmer(json!({}));

        assert!(has_enough_quantity(&exact, &request));
        assert!(!has_enough_quantity(&short, &request));
        assert!(!has_enough_quantity(&garbled, &request));
        assert!(!has_enough_quantity(&missing, &request));
    }

    #[test]
    fn test_unreadable_request_quantity_fails() {
        let request = create_test_request(json!({"produce_type": "Mango", "quantity": "some"}));
        let farmer = create_test_farmer(json!({"quantity_available": 1_000_000}));

        assert!(!has_enough_quantity(&farmer, &request));
    }

    #[test]
    fn test_organic_ok() {
        let organic_request = create_test_request(json!({"produce_type": "Tea", "organic_required": true}));
        let any_request = create_test_request(json!({"produce_type": "Tea"}));

        let organic = create_test_farmer(json!({"organic": true}));
        let conventional = create_test_farmer(json!({"organic": false}));

        assert!(organic_ok(&organic, &organic_request));
        assert!(!organic_ok(&conventional, &organic_request));
        assert!(organic_ok(&conventional, &any_request));
    }

    #[test]
    fn test_location_check_prefers_coordinates() {
        let request = create_test_request(json!({
            "produce_type": "Mango",
            "preferred_location": "Embu",
            "latitude": -1.286,
            "longitude": 36.817,
        }));
        let farmer = create_test_farmer(json!({
            "location": "Kiambu",
            "latitude": -1.3,
            "longitude": 36.8,
        }));

        let check = LocationCheck::resolve(&request, &farmer);
        assert!(matches!(check, LocationCheck::Proximity { .. }));
        assert!(check.passes(&farmer, 50.0));
        assert!(check.distance_km().is_some());
    }

    #[test]
    fn test_location_check_falls_back_to_text() {
        let request = create_test_request(json!({
            "produce_type": "Mango",
            "preferred_location": "kiambu",
            "latitude": -1.286,
            "longitude": 36.817,
        }));
        let farmer = create_test_farmer(json!({"location": "Upper KIAMBU Ward"}));
        let elsewhere = create_test_farmer(json!({"location": "Embu"}));
        let nowhere = create_test_farmer(json!({}));

        let check = LocationCheck::resolve(&request, &farmer);
        assert_eq!(check, LocationCheck::Text { needle: "kiambu" });
        assert!(check.passes(&farmer, 50.0));
        assert!(!LocationCheck::resolve(&request, &elsewhere).passes(&elsewhere, 50.0));
        assert!(!LocationCheck::resolve(&request, &nowhere).passes(&nowhere, 50.0));
        assert_eq!(check.distance_km(), None);
    }

    #[test]
    fn test_location_check_unconstrained() {
        let request = create_test_request(json!({"produce_type": "Mango", "preferred_location": ""}));
        let farmer = create_test_farmer(json!({"latitude": 10.0, "longitude": 10.0}));

        let check = LocationCheck::resolve(&request, &farmer);
        assert_eq!(check, LocationCheck::Unconstrained);
        assert!(check.passes(&farmer, 50.0));
    }

    #[test]
    fn test_proximity_threshold_is_inclusive() {
        let farmer = create_test_farmer(json!({}));

        assert!(LocationCheck::Proximity { distance_km: 50.0 }.passes(&farmer, 50.0));
        assert!(!LocationCheck::Proximity { distance_km: 50.01 }.passes(&farmer, 50.0));
    }
}
