use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{LocationDirectory, Matcher};
use crate::models::{
    ErrorResponse, Farmer, FarmerListResponse, FarmerListing, FarmerSearchQuery, FindMatchesResponse,
    HealthResponse, MatchPreviewRequest, SourcingRequest,
};
use crate::services::{CatalogCache, ExporterSession, SupabaseClient, SupabaseError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SupabaseClient>,
    pub catalog: Arc<CatalogCache>,
    pub directory: Arc<LocationDirectory>,
    pub matcher: Matcher,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/requests/{request_id}/matches", web::get().to(find_request_matches))
        .route("/matches/preview", web::post().to(preview_matches))
        .route("/farmers", web::get().to(list_farmers));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await;

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Match farmers against a saved sourcing request
///
/// GET /api/v1/requests/{request_id}/matches
async fn find_request_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    session: ExporterSession,
) -> impl Responder {
    let request_id = path.into_inner();

    tracing::info!("Finding matches for sourcing request: {}", request_id);

    let request = match state.store.get_sourcing_request(&request_id, &session).await {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Failed to fetch sourcing request {}: {}", request_id, e);
            return store_error_response("Failed to fetch sourcing request", e);
        }
    };

    run_matching(&state, request, &session).await
}

/// Preview matches for an unsaved request
///
/// POST /api/v1/matches/preview
///
/// Request body:
/// ```json
/// {
///   "produceType": "Mango",
///   "quantity": 500,
///   "organicRequired": true,
///   "preferredLocation": "Kiambu",
///   "latitude": -1.286,
///   "longitude": 36.817
/// }
/// ```
async fn preview_matches(
    state: web::Data<AppState>,
    req: web::Json<MatchPreviewRequest>,
    session: ExporterSession,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for preview request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if !state.directory.is_known_produce(&req.produce_type) {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Unknown produce type".to_string(),
            message: format!("{} is not in the produce catalog", req.produce_type),
            status_code: 400,
        });
    }

    run_matching(&state, SourcingRequest::from(req.into_inner()), &session).await
}

async fn run_matching(
    state: &AppState,
    request: SourcingRequest,
    session: &ExporterSession,
) -> HttpResponse {
    let farmers = match state.catalog.farmers(&state.store, session).await {
        Ok(farmers) => farmers,
        Err(e) => {
            tracing::error!("Failed to fetch farmer catalog: {}", e);
            return store_error_response("Failed to fetch farmers", e);
        }
    };

    let result = state.matcher.find_matches(&request, farmers.to_vec());

    tracing::info!(
        "Returning {} matches for {} (from {} farmers)",
        result.matches.len(),
        request.produce_type,
        result.total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        request,
        matches: result.matches,
        total_candidates: result.total_candidates,
    })
}

/// Farmer catalog with county and hub names resolved
///
/// GET /api/v1/farmers?search={text}
async fn list_farmers(
    state: web::Data<AppState>,
    query: web::Query<FarmerSearchQuery>,
    session: ExporterSession,
) -> impl Responder {
    let farmers = match state.catalog.farmers(&state.store, &session).await {
        Ok(farmers) => farmers,
        Err(e) => {
            tracing::error!("Failed to fetch farmer catalog: {}", e);
            return store_error_response("Failed to fetch farmers", e);
        }
    };

    let search = query.search.as_deref().unwrap_or("").to_lowercase();

    let listings: Vec<FarmerListing> = farmers
        .iter()
        .map(|farmer| farmer_listing(farmer, &state.directory))
        .filter(|listing| listing_matches(listing, &search))
        .collect();

    HttpResponse::Ok().json(FarmerListResponse {
        total: listings.len(),
        farmers: listings,
    })
}

/// Resolve a farmer's reference ids into display names
pub fn farmer_listing(farmer: &Farmer, directory: &LocationDirectory) -> FarmerListing {
    FarmerListing {
        id: farmer.id.clone(),
        name: farmer.name.clone(),
        phone_number: farmer.phone_number.clone(),
        county: farmer.county.as_deref().map(|c| directory.county_name(c).to_string()),
        hub: farmer.hub_id.as_deref().map(|h| directory.hub_name(h).to_string()),
        produce_types: farmer.produce_types.clone().unwrap_or_default(),
        quantity_available: farmer.quantity_available,
        acreage: farmer.acreage,
        organic: farmer.is_organic(),
        location: farmer.location.clone(),
    }
}

// `search` is expected lowercased; empty matches everything
fn listing_matches(listing: &FarmerListing, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    [&listing.name, &listing.phone_number, &listing.county]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(search))
}

fn store_error_response(context: &str, e: SupabaseError) -> HttpResponse {
    let status = match e {
        SupabaseError::NotFound(_) => StatusCode::NOT_FOUND,
        SupabaseError::Unauthorized => StatusCode::UNAUTHORIZED,
        _ => StatusCode::BAD_GATEWAY,
    };

    HttpResponse::build(status).json(ErrorResponse {
        error: context.to_string(),
        message: e.to_string(),
        status_code: status.as_u16(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_farmer(value: serde_json::Value) -> Farmer {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_farmer_listing_resolves_names() {
        let directory = LocationDirectory::builtin().unwrap();
        let farmer = create_farmer(json!({
            "id": "f-1",
            "name": "Jane Farmer",
            "county": "55586541-4e5c-4e60-0f9c-9d7c1e8e7f2f",
            "hub_id": "945d0009-22ed-41c5-a893-fd6a5fcdae06",
            "produce_types": "Mango",
        }));

        let listing = farmer_listing(&farmer, &directory);

        assert_eq!(listing.county.as_deref(), Some("Kiambu"));
        assert_eq!(listing.hub.as_deref(), Some("Nairobi Primary"));
        assert!(listing.produce_types.is_empty());
    }

    #[test]
    fn test_listing_search() {
        let directory = LocationDirectory::builtin().unwrap();
        let listing = farmer_listing(
            &create_farmer(json!({
                "name": "Green Fields Co-op",
                "phone_number": "+254712345678",
                "county": "e0f83c2a-c46e-4c5b-8fa6-c7b8862e9958",
            })),
            &directory,
        );

        assert!(listing_matches(&listing, ""));
        assert!(listing_matches(&listing, "fields"));
        assert!(listing_matches(&listing, "712345"));
        assert!(listing_matches(&listing, "meru"));
        assert!(!listing_matches(&listing, "embu"));
    }

    #[test]
    fn test_store_error_status() {
        let response = store_error_response("x", SupabaseError::NotFound("r".into()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = store_error_response("x", SupabaseError::ApiError("500".into()));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
