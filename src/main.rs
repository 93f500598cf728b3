use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use agri_match::config::{LoggingSettings, Settings};
use agri_match::core::Matcher;
use agri_match::routes::{self, AppState};
use agri_match::services::{CatalogCache, SupabaseClient, SupabaseTables};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins, then LOG_LEVEL, then the configured level
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn startup_error(message: String) -> std::io::Error {
    error!("{}", message);
    std::io::Error::other(message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();

    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    info!("Starting Agri Match service...");

    let settings = settings.map_err(|e| startup_error(format!("Failed to load configuration: {}", e)))?;

    info!("Configuration loaded successfully");

    let directory = settings
        .directory
        .load()
        .map_err(|e| startup_error(format!("Failed to load reference tables: {}", e)))?;

    info!(
        "Reference tables loaded ({} counties, {} hubs, {} produce types)",
        directory.county_count(),
        directory.hub_count(),
        directory.produce_types().len()
    );

    let tables = SupabaseTables {
        sourcing_requests: settings.tables.sourcing_requests,
        farmers: settings.tables.farmers,
    };

    let store = SupabaseClient::new(
        settings.supabase.url,
        settings.supabase.api_key,
        Duration::from_secs(settings.supabase.timeout_secs.unwrap_or(30)),
        tables,
    )
    .map_err(|e| startup_error(format!("Failed to create store client: {}", e)))?;

    info!("Store client initialized");

    let catalog_ttl = settings.cache.catalog_ttl_secs.unwrap_or(60);
    let catalog_capacity = settings.cache.capacity.unwrap_or(16);
    let catalog = CatalogCache::new(catalog_capacity, catalog_ttl);

    info!("Catalog cache initialized (capacity: {}, TTL: {}s)", catalog_capacity, catalog_ttl);

    let matcher = Matcher::new(settings.matching.max_distance_km);

    info!("Matcher initialized with max distance {} km", matcher.max_distance_km());

    let app_state = AppState {
        store: Arc::new(store),
        catalog: Arc::new(catalog),
        directory: Arc::new(directory),
        matcher,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_app)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
