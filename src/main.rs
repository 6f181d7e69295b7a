use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use propmate::config::Settings;
use propmate::core::Matcher;
use propmate::routes::{
    self, handle_json_payload_error, handle_query_payload_error, AppState, RankLimits,
};
use propmate::services::{PitchGenerator, RankingCache, TenantStore};
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(default_level: &str, default_format: &str) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| default_level.to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| default_format.to_string());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(message: String) -> io::Error {
    error!("{}", message);
    io::Error::new(io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();

    match &settings {
        Ok(s) => init_logging(&s.logging.level, &s.logging.format),
        Err(_) => init_logging("info", "json"),
    }

    info!("Starting PropMate matching service...");

    let settings =
        settings.map_err(|e| startup_error(format!("Failed to load configuration: {}", e)))?;

    info!("Configuration loaded successfully");

    // Refuse to serve with a weight table that can exceed 100
    let weights = settings.scoring_weights();
    weights
        .validate()
        .map_err(|e| startup_error(format!("Invalid scoring weights: {}", e)))?;

    let l1_size = settings.store.l1_cache_size.unwrap_or(1000);
    let l1_ttl = settings.store.l1_ttl_secs.unwrap_or(60);

    let store = match &settings.store.redis_url {
        Some(url) => TenantStore::connect(url, l1_size, l1_ttl)
            .await
            .map_err(|e| startup_error(format!("Failed to connect to Redis: {}", e)))?,
        None => {
            warn!("No Redis URL configured, records will live in process memory");
            TenantStore::in_memory(l1_size, l1_ttl)
        }
    };
    let store = Arc::new(store);

    info!(
        "Tenant store initialized ({} backend, L1: {} entries, TTL: {}s)",
        store.backend_name(),
        l1_size,
        l1_ttl
    );

    let rankings = Arc::new(RankingCache::new(
        settings.cache.ranking_capacity.unwrap_or(5000),
        settings.cache.ranking_ttl_secs.unwrap_or(300),
    ));

    let pitch = PitchGenerator::new(
        settings.ai.api_key.clone(),
        settings.ai.endpoint.clone(),
        settings.ai.model.clone(),
        settings.ai.timeout_secs,
    )
    .map_err(|e| startup_error(format!("Failed to build pitch client: {}", e)))?;

    if pitch.is_remote() {
        info!("Pitch generation using model {}", settings.ai.model);
    } else {
        info!("No AI API key configured, pitches use the local template");
    }
    let pitch = Arc::new(pitch);

    let matcher = Matcher::new(weights).with_min_score(settings.matching.min_score.unwrap_or(0));

    info!("Matcher initialized with weights: {:?}", weights);

    let defaults = RankLimits::default();
    let limits = RankLimits {
        default_limit: settings.matching.default_limit.unwrap_or(defaults.default_limit),
        max_limit: settings.matching.max_limit.unwrap_or(defaults.max_limit),
    };

    let app_state = AppState {
        store,
        rankings,
        pitch,
        matcher,
        limits,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
