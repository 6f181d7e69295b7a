use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::models::{
    Client, HealthResponse, PitchResponse, Property, RankQuery, RankingResponse, ScorePairRequest,
    TenantId,
};
use crate::routes::{bad_request, internal_error, not_found, AppState};
use crate::services::{CacheKey, Collection};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/score", web::post().to(score_pair))
        .route("/tenants/{tenant}/matches/{client_id}", web::get().to(rank_for_client))
        .route(
            "/tenants/{tenant}/matches/{client_id}/pitch/{property_id}",
            web::post().to(pitch_for_match),
        );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store_backend: state.store.backend_name().to_string(),
        cached_rankings: state.rankings.stats().entries,
        timestamp: chrono::Utc::now(),
    })
}

/// Score a posted pair without touching the store
///
/// POST /api/v1/matches/score
///
/// Request body:
/// ```json
/// {
///   "property": { ... },
///   "client": { ... }
/// }
/// ```
async fn score_pair(
    state: web::Data<AppState>,
    req: web::Json<ScorePairRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for score request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    HttpResponse::Ok().json(state.matcher.score(&req.property, &req.client))
}

/// Rank the tenant's inventory against one client
///
/// GET /api/v1/tenants/{tenant}/matches/{clientId}?limit=20
///
/// Rankings are memoized per (tenant, client, limit) until the tenant's
/// properties or clients change.
async fn rank_for_client(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    query: web::Query<RankQuery>,
) -> impl Responder {
    let (tenant, client_id) = path.into_inner();
    let tenant = TenantId::new(&tenant);
    let limit = state.limits.effective(query.limit);
    let generation = state.rankings.generation(&tenant);

    let cache_key = CacheKey::ranking(&tenant, &client_id, Some(limit));
    if let Some(cached) = state.rankings.get(&cache_key).await {
        return HttpResponse::Ok().json(cached.as_ref());
    }

    let clients: Vec<Client> = match state.store.load(&tenant, Collection::Clients).await {
        Ok(clients) => clients,
        Err(e) => {
            tracing::error!("Failed to load clients for {}: {}", tenant, e);
            return internal_error("Failed to load clients", e.to_string());
        }
    };

    let Some(client) = clients.into_iter().find(|c| c.id == client_id) else {
        return not_found("Client", &client_id);
    };

    let properties: Vec<Property> = match state.store.load(&tenant, Collection::Properties).await {
        Ok(properties) => properties,
        Err(e) => {
            tracing::error!("Failed to load properties for {}: {}", tenant, e);
            return internal_error("Failed to load properties", e.to_string());
        }
    };

    let ranking = state.matcher.rank(&client, &properties, Some(limit));

    tracing::info!(
        "Ranked {} of {} properties for client {} of {}",
        ranking.matches.len(),
        ranking.total_candidates,
        client_id,
        tenant
    );

    let response = Arc::new(RankingResponse {
        client_id,
        matches: ranking.matches,
        total_candidates: ranking.total_candidates,
    });
    state
        .rankings
        .insert_if_current(&tenant, generation, cache_key, response.clone())
        .await;

    HttpResponse::Ok().json(response.as_ref())
}

/// Sales pitch for one stored (property, client) pair
///
/// POST /api/v1/tenants/{tenant}/matches/{clientId}/pitch/{propertyId}
async fn pitch_for_match(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> impl Responder {
    let (tenant, client_id, property_id) = path.into_inner();
    let tenant = TenantId::new(&tenant);

    let loaded = tokio::try_join!(
        state.store.load::<Client>(&tenant, Collection::Clients),
        state.store.load::<Property>(&tenant, Collection::Properties),
    );
    let (clients, properties) = match loaded {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to load records for {}: {}", tenant, e);
            return internal_error("Failed to load records", e.to_string());
        }
    };

    let Some(client) = clients.iter().find(|c| c.id == client_id) else {
        return not_found("Client", &client_id);
    };
    let Some(property) = properties.iter().find(|p| p.id == property_id) else {
        return not_found("Property", &property_id);
    };

    let pitch = state.pitch.recommend(property, client).await;

    HttpResponse::Ok().json(PitchResponse {
        property_id,
        client_id,
        pitch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            store_backend: "memory".to_string(),
            cached_rankings: 0,
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
