// Route exports
pub mod insights;
pub mod matches;
pub mod records;

use actix_web::{error, web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{PitchGenerator, RankingCache, TenantStore};

/// Bounds applied to ranking requests
#[derive(Debug, Clone, Copy)]
pub struct RankLimits {
    pub default_limit: u16,
    pub max_limit: u16,
}

impl Default for RankLimits {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 200,
        }
    }
}

impl RankLimits {
    pub fn effective(&self, requested: Option<u16>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit) as usize
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TenantStore>,
    pub rankings: Arc<RankingCache>,
    pub pitch: Arc<PitchGenerator>,
    pub matcher: Matcher,
    pub limits: RankLimits,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(records::configure)
            .configure(insights::configure),
    );
}

pub(crate) fn bad_request(error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: 400,
    })
}

pub(crate) fn not_found(what: &str, id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: format!("{} not found", what),
        message: format!("No {} with id {}", what.to_lowercase(), id),
        status_code: 404,
    })
}

pub(crate) fn internal_error(error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: 500,
    })
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let response = bad_request("invalid_json", format!("Invalid JSON: {}", err));
    error::InternalError::from_response(err, response).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    let response = bad_request("invalid_query", format!("Invalid query: {}", err));
    error::InternalError::from_response(err, response).into()
}
