// Route exports
pub mod profile;
pub mod programs;
pub mod shortlist;
pub mod universities;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::HealthResponse;
use crate::services::{FitService, PostgresClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub fit: Arc<FitService<PostgresClient>>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api/v1")
            .configure(programs::configure)
            .configure(profile::configure)
            .configure(shortlist::configure)
            .configure(universities::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Parse a path or body identifier, rejecting anything that is not a UUID
pub(crate) fn parse_id(raw: Option<&str>, field: &str) -> Result<Uuid, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} required", field)))?;

    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("{} must be a UUID", field)))
}
