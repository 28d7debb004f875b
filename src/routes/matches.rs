use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use crate::core::MatchingOrchestrator;
use crate::error::MatchError;
use crate::models::HealthResponse;
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<MatchingOrchestrator>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match/{offer_id}", web::get().to(match_users_with_offer));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Match candidates with an offer
///
/// GET /api/v1/match/{offerId}
///
/// Requires `Authorization: Bearer <token>` from a recruiter with a plan.
/// Returns a JSON array whose size and fields depend on that plan.
async fn match_users_with_offer(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, MatchError> {
    let offer_id = path.into_inner();

    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| MatchError::Unauthorized("Missing Authorization header".to_string()))?;

    let results = state
        .orchestrator
        .match_users_with_offer(offer_id, bearer)
        .await?;

    Ok(HttpResponse::Ok().json(results))
}
