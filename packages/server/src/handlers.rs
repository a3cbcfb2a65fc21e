//! HTTP handler functions for the verification API.

use actix_web::{HttpResponse, web};
use fho_verify_server_models::{ApiError, ApiHealth, IbwStatsRequest, StatsRequest};
use fho_verify_verification::VerificationError;
use fho_verify_verification::catalog;
use serde::Serialize;

use crate::{AppState, api};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/available-dates`
///
/// Sorted distinct forecast issuance dates, `YYYY-MM-DD`.
pub async fn available_dates(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(catalog::available_dates(&state.dataset))
}

/// `GET /api/high-impact-events`
pub async fn high_impact_events(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(catalog::high_impact_events(&state.dataset))
}

/// `POST /api/stats`
///
/// Cumulative POD over the requested range, map layers for the issuance
/// date and the per-polygon POD distribution.
pub async fn stats(state: web::Data<AppState>, body: web::Json<StatsRequest>) -> HttpResponse {
    let dataset = state.dataset.clone();
    let request = body.into_inner();
    respond(web::block(move || api::stats_response(&dataset, &request)).await)
}

/// `POST /api/ibw-stats`
///
/// Impact-tier validation for one issuance cycle.
pub async fn ibw_stats(
    state: web::Data<AppState>,
    body: web::Json<IbwStatsRequest>,
) -> HttpResponse {
    let dataset = state.dataset.clone();
    let request = body.into_inner();
    respond(web::block(move || api::ibw_stats_response(&dataset, &request)).await)
}

/// Validation errors are the caller's fault (400). A failure of the
/// blocking pool itself is ours (500).
fn respond<T: Serialize>(
    result: Result<Result<T, VerificationError>, actix_web::error::BlockingError>,
) -> HttpResponse {
    match result {
        Ok(Ok(response)) => HttpResponse::Ok().json(response),
        Ok(Err(e)) => {
            log::debug!("Rejected request: {e}");
            HttpResponse::BadRequest().json(ApiError::new(e))
        }
        Err(e) => {
            log::error!("Verification task failed: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Verification failed"))
        }
    }
}
