//! HTTP request handlers for the claim service.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::pipeline::{ClaimDate, ClaimRequest};

use super::request::{AUTH_TOKEN_HEADER, ClaimQueryParams};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/claims", get(claims_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// Handler for `GET /claims`.
///
/// Generates one claim per person on call in the requested window, dated
/// today, and returns the claim locations as a JSON array.
async fn claims_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ClaimQueryParams>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing claim request");

    let window = match params.validate() {
        Ok(window) => window,
        Err(api_error) => {
            warn!(correlation_id = %correlation_id, error = %api_error.message, "Rejected claim request");
            return ApiErrorResponse::bad_request(api_error).into_response();
        }
    };

    let api_token = match headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
    {
        Some(token) => token.to_string(),
        None => {
            warn!(correlation_id = %correlation_id, "Missing auth token header");
            return ApiErrorResponse::bad_request(ApiError::missing_header(AUTH_TOKEN_HEADER))
                .into_response();
        }
    };

    let request = ClaimRequest {
        schedule_name: state.schedule_name().to_string(),
        api_token,
        since: window.since,
        until: window.until,
        output_directory: None,
        claim_date: ClaimDate::Now,
    };

    let pipeline = state.pipeline();
    let started = Instant::now();
    let joined = tokio::task::spawn_blocking(move || pipeline.run(&request, Utc::now())).await;

    match joined {
        Ok(Ok(output)) => {
            let locations = output.locations();
            info!(
                correlation_id = %correlation_id,
                claims = locations.len(),
                failed = output.report.failures().count(),
                skipped_records = output.skipped_records,
                duration_ms = started.elapsed().as_millis(),
                "Claims generated"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(locations),
            )
                .into_response()
        }
        Ok(Err(err)) => {
            warn!(correlation_id = %correlation_id, error = %err, "Claim generation failed");
            ApiErrorResponse::from(err).into_response()
        }
        Err(join_error) => {
            error!(correlation_id = %correlation_id, error = %join_error, "Claim task aborted");
            ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::new("INTERNAL_ERROR", "Claim generation aborted"),
            }
            .into_response()
        }
    }
}
