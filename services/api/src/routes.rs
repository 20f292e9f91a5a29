use crate::infra::{AppState, InMemoryFacilityRepository, PricingService};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use facility_pricing::error::AppError;
use facility_pricing::pricing::{
    is_facility_ready_for_pricing, pricing_router, Facility, FacilityCsvImporter, FacilityId,
    FacilityRepository, PricingError, PricingReadiness,
};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

pub(crate) fn with_pricing_routes(
    service: Arc<PricingService>,
    facilities: InMemoryFacilityRepository,
) -> Router {
    let facility_routes = Router::new()
        .route("/api/v1/facilities/:facility_id", put(upsert_facility))
        .route(
            "/api/v1/facilities/:facility_id/areas/import",
            post(import_areas),
        )
        .with_state(facilities);

    pricing_router(service)
        .merge(facility_routes)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stores a facility snapshot; the path id wins over any id in the body.
pub(crate) async fn upsert_facility(
    State(facilities): State<InMemoryFacilityRepository>,
    Path(facility_id): Path<String>,
    Json(mut facility): Json<Facility>,
) -> Result<Json<PricingReadiness>, AppError> {
    facility.id = FacilityId::new(facility_id);
    let stored = facilities
        .upsert(facility)
        .map_err(PricingError::Repository)?;
    info!(facility_id = %stored.id, areas = stored.areas.len(), "facility stored");
    Ok(Json(is_facility_ready_for_pricing(&stored)))
}

/// Replaces a stored facility's areas with rows from a CSV area export.
pub(crate) async fn import_areas(
    State(facilities): State<InMemoryFacilityRepository>,
    Path(facility_id): Path<String>,
    body: String,
) -> Result<Json<PricingReadiness>, AppError> {
    let facility_id = FacilityId::new(facility_id);
    let mut facility = facilities
        .fetch(&facility_id)
        .map_err(PricingError::Repository)?
        .ok_or_else(|| PricingError::FacilityNotFound(facility_id.clone()))?;

    facility.areas = FacilityCsvImporter::from_reader(Cursor::new(body.into_bytes()))?;
    let stored = facilities
        .upsert(facility)
        .map_err(PricingError::Repository)?;
    info!(facility_id = %stored.id, areas = stored.areas.len(), "areas imported");
    Ok(Json(is_facility_ready_for_pricing(&stored)))
}
