use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FacilityId, PricingPlanId, TenantId};
use super::error::{PricingError, PricingErrorKind};
use super::keys::{ServiceFrequency, TaskComplexity};
use super::plan::PricingPlan;
use super::repository::{FacilityRepository, PricingPlanRepository};
use super::service::FacilityPricingService;

#[derive(Debug, Deserialize)]
pub struct PricingRequest {
    pub service_frequency: ServiceFrequency,
    #[serde(default)]
    pub task_complexity: Option<TaskComplexity>,
    #[serde(default)]
    pub pricing_plan_id: Option<PricingPlanId>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub frequencies: Vec<ServiceFrequency>,
    #[serde(default)]
    pub pricing_plan_id: Option<PricingPlanId>,
}

#[derive(Debug, Deserialize)]
pub struct ProposalRequest {
    pub service_frequency: ServiceFrequency,
    #[serde(default)]
    pub pricing_plan_id: Option<PricingPlanId>,
}

#[derive(Debug, Deserialize)]
pub struct DefaultPlanRequest {
    pub tenant_id: TenantId,
}

/// Router builder exposing the pricing engine over HTTP.
pub fn pricing_router<F, P>(service: Arc<FacilityPricingService<F, P>>) -> Router
where
    F: FacilityRepository + 'static,
    P: PricingPlanRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/facilities/:facility_id/pricing",
            post(pricing_handler::<F, P>),
        )
        .route(
            "/api/v1/facilities/:facility_id/pricing/compare",
            post(compare_handler::<F, P>),
        )
        .route(
            "/api/v1/facilities/:facility_id/pricing/readiness",
            get(readiness_handler::<F, P>),
        )
        .route(
            "/api/v1/facilities/:facility_id/proposal-services",
            post(proposal_handler::<F, P>),
        )
        .route(
            "/api/v1/facilities/:facility_id/task-time",
            get(task_time_handler::<F, P>),
        )
        .route("/api/v1/pricing-plans", post(save_plan_handler::<F, P>))
        .route(
            "/api/v1/pricing-plans/:plan_id/default",
            post(default_plan_handler::<F, P>),
        )
        .with_state(service)
}

pub(crate) async fn pricing_handler<F, P>(
    State(service): State<Arc<FacilityPricingService<F, P>>>,
    Path(facility_id): Path<String>,
    axum::Json(request): axum::Json<PricingRequest>,
) -> Response
where
    F: FacilityRepository + 'static,
    P: PricingPlanRepository + 'static,
{
    let result = service.calculate_pricing(
        &FacilityId(facility_id),
        &request.service_frequency,
        request.task_complexity.as_ref(),
        request.pricing_plan_id.as_ref(),
    );
    respond(result)
}

pub(crate) async fn compare_handler<F, P>(
    State(service): State<Arc<FacilityPricingService<F, P>>>,
    Path(facility_id): Path<String>,
    axum::Json(request): axum::Json<CompareRequest>,
) -> Response
where
    F: FacilityRepository + 'static,
    P: PricingPlanRepository + 'static,
{
    let result = service.compare_pricing_across_frequencies(
        &FacilityId(facility_id),
        &request.frequencies,
        request.pricing_plan_id.as_ref(),
    );
    respond(result)
}

pub(crate) async fn readiness_handler<F, P>(
    State(service): State<Arc<FacilityPricingService<F, P>>>,
    Path(facility_id): Path<String>,
) -> Response
where
    F: FacilityRepository + 'static,
    P: PricingPlanRepository + 'static,
{
    respond(service.is_facility_ready_for_pricing(&FacilityId(facility_id)))
}

pub(crate) async fn proposal_handler<F, P>(
    State(service): State<Arc<FacilityPricingService<F, P>>>,
    Path(facility_id): Path<String>,
    axum::Json(request): axum::Json<ProposalRequest>,
) -> Response
where
    F: FacilityRepository + 'static,
    P: PricingPlanRepository + 'static,
{
    let result = service.generate_proposal_services(
        &FacilityId(facility_id),
        &request.service_frequency,
        request.pricing_plan_id.as_ref(),
    );
    respond(result)
}

pub(crate) async fn task_time_handler<F, P>(
    State(service): State<Arc<FacilityPricingService<F, P>>>,
    Path(facility_id): Path<String>,
) -> Response
where
    F: FacilityRepository + 'static,
    P: PricingPlanRepository + 'static,
{
    respond(service.estimate_task_time(&FacilityId(facility_id)))
}

pub(crate) async fn save_plan_handler<F, P>(
    State(service): State<Arc<FacilityPricingService<F, P>>>,
    axum::Json(plan): axum::Json<PricingPlan>,
) -> Response
where
    F: FacilityRepository + 'static,
    P: PricingPlanRepository + 'static,
{
    match service.save_plan(plan) {
        Ok(saved) => (StatusCode::CREATED, axum::Json(saved)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn default_plan_handler<F, P>(
    State(service): State<Arc<FacilityPricingService<F, P>>>,
    Path(plan_id): Path<String>,
    axum::Json(request): axum::Json<DefaultPlanRequest>,
) -> Response
where
    F: FacilityRepository + 'static,
    P: PricingPlanRepository + 'static,
{
    respond(service.set_default_plan(&request.tenant_id, &PricingPlanId(plan_id)))
}

fn respond<T: serde::Serialize>(result: Result<T, PricingError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, axum::Json(body)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: PricingError) -> Response {
    let kind = err.kind();
    let status = match kind {
        PricingErrorKind::NotFound => StatusCode::NOT_FOUND,
        PricingErrorKind::NotReady | PricingErrorKind::InvalidConfiguration => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PricingErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    };

    let mut payload = json!({
        "error": err.to_string(),
        "kind": kind,
    });
    match &err {
        PricingError::NotReady(reason) => payload["reason"] = json!(reason),
        PricingError::InvalidConfiguration(validation) => {
            payload["violations"] = json!(validation.violations())
        }
        _ => {}
    }

    (status, axum::Json(payload)).into_response()
}
