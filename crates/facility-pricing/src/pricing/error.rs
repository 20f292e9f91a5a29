use super::domain::{FacilityId, PricingPlanId, TenantId};
use super::readiness::NotReadyReason;
use super::repository::RepositoryError;
use serde::Serialize;
use std::fmt;

/// One out-of-range field on a pricing plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanViolation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for PlanViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid pricing plan configuration: {}", join_violations(.violations))]
pub struct PlanValidationError {
    violations: Vec<PlanViolation>,
}

impl PlanValidationError {
    pub(crate) fn new(violations: Vec<PlanViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[PlanViolation] {
        &self.violations
    }
}

fn join_violations(violations: &[PlanViolation]) -> String {
    violations
        .iter()
        .map(PlanViolation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Coarse error category callers translate into transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingErrorKind {
    NotFound,
    NotReady,
    InvalidConfiguration,
    Unavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("facility {0} not found")]
    FacilityNotFound(FacilityId),
    #[error("pricing plan {0} not found")]
    PlanNotFound(PricingPlanId),
    #[error("no default pricing plan configured for tenant {0}")]
    NoDefaultPlan(TenantId),
    #[error("facility is not ready for pricing: {0}")]
    NotReady(NotReadyReason),
    #[error(transparent)]
    InvalidConfiguration(#[from] PlanValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PricingError {
    pub fn kind(&self) -> PricingErrorKind {
        match self {
            PricingError::FacilityNotFound(_)
            | PricingError::PlanNotFound(_)
            | PricingError::NoDefaultPlan(_) => PricingErrorKind::NotFound,
            PricingError::NotReady(_) => PricingErrorKind::NotReady,
            PricingError::InvalidConfiguration(_) => PricingErrorKind::InvalidConfiguration,
            PricingError::Repository(RepositoryError::NotFound)
            | PricingError::Repository(RepositoryError::TenantMismatch) => PricingErrorKind::NotFound,
            PricingError::Repository(_) => PricingErrorKind::Unavailable,
        }
    }
}
