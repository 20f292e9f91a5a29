//! Facility pricing: cost buildup, facility rollup, frequency comparison,
//! proposal line items and labor-minute estimates.

pub mod domain;
pub mod engine;
pub mod error;
pub mod importer;
pub mod keys;
mod money;
pub mod plan;
pub mod proposal;
pub mod rates;
pub mod readiness;
pub mod repository;
pub mod router;
pub mod service;
pub mod task_time;

#[cfg(test)]
mod tests;

pub use domain::{
    Area, AreaId, Facility, FacilityId, FacilityTask, PricingPlanId, TaskId, TaskTemplate,
    TaskTimingOverrides, TenantId,
};
pub use engine::{
    AreaCost, AreaCostBreakdown, AreaCostCalculator, CostBreakdown, FacilityPricingAggregator,
    FacilityPricingResult, FrequencyComparator, FrequencyComparison, PricingComputation,
    PricingEngine,
};
pub use error::{PlanValidationError, PlanViolation, PricingError, PricingErrorKind};
pub use importer::{FacilityCsvImporter, FacilityImportError};
pub use keys::{BuildingType, ConditionLevel, FloorType, ServiceFrequency, TaskComplexity};
pub use plan::{CostRates, MultiplierTables, PricingPlan, PricingStrategy};
pub use proposal::{ProposalServiceGenerator, ProposalServiceLine};
pub use rates::{AddOnTable, MultiplierTable, RateModel};
pub use readiness::{is_facility_ready_for_pricing, NotReadyReason, PricingReadiness};
pub use repository::{FacilityRepository, PricingPlanRepository, RepositoryError};
pub use router::pricing_router;
pub use service::FacilityPricingService;
pub use task_time::{
    AreaTimeEstimate, FacilityTimeEstimate, TaskTimeEstimate, TaskTimeEstimator, Workload,
};
