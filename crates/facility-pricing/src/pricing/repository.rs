use super::domain::{Facility, FacilityId, PricingPlanId, TenantId};
use super::plan::PricingPlan;

/// Read access to facility snapshots owned by the CRM data layer.
pub trait FacilityRepository: Send + Sync {
    fn fetch(&self, id: &FacilityId) -> Result<Option<Facility>, RepositoryError>;
}

/// Storage abstraction for pricing plans so the service can run without a database.
pub trait PricingPlanRepository: Send + Sync {
    fn fetch(&self, id: &PricingPlanId) -> Result<Option<PricingPlan>, RepositoryError>;
    fn default_for_tenant(&self, tenant: &TenantId)
        -> Result<Option<PricingPlan>, RepositoryError>;
    fn list_for_tenant(&self, tenant: &TenantId) -> Result<Vec<PricingPlan>, RepositoryError>;
    /// Inserts or replaces a plan. A plan saved with `is_default` must clear
    /// the flag on the tenant's other plans in the same write.
    fn save(&self, plan: PricingPlan) -> Result<PricingPlan, RepositoryError>;
    /// Marks `id` as the tenant default and clears the previous default atomically.
    fn set_default(
        &self,
        tenant: &TenantId,
        id: &PricingPlanId,
    ) -> Result<PricingPlan, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record belongs to a different tenant")]
    TenantMismatch,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
