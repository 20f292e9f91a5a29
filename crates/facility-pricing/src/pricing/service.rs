use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{Facility, FacilityId, PricingPlanId, TenantId};
use super::engine::{
    FacilityPricingResult, FrequencyComparator, FrequencyComparison, PricingEngine,
};
use super::error::PricingError;
use super::keys::{ServiceFrequency, TaskComplexity};
use super::plan::PricingPlan;
use super::proposal::{ProposalServiceGenerator, ProposalServiceLine};
use super::readiness::PricingReadiness;
use super::repository::{FacilityRepository, PricingPlanRepository};
use super::task_time::{FacilityTimeEstimate, TaskTimeEstimator};

/// Service composing the facility and plan repositories with the pricing engine.
pub struct FacilityPricingService<F, P> {
    facilities: Arc<F>,
    plans: Arc<P>,
}

impl<F, P> FacilityPricingService<F, P>
where
    F: FacilityRepository + 'static,
    P: PricingPlanRepository + 'static,
{
    pub fn new(facilities: Arc<F>, plans: Arc<P>) -> Self {
        Self { facilities, plans }
    }

    /// Explicit plan ids win; otherwise the tenant's current default is used.
    ///
    /// The default is read once per call. A default switched concurrently may
    /// or may not be observed, so callers needing a stable plan pass its id.
    pub fn resolve_plan(
        &self,
        tenant: &TenantId,
        plan_id: Option<&PricingPlanId>,
    ) -> Result<PricingPlan, PricingError> {
        match plan_id {
            Some(id) => {
                let plan = self
                    .plans
                    .fetch(id)?
                    .ok_or_else(|| PricingError::PlanNotFound(id.clone()))?;
                if &plan.tenant_id != tenant {
                    return Err(PricingError::PlanNotFound(id.clone()));
                }
                Ok(plan)
            }
            None => self
                .plans
                .default_for_tenant(tenant)?
                .ok_or_else(|| PricingError::NoDefaultPlan(tenant.clone())),
        }
    }

    pub fn is_facility_ready_for_pricing(
        &self,
        facility_id: &FacilityId,
    ) -> Result<PricingReadiness, PricingError> {
        let facility = self.load_facility(facility_id)?;
        Ok(PricingReadiness::check(&facility))
    }

    pub fn calculate_pricing(
        &self,
        facility_id: &FacilityId,
        frequency: &ServiceFrequency,
        task_complexity: Option<&TaskComplexity>,
        plan_id: Option<&PricingPlanId>,
    ) -> Result<FacilityPricingResult, PricingError> {
        let task_complexity = task_complexity.cloned().unwrap_or_default();
        self.with_engine(facility_id, plan_id, |facility, engine| {
            let result = engine.calculate(facility, frequency, &task_complexity)?;
            debug!(
                facility_id = %result.facility_id,
                plan_id = %result.pricing_plan_id,
                frequency = %result.service_frequency,
                monthly_total = result.monthly_total,
                minimum_applied = result.minimum_applied,
                "facility priced"
            );
            Ok(result)
        })
    }

    pub fn compare_pricing_across_frequencies(
        &self,
        facility_id: &FacilityId,
        frequencies: &[ServiceFrequency],
        plan_id: Option<&PricingPlanId>,
    ) -> Result<Vec<FrequencyComparison>, PricingError> {
        self.with_engine(facility_id, plan_id, |facility, engine| {
            FrequencyComparator::new(engine).compare(facility, frequencies)
        })
    }

    pub fn generate_proposal_services(
        &self,
        facility_id: &FacilityId,
        frequency: &ServiceFrequency,
        plan_id: Option<&PricingPlanId>,
    ) -> Result<Vec<ProposalServiceLine>, PricingError> {
        self.with_engine(facility_id, plan_id, |facility, engine| {
            let computation = engine.compute(facility, frequency, &TaskComplexity::Standard)?;
            let lines = ProposalServiceGenerator::generate(facility, &computation);
            debug!(
                facility_id = %facility.id,
                lines = lines.len(),
                monthly_total = computation.result.monthly_total,
                "proposal services generated"
            );
            Ok(lines)
        })
    }

    pub fn estimate_task_time(
        &self,
        facility_id: &FacilityId,
    ) -> Result<FacilityTimeEstimate, PricingError> {
        let facility = self.load_facility(facility_id)?;
        Ok(TaskTimeEstimator::estimate(&facility))
    }

    /// Validates before anything reaches storage.
    pub fn save_plan(&self, plan: PricingPlan) -> Result<PricingPlan, PricingError> {
        if let Err(err) = plan.validate() {
            warn!(plan_id = %plan.id, error = %err, "rejected pricing plan");
            return Err(err.into());
        }

        let saved = self.plans.save(plan)?;
        info!(
            plan_id = %saved.id,
            tenant_id = %saved.tenant_id,
            version = saved.version,
            is_default = saved.is_default,
            "pricing plan saved"
        );
        Ok(saved)
    }

    pub fn set_default_plan(
        &self,
        tenant: &TenantId,
        plan_id: &PricingPlanId,
    ) -> Result<PricingPlan, PricingError> {
        let plan = self.plans.set_default(tenant, plan_id)?;
        info!(plan_id = %plan.id, tenant_id = %tenant, "default pricing plan switched");
        Ok(plan)
    }

    fn load_facility(&self, facility_id: &FacilityId) -> Result<Facility, PricingError> {
        self.facilities
            .fetch(facility_id)?
            .ok_or_else(|| PricingError::FacilityNotFound(facility_id.clone()))
    }

    fn with_engine<T>(
        &self,
        facility_id: &FacilityId,
        plan_id: Option<&PricingPlanId>,
        run: impl FnOnce(&Facility, &PricingEngine<'_>) -> Result<T, PricingError>,
    ) -> Result<T, PricingError> {
        let facility = self.load_facility(facility_id)?;
        let plan = self.resolve_plan(&facility.tenant_id, plan_id)?;
        let engine = match PricingEngine::new(&plan) {
            Ok(engine) => engine,
            Err(err) => {
                warn!(plan_id = %plan.id, error = %err, "refusing to price with invalid plan");
                return Err(err.into());
            }
        };
        run(&facility, &engine)
    }
}
