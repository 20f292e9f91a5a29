use chrono::{Local, NaiveDate};
use facility_pricing::config::PricingConfig;
use facility_pricing::error::AppError;
use facility_pricing::pricing::{
    BuildingType, Facility, FacilityId, FacilityPricingService, FacilityRepository,
    PricingPlan, PricingPlanId, PricingPlanRepository, RepositoryError, ServiceFrequency,
    TaskComplexity, TenantId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

pub(crate) type PricingService =
    FacilityPricingService<InMemoryFacilityRepository, InMemoryPricingPlanRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{store} lock poisoned")))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFacilityRepository {
    facilities: Arc<Mutex<HashMap<FacilityId, Facility>>>,
}

impl InMemoryFacilityRepository {
    pub(crate) fn upsert(&self, facility: Facility) -> Result<Facility, RepositoryError> {
        let mut guard = lock(&self.facilities, "facility store")?;
        guard.insert(facility.id.clone(), facility.clone());
        Ok(facility)
    }
}

impl FacilityRepository for InMemoryFacilityRepository {
    fn fetch(&self, id: &FacilityId) -> Result<Option<Facility>, RepositoryError> {
        let guard = lock(&self.facilities, "facility store")?;
        Ok(guard.get(id).cloned())
    }
}

/// Plan store whose tenant default must be active and already in force.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPricingPlanRepository {
    plans: Arc<Mutex<HashMap<PricingPlanId, PricingPlan>>>,
}

impl InMemoryPricingPlanRepository {
    pub(crate) fn default_on(
        &self,
        tenant: &TenantId,
        date: NaiveDate,
    ) -> Result<Option<PricingPlan>, RepositoryError> {
        let guard = lock(&self.plans, "plan store")?;
        Ok(guard
            .values()
            .find(|plan| &plan.tenant_id == tenant && plan.is_default && plan.is_effective_on(date))
            .cloned())
    }
}

impl PricingPlanRepository for InMemoryPricingPlanRepository {
    fn fetch(&self, id: &PricingPlanId) -> Result<Option<PricingPlan>, RepositoryError> {
        let guard = lock(&self.plans, "plan store")?;
        Ok(guard.get(id).cloned())
    }

    fn default_for_tenant(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<PricingPlan>, RepositoryError> {
        self.default_on(tenant, Local::now().date_naive())
    }

    fn list_for_tenant(&self, tenant: &TenantId) -> Result<Vec<PricingPlan>, RepositoryError> {
        let guard = lock(&self.plans, "plan store")?;
        let mut plans: Vec<PricingPlan> = guard
            .values()
            .filter(|plan| &plan.tenant_id == tenant)
            .cloned()
            .collect();
        plans.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(plans)
    }

    fn save(&self, plan: PricingPlan) -> Result<PricingPlan, RepositoryError> {
        let mut guard = lock(&self.plans, "plan store")?;
        if let Some(existing) = guard.get(&plan.id) {
            if existing.tenant_id != plan.tenant_id {
                return Err(RepositoryError::TenantMismatch);
            }
        }
        if plan.is_default {
            for other in guard.values_mut() {
                if other.tenant_id == plan.tenant_id {
                    other.is_default = false;
                }
            }
        }
        guard.insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }

    fn set_default(
        &self,
        tenant: &TenantId,
        id: &PricingPlanId,
    ) -> Result<PricingPlan, RepositoryError> {
        let mut guard = lock(&self.plans, "plan store")?;
        match guard.get(id) {
            None => return Err(RepositoryError::NotFound),
            Some(plan) if &plan.tenant_id != tenant => {
                return Err(RepositoryError::TenantMismatch)
            }
            Some(_) => {}
        }
        for plan in guard.values_mut() {
            if &plan.tenant_id == tenant {
                plan.is_default = &plan.id == id;
            }
        }
        guard.get(id).cloned().ok_or(RepositoryError::NotFound)
    }
}

/// Builds the service and seeds plans from `PRICING_PLANS_PATH`, or the
/// stock plan for the default tenant when no file is configured.
pub(crate) fn build_service(
    config: &PricingConfig,
) -> Result<(Arc<PricingService>, InMemoryFacilityRepository), AppError> {
    let facilities = InMemoryFacilityRepository::default();
    let plans = InMemoryPricingPlanRepository::default();
    let service = Arc::new(FacilityPricingService::new(
        Arc::new(facilities.clone()),
        Arc::new(plans),
    ));

    let mut seeded = config.load_plans()?;
    if seeded.is_empty() {
        seeded.push(PricingPlan::standard(
            PricingPlanId::new("standard"),
            config.default_tenant.clone(),
        ));
    }
    let count = seeded.len();
    for plan in seeded {
        service.save_plan(plan)?;
    }
    info!(plans = count, tenant = %config.default_tenant, "pricing plans seeded");

    Ok((service, facilities))
}

pub(crate) fn parse_frequency(raw: &str) -> Result<ServiceFrequency, String> {
    known_key(raw, ServiceFrequency::parse(raw), ServiceFrequency::known())
}

pub(crate) fn parse_building_type(raw: &str) -> Result<BuildingType, String> {
    known_key(raw, BuildingType::parse(raw), BuildingType::known())
}

pub(crate) fn parse_task_complexity(raw: &str) -> Result<TaskComplexity, String> {
    known_key(raw, TaskComplexity::parse(raw), TaskComplexity::known())
}

/// Command-line keys must be one of the stock keys; typos would otherwise
/// price silently at neutral multipliers.
fn known_key<K>(raw: &str, parsed: K, known: Vec<K>) -> Result<K, String>
where
    K: PartialEq + std::fmt::Display,
{
    if known.contains(&parsed) {
        return Ok(parsed);
    }
    let expected = known
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(format!("unknown value '{raw}' (expected one of: {expected})"))
}
