use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::pricing::domain::{
    Area, AreaId, Facility, FacilityId, FacilityTask, PricingPlanId, TaskId, TaskTemplate,
    TaskTimingOverrides, TenantId,
};
use crate::pricing::keys::{BuildingType, ConditionLevel, FloorType, ServiceFrequency};
use crate::pricing::plan::PricingPlan;
use crate::pricing::repository::{FacilityRepository, PricingPlanRepository, RepositoryError};
use crate::pricing::FacilityPricingService;

pub(super) const TENANT: &str = "tenant-1";
pub(super) const PLAN: &str = "plan-standard";
pub(super) const FACILITY: &str = "fac-100";

pub(super) fn tenant() -> TenantId {
    TenantId::new(TENANT)
}

pub(super) fn scenario_plan() -> PricingPlan {
    PricingPlan::standard(PricingPlanId::new(PLAN), tenant())
}

pub(super) fn area(id: &str, name: &str, square_feet: f64) -> Area {
    Area {
        id: AreaId::new(id),
        name: Some(name.to_string()),
        area_type: "Office".to_string(),
        square_feet,
        quantity: 1,
        floor_type: FloorType::Vct,
        condition_level: ConditionLevel::Standard,
        room_count: 0,
        unit_count: 0,
        fixtures: BTreeMap::new(),
    }
}

/// One 1,000 sq ft office area, no tasks.
pub(super) fn scenario_facility() -> Facility {
    Facility {
        id: FacilityId::new(FACILITY),
        tenant_id: tenant(),
        name: "Riverside Office Park".to_string(),
        building_type: BuildingType::Office,
        areas: vec![area("area-1", "Suite 100", 1000.0)],
        tasks: Vec::new(),
    }
}

pub(super) fn template(name: &str, base_minutes: f64, minutes_per_sq_ft: f64) -> TaskTemplate {
    TaskTemplate {
        name: name.to_string(),
        base_minutes,
        minutes_per_sq_ft,
        minutes_per_unit: 0.0,
        minutes_per_room: 0.0,
        fixture_minutes: BTreeMap::new(),
    }
}

pub(super) fn task(
    id: &str,
    area_id: Option<&str>,
    name: &str,
    frequency: ServiceFrequency,
) -> FacilityTask {
    FacilityTask {
        id: TaskId::new(id),
        area_id: area_id.map(AreaId::new),
        name: None,
        frequency,
        template: template(name, 5.0, 0.01),
        overrides: TaskTimingOverrides::default(),
    }
}

/// Scenario facility with area tasks and one facility-wide task.
pub(super) fn tasked_facility() -> Facility {
    let mut facility = scenario_facility();
    facility.tasks = vec![
        task(
            "t-1",
            Some("area-1"),
            "Empty trash",
            ServiceFrequency::FivePerWeek,
        ),
        task(
            "t-2",
            Some("area-1"),
            "Vacuum carpets",
            ServiceFrequency::FivePerWeek,
        ),
        task("t-3", Some("area-1"), "Dust blinds", ServiceFrequency::Monthly),
        task("t-4", None, "Lock up and alarm", ServiceFrequency::Daily),
    ];
    facility
}

/// Three areas of uneven size, enough to exercise cent reconciliation.
pub(super) fn multi_area_facility() -> Facility {
    let mut facility = scenario_facility();
    facility.building_type = BuildingType::Medical;
    facility.areas = vec![
        area("area-1", "Lobby", 1234.0),
        area("area-2", "Exam Rooms", 987.0),
        area("area-3", "Records", 333.0),
    ];
    facility.areas[1].condition_level = ConditionLevel::Hard;
    facility.areas[2].floor_type = FloorType::Carpet;
    facility.tasks = vec![
        task("t-1", Some("area-1"), "Mop floors", ServiceFrequency::Daily),
        task("t-2", Some("area-2"), "Disinfect surfaces", ServiceFrequency::Daily),
        task("t-3", Some("area-3"), "Vacuum", ServiceFrequency::Weekly),
    ];
    facility
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

#[derive(Default)]
pub(super) struct MemoryFacilities {
    facilities: Mutex<HashMap<FacilityId, Facility>>,
}

impl MemoryFacilities {
    pub(super) fn insert(&self, facility: Facility) {
        self.facilities
            .lock()
            .expect("lock poisoned")
            .insert(facility.id.clone(), facility);
    }
}

impl FacilityRepository for MemoryFacilities {
    fn fetch(&self, id: &FacilityId) -> Result<Option<Facility>, RepositoryError> {
        Ok(self
            .facilities
            .lock()
            .expect("lock poisoned")
            .get(id)
            .cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryPlans {
    plans: Mutex<HashMap<PricingPlanId, PricingPlan>>,
}

impl MemoryPlans {
    pub(super) fn snapshot(&self, id: &str) -> Option<PricingPlan> {
        self.plans
            .lock()
            .expect("lock poisoned")
            .get(&PricingPlanId::new(id))
            .cloned()
    }
}

impl PricingPlanRepository for MemoryPlans {
    fn fetch(&self, id: &PricingPlanId) -> Result<Option<PricingPlan>, RepositoryError> {
        Ok(self.plans.lock().expect("lock poisoned").get(id).cloned())
    }

    fn default_for_tenant(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<PricingPlan>, RepositoryError> {
        Ok(self
            .plans
            .lock()
            .expect("lock poisoned")
            .values()
            .find(|plan| &plan.tenant_id == tenant && plan.is_default && plan.is_active)
            .cloned())
    }

    fn list_for_tenant(&self, tenant: &TenantId) -> Result<Vec<PricingPlan>, RepositoryError> {
        let mut plans: Vec<PricingPlan> = self
            .plans
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|plan| &plan.tenant_id == tenant)
            .cloned()
            .collect();
        plans.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(plans)
    }

    fn save(&self, plan: PricingPlan) -> Result<PricingPlan, RepositoryError> {
        let mut plans = self.plans.lock().expect("lock poisoned");
        if plan.is_default {
            for other in plans.values_mut() {
                if other.tenant_id == plan.tenant_id {
                    other.is_default = false;
                }
            }
        }
        plans.insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }

    fn set_default(
        &self,
        tenant: &TenantId,
        id: &PricingPlanId,
    ) -> Result<PricingPlan, RepositoryError> {
        let mut plans = self.plans.lock().expect("lock poisoned");
        match plans.get(id) {
            None => return Err(RepositoryError::NotFound),
            Some(plan) if &plan.tenant_id != tenant => return Err(RepositoryError::TenantMismatch),
            Some(_) => {}
        }
        for plan in plans.values_mut() {
            if &plan.tenant_id == tenant {
                plan.is_default = &plan.id == id;
            }
        }
        plans.get(id).cloned().ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailablePlans;

impl PricingPlanRepository for UnavailablePlans {
    fn fetch(&self, _id: &PricingPlanId) -> Result<Option<PricingPlan>, RepositoryError> {
        Err(RepositoryError::Unavailable("plan store offline".to_string()))
    }

    fn default_for_tenant(
        &self,
        _tenant: &TenantId,
    ) -> Result<Option<PricingPlan>, RepositoryError> {
        Err(RepositoryError::Unavailable("plan store offline".to_string()))
    }

    fn list_for_tenant(&self, _tenant: &TenantId) -> Result<Vec<PricingPlan>, RepositoryError> {
        Err(RepositoryError::Unavailable("plan store offline".to_string()))
    }

    fn save(&self, _plan: PricingPlan) -> Result<PricingPlan, RepositoryError> {
        Err(RepositoryError::Unavailable("plan store offline".to_string()))
    }

    fn set_default(
        &self,
        _tenant: &TenantId,
        _id: &PricingPlanId,
    ) -> Result<PricingPlan, RepositoryError> {
        Err(RepositoryError::Unavailable("plan store offline".to_string()))
    }
}

pub(super) type MemoryService = FacilityPricingService<MemoryFacilities, MemoryPlans>;

/// Service seeded with the scenario plan and the tasked facility.
pub(super) fn build_service() -> (Arc<MemoryService>, Arc<MemoryFacilities>, Arc<MemoryPlans>) {
    let facilities = Arc::new(MemoryFacilities::default());
    let plans = Arc::new(MemoryPlans::default());
    facilities.insert(tasked_facility());
    plans.save(scenario_plan()).expect("seed plan");

    let service = Arc::new(FacilityPricingService::new(
        facilities.clone(),
        plans.clone(),
    ));
    (service, facilities, plans)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
