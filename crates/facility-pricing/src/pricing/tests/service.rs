use super::common::*;
use crate::pricing::domain::{FacilityId, PricingPlanId, TenantId};
use crate::pricing::error::{PricingError, PricingErrorKind};
use crate::pricing::keys::{ServiceFrequency, TaskComplexity};
use crate::pricing::plan::PricingPlan;
use crate::pricing::readiness::NotReadyReason;
use crate::pricing::repository::{PricingPlanRepository, RepositoryError};
use crate::pricing::FacilityPricingService;
use std::sync::Arc;

fn facility_id() -> FacilityId {
    FacilityId::new(FACILITY)
}

#[test]
fn calculate_uses_tenant_default_plan() {
    let (service, _, _) = build_service();

    let result = service
        .calculate_pricing(&facility_id(), &ServiceFrequency::FivePerWeek, None, None)
        .expect("priced");

    assert_eq!(result.pricing_plan_id, PricingPlanId::new(PLAN));
    assert_eq!(result.task_complexity, TaskComplexity::Standard);
    assert_eq!(result.monthly_total, 771.45);
}

#[test]
fn explicit_plan_overrides_default() {
    let (service, _, plans) = build_service();
    let mut premium = scenario_plan();
    premium.id = PricingPlanId::new("plan-premium");
    premium.name = "Premium".to_string();
    premium.is_default = false;
    premium.rates.target_profit_margin = 0.4;
    plans.save(premium).expect("saved");

    let result = service
        .calculate_pricing(
            &facility_id(),
            &ServiceFrequency::FivePerWeek,
            None,
            Some(&PricingPlanId::new("plan-premium")),
        )
        .expect("priced");

    assert_eq!(result.pricing_plan_name, "Premium");
    assert!(result.monthly_total > 771.45);
}

#[test]
fn missing_facility_is_not_found() {
    let (service, _, _) = build_service();

    let err = service
        .calculate_pricing(
            &FacilityId::new("fac-missing"),
            &ServiceFrequency::Weekly,
            None,
            None,
        )
        .expect_err("facility missing");

    assert!(matches!(err, PricingError::FacilityNotFound(_)));
    assert_eq!(err.kind(), PricingErrorKind::NotFound);
}

#[test]
fn plan_from_another_tenant_is_not_found() {
    let (service, _, plans) = build_service();
    let foreign = PricingPlan::standard(
        PricingPlanId::new("plan-foreign"),
        TenantId::new("tenant-2"),
    );
    plans.save(foreign).expect("saved");

    let err = service
        .calculate_pricing(
            &facility_id(),
            &ServiceFrequency::Weekly,
            None,
            Some(&PricingPlanId::new("plan-foreign")),
        )
        .expect_err("foreign plan rejected");

    assert!(matches!(err, PricingError::PlanNotFound(_)));
}

#[test]
fn tenant_without_default_plan_reports_configuration_gap() {
    let facilities = Arc::new(MemoryFacilities::default());
    facilities.insert(tasked_facility());
    let service = FacilityPricingService::new(facilities, Arc::new(MemoryPlans::default()));

    let err = service
        .calculate_pricing(&facility_id(), &ServiceFrequency::Weekly, None, None)
        .expect_err("no default plan");

    assert!(matches!(err, PricingError::NoDefaultPlan(_)));
    assert_eq!(err.kind(), PricingErrorKind::NotFound);
}

#[test]
fn stored_invalid_plan_is_refused_at_calculation() {
    let (service, _, plans) = build_service();
    let mut broken = scenario_plan();
    broken.rates.sq_ft_per_labor_hour = 0.0;
    plans.save(broken).expect("repository accepts raw writes");

    let err = service
        .calculate_pricing(&facility_id(), &ServiceFrequency::Weekly, None, None)
        .expect_err("invalid plan");

    match &err {
        PricingError::InvalidConfiguration(validation) => {
            assert_eq!(validation.violations()[0].field, "sq_ft_per_labor_hour");
        }
        other => panic!("expected invalid configuration, got {other:?}"),
    }
    assert_eq!(err.kind(), PricingErrorKind::InvalidConfiguration);
}

#[test]
fn facility_without_areas_surfaces_not_ready() {
    let (service, facilities, _) = build_service();
    let mut empty = scenario_facility();
    empty.id = FacilityId::new("fac-empty");
    empty.areas.clear();
    facilities.insert(empty);

    let readiness = service
        .is_facility_ready_for_pricing(&FacilityId::new("fac-empty"))
        .expect("facility exists");
    assert!(!readiness.ready);
    assert_eq!(readiness.reason, Some(NotReadyReason::NoAreas));

    let err = service
        .generate_proposal_services(
            &FacilityId::new("fac-empty"),
            &ServiceFrequency::Weekly,
            None,
        )
        .expect_err("not ready");
    assert_eq!(err.kind(), PricingErrorKind::NotReady);
}

#[test]
fn comparison_and_proposal_share_the_resolved_plan() {
    let (service, _, _) = build_service();

    let comparisons = service
        .compare_pricing_across_frequencies(
            &facility_id(),
            &[ServiceFrequency::Weekly, ServiceFrequency::FivePerWeek],
            None,
        )
        .expect("compared");
    let lines = service
        .generate_proposal_services(&facility_id(), &ServiceFrequency::FivePerWeek, None)
        .expect("generated");

    assert_eq!(comparisons.len(), 2);
    assert_eq!(comparisons[1].monthly_total, 771.45);
    let total: i64 = lines.iter().map(|line| cents(line.monthly_price)).sum();
    assert_eq!(total, 77145);
}

#[test]
fn task_time_is_estimated_without_a_plan() {
    let facilities = Arc::new(MemoryFacilities::default());
    facilities.insert(tasked_facility());
    let service = FacilityPricingService::new(facilities, Arc::new(UnavailablePlans));

    let estimate = service
        .estimate_task_time(&facility_id())
        .expect("estimate needs no plan");

    assert_eq!(estimate.total_minutes, 60.0);
}

#[test]
fn save_plan_rejects_invalid_configuration_before_storage() {
    let (service, _, plans) = build_service();
    let mut plan = scenario_plan();
    plan.id = PricingPlanId::new("plan-bad");
    plan.rates.target_profit_margin = 1.2;
    plan.rates.insurance_percentage = -0.1;

    match service.save_plan(plan) {
        Err(PricingError::InvalidConfiguration(validation)) => {
            assert_eq!(validation.violations().len(), 2);
        }
        other => panic!("expected invalid configuration, got {other:?}"),
    }
    assert!(plans.snapshot("plan-bad").is_none());
}

#[test]
fn saving_a_default_plan_demotes_the_previous_default() {
    let (service, _, plans) = build_service();
    let mut replacement = scenario_plan();
    replacement.id = PricingPlanId::new("plan-2026");
    replacement.version = 2;

    service.save_plan(replacement).expect("saved");

    let defaults: Vec<_> = plans
        .list_for_tenant(&tenant())
        .expect("listed")
        .into_iter()
        .filter(|plan| plan.is_default)
        .map(|plan| plan.id)
        .collect();
    assert_eq!(defaults, vec![PricingPlanId::new("plan-2026")]);
}

#[test]
fn set_default_plan_switches_the_tenant_default() {
    let (service, _, plans) = build_service();
    let mut alternate = scenario_plan();
    alternate.id = PricingPlanId::new("plan-alt");
    alternate.is_default = false;
    plans.save(alternate).expect("saved");

    let switched = service
        .set_default_plan(&tenant(), &PricingPlanId::new("plan-alt"))
        .expect("switched");
    assert!(switched.is_default);

    let previous = plans.snapshot(PLAN).expect("still stored");
    assert!(!previous.is_default);
    let resolved = service.resolve_plan(&tenant(), None).expect("default");
    assert_eq!(resolved.id, PricingPlanId::new("plan-alt"));
}

#[test]
fn set_default_plan_refuses_foreign_plans() {
    let (service, _, plans) = build_service();
    plans
        .save(PricingPlan::standard(
            PricingPlanId::new("plan-foreign"),
            TenantId::new("tenant-2"),
        ))
        .expect("saved");

    let err = service
        .set_default_plan(&tenant(), &PricingPlanId::new("plan-foreign"))
        .expect_err("tenant mismatch");

    assert!(matches!(
        err,
        PricingError::Repository(RepositoryError::TenantMismatch)
    ));
    assert_eq!(err.kind(), PricingErrorKind::NotFound);
}

#[test]
fn repository_outage_is_unavailable() {
    let facilities = Arc::new(MemoryFacilities::default());
    facilities.insert(tasked_facility());
    let service = FacilityPricingService::new(facilities, Arc::new(UnavailablePlans));

    let err = service
        .calculate_pricing(&facility_id(), &ServiceFrequency::Weekly, None, None)
        .expect_err("store offline");

    assert_eq!(err.kind(), PricingErrorKind::Unavailable);
}
