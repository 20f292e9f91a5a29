use super::common::*;
use crate::pricing::domain::AreaId;
use crate::pricing::engine::PricingEngine;
use crate::pricing::keys::{BuildingType, ServiceFrequency, TaskComplexity};
use crate::pricing::plan::PricingStrategy;
use crate::pricing::proposal::{ProposalServiceGenerator, ProposalServiceLine};
use crate::pricing::Facility;

fn lines_for(facility: &Facility, frequency: ServiceFrequency) -> (Vec<ProposalServiceLine>, f64) {
    let plan = scenario_plan();
    let engine = PricingEngine::new(&plan).expect("valid plan");
    let computation = engine
        .compute(facility, &frequency, &TaskComplexity::Standard)
        .expect("priceable");
    let total = computation.result.monthly_total;
    (ProposalServiceGenerator::generate(facility, &computation), total)
}

fn sum_cents(lines: &[ProposalServiceLine]) -> i64 {
    lines.iter().map(|line| cents(line.monthly_price)).sum()
}

#[test]
fn facility_without_tasks_gets_single_generic_line() {
    let (lines, total) = lines_for(&scenario_facility(), ServiceFrequency::FivePerWeek);

    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line.area_id, None);
    assert_eq!(line.service_name, "Facility-Wide Services");
    assert_eq!(line.monthly_price, total);
    assert_eq!(line.frequency, ServiceFrequency::FivePerWeek);
    assert_eq!(
        line.description,
        "5x Weekly cleaning of Riverside Office Park"
    );
    assert_eq!(line.included_tasks.len(), 4);
}

#[test]
fn area_and_facility_wide_lines_sum_to_total() {
    let (lines, total) = lines_for(&tasked_facility(), ServiceFrequency::FivePerWeek);

    assert_eq!(total, 771.45);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].area_id, Some(AreaId::new("area-1")));
    assert_eq!(lines[0].service_name, "Suite 100");
    assert_eq!(lines[1].area_id, None);
    assert_eq!(lines[1].service_name, "Facility-Wide Services");
    assert_eq!(sum_cents(&lines), 77145);
    assert_eq!(lines[0].monthly_price, 338.05);
    assert_eq!(lines[1].monthly_price, 433.4);
}

#[test]
fn descriptions_group_tasks_by_frequency_most_frequent_first() {
    let (lines, _) = lines_for(&tasked_facility(), ServiceFrequency::FivePerWeek);

    assert_eq!(
        lines[0].description,
        "5x Weekly: Empty trash, Vacuum carpets. Monthly: Dust blinds"
    );
    assert_eq!(
        lines[0].included_tasks,
        vec!["Empty trash", "Vacuum carpets", "Dust blinds"]
    );
    assert_eq!(lines[1].description, "Daily: Lock up and alarm");
}

#[test]
fn duplicate_task_names_are_listed_once() {
    let mut facility = tasked_facility();
    facility.tasks.push(task(
        "t-5",
        Some("area-1"),
        "Empty trash",
        ServiceFrequency::Weekly,
    ));

    let (lines, _) = lines_for(&facility, ServiceFrequency::FivePerWeek);

    assert_eq!(
        lines[0].included_tasks,
        vec!["Empty trash", "Vacuum carpets", "Dust blinds"]
    );
}

#[test]
fn adjusted_totals_reconcile_to_the_cent() {
    let facility = multi_area_facility();
    for frequency in [
        ServiceFrequency::Daily,
        ServiceFrequency::ThreePerWeek,
        ServiceFrequency::Biweekly,
        ServiceFrequency::Quarterly,
    ] {
        let (lines, total) = lines_for(&facility, frequency.clone());
        assert_eq!(lines.len(), 3, "{frequency}");
        assert_eq!(sum_cents(&lines), cents(total), "{frequency}");
    }
}

#[test]
fn lines_keep_proportions_of_unscaled_area_prices() {
    let mut facility = multi_area_facility();
    facility.areas[1].condition_level = facility.areas[0].condition_level.clone();
    facility.areas[1].square_feet = facility.areas[0].square_feet;
    facility.areas[1].floor_type = facility.areas[0].floor_type.clone();

    let (lines, _) = lines_for(&facility, ServiceFrequency::Daily);

    assert!((lines[0].monthly_price - lines[1].monthly_price).abs() <= 0.01);
}

#[test]
fn minimum_charge_is_spread_across_lines() {
    let (lines, total) = lines_for(&tasked_facility(), ServiceFrequency::Monthly);

    assert_eq!(total, 250.0);
    assert_eq!(sum_cents(&lines), 25000);
    assert!(lines[1].monthly_price > lines[0].monthly_price);
}

#[test]
fn area_without_tasks_gets_routine_description() {
    let mut facility = multi_area_facility();
    facility.areas.push(area("area-4", "Break Room", 200.0));

    let (lines, total) = lines_for(&facility, ServiceFrequency::Daily);

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[3].description, "Routine cleaning of Break Room");
    assert!(lines[3].included_tasks.is_empty());
    assert_eq!(sum_cents(&lines), cents(total));
}

#[test]
fn unpriced_facility_wide_line_never_goes_negative() {
    let mut plan = scenario_plan();
    plan.pricing_type = PricingStrategy::FlatRate;
    plan.rates.minimum_monthly_charge = 0.0;
    let engine = PricingEngine::new(&plan).expect("valid plan");

    let mut facility = scenario_facility();
    facility.building_type = BuildingType::Medical;
    facility.areas = vec![
        area("area-1", "North Wing", 1000.05),
        area("area-2", "South Wing", 1000.05),
        area("area-3", "East Wing", 1000.05),
    ];
    facility.tasks = vec![task("t-1", None, "Lock up and alarm", ServiceFrequency::Daily)];

    let computation = engine
        .compute(&facility, &ServiceFrequency::Weekly, &TaskComplexity::Standard)
        .expect("priceable");
    let total = computation.result.monthly_total;
    let lines = ProposalServiceGenerator::generate(&facility, &computation);

    assert_eq!(total, 390.02);
    let prices: Vec<f64> = lines.iter().map(|line| line.monthly_price).collect();
    assert_eq!(prices, vec![130.01, 130.01, 130.0, 0.0]);
    assert!(prices.iter().all(|price| *price >= 0.0));
    assert_eq!(sum_cents(&lines), cents(total));
}
