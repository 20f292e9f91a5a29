use crate::infra::{
    build_service, parse_building_type, parse_frequency, parse_task_complexity,
    InMemoryFacilityRepository,
};
use clap::Args;
use facility_pricing::config::{AppConfig, PricingConfig};
use facility_pricing::error::AppError;
use facility_pricing::pricing::{
    Area, AreaId, BuildingType, ConditionLevel, Facility, FacilityCsvImporter, FacilityId,
    FacilityPricingResult, FacilityTask, FacilityTimeEstimate, FloorType, FrequencyComparison,
    PricingError, ProposalServiceLine, ServiceFrequency, TaskComplexity, TaskId, TaskTemplate,
    TaskTimingOverrides, TenantId,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// CSV area export (Area, Area Type, Square Feet, Quantity, Floor Type, Condition, Rooms, Units)
    #[arg(long)]
    pub(crate) areas_csv: PathBuf,
    /// Facility name printed on the quote
    #[arg(long, default_value = "Quoted Facility")]
    pub(crate) name: String,
    #[arg(long, default_value = "other", value_parser = parse_building_type)]
    pub(crate) building_type: BuildingType,
    #[arg(long, default_value = "weekly", value_parser = parse_frequency)]
    pub(crate) frequency: ServiceFrequency,
    #[arg(long, default_value = "standard", value_parser = parse_task_complexity)]
    pub(crate) task_complexity: TaskComplexity,
    /// Also price the facility across the standard frequency ladder
    #[arg(long)]
    pub(crate) compare: bool,
    /// Print the pricing result as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    #[arg(long, default_value = "5x_week", value_parser = parse_frequency)]
    pub(crate) frequency: ServiceFrequency,
    #[arg(long, default_value = "medical", value_parser = parse_building_type)]
    pub(crate) building_type: BuildingType,
}

const COMPARISON_LADDER: [ServiceFrequency; 6] = [
    ServiceFrequency::Biweekly,
    ServiceFrequency::Weekly,
    ServiceFrequency::TwicePerWeek,
    ServiceFrequency::ThreePerWeek,
    ServiceFrequency::FivePerWeek,
    ServiceFrequency::Daily,
];

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        areas_csv,
        name,
        building_type,
        frequency,
        task_complexity,
        compare,
        json,
    } = args;

    let config = AppConfig::load()?;
    let (service, facilities) = build_service(&config.pricing)?;

    let facility = Facility {
        id: FacilityId::new("quote"),
        tenant_id: config.pricing.default_tenant.clone(),
        name,
        building_type,
        areas: FacilityCsvImporter::from_path(&areas_csv)?,
        tasks: Vec::new(),
    };
    store(&facilities, facility.clone())?;

    let result =
        service.calculate_pricing(&facility.id, &frequency, Some(&task_complexity), None)?;
    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Pricing result unavailable as JSON: {err}"),
        }
    } else {
        render_pricing(&result);
    }

    if compare {
        let comparisons =
            service.compare_pricing_across_frequencies(&facility.id, &COMPARISON_LADDER, None)?;
        render_comparison(&comparisons);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        frequency,
        building_type,
    } = args;

    let pricing = PricingConfig {
        plans_path: None,
        default_tenant: TenantId::new("demo"),
    };
    let (service, facilities) = build_service(&pricing)?;
    let mut facility = demo_facility(&pricing.default_tenant);
    facility.building_type = building_type;
    store(&facilities, facility.clone())?;

    println!("Facility pricing demo: {}", facility.name);
    let readiness = service.is_facility_ready_for_pricing(&facility.id)?;
    println!(
        "- {} areas | {:.0} sq ft | ready for pricing: {}",
        readiness.area_count, readiness.total_square_feet, readiness.ready
    );

    let result = service.calculate_pricing(&facility.id, &frequency, None, None)?;
    render_pricing(&result);

    let comparisons =
        service.compare_pricing_across_frequencies(&facility.id, &COMPARISON_LADDER, None)?;
    render_comparison(&comparisons);

    let lines = service.generate_proposal_services(&facility.id, &frequency, None)?;
    render_proposal(&lines);

    let estimate = service.estimate_task_time(&facility.id)?;
    render_task_time(&estimate);

    Ok(())
}

fn store(facilities: &InMemoryFacilityRepository, facility: Facility) -> Result<(), AppError> {
    facilities
        .upsert(facility)
        .map(|_| ())
        .map_err(|err| AppError::Pricing(PricingError::Repository(err)))
}

fn render_pricing(result: &FacilityPricingResult) {
    println!(
        "\n{} @ {} ({} plan, {})",
        result.facility_name,
        result.service_frequency.label(),
        result.pricing_plan_name,
        result.pricing_strategy.label()
    );
    for area in &result.areas {
        println!(
            "  - {}: {:.0} sq ft | {:.2} labor hrs/visit | ${:.2}/visit | ${:.2}/mo",
            area.area_name,
            area.total_square_feet,
            area.labor_hours,
            area.total_cost_per_visit,
            area.monthly_price
        );
    }
    println!(
        "- Cost per visit ${:.2} (labor ${:.2}, travel ${:.2}, supplies ${:.2}) x {} visits",
        result.cost_breakdown.total_cost_per_visit,
        result.cost_breakdown.total_labor_cost,
        result.cost_breakdown.travel_cost,
        result.cost_breakdown.supply_cost,
        result.monthly_visits
    );
    println!(
        "- Monthly cost ${:.2} | profit ${:.2} at {:.0}% margin",
        result.monthly_cost_before_profit,
        result.profit_amount,
        result.profit_margin_applied * 100.0
    );
    println!(
        "- Building adjustment ${:.2} (x{}) | task add-on ${:.2} ({})",
        result.building_adjustment,
        result.building_multiplier,
        result.task_complexity_amount,
        result.task_complexity.label()
    );
    let floor_note = if result.minimum_applied {
        " (minimum charge applied)"
    } else {
        ""
    };
    println!("- Monthly total ${:.2}{}", result.monthly_total, floor_note);
}

fn render_comparison(comparisons: &[FrequencyComparison]) {
    println!("\nFrequency comparison");
    for entry in comparisons {
        println!(
            "  - {:<10} {:>6.2} visits/mo  ${:>10.2}/mo",
            entry.frequency.label(),
            entry.monthly_visits,
            entry.monthly_total
        );
    }
}

fn render_proposal(lines: &[ProposalServiceLine]) {
    println!("\nProposal services");
    for line in lines {
        println!("  - {}: ${:.2}/mo", line.service_name, line.monthly_price);
        println!("    {}", line.description);
    }
    let total: f64 = lines.iter().map(|line| line.monthly_price).sum();
    println!("  Total ${:.2}/mo", total);
}

fn render_task_time(estimate: &FacilityTimeEstimate) {
    println!("\nLabor estimate per visit");
    for area in &estimate.areas {
        println!("  - {}: {:.1} min", area.area_name, area.total_minutes);
    }
    if !estimate.facility_wide_tasks.is_empty() {
        println!(
            "  - Facility-wide: {:.1} min",
            estimate.facility_wide_minutes
        );
    }
    println!(
        "  Total {:.1} min ({:.2} hrs)",
        estimate.total_minutes, estimate.total_hours
    );
}

fn demo_area(
    id: &str,
    name: &str,
    square_feet: f64,
    quantity: u32,
    floor_type: FloorType,
    condition_level: ConditionLevel,
) -> Area {
    Area {
        id: AreaId::new(id),
        name: Some(name.to_string()),
        area_type: name.to_string(),
        square_feet,
        quantity,
        floor_type,
        condition_level,
        room_count: 0,
        unit_count: 0,
        fixtures: BTreeMap::new(),
    }
}

fn demo_task(
    id: &str,
    area_id: Option<&str>,
    frequency: ServiceFrequency,
    template: TaskTemplate,
) -> FacilityTask {
    FacilityTask {
        id: TaskId::new(id),
        area_id: area_id.map(AreaId::new),
        name: None,
        frequency,
        template,
        overrides: TaskTimingOverrides::default(),
    }
}

fn template(name: &str, base_minutes: f64, minutes_per_sq_ft: f64) -> TaskTemplate {
    TaskTemplate {
        name: name.to_string(),
        base_minutes,
        minutes_per_sq_ft,
        minutes_per_unit: 0.0,
        minutes_per_room: 0.0,
        fixture_minutes: BTreeMap::new(),
    }
}

fn demo_facility(tenant: &TenantId) -> Facility {
    let mut exam_rooms = demo_area(
        "exam",
        "Exam Rooms",
        180.0,
        8,
        FloorType::Vct,
        ConditionLevel::Medium,
    );
    exam_rooms.room_count = 1;
    let mut restrooms = demo_area(
        "restrooms",
        "Restrooms",
        220.0,
        2,
        FloorType::Tile,
        ConditionLevel::Hard,
    );
    restrooms.fixtures.insert("toilet".to_string(), 3);
    restrooms.fixtures.insert("sink".to_string(), 2);

    let mut disinfect = template("Disinfect exam surfaces", 2.0, 0.0);
    disinfect.minutes_per_room = 6.0;
    let mut restroom_clean = template("Clean and restock restrooms", 5.0, 0.01);
    restroom_clean
        .fixture_minutes
        .insert("toilet".to_string(), 3.0);
    restroom_clean.fixture_minutes.insert("sink".to_string(), 1.5);

    Facility {
        id: FacilityId::new("harbor-medical"),
        tenant_id: tenant.clone(),
        name: "Harbor Medical Plaza".to_string(),
        building_type: BuildingType::Medical,
        areas: vec![
            demo_area(
                "lobby",
                "Lobby",
                1200.0,
                1,
                FloorType::Tile,
                ConditionLevel::Standard,
            ),
            exam_rooms,
            restrooms,
            demo_area(
                "offices",
                "Offices",
                2400.0,
                1,
                FloorType::Carpet,
                ConditionLevel::Standard,
            ),
        ],
        tasks: vec![
            demo_task(
                "t-lobby-mop",
                Some("lobby"),
                ServiceFrequency::Daily,
                template("Mop lobby floors", 5.0, 0.012),
            ),
            demo_task(
                "t-exam",
                Some("exam"),
                ServiceFrequency::Daily,
                disinfect,
            ),
            demo_task(
                "t-restrooms",
                Some("restrooms"),
                ServiceFrequency::Daily,
                restroom_clean,
            ),
            demo_task(
                "t-offices-trash",
                Some("offices"),
                ServiceFrequency::FivePerWeek,
                template("Empty trash and recycling", 6.0, 0.002),
            ),
            demo_task(
                "t-offices-vacuum",
                Some("offices"),
                ServiceFrequency::Weekly,
                template("Vacuum carpets", 0.0, 0.008),
            ),
            demo_task(
                "t-alarm",
                None,
                ServiceFrequency::Daily,
                template("Lock up and set alarm", 5.0, 0.0),
            ),
        ],
    }
}
