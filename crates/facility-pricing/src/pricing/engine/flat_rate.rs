use super::super::domain::{Area, Facility};
use super::super::keys::{ServiceFrequency, TaskComplexity};
use super::super::money::round2;
use super::super::plan::PricingStrategy;
use super::super::rates::RateModel;
use super::{apply_adjustments, AreaCost, AreaCostBreakdown, CostBreakdown, FacilityPricingResult};
use super::PricingComputation;

/// Monthly base price of an area under the legacy per-square-foot rate.
pub(super) fn area_monthly_base(rates: RateModel<'_>, area: &Area) -> f64 {
    area.total_square_feet()
        * rates.rates().base_rate_per_sq_ft
        * rates.floor_multiplier(&area.floor_type)
        * rates.condition_multiplier(&area.condition_level)
}

pub(super) fn compute(
    rates: RateModel<'_>,
    facility: &Facility,
    frequency: &ServiceFrequency,
    task_complexity: &TaskComplexity,
) -> PricingComputation {
    let frequency_multiplier = rates.frequency_multiplier(frequency);
    let no_cost = AreaCost::default();

    let mut areas = Vec::with_capacity(facility.areas.len());
    let mut area_prices = Vec::with_capacity(facility.areas.len());
    for area in &facility.areas {
        let monthly_price = area_monthly_base(rates, area) * frequency_multiplier;
        areas.push(AreaCostBreakdown::new(area, &rates, &no_cost, monthly_price));
        area_prices.push(monthly_price);
    }

    let base_total: f64 = area_prices.iter().sum();
    let building_multiplier = rates.building_multiplier(&facility.building_type);
    let task_complexity_add_on = rates.task_complexity_add_on(task_complexity);
    let adjustments = apply_adjustments(
        base_total,
        building_multiplier,
        task_complexity_add_on,
        rates.rates().minimum_monthly_charge,
    );

    let result = FacilityPricingResult {
        facility_id: facility.id.clone(),
        facility_name: facility.name.clone(),
        building_type: facility.building_type.clone(),
        service_frequency: frequency.clone(),
        pricing_strategy: PricingStrategy::FlatRate,
        total_square_feet: round2(facility.total_square_feet()),
        areas,
        cost_breakdown: CostBreakdown::default(),
        monthly_visits: frequency.monthly_visits(),
        monthly_cost_before_profit: round2(base_total),
        profit_amount: 0.0,
        profit_margin_applied: 0.0,
        building_multiplier,
        building_adjustment: round2(adjustments.building_adjustment),
        task_complexity: task_complexity.clone(),
        task_complexity_add_on,
        task_complexity_amount: round2(adjustments.task_complexity_amount),
        subtotal: round2(adjustments.subtotal),
        monthly_total: round2(adjustments.monthly_total),
        minimum_applied: adjustments.minimum_applied,
        pricing_plan_id: rates.plan().id.clone(),
        pricing_plan_name: rates.plan().name.clone(),
    };

    PricingComputation {
        result,
        area_prices,
        facility_wide_price: 0.0,
    }
}
