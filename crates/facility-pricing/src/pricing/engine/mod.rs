//! Facility pricing engine.
//!
//! Pure computation over a facility snapshot and a validated plan: no I/O,
//! no clock, no shared state. Identical inputs always produce identical
//! results.

mod aggregate;
mod area;
mod compare;
mod flat_rate;

pub use aggregate::{
    apply_adjustments, gross_up, Adjustments, AggregationInput, FacilityPricingAggregator,
    FacilityTotals,
};
pub use area::{AreaCost, AreaCostBreakdown, AreaCostCalculator};
pub use compare::{FrequencyComparator, FrequencyComparison};

use super::domain::{Facility, FacilityId, PricingPlanId};
use super::error::{PlanValidationError, PricingError};
use super::keys::{BuildingType, ServiceFrequency, TaskComplexity};
use super::money::round2;
use super::plan::{PricingPlan, PricingStrategy};
use super::rates::RateModel;
use super::readiness::PricingReadiness;
use serde::Serialize;

/// Per-visit cost totals across all areas plus travel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub labor_cost: f64,
    pub labor_burden: f64,
    pub total_labor_cost: f64,
    pub insurance_cost: f64,
    pub admin_overhead_cost: f64,
    pub equipment_cost: f64,
    pub travel_cost: f64,
    pub supply_cost: f64,
    pub total_cost_per_visit: f64,
}

impl CostBreakdown {
    fn from_costs(areas: &AreaCost, travel_cost: f64) -> Self {
        Self {
            labor_cost: round2(areas.labor_cost_base),
            labor_burden: round2(areas.labor_burden),
            total_labor_cost: round2(areas.labor_cost),
            insurance_cost: round2(areas.insurance_cost),
            admin_overhead_cost: round2(areas.admin_overhead_cost),
            equipment_cost: round2(areas.equipment_cost),
            travel_cost: round2(travel_cost),
            supply_cost: round2(areas.supply_cost),
            total_cost_per_visit: round2(areas.total_cost_per_visit + travel_cost),
        }
    }
}

/// Monthly price of a facility under one plan and frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityPricingResult {
    pub facility_id: FacilityId,
    pub facility_name: String,
    pub building_type: BuildingType,
    pub service_frequency: ServiceFrequency,
    pub pricing_strategy: PricingStrategy,
    pub total_square_feet: f64,
    pub areas: Vec<AreaCostBreakdown>,
    pub cost_breakdown: CostBreakdown,
    pub monthly_visits: f64,
    pub monthly_cost_before_profit: f64,
    pub profit_amount: f64,
    pub profit_margin_applied: f64,
    pub building_multiplier: f64,
    pub building_adjustment: f64,
    pub task_complexity: TaskComplexity,
    pub task_complexity_add_on: f64,
    pub task_complexity_amount: f64,
    pub subtotal: f64,
    pub monthly_total: f64,
    pub minimum_applied: bool,
    pub pricing_plan_id: PricingPlanId,
    pub pricing_plan_name: String,
}

/// A result together with the unrounded, unadjusted monthly prices the
/// proposal generator rescales.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingComputation {
    pub result: FacilityPricingResult,
    area_prices: Vec<f64>,
    facility_wide_price: f64,
}

impl PricingComputation {
    /// Unscaled monthly price per area, in facility area order.
    pub fn area_prices(&self) -> &[f64] {
        &self.area_prices
    }

    /// Unscaled monthly price of facility-level costs (travel).
    pub fn facility_wide_price(&self) -> f64 {
        self.facility_wide_price
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PricingEngine<'p> {
    rates: RateModel<'p>,
}

impl<'p> PricingEngine<'p> {
    pub fn new(plan: &'p PricingPlan) -> Result<Self, PlanValidationError> {
        Ok(Self::from_rates(RateModel::from_plan(plan)?))
    }

    pub fn from_rates(rates: RateModel<'p>) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> RateModel<'p> {
        self.rates
    }

    pub fn calculate(
        &self,
        facility: &Facility,
        frequency: &ServiceFrequency,
        task_complexity: &TaskComplexity,
    ) -> Result<FacilityPricingResult, PricingError> {
        self.compute(facility, frequency, task_complexity)
            .map(|computation| computation.result)
    }

    pub fn compute(
        &self,
        facility: &Facility,
        frequency: &ServiceFrequency,
        task_complexity: &TaskComplexity,
    ) -> Result<PricingComputation, PricingError> {
        PricingReadiness::check(facility)
            .into_result()
            .map_err(PricingError::NotReady)?;

        let computation = match self.rates.strategy() {
            PricingStrategy::CostBased => self.cost_based(facility, frequency, task_complexity),
            PricingStrategy::FlatRate => {
                flat_rate::compute(self.rates, facility, frequency, task_complexity)
            }
        };
        Ok(computation)
    }

    fn cost_based(
        &self,
        facility: &Facility,
        frequency: &ServiceFrequency,
        task_complexity: &TaskComplexity,
    ) -> PricingComputation {
        let rates = self.rates.rates();
        let calculator = AreaCostCalculator::new(self.rates);
        let monthly_visits = frequency.monthly_visits();
        let margin = rates.target_profit_margin;

        let mut totals = AreaCost::default();
        let mut areas = Vec::with_capacity(facility.areas.len());
        let mut area_prices = Vec::with_capacity(facility.areas.len());

        for area in &facility.areas {
            let cost = calculator.calculate(area);
            let monthly_price = gross_up(cost.total_cost_per_visit * monthly_visits, margin);
            totals.accumulate(&cost);
            areas.push(AreaCostBreakdown::new(area, &self.rates, &cost, monthly_price));
            area_prices.push(monthly_price);
        }

        let building_multiplier = self.rates.building_multiplier(&facility.building_type);
        let task_complexity_add_on = self.rates.task_complexity_add_on(task_complexity);
        let facility_totals = FacilityPricingAggregator::aggregate(&AggregationInput {
            area_cost_per_visit: totals.total_cost_per_visit,
            travel_cost_per_visit: rates.travel_cost_per_visit,
            monthly_visits,
            target_profit_margin: margin,
            building_multiplier,
            task_complexity_add_on,
            minimum_monthly_charge: rates.minimum_monthly_charge,
        })
        .rounded();

        let result = FacilityPricingResult {
            facility_id: facility.id.clone(),
            facility_name: facility.name.clone(),
            building_type: facility.building_type.clone(),
            service_frequency: frequency.clone(),
            pricing_strategy: PricingStrategy::CostBased,
            total_square_feet: round2(facility.total_square_feet()),
            areas,
            cost_breakdown: CostBreakdown::from_costs(&totals, rates.travel_cost_per_visit),
            monthly_visits,
            monthly_cost_before_profit: facility_totals.monthly_cost_before_profit,
            profit_amount: facility_totals.profit_amount,
            profit_margin_applied: margin,
            building_multiplier,
            building_adjustment: facility_totals.building_adjustment,
            task_complexity: task_complexity.clone(),
            task_complexity_add_on,
            task_complexity_amount: facility_totals.task_complexity_amount,
            subtotal: facility_totals.subtotal,
            monthly_total: facility_totals.monthly_total,
            minimum_applied: facility_totals.minimum_applied,
            pricing_plan_id: self.rates.plan().id.clone(),
            pricing_plan_name: self.rates.plan().name.clone(),
        };

        PricingComputation {
            result,
            area_prices,
            facility_wide_price: gross_up(rates.travel_cost_per_visit * monthly_visits, margin),
        }
    }
}
