use super::super::money::round2;

/// Facility-level inputs to the monthly rollup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationInput {
    /// Sum of unrounded per-visit area costs.
    pub area_cost_per_visit: f64,
    pub travel_cost_per_visit: f64,
    pub monthly_visits: f64,
    pub target_profit_margin: f64,
    pub building_multiplier: f64,
    pub task_complexity_add_on: f64,
    pub minimum_monthly_charge: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FacilityTotals {
    pub total_cost_per_visit: f64,
    pub monthly_cost_before_profit: f64,
    pub profit_amount: f64,
    pub building_adjustment: f64,
    pub subtotal: f64,
    pub task_complexity_amount: f64,
    pub monthly_total: f64,
    pub minimum_applied: bool,
}

impl FacilityTotals {
    pub fn rounded(&self) -> Self {
        Self {
            total_cost_per_visit: round2(self.total_cost_per_visit),
            monthly_cost_before_profit: round2(self.monthly_cost_before_profit),
            profit_amount: round2(self.profit_amount),
            building_adjustment: round2(self.building_adjustment),
            subtotal: round2(self.subtotal),
            task_complexity_amount: round2(self.task_complexity_amount),
            monthly_total: round2(self.monthly_total),
            minimum_applied: self.minimum_applied,
        }
    }
}

/// Facility adjustments layered on a grossed-up subtotal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Adjustments {
    pub building_adjustment: f64,
    pub subtotal: f64,
    pub task_complexity_amount: f64,
    pub monthly_total: f64,
    pub minimum_applied: bool,
}

pub struct FacilityPricingAggregator;

impl FacilityPricingAggregator {
    pub fn aggregate(input: &AggregationInput) -> FacilityTotals {
        let total_cost_per_visit = input.area_cost_per_visit + input.travel_cost_per_visit;
        let monthly_cost_before_profit = total_cost_per_visit * input.monthly_visits;
        let grossed = gross_up(monthly_cost_before_profit, input.target_profit_margin);
        let profit_amount = grossed - monthly_cost_before_profit;

        let adjustments = apply_adjustments(
            grossed,
            input.building_multiplier,
            input.task_complexity_add_on,
            input.minimum_monthly_charge,
        );

        FacilityTotals {
            total_cost_per_visit,
            monthly_cost_before_profit,
            profit_amount,
            building_adjustment: adjustments.building_adjustment,
            subtotal: adjustments.subtotal,
            task_complexity_amount: adjustments.task_complexity_amount,
            monthly_total: adjustments.monthly_total,
            minimum_applied: adjustments.minimum_applied,
        }
    }
}

/// Sell price whose realized margin equals `margin`. Callers guarantee `margin < 1`.
pub fn gross_up(cost: f64, margin: f64) -> f64 {
    debug_assert!(margin < 1.0, "profit margin must stay below one");
    cost / (1.0 - margin)
}

pub fn apply_adjustments(
    subtotal: f64,
    building_multiplier: f64,
    task_complexity_add_on: f64,
    minimum_monthly_charge: f64,
) -> Adjustments {
    let building_adjustment = subtotal * (building_multiplier - 1.0);
    let subtotal = subtotal + building_adjustment;

    let task_complexity_amount = subtotal * task_complexity_add_on;
    let mut monthly_total = subtotal + task_complexity_amount;

    let minimum_applied = monthly_total < minimum_monthly_charge;
    if minimum_applied {
        monthly_total = minimum_monthly_charge;
    }

    Adjustments {
        building_adjustment,
        subtotal,
        task_complexity_amount,
        monthly_total,
        minimum_applied,
    }
}
