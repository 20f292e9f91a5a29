use super::super::domain::{Area, AreaId};
use super::super::keys::{ConditionLevel, FloorType};
use super::super::money::round2;
use super::super::rates::RateModel;
use serde::Serialize;

/// Unrounded per-visit cost of one area.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AreaCost {
    pub labor_hours: f64,
    pub labor_cost_base: f64,
    pub labor_burden: f64,
    pub labor_cost: f64,
    pub insurance_cost: f64,
    pub admin_overhead_cost: f64,
    pub equipment_cost: f64,
    pub supply_cost: f64,
    pub total_cost_per_visit: f64,
}

impl AreaCost {
    pub(crate) fn accumulate(&mut self, other: &AreaCost) {
        self.labor_hours += other.labor_hours;
        self.labor_cost_base += other.labor_cost_base;
        self.labor_burden += other.labor_burden;
        self.labor_cost += other.labor_cost;
        self.insurance_cost += other.insurance_cost;
        self.admin_overhead_cost += other.admin_overhead_cost;
        self.equipment_cost += other.equipment_cost;
        self.supply_cost += other.supply_cost;
        self.total_cost_per_visit += other.total_cost_per_visit;
    }
}

/// Per-area labor, overhead and supply buildup.
#[derive(Debug, Clone, Copy)]
pub struct AreaCostCalculator<'p> {
    rates: RateModel<'p>,
}

impl<'p> AreaCostCalculator<'p> {
    pub fn new(rates: RateModel<'p>) -> Self {
        Self { rates }
    }

    pub fn calculate(&self, area: &Area) -> AreaCost {
        let floor_multiplier = self.rates.floor_multiplier(&area.floor_type);
        let condition_multiplier = self.rates.condition_multiplier(&area.condition_level);
        self.calculate_with(
            area.total_square_feet(),
            floor_multiplier,
            condition_multiplier,
        )
    }

    pub fn calculate_with(
        &self,
        total_square_feet: f64,
        floor_multiplier: f64,
        condition_multiplier: f64,
    ) -> AreaCost {
        if total_square_feet <= 0.0 {
            return AreaCost::default();
        }

        let rates = self.rates.rates();
        let labor_hours = (total_square_feet / rates.sq_ft_per_labor_hour)
            * floor_multiplier
            * condition_multiplier;
        let labor_cost_base = labor_hours * rates.labor_cost_per_hour;
        let labor_burden = labor_cost_base * rates.labor_burden_percentage;
        let labor_cost = labor_cost_base + labor_burden;

        let insurance_cost = labor_cost * rates.insurance_percentage;
        let admin_overhead_cost = labor_cost * rates.admin_overhead_percentage;
        let equipment_cost = labor_cost * rates.equipment_percentage;
        let loaded_labor = labor_cost + insurance_cost + admin_overhead_cost + equipment_cost;

        let supply_cost = match rates.supply_cost_per_sq_ft {
            Some(per_sq_ft) => total_square_feet * per_sq_ft,
            None => loaded_labor * rates.supply_cost_percentage,
        };

        AreaCost {
            labor_hours,
            labor_cost_base,
            labor_burden,
            labor_cost,
            insurance_cost,
            admin_overhead_cost,
            equipment_cost,
            supply_cost,
            total_cost_per_visit: loaded_labor + supply_cost,
        }
    }
}

/// Rounded per-area line of a pricing result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaCostBreakdown {
    pub area_id: AreaId,
    pub area_name: String,
    pub area_type: String,
    pub square_feet: f64,
    pub quantity: u32,
    pub total_square_feet: f64,
    pub floor_type: FloorType,
    pub floor_multiplier: f64,
    pub condition_level: ConditionLevel,
    pub condition_multiplier: f64,
    pub labor_hours: f64,
    pub labor_cost: f64,
    pub labor_burden: f64,
    pub total_labor_cost: f64,
    pub insurance_cost: f64,
    pub admin_overhead_cost: f64,
    pub equipment_cost: f64,
    pub supply_cost: f64,
    pub total_cost_per_visit: f64,
    /// Monthly price before facility-level adjustments.
    pub monthly_price: f64,
}

impl AreaCostBreakdown {
    pub(crate) fn new(
        area: &Area,
        rates: &RateModel<'_>,
        cost: &AreaCost,
        monthly_price: f64,
    ) -> Self {
        Self {
            area_id: area.id.clone(),
            area_name: area.display_name().to_string(),
            area_type: area.area_type.clone(),
            square_feet: round2(area.square_feet.max(0.0)),
            quantity: area.effective_quantity(),
            total_square_feet: round2(area.total_square_feet()),
            floor_type: area.floor_type.clone(),
            floor_multiplier: rates.floor_multiplier(&area.floor_type),
            condition_level: area.condition_level.clone(),
            condition_multiplier: rates.condition_multiplier(&area.condition_level),
            labor_hours: round2(cost.labor_hours),
            labor_cost: round2(cost.labor_cost_base),
            labor_burden: round2(cost.labor_burden),
            total_labor_cost: round2(cost.labor_cost),
            insurance_cost: round2(cost.insurance_cost),
            admin_overhead_cost: round2(cost.admin_overhead_cost),
            equipment_cost: round2(cost.equipment_cost),
            supply_cost: round2(cost.supply_cost),
            total_cost_per_visit: round2(cost.total_cost_per_visit),
            monthly_price: round2(monthly_price),
        }
    }
}
