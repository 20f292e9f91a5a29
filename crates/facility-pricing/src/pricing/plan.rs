use super::domain::{PricingPlanId, TenantId};
use super::error::{PlanValidationError, PlanViolation};
use super::keys::{BuildingType, ConditionLevel, FloorType, ServiceFrequency, TaskComplexity};
use super::rates::{AddOnTable, MultiplierTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calculator a plan dispatches to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    /// Labor-hour cost buildup with overhead layering and profit grossing.
    #[default]
    CostBased,
    /// Legacy per-square-foot rate scaled by the frequency table.
    FlatRate,
}

impl PricingStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CostBased => "Cost Based",
            Self::FlatRate => "Flat Rate",
        }
    }
}

/// Scalar cost and margin rates of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRates {
    pub labor_cost_per_hour: f64,
    pub labor_burden_percentage: f64,
    pub sq_ft_per_labor_hour: f64,
    pub insurance_percentage: f64,
    pub admin_overhead_percentage: f64,
    pub travel_cost_per_visit: f64,
    pub equipment_percentage: f64,
    pub supply_cost_percentage: f64,
    /// When set, replaces the percentage-based supply cost for every area.
    #[serde(default)]
    pub supply_cost_per_sq_ft: Option<f64>,
    pub target_profit_margin: f64,
    pub minimum_monthly_charge: f64,
    #[serde(default)]
    pub base_rate_per_sq_ft: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            labor_cost_per_hour: 18.0,
            labor_burden_percentage: 0.25,
            sq_ft_per_labor_hour: 2500.0,
            insurance_percentage: 0.08,
            admin_overhead_percentage: 0.12,
            travel_cost_per_visit: 15.0,
            equipment_percentage: 0.05,
            supply_cost_percentage: 0.04,
            supply_cost_per_sq_ft: None,
            target_profit_margin: 0.25,
            minimum_monthly_charge: 250.0,
            base_rate_per_sq_ft: 0.10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTables {
    #[serde(default)]
    pub floor_types: MultiplierTable<FloorType>,
    #[serde(default)]
    pub conditions: MultiplierTable<ConditionLevel>,
    #[serde(default)]
    pub building_types: MultiplierTable<BuildingType>,
    /// Only consulted by the flat-rate strategy.
    #[serde(default)]
    pub frequencies: MultiplierTable<ServiceFrequency>,
    #[serde(default)]
    pub task_complexity_add_ons: AddOnTable<TaskComplexity>,
}

impl MultiplierTables {
    pub fn standard() -> Self {
        Self {
            floor_types: MultiplierTable::new()
                .with(FloorType::Vct, 1.0)
                .with(FloorType::Carpet, 1.1)
                .with(FloorType::Hardwood, 1.15)
                .with(FloorType::Tile, 1.05)
                .with(FloorType::Concrete, 0.9)
                .with(FloorType::Epoxy, 0.95),
            conditions: MultiplierTable::new()
                .with(ConditionLevel::Standard, 1.0)
                .with(ConditionLevel::Medium, 1.25)
                .with(ConditionLevel::Hard, 1.5),
            building_types: MultiplierTable::new()
                .with(BuildingType::Office, 1.0)
                .with(BuildingType::Medical, 1.3)
                .with(BuildingType::Industrial, 1.15)
                .with(BuildingType::Retail, 1.05)
                .with(BuildingType::Educational, 1.1)
                .with(BuildingType::Warehouse, 0.9)
                .with(BuildingType::Residential, 1.0)
                .with(BuildingType::Mixed, 1.05)
                .with(BuildingType::Other, 1.0),
            frequencies: MultiplierTable::new()
                .with(ServiceFrequency::OncePerWeek, 1.0)
                .with(ServiceFrequency::Weekly, 1.0)
                .with(ServiceFrequency::TwicePerWeek, 1.8)
                .with(ServiceFrequency::ThreePerWeek, 2.5)
                .with(ServiceFrequency::FourPerWeek, 3.1)
                .with(ServiceFrequency::FivePerWeek, 3.6)
                .with(ServiceFrequency::SevenPerWeek, 4.8)
                .with(ServiceFrequency::Daily, 4.5)
                .with(ServiceFrequency::Biweekly, 0.55)
                .with(ServiceFrequency::Monthly, 0.3)
                .with(ServiceFrequency::Quarterly, 0.12),
            task_complexity_add_ons: AddOnTable::new()
                .with(TaskComplexity::Standard, 0.0)
                .with(TaskComplexity::Sanitization, 0.15)
                .with(TaskComplexity::Biohazard, 0.5)
                .with(TaskComplexity::FireSmoke, 0.35)
                .with(TaskComplexity::RoughClean, 0.2),
        }
    }
}

/// Versioned, tenant-level cost and multiplier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub id: PricingPlanId,
    pub tenant_id: TenantId,
    pub name: String,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default)]
    pub pricing_type: PricingStrategy,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    #[serde(default)]
    pub rates: CostRates,
    #[serde(default)]
    pub multipliers: MultiplierTables,
}

fn first_version() -> u32 {
    1
}

fn active_by_default() -> bool {
    true
}

impl PricingPlan {
    /// Stock cost-based plan used to seed new tenants.
    pub fn standard(id: PricingPlanId, tenant_id: TenantId) -> Self {
        Self {
            id,
            tenant_id,
            name: "Standard Commercial".to_string(),
            version: 1,
            pricing_type: PricingStrategy::CostBased,
            is_default: true,
            is_active: true,
            effective_from: None,
            rates: CostRates::default(),
            multipliers: MultiplierTables::standard(),
        }
    }

    /// Active and already in force on `date`; plans without a start date are always in force.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.effective_from.map_or(true, |from| from <= date)
    }

    /// Collects every out-of-range field instead of stopping at the first.
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        let mut check = RangeCheck::default();
        let rates = &self.rates;

        if self.name.trim().is_empty() {
            check.reject("name", "must not be empty");
        }

        check.non_negative("labor_cost_per_hour", rates.labor_cost_per_hour);
        check.fraction("labor_burden_percentage", rates.labor_burden_percentage);
        if !rates.sq_ft_per_labor_hour.is_finite() || rates.sq_ft_per_labor_hour < 100.0 {
            check.reject("sq_ft_per_labor_hour", "must be at least 100");
        }
        check.fraction("insurance_percentage", rates.insurance_percentage);
        check.fraction("admin_overhead_percentage", rates.admin_overhead_percentage);
        check.non_negative("travel_cost_per_visit", rates.travel_cost_per_visit);
        check.fraction("equipment_percentage", rates.equipment_percentage);
        check.fraction("supply_cost_percentage", rates.supply_cost_percentage);
        if let Some(per_sq_ft) = rates.supply_cost_per_sq_ft {
            check.non_negative("supply_cost_per_sq_ft", per_sq_ft);
        }
        let margin = rates.target_profit_margin;
        if !margin.is_finite() || !(0.0..1.0).contains(&margin) {
            check.reject(
                "target_profit_margin",
                "must be at least 0 and strictly below 1",
            );
        }
        check.whole_cents("minimum_monthly_charge", rates.minimum_monthly_charge);
        check.non_negative("base_rate_per_sq_ft", rates.base_rate_per_sq_ft);

        let tables = &self.multipliers;
        check.table("floor_types", tables.floor_types.iter());
        check.table("conditions", tables.conditions.iter());
        check.table("building_types", tables.building_types.iter());
        check.table("frequencies", tables.frequencies.iter());
        check.table(
            "task_complexity_add_ons",
            tables.task_complexity_add_ons.iter(),
        );

        check.finish()
    }
}

#[derive(Default)]
struct RangeCheck {
    violations: Vec<PlanViolation>,
}

impl RangeCheck {
    fn reject(&mut self, field: impl Into<String>, message: &str) {
        self.violations.push(PlanViolation {
            field: field.into(),
            message: message.to_string(),
        });
    }

    fn non_negative(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.reject(field, "must be a non-negative number");
        }
    }

    /// Totals are rounded to the cent, so a sub-cent floor could not be honoured.
    fn whole_cents(&mut self, field: &str, value: f64) {
        let scaled = value * 100.0;
        if !value.is_finite() || value < 0.0 {
            self.reject(field, "must be a non-negative number");
        } else if (scaled - scaled.round()).abs() > 1e-6 {
            self.reject(field, "must be a whole number of cents");
        }
    }

    fn fraction(&mut self, field: &str, value: f64) {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            self.reject(field, "must be between 0 and 1");
        }
    }

    fn table<'k, K: std::fmt::Display + 'k>(
        &mut self,
        table: &str,
        entries: impl Iterator<Item = (&'k K, &'k f64)>,
    ) {
        for (key, value) in entries {
            self.non_negative(&format!("{table}.{key}"), *value);
        }
    }

    fn finish(self) -> Result<(), PlanValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(PlanValidationError::new(self.violations))
        }
    }
}
