//! Typed lookups over a pricing plan's rate and multiplier tables.
//!
//! All fallback policy for missing table keys lives here: multiplier tables
//! resolve unknown keys to `1.0`, add-on tables resolve them to `0.0`.

use super::error::PlanValidationError;
use super::keys::{BuildingType, ConditionLevel, FloorType, ServiceFrequency, TaskComplexity};
use super::plan::{CostRates, PricingPlan, PricingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multiplicative factor per category key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiplierTable<K: Ord>(BTreeMap<K, f64>);

impl<K: Ord> MultiplierTable<K> {
    pub const FALLBACK: f64 = 1.0;

    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, key: K, factor: f64) -> Self {
        self.0.insert(key, factor);
        self
    }

    pub fn resolve(&self, key: &K) -> f64 {
        self.0.get(key).copied().unwrap_or(Self::FALLBACK)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &f64)> {
        self.0.iter()
    }
}

impl<K: Ord> Default for MultiplierTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<(K, f64)> for MultiplierTable<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Additive fraction per category key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddOnTable<K: Ord>(BTreeMap<K, f64>);

impl<K: Ord> AddOnTable<K> {
    pub const FALLBACK: f64 = 0.0;

    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, key: K, fraction: f64) -> Self {
        self.0.insert(key, fraction);
        self
    }

    pub fn resolve(&self, key: &K) -> f64 {
        self.0.get(key).copied().unwrap_or(Self::FALLBACK)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &f64)> {
        self.0.iter()
    }
}

impl<K: Ord> Default for AddOnTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<(K, f64)> for AddOnTable<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Read-only view over a plan that has passed validation.
///
/// Building one is the only way into the calculators, so an engine never
/// sees a margin that would divide by zero.
#[derive(Debug, Clone, Copy)]
pub struct RateModel<'a> {
    plan: &'a PricingPlan,
}

impl<'a> RateModel<'a> {
    pub fn from_plan(plan: &'a PricingPlan) -> Result<Self, PlanValidationError> {
        plan.validate()?;
        Ok(Self { plan })
    }

    pub fn plan(&self) -> &'a PricingPlan {
        self.plan
    }

    pub fn strategy(&self) -> PricingStrategy {
        self.plan.pricing_type
    }

    pub fn rates(&self) -> &'a CostRates {
        &self.plan.rates
    }

    pub fn floor_multiplier(&self, floor_type: &FloorType) -> f64 {
        self.plan.multipliers.floor_types.resolve(floor_type)
    }

    pub fn condition_multiplier(&self, condition: &ConditionLevel) -> f64 {
        self.plan.multipliers.conditions.resolve(condition)
    }

    pub fn building_multiplier(&self, building_type: &BuildingType) -> f64 {
        self.plan.multipliers.building_types.resolve(building_type)
    }

    pub fn frequency_multiplier(&self, frequency: &ServiceFrequency) -> f64 {
        self.plan.multipliers.frequencies.resolve(frequency)
    }

    pub fn task_complexity_add_on(&self, complexity: &TaskComplexity) -> f64 {
        self.plan.multipliers.task_complexity_add_ons.resolve(complexity)
    }
}
