use super::keys::{BuildingType, ConditionLevel, FloorType, ServiceFrequency};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(FacilityId);
string_id!(AreaId);
string_id!(TaskId);
string_id!(PricingPlanId);
string_id!(
    /// Tenant (cleaning company) that owns facilities and pricing plans.
    TenantId
);

/// Snapshot of a serviced building handed to the engine by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub tenant_id: TenantId,
    pub name: String,
    #[serde(default)]
    pub building_type: BuildingType,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub tasks: Vec<FacilityTask>,
}

impl Facility {
    pub fn total_square_feet(&self) -> f64 {
        self.areas.iter().map(Area::total_square_feet).sum()
    }

    pub fn area(&self, area_id: &AreaId) -> Option<&Area> {
        self.areas.iter().find(|area| &area.id == area_id)
    }

    pub fn tasks_for_area<'a>(
        &'a self,
        area_id: &'a AreaId,
    ) -> impl Iterator<Item = &'a FacilityTask> + 'a {
        self.tasks
            .iter()
            .filter(move |task| task.area_id.as_ref() == Some(area_id))
    }

    pub fn facility_wide_tasks(&self) -> impl Iterator<Item = &FacilityTask> {
        self.tasks.iter().filter(|task| task.area_id.is_none())
    }

    pub fn has_facility_wide_tasks(&self) -> bool {
        self.facility_wide_tasks().next().is_some()
    }
}

/// A discrete space within a facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    #[serde(default)]
    pub name: Option<String>,
    pub area_type: String,
    pub square_feet: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub floor_type: FloorType,
    #[serde(default)]
    pub condition_level: ConditionLevel,
    #[serde(default)]
    pub room_count: u32,
    #[serde(default)]
    pub unit_count: u32,
    /// Fixture type (e.g. `toilet`, `sink`) to count for one instance of the area.
    #[serde(default)]
    pub fixtures: BTreeMap<String, u32>,
}

fn default_quantity() -> u32 {
    1
}

impl Area {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.area_type)
    }

    /// Quantity is floored at one; negative footage counts as empty.
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.max(1)
    }

    pub fn total_square_feet(&self) -> f64 {
        self.square_feet.max(0.0) * f64::from(self.effective_quantity())
    }

    /// Counts are widened to `u64`, where `u32 * u32` cannot overflow.
    pub fn total_room_count(&self) -> u64 {
        self.scaled_count(self.room_count)
    }

    pub fn total_unit_count(&self) -> u64 {
        self.scaled_count(self.unit_count)
    }

    pub fn total_fixture_count(&self, fixture_type: &str) -> u64 {
        self.scaled_count(self.fixtures.get(fixture_type).copied().unwrap_or(0))
    }

    fn scaled_count(&self, count: u32) -> u64 {
        u64::from(count) * u64::from(self.effective_quantity())
    }
}

/// Reusable timing definition a facility task is instantiated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub name: String,
    #[serde(default)]
    pub base_minutes: f64,
    #[serde(default)]
    pub minutes_per_sq_ft: f64,
    #[serde(default)]
    pub minutes_per_unit: f64,
    #[serde(default)]
    pub minutes_per_room: f64,
    #[serde(default)]
    pub fixture_minutes: BTreeMap<String, f64>,
}

/// Per-task replacements for template timing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskTimingOverrides {
    #[serde(default)]
    pub base_minutes: Option<f64>,
    #[serde(default)]
    pub minutes_per_sq_ft: Option<f64>,
    #[serde(default)]
    pub minutes_per_unit: Option<f64>,
    #[serde(default)]
    pub minutes_per_room: Option<f64>,
    #[serde(default)]
    pub fixture_minutes: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityTask {
    pub id: TaskId,
    /// `None` marks a facility-wide task.
    #[serde(default)]
    pub area_id: Option<AreaId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub frequency: ServiceFrequency,
    pub template: TaskTemplate,
    #[serde(default)]
    pub overrides: TaskTimingOverrides,
}

impl FacilityTask {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.template.name)
    }

    pub fn base_minutes(&self) -> f64 {
        self.overrides
            .base_minutes
            .unwrap_or(self.template.base_minutes)
    }

    pub fn minutes_per_sq_ft(&self) -> f64 {
        self.overrides
            .minutes_per_sq_ft
            .unwrap_or(self.template.minutes_per_sq_ft)
    }

    pub fn minutes_per_unit(&self) -> f64 {
        self.overrides
            .minutes_per_unit
            .unwrap_or(self.template.minutes_per_unit)
    }

    pub fn minutes_per_room(&self) -> f64 {
        self.overrides
            .minutes_per_room
            .unwrap_or(self.template.minutes_per_room)
    }

    /// Template fixture rates with any per-task overrides laid on top.
    pub fn fixture_minutes(&self) -> BTreeMap<String, f64> {
        let mut rates = self.template.fixture_minutes.clone();
        for (fixture, minutes) in &self.overrides.fixture_minutes {
            rates.insert(fixture.clone(), *minutes);
        }
        rates
    }
}
