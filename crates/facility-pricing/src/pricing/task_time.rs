//! Labor-minute estimates derived from task templates and area workload.

use super::domain::{Area, AreaId, Facility, FacilityTask, TaskId};
use super::money::round2;
use serde::Serialize;
use std::collections::BTreeMap;

/// Physical quantities a task's minute rates are multiplied against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workload {
    pub square_feet: f64,
    pub units: u64,
    pub rooms: u64,
    pub fixtures: BTreeMap<String, u64>,
}

impl Workload {
    pub fn for_area(area: &Area) -> Self {
        let fixtures = area
            .fixtures
            .keys()
            .map(|fixture| (fixture.clone(), area.total_fixture_count(fixture)))
            .collect();

        Self {
            square_feet: area.total_square_feet(),
            units: area.total_unit_count(),
            rooms: area.total_room_count(),
            fixtures,
        }
    }

    pub fn for_facility(facility: &Facility) -> Self {
        facility
            .areas
            .iter()
            .map(Self::for_area)
            .fold(Self::default(), |mut total, area| {
                total.square_feet += area.square_feet;
                total.units = total.units.saturating_add(area.units);
                total.rooms = total.rooms.saturating_add(area.rooms);
                for (fixture, count) in area.fixtures {
                    let entry = total.fixtures.entry(fixture).or_insert(0);
                    *entry = entry.saturating_add(count);
                }
                total
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTimeEstimate {
    pub task_id: TaskId,
    pub task_name: String,
    pub minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaTimeEstimate {
    pub area_id: AreaId,
    pub area_name: String,
    pub tasks: Vec<TaskTimeEstimate>,
    pub total_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityTimeEstimate {
    pub areas: Vec<AreaTimeEstimate>,
    pub facility_wide_tasks: Vec<TaskTimeEstimate>,
    pub facility_wide_minutes: f64,
    pub total_minutes: f64,
    pub total_hours: f64,
}

pub struct TaskTimeEstimator;

impl TaskTimeEstimator {
    /// Minutes for one task; overrides on the task win over template values.
    pub fn task_minutes(task: &FacilityTask, workload: &Workload) -> f64 {
        let fixture_minutes: f64 = task
            .fixture_minutes()
            .iter()
            .map(|(fixture, minutes)| {
                minutes * workload.fixtures.get(fixture).copied().unwrap_or(0) as f64
            })
            .sum();

        task.base_minutes()
            + task.minutes_per_sq_ft() * workload.square_feet
            + task.minutes_per_unit() * workload.units as f64
            + task.minutes_per_room() * workload.rooms as f64
            + fixture_minutes
    }

    /// Tasks pointing at an area the facility does not contain are skipped.
    pub fn estimate(facility: &Facility) -> FacilityTimeEstimate {
        let mut raw_total = 0.0;

        let areas = facility
            .areas
            .iter()
            .map(|area| {
                let workload = Workload::for_area(area);
                let (tasks, raw_minutes) =
                    estimate_tasks(facility.tasks_for_area(&area.id), &workload);
                raw_total += raw_minutes;
                AreaTimeEstimate {
                    area_id: area.id.clone(),
                    area_name: area.display_name().to_string(),
                    tasks,
                    total_minutes: round2(raw_minutes),
                }
            })
            .collect();

        let facility_workload = Workload::for_facility(facility);
        let (facility_wide_tasks, facility_wide_raw) =
            estimate_tasks(facility.facility_wide_tasks(), &facility_workload);
        raw_total += facility_wide_raw;

        FacilityTimeEstimate {
            areas,
            facility_wide_tasks,
            facility_wide_minutes: round2(facility_wide_raw),
            total_minutes: round2(raw_total),
            total_hours: round2(raw_total / 60.0),
        }
    }
}

fn estimate_tasks<'a>(
    tasks: impl Iterator<Item = &'a FacilityTask>,
    workload: &Workload,
) -> (Vec<TaskTimeEstimate>, f64) {
    let mut raw_total = 0.0;
    let estimates = tasks
        .map(|task| {
            let minutes = TaskTimeEstimator::task_minutes(task, workload);
            raw_total += minutes;
            TaskTimeEstimate {
                task_id: task.id.clone(),
                task_name: task.display_name().to_string(),
                minutes: round2(minutes),
            }
        })
        .collect();
    (estimates, raw_total)
}
