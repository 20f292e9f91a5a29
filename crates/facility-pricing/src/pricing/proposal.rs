//! Per-area proposal line items reconciled to the facility total.

use super::domain::{AreaId, Facility, FacilityTask};
use super::engine::PricingComputation;
use super::keys::ServiceFrequency;
use super::money::{from_cents, to_cents};
use serde::Serialize;

const GENERIC_TASKS: [&str; 4] = [
    "Trash removal",
    "Restroom cleaning and restocking",
    "Floor care",
    "Dusting and surface wiping",
];

const FACILITY_WIDE_SERVICE: &str = "Facility-Wide Services";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalServiceLine {
    /// `None` for the facility-wide line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_id: Option<AreaId>,
    pub service_name: String,
    pub frequency: ServiceFrequency,
    pub monthly_price: f64,
    pub description: String,
    pub included_tasks: Vec<String>,
}

struct LineDraft {
    area_id: Option<AreaId>,
    service_name: String,
    description: String,
    included_tasks: Vec<String>,
    unscaled_price: f64,
}

pub struct ProposalServiceGenerator;

impl ProposalServiceGenerator {
    /// Lines always sum to `computation.result.monthly_total` to the cent and
    /// never go negative.
    pub fn generate(
        facility: &Facility,
        computation: &PricingComputation,
    ) -> Vec<ProposalServiceLine> {
        let result = &computation.result;
        if facility.tasks.is_empty() {
            return vec![fallback_line(facility, &result.service_frequency, result.monthly_total)];
        }

        let mut drafts: Vec<LineDraft> = facility
            .areas
            .iter()
            .zip(computation.area_prices())
            .map(|(area, price)| {
                let tasks: Vec<&FacilityTask> = facility.tasks_for_area(&area.id).collect();
                LineDraft {
                    area_id: Some(area.id.clone()),
                    service_name: area.display_name().to_string(),
                    description: describe(area.display_name(), &tasks),
                    included_tasks: task_names(&tasks),
                    unscaled_price: *price,
                }
            })
            .collect();

        let facility_wide: Vec<&FacilityTask> = facility.facility_wide_tasks().collect();
        if !facility_wide.is_empty() {
            drafts.push(LineDraft {
                area_id: None,
                service_name: FACILITY_WIDE_SERVICE.to_string(),
                description: describe(&facility.name, &facility_wide),
                included_tasks: task_names(&facility_wide),
                unscaled_price: computation.facility_wide_price(),
            });
        }

        let unscaled_total: f64 = drafts.iter().map(|draft| draft.unscaled_price).sum();
        let scaling_factor = if unscaled_total > 0.0 && result.monthly_total > 0.0 {
            result.monthly_total / unscaled_total
        } else {
            1.0
        };

        let mut cents: Vec<i64> = drafts
            .iter()
            .map(|draft| to_cents(draft.unscaled_price * scaling_factor))
            .collect();
        let residual = to_cents(result.monthly_total) - cents.iter().sum::<i64>();
        absorb_residual(&mut cents, residual);

        drafts
            .into_iter()
            .zip(cents)
            .map(|(draft, cents)| ProposalServiceLine {
                area_id: draft.area_id,
                service_name: draft.service_name,
                frequency: result.service_frequency.clone(),
                monthly_price: from_cents(cents),
                description: draft.description,
                included_tasks: draft.included_tasks,
            })
            .collect()
    }
}

/// The last line absorbs the residual. A negative residual never takes a
/// line below zero; whatever the last line cannot give up moves to the
/// closest priced line before it.
fn absorb_residual(cents: &mut [i64], mut residual: i64) {
    if residual >= 0 {
        if let Some(last) = cents.last_mut() {
            *last += residual;
        }
        return;
    }
    for line in cents.iter_mut().rev() {
        if residual == 0 {
            break;
        }
        let taken = (*line).max(0).min(-residual);
        *line -= taken;
        residual += taken;
    }
}

fn fallback_line(
    facility: &Facility,
    frequency: &ServiceFrequency,
    monthly_total: f64,
) -> ProposalServiceLine {
    ProposalServiceLine {
        area_id: None,
        service_name: FACILITY_WIDE_SERVICE.to_string(),
        frequency: frequency.clone(),
        monthly_price: from_cents(to_cents(monthly_total)),
        description: format!("{} cleaning of {}", frequency.label(), facility.name),
        included_tasks: GENERIC_TASKS.iter().map(|task| task.to_string()).collect(),
    }
}

/// Groups task names by frequency, most frequent cadence first.
fn describe(subject: &str, tasks: &[&FacilityTask]) -> String {
    if tasks.is_empty() {
        return format!("Routine cleaning of {subject}");
    }

    let mut groups: Vec<(&ServiceFrequency, Vec<&str>)> = Vec::new();
    for task in tasks {
        match groups
            .iter_mut()
            .find(|(frequency, _)| *frequency == &task.frequency)
        {
            Some((_, names)) => names.push(task.display_name()),
            None => groups.push((&task.frequency, vec![task.display_name()])),
        }
    }
    groups.sort_by(|a, b| b.0.monthly_visits().total_cmp(&a.0.monthly_visits()));

    groups
        .iter()
        .map(|(frequency, names)| format!("{}: {}", frequency.label(), names.join(", ")))
        .collect::<Vec<_>>()
        .join(". ")
}

fn task_names(tasks: &[&FacilityTask]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(tasks.len());
    for task in tasks {
        let name = task.display_name();
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}
