use super::super::domain::Facility;
use super::super::error::PricingError;
use super::super::keys::{ServiceFrequency, TaskComplexity};
use super::PricingEngine;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyComparison {
    pub frequency: ServiceFrequency,
    pub monthly_total: f64,
    pub monthly_visits: f64,
}

/// Re-prices one facility at several cadences.
pub struct FrequencyComparator<'e, 'p> {
    engine: &'e PricingEngine<'p>,
}

impl<'e, 'p> FrequencyComparator<'e, 'p> {
    pub fn new(engine: &'e PricingEngine<'p>) -> Self {
        Self { engine }
    }

    /// Results follow the order of `frequencies`; each entry is a full,
    /// independent recalculation at standard task complexity.
    pub fn compare(
        &self,
        facility: &Facility,
        frequencies: &[ServiceFrequency],
    ) -> Result<Vec<FrequencyComparison>, PricingError> {
        frequencies
            .iter()
            .map(|frequency| {
                let result =
                    self.engine
                        .calculate(facility, frequency, &TaskComplexity::Standard)?;
                Ok(FrequencyComparison {
                    frequency: frequency.clone(),
                    monthly_total: result.monthly_total,
                    monthly_visits: result.monthly_visits,
                })
            })
            .collect()
    }
}
