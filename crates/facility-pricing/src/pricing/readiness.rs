use super::domain::Facility;
use super::money::round2;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotReadyReason {
    NoAreas,
    ZeroSquareFootage,
}

impl NotReadyReason {
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoAreas => "facility has no areas defined",
            Self::ZeroSquareFootage => "facility areas have no square footage",
        }
    }
}

impl fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Whether a facility carries enough physical data to be priced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingReadiness {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<NotReadyReason>,
    pub area_count: usize,
    pub total_square_feet: f64,
}

impl PricingReadiness {
    pub fn check(facility: &Facility) -> Self {
        let area_count = facility.areas.len();
        let total_square_feet = facility.total_square_feet();

        let reason = if area_count == 0 {
            Some(NotReadyReason::NoAreas)
        } else if total_square_feet <= 0.0 {
            Some(NotReadyReason::ZeroSquareFootage)
        } else {
            None
        };

        Self {
            ready: reason.is_none(),
            reason,
            area_count,
            total_square_feet: round2(total_square_feet),
        }
    }

    pub fn into_result(self) -> Result<Self, NotReadyReason> {
        match self.reason {
            Some(reason) => Err(reason),
            None => Ok(self),
        }
    }
}

pub fn is_facility_ready_for_pricing(facility: &Facility) -> PricingReadiness {
    PricingReadiness::check(facility)
}
