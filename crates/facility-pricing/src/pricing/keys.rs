//! String-backed category keys used to index pricing plan tables.
//!
//! Every key type round-trips through its snake_case form. Keys a tenant
//! invents that are not part of the stock set are kept verbatim as `Custom`
//! so they can still be matched against a plan's own table entries.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! category_key {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (default $default:ident) {
            $($variant:ident => $key:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Custom(String),
        }

        impl $name {
            pub fn parse(raw: &str) -> Self {
                let normalized = normalize_key(raw);
                match normalized.as_str() {
                    "" => Self::$default,
                    $($key => Self::$variant,)+
                    _ => Self::Custom(normalized),
                }
            }

            pub fn as_key(&self) -> &str {
                match self {
                    $(Self::$variant => $key,)+
                    Self::Custom(key) => key.as_str(),
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Custom(key) => key.as_str(),
                }
            }

            pub fn known() -> Vec<Self> {
                vec![$(Self::$variant),+]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::parse(&value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_key().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_key())
            }
        }
    };
}

fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|ch| if ch == '-' || ch == ' ' { '_' } else { ch })
        .collect()
}

category_key! {
    /// Floor finish of an area, keyed into `floor_type_multipliers`.
    pub enum FloorType (default Vct) {
        Vct => "vct", "VCT";
        Carpet => "carpet", "Carpet";
        Hardwood => "hardwood", "Hardwood";
        Tile => "tile", "Tile";
        Concrete => "concrete", "Concrete";
        Epoxy => "epoxy", "Epoxy";
    }
}

category_key! {
    /// How much soil an area accumulates between visits.
    pub enum ConditionLevel (default Standard) {
        Standard => "standard", "Standard";
        Medium => "medium", "Medium";
        Hard => "hard", "Hard";
    }
}

category_key! {
    pub enum BuildingType (default Other) {
        Office => "office", "Office";
        Medical => "medical", "Medical";
        Industrial => "industrial", "Industrial";
        Retail => "retail", "Retail";
        Educational => "educational", "Educational";
        Warehouse => "warehouse", "Warehouse";
        Residential => "residential", "Residential";
        Mixed => "mixed", "Mixed Use";
        Other => "other", "Other";
    }
}

category_key! {
    /// Specialty level of the requested work, keyed into `task_complexity_add_ons`.
    pub enum TaskComplexity (default Standard) {
        Standard => "standard", "Standard";
        Sanitization => "sanitization", "Sanitization";
        Biohazard => "biohazard", "Biohazard";
        FireSmoke => "fire_smoke", "Fire & Smoke";
        RoughClean => "rough_clean", "Rough Clean";
    }
}

category_key! {
    /// Cadence of recurring service visits.
    pub enum ServiceFrequency (default Weekly) {
        OncePerWeek => "1x_week", "1x Weekly";
        TwicePerWeek => "2x_week", "2x Weekly";
        ThreePerWeek => "3x_week", "3x Weekly";
        FourPerWeek => "4x_week", "4x Weekly";
        FivePerWeek => "5x_week", "5x Weekly";
        SevenPerWeek => "7x_week", "7x Weekly";
        Daily => "daily", "Daily";
        Weekly => "weekly", "Weekly";
        Biweekly => "biweekly", "Biweekly";
        Monthly => "monthly", "Monthly";
        Quarterly => "quarterly", "Quarterly";
    }
}

/// Visits per month assumed when a frequency key is not in the table.
pub const DEFAULT_MONTHLY_VISITS: f64 = 4.33;

impl ServiceFrequency {
    pub fn monthly_visits(&self) -> f64 {
        match self {
            Self::OncePerWeek | Self::Weekly => 4.33,
            Self::TwicePerWeek => 8.67,
            Self::ThreePerWeek => 13.0,
            Self::FourPerWeek => 17.33,
            Self::FivePerWeek => 21.67,
            Self::SevenPerWeek => 30.33,
            Self::Daily => 30.0,
            Self::Biweekly => 2.17,
            Self::Monthly => 1.0,
            Self::Quarterly => 0.33,
            Self::Custom(_) => DEFAULT_MONTHLY_VISITS,
        }
    }
}
