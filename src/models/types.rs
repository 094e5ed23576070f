//! Categorical fields of a sibling history
//!
//! Survey files carry these as numeric codes or as value labels. Both are
//! decoded into closed enums here; anything outside the known set becomes a
//! [`RecordError::UnknownCategory`] instead of travelling on as a string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn unknown(field: &'static str, value: impl ToString) -> RecordError {
    RecordError::UnknownCategory {
        field,
        value: value.to_string(),
    }
}

/// Sex of a sibling (mm1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Brother
    Male,
    /// Sister
    Female,
}

impl Sex {
    /// DHS code (mm1)
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Male => 1,
            Self::Female => 2,
        }
    }
}

impl TryFrom<i32> for Sex {
    type Error = RecordError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Male),
            2 => Ok(Self::Female),
            other => Err(unknown("sex", other)),
        }
    }
}

impl FromStr for Sex {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "male" | "m" | "brother" => Ok(Self::Male),
            "female" | "f" | "sister" => Ok(Self::Female),
            _ => Err(unknown("sex", s.trim())),
        }
    }
}

/// Survival status of a sibling (mm2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurvivalStatus {
    /// Reported alive at interview
    Alive,
    /// Reported dead
    Dead,
    /// Respondent did not know
    Unknown,
}

impl SurvivalStatus {
    /// DHS code (mm2)
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Dead => 0,
            Self::Alive => 1,
            Self::Unknown => 8,
        }
    }
}

impl TryFrom<i32> for SurvivalStatus {
    type Error = RecordError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Dead),
            1 => Ok(Self::Alive),
            8 => Ok(Self::Unknown),
            other => Err(unknown("survival status", other)),
        }
    }
}

impl FromStr for SurvivalStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "alive" | "yes" => Ok(Self::Alive),
            "dead" | "no" => Ok(Self::Dead),
            "don't know" | "dont know" | "unknown" | "dk" => Ok(Self::Unknown),
            _ => Err(unknown("survival status", s.trim())),
        }
    }
}

/// Timing of a sister's death relative to pregnancy (mm9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaternalDeathCause {
    /// Never pregnant
    NeverPregnant,
    /// Death not related to pregnancy
    NotPregnancyRelated,
    /// Died while pregnant
    WhilePregnant,
    /// Died during delivery
    DuringDelivery,
    /// Died since delivery
    SinceDelivery,
    /// Died within six weeks after delivery
    SixWeeksAfterDelivery,
    /// Died within two months after delivery
    TwoMonthsAfterDelivery,
    /// Respondent did not know or the answer is missing
    Unknown,
}

impl MaternalDeathCause {
    /// Whether this timing collapses into the pregnancy-related class
    #[must_use]
    pub const fn is_pregnancy_related(self) -> bool {
        matches!(
            self,
            Self::WhilePregnant
                | Self::DuringDelivery
                | Self::SinceDelivery
                | Self::SixWeeksAfterDelivery
                | Self::TwoMonthsAfterDelivery
        )
    }

    /// DHS code (mm9)
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::NeverPregnant => 0,
            Self::NotPregnancyRelated => 1,
            Self::WhilePregnant => 2,
            Self::DuringDelivery => 3,
            Self::SinceDelivery => 4,
            Self::SixWeeksAfterDelivery => 5,
            Self::TwoMonthsAfterDelivery => 6,
            Self::Unknown => 98,
        }
    }

    /// Survey value label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeverPregnant => "never pregnant",
            Self::NotPregnancyRelated => "death not related to pregnancy",
            Self::WhilePregnant => "died while pregnant",
            Self::DuringDelivery => "died during delivery",
            Self::SinceDelivery => "since delivery",
            Self::SixWeeksAfterDelivery => "6 weeks after delivery",
            Self::TwoMonthsAfterDelivery => "2 months after delivery",
            Self::Unknown => "don't know",
        }
    }
}

impl TryFrom<i32> for MaternalDeathCause {
    type Error = RecordError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NeverPregnant),
            1 => Ok(Self::NotPregnancyRelated),
            2 => Ok(Self::WhilePregnant),
            3 => Ok(Self::DuringDelivery),
            4 => Ok(Self::SinceDelivery),
            5 => Ok(Self::SixWeeksAfterDelivery),
            6 => Ok(Self::TwoMonthsAfterDelivery),
            98 | 99 => Ok(Self::Unknown),
            other => Err(unknown("maternal death cause", other)),
        }
    }
}

impl FromStr for MaternalDeathCause {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        [
            Self::NeverPregnant,
            Self::NotPregnancyRelated,
            Self::WhilePregnant,
            Self::DuringDelivery,
            Self::SinceDelivery,
            Self::SixWeeksAfterDelivery,
            Self::TwoMonthsAfterDelivery,
            Self::Unknown,
        ]
        .into_iter()
        .find(|cause| cause.label() == key)
        .or_else(|| (key == "missing").then_some(Self::Unknown))
        .ok_or_else(|| unknown("maternal death cause", s.trim()))
    }
}

impl fmt::Display for MaternalDeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
