//! Reference window and age-group definitions

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Length of the reference period preceding the interview
pub const REFERENCE_WINDOW_MONTHS: i32 = 84;

/// Width of one age group
pub const AGE_GROUP_WIDTH_MONTHS: i32 = 60;

/// Age-group indices reported in the rate table (ages 15-19 to 45-49)
pub const REPRODUCTIVE_AGE_GROUPS: RangeInclusive<i32> = 3..=9;

/// Five-year age band, indexed from 0 for ages 0-4
///
/// Indices below zero or above the reproductive range are valid while
/// allocating exposure; they are only dropped when aggregating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgeGroup(i32);

impl AgeGroup {
    /// Age group with the given index
    #[must_use]
    pub const fn new(index: i32) -> Self {
        Self(index)
    }

    /// Age group containing `age_months` completed months of age
    #[must_use]
    pub const fn containing(age_months: i32) -> Self {
        Self(age_months.div_euclid(AGE_GROUP_WIDTH_MONTHS))
    }

    /// Index of the group
    #[must_use]
    pub const fn index(self) -> i32 {
        self.0
    }

    /// The group `n` bands younger
    #[must_use]
    pub const fn younger(self, n: i32) -> Self {
        Self(self.0 - n)
    }

    /// First age in years covered by the group
    #[must_use]
    pub const fn lower_age(self) -> i32 {
        self.0 * 5
    }

    /// Last age in years covered by the group
    #[must_use]
    pub const fn upper_age(self) -> i32 {
        self.0 * 5 + 4
    }

    /// Whether the group is one of the reported groups 15-19 .. 45-49
    #[must_use]
    pub fn is_reproductive(self) -> bool {
        REPRODUCTIVE_AGE_GROUPS.contains(&self.0)
    }

    /// All reported groups in ascending order
    pub fn reproductive() -> impl Iterator<Item = Self> {
        REPRODUCTIVE_AGE_GROUPS.map(Self)
    }

    /// Label in the form `15-19`
    #[must_use]
    pub fn label(self) -> String {
        format!("{}-{}", self.lower_age(), self.upper_age())
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower_age(), self.upper_age())
    }
}

/// One of the three age groups a sibling's window exposure can fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExposureSlot {
    /// The group she was in at the end of her exposure
    Last,
    /// The group before that
    Mid,
    /// Two groups before the last
    First,
}

impl ExposureSlot {
    /// All slots, most recent first
    pub const ALL: [Self; 3] = [Self::Last, Self::Mid, Self::First];

    /// Whether deaths are counted in this slot
    ///
    /// A death ends exposure, so it always falls in the last group.
    #[must_use]
    pub const fn carries_deaths(self) -> bool {
        matches!(self, Self::Last)
    }

    /// Short name of the slot
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Last => "last",
            Self::Mid => "mid",
            Self::First => "first",
        }
    }
}

impl fmt::Display for ExposureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
