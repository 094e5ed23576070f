//! Exposure allocation for a single sibling
//!
//! Each sister contributes the months she lived inside the 84-month window
//! that ends the month before interview. Those months can straddle up to
//! three five-year age groups. They are allocated backwards from the end of
//! her exposure: the current (last) group is filled first, then the previous
//! group up to its full width, and whatever remains goes to the group before.

use serde::Serialize;

use crate::algorithm::mortality::window::{
    AGE_GROUP_WIDTH_MONTHS, AgeGroup, ExposureSlot, REFERENCE_WINDOW_MONTHS,
};
use crate::error::RecordError;
use crate::models::{Sex, SiblingRecord, SurvivalStatus};

/// Exposure of one sister inside her reference window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedExposure {
    /// Sampling weight carried over from the record
    pub weight: f64,
    /// Last month of exposure (CMC)
    pub upper_limit: i32,
    /// First month of exposure (CMC)
    pub lower_limit: i32,
    /// Months of exposure, always in 1..=84
    pub total_exposure_months: i32,
    /// Age group at the end of exposure
    pub last_age_group: AgeGroup,
    /// Age group before the last
    pub mid_age_group: AgeGroup,
    /// Age group two before the last
    pub first_age_group: AgeGroup,
    /// Months spent in the last group
    pub expo_last: i32,
    /// Months spent in the mid group
    pub expo_mid: i32,
    /// Months spent in the first group
    pub expo_first: i32,
    /// Whether exposure ended in a pregnancy-related death
    pub is_maternal_death: bool,
}

impl DerivedExposure {
    /// Age group for the given slot
    #[must_use]
    pub const fn age_group(&self, slot: ExposureSlot) -> AgeGroup {
        match slot {
            ExposureSlot::Last => self.last_age_group,
            ExposureSlot::Mid => self.mid_age_group,
            ExposureSlot::First => self.first_age_group,
        }
    }

    /// Months allocated to the given slot
    #[must_use]
    pub const fn months(&self, slot: ExposureSlot) -> i32 {
        match slot {
            ExposureSlot::Last => self.expo_last,
            ExposureSlot::Mid => self.expo_mid,
            ExposureSlot::First => self.expo_first,
        }
    }

    /// Weighted maternal deaths attributed to the given slot
    #[must_use]
    pub fn weighted_deaths(&self, slot: ExposureSlot) -> f64 {
        if slot.carries_deaths() && self.is_maternal_death {
            self.weight
        } else {
            0.0
        }
    }
}

/// Why an otherwise valid record contributes nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExclusionReason {
    /// Brothers are not at risk of maternal death
    Male,
    /// Survival status was not known to the respondent
    UnknownSurvival,
    /// No month of her life falls inside the reference window
    NoExposure,
}

/// Result of screening one sibling record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// The sister contributes exposure
    Exposed(DerivedExposure),
    /// The record is valid but filtered out
    Excluded(ExclusionReason),
}

/// Inclusive bounds of a sister's exposure inside her reference window
///
/// Returns `(lower, upper)`; the interval is empty when `upper < lower`.
#[must_use]
pub fn exposure_bounds(interview_month: i32, birth_month: i32, death_month: Option<i32>) -> (i32, i32) {
    let window_end = interview_month - 1;
    let upper = death_month.map_or(window_end, |death| death.min(window_end));
    let lower = (interview_month - REFERENCE_WINDOW_MONTHS).max(birth_month);
    (lower, upper)
}

/// Split `total` months across the last, mid and first age groups
///
/// `months_into_last` counts the months since she entered her last group,
/// inclusive of the upper limit.
#[must_use]
pub fn allocate_months(total: i32, months_into_last: i32) -> (i32, i32, i32) {
    let last = total.min(months_into_last);
    let mid = AGE_GROUP_WIDTH_MONTHS.min(total - last);
    let first = total - last - mid;
    (last, mid, first)
}

/// Screen one record and derive its exposure
///
/// Only sisters with a known survival status are processed. Records that
/// cannot be interpreted, including deaths dated before birth, are returned
/// as errors so the caller can collect them; a death month reported for a
/// surviving sister is ignored.
pub fn screen_record(record: &SiblingRecord) -> Result<RecordOutcome, RecordError> {
    if record.sex == Sex::Male {
        return Ok(RecordOutcome::Excluded(ExclusionReason::Male));
    }
    if record.survival_status == SurvivalStatus::Unknown {
        return Ok(RecordOutcome::Excluded(ExclusionReason::UnknownSurvival));
    }
    if !record.weight.is_finite() || record.weight <= 0.0 {
        return Err(RecordError::InvalidWeight(record.weight));
    }
    let birth_month = record.birth_month.ok_or(RecordError::MissingBirthMonth)?;
    let death_month = match record.survival_status {
        SurvivalStatus::Dead => Some(record.death_month.ok_or(RecordError::MissingDeathMonth)?),
        _ => None,
    };
    if let Some(death_month) = death_month.filter(|&death| death < birth_month) {
        return Err(RecordError::DeathBeforeBirth {
            birth_month,
            death_month,
        });
    }

    let (lower_limit, upper_limit) = exposure_bounds(record.interview_month, birth_month, death_month);
    let total_exposure_months = upper_limit - lower_limit + 1;
    if total_exposure_months <= 0 {
        return Ok(RecordOutcome::Excluded(ExclusionReason::NoExposure));
    }

    let last_age_group = AgeGroup::containing(upper_limit - birth_month);
    let months_into_last =
        upper_limit - (birth_month + last_age_group.index() * AGE_GROUP_WIDTH_MONTHS) + 1;
    let (expo_last, expo_mid, expo_first) = allocate_months(total_exposure_months, months_into_last);

    Ok(RecordOutcome::Exposed(DerivedExposure {
        weight: record.weight,
        upper_limit,
        lower_limit,
        total_exposure_months,
        last_age_group,
        mid_age_group: last_age_group.younger(1),
        first_age_group: last_age_group.younger(2),
        expo_last,
        expo_mid,
        expo_first,
        is_maternal_death: record.is_maternal_death(),
    }))
}
