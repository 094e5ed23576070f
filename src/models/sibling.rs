//! Sibling-history records
//!
//! A [`RawSiblingRow`] is one row of the flat, one-row-per-sibling table
//! handed over by the survey loader, still in DHS recode vocabulary. Decoding
//! turns it into a [`SiblingRecord`], the only shape the estimation core
//! accepts.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::models::types::{MaternalDeathCause, Sex, SurvivalStatus};

/// One sibling reported by an interviewed woman
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiblingRecord {
    /// Identifier of the interviewed woman
    pub case_id: String,
    /// Fractional sampling weight
    pub weight: f64,
    /// Century month code of the interview
    pub interview_month: i32,
    /// Sex of the sibling
    pub sex: Sex,
    /// Whether the sibling was alive at interview
    pub survival_status: SurvivalStatus,
    /// Century month code of birth
    pub birth_month: Option<i32>,
    /// Century month code of death, for dead siblings
    pub death_month: Option<i32>,
    /// Pregnancy timing of the death, for dead sisters
    pub maternal_death_cause: Option<MaternalDeathCause>,
}

impl SiblingRecord {
    /// A surviving sister
    #[must_use]
    pub fn alive_sister(
        case_id: impl Into<String>,
        weight: f64,
        interview_month: i32,
        birth_month: i32,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            weight,
            interview_month,
            sex: Sex::Female,
            survival_status: SurvivalStatus::Alive,
            birth_month: Some(birth_month),
            death_month: None,
            maternal_death_cause: None,
        }
    }

    /// A sister who died in `death_month` with the given pregnancy timing
    #[must_use]
    pub fn dead_sister(
        case_id: impl Into<String>,
        weight: f64,
        interview_month: i32,
        birth_month: i32,
        death_month: i32,
        cause: MaternalDeathCause,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            weight,
            interview_month,
            sex: Sex::Female,
            survival_status: SurvivalStatus::Dead,
            birth_month: Some(birth_month),
            death_month: Some(death_month),
            maternal_death_cause: Some(cause),
        }
    }

    /// Whether the death is pregnancy-related
    ///
    /// Survivors and deaths with a missing or non-maternal cause are not.
    #[must_use]
    pub fn is_maternal_death(&self) -> bool {
        self.survival_status == SurvivalStatus::Dead
            && self
                .maternal_death_cause
                .is_some_and(MaternalDeathCause::is_pregnancy_related)
    }
}

/// Flat sibling row in DHS recode column names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSiblingRow {
    /// Case identification
    #[serde(rename = "caseid")]
    pub case_id: String,
    /// Raw sample weight
    #[serde(rename = "v005")]
    pub weight: f64,
    /// Date of interview (CMC)
    #[serde(rename = "v008")]
    pub interview_month: i32,
    /// Sex of sibling
    #[serde(rename = "mm1")]
    pub sex: Option<i32>,
    /// Survival status of sibling
    #[serde(rename = "mm2")]
    pub survival: Option<i32>,
    /// Date of birth of sibling (CMC)
    #[serde(rename = "mm4")]
    pub birth_month: Option<i32>,
    /// Date of death of sibling (CMC)
    #[serde(rename = "mm8")]
    pub death_month: Option<i32>,
    /// Death and pregnancy status
    #[serde(rename = "mm9")]
    pub death_cause: Option<i32>,
}

/// Column names of the flat sibling table, in schema order
pub const SIBLING_COLUMNS: [&str; 8] = ["caseid", "v005", "v008", "mm1", "mm2", "mm4", "mm8", "mm9"];

impl RawSiblingRow {
    /// Encode a decoded record back into survey codes
    ///
    /// The weight is multiplied by `weight_scale`, so encoding and then
    /// decoding with the same scale returns the original record.
    #[must_use]
    pub fn encode(record: &SiblingRecord, weight_scale: f64) -> Self {
        Self {
            case_id: record.case_id.clone(),
            weight: record.weight * weight_scale,
            interview_month: record.interview_month,
            sex: Some(record.sex.code()),
            survival: Some(record.survival_status.code()),
            birth_month: record.birth_month,
            death_month: record.death_month,
            death_cause: record.maternal_death_cause.map(MaternalDeathCause::code),
        }
    }

    /// Decode the categorical codes and rescale the weight
    ///
    /// The cause code is only decoded for dead siblings; on everyone else it
    /// is meaningless and dropped.
    pub fn decode(&self, weight_scale: f64) -> Result<SiblingRecord, RecordError> {
        let sex = Sex::try_from(self.sex.ok_or(RecordError::MissingField("sex"))?)?;
        let survival_status = SurvivalStatus::try_from(
            self.survival
                .ok_or(RecordError::MissingField("survival status"))?,
        )?;
        let maternal_death_cause = match (survival_status, self.death_cause) {
            (SurvivalStatus::Dead, Some(code)) => Some(MaternalDeathCause::try_from(code)?),
            _ => None,
        };

        Ok(SiblingRecord {
            case_id: self.case_id.trim().to_string(),
            weight: self.weight / weight_scale,
            interview_month: self.interview_month,
            sex,
            survival_status,
            birth_month: self.birth_month,
            death_month: self.death_month,
            maternal_death_cause,
        })
    }
}
