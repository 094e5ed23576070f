//! Age-specific maternal mortality rates

use std::fmt;

use serde::Serialize;

use crate::algorithm::mortality::aggregate::AgeGroupAggregates;
use crate::algorithm::mortality::window::{AgeGroup, ExposureSlot};
use crate::error::{MmrError, Result};

/// Maternal mortality rate for one age group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRow {
    /// Age group the row describes
    #[serde(skip)]
    pub age_group: AgeGroup,
    /// Label such as `15-19`
    pub age_group_label: String,
    /// Weighted pregnancy-related deaths
    pub maternal_deaths: f64,
    /// Weighted person-years of exposure
    pub exposure_years: f64,
    /// Deaths per 1,000 person-years, unrounded
    pub rate: f64,
}

/// Rates for the seven age groups 15-19 through 45-49
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    /// One row per age group, youngest first
    pub rows: Vec<RateRow>,
}

impl RateTable {
    /// Row for the given age group
    #[must_use]
    pub fn row(&self, age_group: AgeGroup) -> Option<&RateRow> {
        self.rows.iter().find(|row| row.age_group == age_group)
    }

    /// Weighted maternal deaths over all ages 15-49
    #[must_use]
    pub fn total_deaths(&self) -> f64 {
        self.rows.iter().map(|row| row.maternal_deaths).sum()
    }

    /// Weighted person-years over all ages 15-49
    #[must_use]
    pub fn total_exposure_years(&self) -> f64 {
        self.rows.iter().map(|row| row.exposure_years).sum()
    }

    /// Crude rate for ages 15-49 per 1,000 person-years
    ///
    /// Not age-standardised; it reflects the age structure of the sisters.
    #[must_use]
    pub fn crude_rate(&self) -> f64 {
        1000.0 * self.total_deaths() / self.total_exposure_years()
    }
}

impl fmt::Display for RateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<9} {:>10} {:>12} {:>8}", "Age", "Deaths", "Exposure", "MMRate")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<9} {:>10.2} {:>12.1} {:>8.1}",
                row.age_group_label, row.maternal_deaths, row.exposure_years, row.rate
            )?;
        }
        write!(
            f,
            "{:<9} {:>10.2} {:>12.1} {:>8.1}",
            "15-49",
            self.total_deaths(),
            self.total_exposure_years(),
            self.crude_rate()
        )
    }
}

/// Merge the per-slot tables into one rate per age group
///
/// Every reported age group must be present in all three tables, and must
/// have accumulated some exposure. Either failure means the table cannot be
/// trusted, so nothing is returned.
pub fn build_rate_table(aggregates: &AgeGroupAggregates) -> Result<RateTable> {
    let rows = AgeGroup::reproductive()
        .map(|age_group| {
            let mut maternal_deaths = 0.0;
            let mut exposure_years = 0.0;
            for slot in ExposureSlot::ALL {
                let sums = aggregates
                    .table(slot)
                    .get(age_group)
                    .ok_or(MmrError::MissingAgeGroup { age_group, slot })?;
                exposure_years += sums.person_years;
                if slot.carries_deaths() {
                    maternal_deaths = sums.weighted_deaths;
                }
            }

            if exposure_years == 0.0 {
                return Err(MmrError::DivisionByZero { age_group });
            }

            Ok(RateRow {
                age_group,
                age_group_label: age_group.label(),
                maternal_deaths,
                exposure_years,
                rate: 1000.0 * maternal_deaths / exposure_years,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RateTable { rows })
}
