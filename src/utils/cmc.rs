//! Century month codes
//!
//! DHS encodes calendar months as `(year - 1900) * 12 + month`, so January
//! 1900 is 1. These helpers convert between that index and `chrono` dates.

use chrono::{Datelike, NaiveDate};

/// Century month code for a calendar year and month (1-12)
#[must_use]
pub const fn cmc_from_ymd(year: i32, month: u32) -> i32 {
    (year - 1900) * 12 + month as i32
}

/// Century month code of the month containing `date`
#[must_use]
pub fn cmc_from_date(date: &NaiveDate) -> i32 {
    cmc_from_ymd(date.year(), date.month())
}

/// First day of the month encoded by `cmc`
#[must_use]
pub fn cmc_to_date(cmc: i32) -> Option<NaiveDate> {
    let zero_based = cmc - 1;
    let year = 1900 + zero_based.div_euclid(12);
    let month = u32::try_from(zero_based.rem_euclid(12) + 1).ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Format a century month code as `YYYY-MM`
#[must_use]
pub fn format_cmc(cmc: i32) -> String {
    cmc_to_date(cmc).map_or_else(|| format!("cmc {cmc}"), |date| date.format("%Y-%m").to_string())
}
