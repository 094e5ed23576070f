//! End-to-end estimation
//!
//! `records -> exposures -> per-slot tables -> rate table`, each stage a pure
//! function of the previous one. Per-record problems are collected in a
//! [`ScreeningSummary`]; only failures of the rate table itself abort.

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::algorithm::mortality::aggregate::{AgeGroupAggregates, aggregate_exposures};
use crate::algorithm::mortality::exposure::{
    DerivedExposure, ExclusionReason, RecordOutcome, screen_record,
};
use crate::algorithm::mortality::rates::{RateTable, build_rate_table};
use crate::config::RateConfig;
use crate::error::{MmrError, RecordError, Result};
use crate::models::{RawSiblingRow, SiblingRecord};
use crate::utils::cmc::format_cmc;
use crate::utils::logging::{create_record_progress_bar, finish_progress_bar, log_rejections};

/// A record that could not be used, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    /// Interviewed woman the record belongs to
    pub case_id: String,
    /// Why it was rejected
    #[serde(serialize_with = "serialize_display")]
    pub reason: RecordError,
}

fn serialize_display<S: serde::Serializer>(
    reason: &RecordError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

impl From<RejectedRecord> for MmrError {
    fn from(record: RejectedRecord) -> Self {
        Self::InvalidRecord {
            case_id: record.case_id,
            reason: record.reason,
        }
    }
}

/// What happened to every input record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScreeningSummary {
    /// Records seen, including rejected ones
    pub total_records: usize,
    /// Sisters contributing exposure
    pub exposed: usize,
    /// Brothers filtered out
    pub excluded_male: usize,
    /// Siblings of unknown survival filtered out
    pub excluded_unknown_survival: usize,
    /// Sisters with no month inside the reference window
    pub excluded_no_exposure: usize,
    /// Records that failed validation or decoding
    pub rejected: Vec<RejectedRecord>,
    /// Earliest and latest exposed month (CMC)
    pub exposure_period: Option<(i32, i32)>,
}

impl ScreeningSummary {
    fn record(&mut self, case_id: &str, outcome: &std::result::Result<RecordOutcome, RecordError>) {
        self.total_records += 1;
        match outcome {
            Ok(RecordOutcome::Exposed(exposure)) => {
                self.exposed += 1;
                self.exposure_period = Some(match self.exposure_period {
                    Some((start, end)) => (
                        start.min(exposure.lower_limit),
                        end.max(exposure.upper_limit),
                    ),
                    None => (exposure.lower_limit, exposure.upper_limit),
                });
            }
            Ok(RecordOutcome::Excluded(ExclusionReason::Male)) => self.excluded_male += 1,
            Ok(RecordOutcome::Excluded(ExclusionReason::UnknownSurvival)) => {
                self.excluded_unknown_survival += 1;
            }
            Ok(RecordOutcome::Excluded(ExclusionReason::NoExposure)) => {
                self.excluded_no_exposure += 1;
            }
            Err(reason) => self.rejected.push(RejectedRecord {
                case_id: case_id.to_string(),
                reason: reason.clone(),
            }),
        }
    }

    /// Records filtered out without being invalid
    #[must_use]
    pub const fn excluded(&self) -> usize {
        self.excluded_male + self.excluded_unknown_survival + self.excluded_no_exposure
    }

    /// Fail with the first rejected record, if any
    pub fn ensure_no_rejections(&self) -> Result<()> {
        match self.rejected.first() {
            Some(record) => Err(record.clone().into()),
            None => Ok(()),
        }
    }

    /// Exposure period as `YYYY-MM to YYYY-MM`
    #[must_use]
    pub fn exposure_period_label(&self) -> Option<String> {
        self.exposure_period
            .map(|(start, end)| format!("{} to {}", format_cmc(start), format_cmc(end)))
    }
}

/// Rate table together with the screening account it was computed from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MortalityEstimate {
    /// Age-specific rates
    pub rates: RateTable,
    /// Record-level accounting
    pub screening: ScreeningSummary,
}

/// Screen every record, keeping input order
pub fn screen_records(
    records: &[SiblingRecord],
    config: &RateConfig,
) -> (Vec<DerivedExposure>, ScreeningSummary) {
    let pb = create_record_progress_bar(
        records.len() as u64,
        Some("Screening sibling records"),
        config.show_progress,
    );

    let outcomes: Vec<_> = if config.parallel {
        records
            .par_iter()
            .map(|record| {
                pb.inc(1);
                screen_record(record)
            })
            .collect()
    } else {
        records
            .iter()
            .map(|record| {
                pb.inc(1);
                screen_record(record)
            })
            .collect()
    };
    finish_progress_bar(&pb, Some("Screening complete"));

    let mut summary = ScreeningSummary::default();
    let mut exposures = Vec::with_capacity(outcomes.len());
    for (record, outcome) in records.iter().zip(&outcomes) {
        summary.record(&record.case_id, outcome);
        if let Ok(RecordOutcome::Exposed(exposure)) = outcome {
            exposures.push(*exposure);
        }
    }

    (exposures, summary)
}

fn screen_and_aggregate(
    records: &[SiblingRecord],
    config: &RateConfig,
) -> (ScreeningSummary, AgeGroupAggregates) {
    let (exposures, screening) = screen_records(records, config);
    debug!(
        "Screened {} records: {} exposed, {} excluded, {} rejected",
        screening.total_records,
        screening.exposed,
        screening.excluded(),
        screening.rejected.len()
    );
    let aggregates = aggregate_exposures(&exposures, config);
    (screening, aggregates)
}

/// Estimate age-specific maternal mortality rates from decoded records
pub fn estimate_rates(records: &[SiblingRecord], config: &RateConfig) -> Result<MortalityEstimate> {
    if records.is_empty() {
        return Err(MmrError::EmptyInput);
    }
    let start = Instant::now();

    let (screening, aggregates) = if config.parallel {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build()?;
        pool.install(|| screen_and_aggregate(records, config))
    } else {
        screen_and_aggregate(records, config)
    };
    log_rejections(&screening.rejected);

    let rates = build_rate_table(&aggregates)?;
    info!(
        "Estimated rates from {} exposed sisters ({} records) in {:?}",
        screening.exposed,
        screening.total_records,
        start.elapsed()
    );

    Ok(MortalityEstimate { rates, screening })
}

/// Decode flat sibling rows and estimate rates from them
///
/// Rows that fail to decode are reported as rejected records next to the
/// ones that fail validation.
pub fn estimate_rates_from_rows(
    rows: &[RawSiblingRow],
    weight_scale: f64,
    config: &RateConfig,
) -> Result<MortalityEstimate> {
    let mut undecodable = Vec::new();
    let records: Vec<SiblingRecord> = rows
        .iter()
        .filter_map(|row| match row.decode(weight_scale) {
            Ok(record) => Some(record),
            Err(reason) => {
                undecodable.push(RejectedRecord {
                    case_id: row.case_id.trim().to_string(),
                    reason,
                });
                None
            }
        })
        .collect();

    log_rejections(&undecodable);
    if records.is_empty() {
        return Err(match undecodable.first() {
            Some(first) => MmrError::NoDecodableRows {
                rejected: undecodable.len(),
                first_reason: first.reason.clone(),
            },
            None => MmrError::EmptyInput,
        });
    }

    let mut estimate = estimate_rates(&records, config)?;
    estimate.screening.total_records += undecodable.len();
    undecodable.append(&mut estimate.screening.rejected);
    estimate.screening.rejected = undecodable;
    Ok(estimate)
}
