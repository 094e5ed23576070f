//! Error handling for maternal mortality estimation.
//!
//! Two layers of failure are kept apart here. [`RecordError`] describes why a
//! single sibling record cannot be used; those are collected and reported
//! alongside the estimate. [`MmrError`] is fatal to a run: the rate table
//! cannot be trusted, or the input could not be read at all.

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

use crate::algorithm::mortality::window::{AgeGroup, ExposureSlot};

/// Reasons a single sibling record is rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// The sibling's birth month (mm4) is missing
    #[error("missing birth month")]
    MissingBirthMonth,

    /// The sibling is reported dead but has no death month (mm8)
    #[error("sibling reported dead without a death month")]
    MissingDeathMonth,

    /// The sampling weight is zero, negative or not a number
    #[error("sampling weight must be a positive finite number, got {0}")]
    InvalidWeight(f64),

    /// A categorical field holds a code or label outside its closed set
    #[error("unrecognised {field} value '{value}'")]
    UnknownCategory {
        /// Field being decoded
        field: &'static str,
        /// Offending raw value
        value: String,
    },

    /// A required categorical field is null
    #[error("missing {0}")]
    MissingField(&'static str),

    /// The reported death month precedes the birth month
    #[error("death month {death_month} precedes birth month {birth_month}")]
    DeathBeforeBirth {
        /// Reported birth month (CMC)
        birth_month: i32,
        /// Reported death month (CMC)
        death_month: i32,
    },
}

/// Errors that abort an estimation run
#[derive(Debug, thiserror::Error)]
pub enum MmrError {
    /// A record failed validation where no rejection list is available
    #[error("invalid sibling record for case '{case_id}': {reason}")]
    InvalidRecord {
        /// Interviewed woman the record belongs to
        case_id: String,
        /// Why the record was rejected
        reason: RecordError,
    },

    /// An expected age group is absent from one of the per-slot tables
    #[error("age group {age_group} missing from the {slot} exposure table")]
    MissingAgeGroup {
        /// The absent age group
        age_group: AgeGroup,
        /// Table the group is missing from
        slot: ExposureSlot,
    },

    /// An age group accumulated no person-years of exposure
    #[error("age group {age_group} has zero person-years of exposure")]
    DivisionByZero {
        /// Age group with no exposure
        age_group: AgeGroup,
    },

    /// No sibling records were supplied
    #[error("no sibling records to estimate from")]
    EmptyInput,

    /// Rows were supplied but none of them could be decoded
    #[error("none of the {rejected} sibling rows could be decoded (first: {first_reason})")]
    NoDecodableRows {
        /// Number of rows that failed to decode
        rejected: usize,
        /// Reason the first row failed
        first_reason: RecordError,
    },

    /// Input schema does not carry the expected columns
    #[error("schema error: {0}")]
    Schema(String),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error converting Arrow batches into sibling rows
    #[error("deserialization error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    /// The worker pool could not be created
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for estimation operations
pub type Result<T> = std::result::Result<T, MmrError>;
