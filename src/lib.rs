//! A Rust library for estimating age-specific maternal mortality rates from
//! household-survey sibling histories with the sisterhood method.

pub mod algorithm;
pub mod async_io;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{RateConfig, SiblingReaderConfig};
pub use error::{MmrError, RecordError, Result};
pub use models::{MaternalDeathCause, RawSiblingRow, Sex, SiblingRecord, SurvivalStatus};

// Estimation
pub use algorithm::mortality::{
    AgeGroup, DerivedExposure, ExposureSlot, MortalityEstimate, RateRow, RateTable,
    ScreeningSummary, SyntheticSurvey, estimate_rates, estimate_rates_from_rows, screen_record,
};

// Input
pub use async_io::{load_sibling_dir_async, read_sibling_rows_async};
pub use utils::io::{load_sibling_dir, read_sibling_rows, read_sibling_source};
