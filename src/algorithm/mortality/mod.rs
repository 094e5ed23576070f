//! Maternal mortality estimation with the sisterhood method
//!
//! Each interviewed woman reports on her sisters. Every sister contributes
//! exposure inside the seven years before interview, split over up to three
//! five-year age groups, and pregnancy-related deaths are counted in the age
//! group where they happened. Weighted deaths over weighted person-years give
//! the age-specific rates.

pub mod aggregate;
pub mod exposure;
pub mod pipeline;
pub mod rates;
pub mod synthetic;
pub mod window;

// Re-export commonly used items
pub use aggregate::{AgeGroupAggregates, GroupSums, SlotTable, aggregate_exposures, aggregate_slot};
pub use exposure::{DerivedExposure, ExclusionReason, RecordOutcome, screen_record};
pub use pipeline::{
    MortalityEstimate, RejectedRecord, ScreeningSummary, estimate_rates, estimate_rates_from_rows,
    screen_records,
};
pub use rates::{RateRow, RateTable, build_rate_table};
pub use synthetic::SyntheticSurvey;
pub use window::{
    AGE_GROUP_WIDTH_MONTHS, AgeGroup, ExposureSlot, REFERENCE_WINDOW_MONTHS,
    REPRODUCTIVE_AGE_GROUPS,
};
