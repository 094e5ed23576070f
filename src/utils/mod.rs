//! Utility functions shared across the crate
//!
//! This module organizes helpers for century month codes, file input and
//! logging.

pub mod cmc;
pub mod io;
pub mod logging;

// Re-export commonly used items
pub use cmc::{cmc_from_date, cmc_from_ymd, cmc_to_date, format_cmc};
pub use logging::{log_operation_complete, log_operation_start, log_warning};
