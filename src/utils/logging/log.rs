//! Logging utilities
//!
//! This module provides standardized logging functions for operations.

use std::path::Path;

use itertools::Itertools;

use crate::algorithm::mortality::pipeline::RejectedRecord;

/// Number of individual rejections echoed at debug level
const MAX_LOGGED_REJECTIONS: usize = 20;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file or directory being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file or directory that was operated on
/// * `items` - Number of items processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<std::time::Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!(
            "Successfully {} {} rows from {} in {:?}",
            operation,
            items,
            path.display(),
            duration
        );
    } else {
        log::info!(
            "Successfully {} {} rows from {}",
            operation,
            items,
            path.display()
        );
    }
}

/// Log an operation warning with consistent format
///
/// # Arguments
/// * `message` - Warning message
/// * `path` - Optional path related to the warning
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}

/// Summarise rejected sibling records, one warning per distinct reason
pub fn log_rejections(rejected: &[RejectedRecord]) {
    if rejected.is_empty() {
        return;
    }

    let counts = rejected
        .iter()
        .map(|r| r.reason.to_string())
        .counts()
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (reason, count) in counts {
        log::warn!("Rejected {count} sibling record(s): {reason}");
    }

    for record in rejected.iter().take(MAX_LOGGED_REJECTIONS) {
        log::debug!("Rejected record for case '{}': {}", record.case_id, record.reason);
    }
}
