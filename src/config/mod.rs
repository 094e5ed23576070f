//! Configuration for rate estimation and sibling-table reading.

use std::fmt;

/// Default number of sibling records per partition during aggregation
pub const DEFAULT_PARTITION_SIZE: usize = 4096;

/// Default batch size for Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// DHS stores sample weights (v005) as integers with six implied decimals
pub const DHS_WEIGHT_SCALE: f64 = 1_000_000.0;

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var("MMR_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
}

/// Execution options for the estimation pipeline
///
/// These never change the estimate itself. Records are always reduced in
/// partitions of `partition_size` and merged in partition order, so a
/// parallel run is bit-identical to a sequential one.
#[derive(Debug, Clone)]
pub struct RateConfig {
    /// Reduce partitions on a rayon pool instead of the calling thread
    pub parallel: bool,
    /// Number of records per partition
    pub partition_size: usize,
    /// Worker threads for the parallel pool
    pub num_threads: usize,
    /// Show a progress bar while screening records
    pub show_progress: bool,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            partition_size: DEFAULT_PARTITION_SIZE,
            num_threads: num_cpus::get(),
            show_progress: false,
        }
    }
}

impl RateConfig {
    /// Create a new builder for constructing a rate configuration
    #[must_use]
    pub fn builder() -> RateConfigBuilder {
        RateConfigBuilder::new()
    }

    /// Configuration that keeps all work on the calling thread
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}

impl fmt::Display for RateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rate Configuration:")?;
        writeln!(f, "  Parallel: {}", self.parallel)?;
        writeln!(f, "  Partition Size: {}", self.partition_size)?;
        writeln!(f, "  Threads: {}", self.num_threads)?;
        writeln!(f, "  Show Progress: {}", self.show_progress)
    }
}

/// Builder for [`RateConfig`]
#[derive(Debug, Clone, Default)]
pub struct RateConfigBuilder {
    config: RateConfig,
}

impl RateConfigBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the parallel reduction
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set the partition size, clamped to at least one record
    #[must_use]
    pub fn partition_size(mut self, size: usize) -> Self {
        self.config.partition_size = size.max(1);
        self
    }

    /// Set the number of worker threads, clamped to at least one
    #[must_use]
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads.max(1);
        self
    }

    /// Enable or disable the progress bar
    #[must_use]
    pub const fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> RateConfig {
        self.config
    }
}

/// Configuration for reading flat sibling tables from Parquet
#[derive(Debug, Clone)]
pub struct SiblingReaderConfig {
    /// Rows per record batch
    pub batch_size: usize,
    /// Divisor applied to the raw weight column
    pub weight_scale: f64,
    /// Fail when an expected column is absent instead of reading it as null
    pub validate_schema: bool,
}

impl Default for SiblingReaderConfig {
    fn default() -> Self {
        Self {
            batch_size: get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE),
            weight_scale: DHS_WEIGHT_SCALE,
            validate_schema: true,
        }
    }
}

impl SiblingReaderConfig {
    /// Reader for tables whose weights are already fractional
    #[must_use]
    pub fn prescaled() -> Self {
        Self {
            weight_scale: 1.0,
            ..Self::default()
        }
    }
}
