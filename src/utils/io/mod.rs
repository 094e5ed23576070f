//! IO utilities for file operations
//!
//! This module provides utilities for reading flat sibling tables from
//! Parquet files.

pub mod parquet;

// Re-export commonly used functions for convenience
pub use self::parquet::{
    batch_to_rows, find_parquet_files, load_sibling_dir, read_sibling_rows, read_sibling_source,
    sibling_schema, validate_directory,
};
