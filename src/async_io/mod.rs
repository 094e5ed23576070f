//! Async Parquet loading of sibling tables
//! Provides asynchronous reading of flat sibling tables using Arrow

pub mod loader;

pub use loader::{find_parquet_files_async, load_sibling_dir_async, read_sibling_rows_async};
