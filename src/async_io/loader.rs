//! Asynchronous sibling-table loader
//!
//! Mirrors the synchronous reader in `utils::io::parquet`, driving parquet's
//! async stream reader on a tokio file handle.

use std::path::{Path, PathBuf};

use futures::TryStreamExt;
use futures::future::try_join_all;
use parquet::arrow::async_reader::ParquetRecordBatchStreamBuilder;
use tokio::fs::{self, File};

use crate::config::SiblingReaderConfig;
use crate::error::Result;
use crate::models::RawSiblingRow;
use crate::utils::io::parquet::{batch_to_rows, create_projection, validate_directory};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Read one Parquet file of sibling rows asynchronously
pub async fn read_sibling_rows_async(
    path: &Path,
    config: &SiblingReaderConfig,
) -> Result<Vec<RawSiblingRow>> {
    let start = std::time::Instant::now();
    log_operation_start("Reading sibling table asynchronously", path);

    let file = File::open(path).await?;
    let builder = ParquetRecordBatchStreamBuilder::new(file).await?;
    let projection = create_projection(builder.schema(), builder.parquet_schema(), config.validate_schema)?;
    let stream = builder
        .with_projection(projection)
        .with_batch_size(config.batch_size)
        .build()?;

    let batches = stream.try_collect::<Vec<_>>().await?;
    let mut rows = Vec::new();
    for batch in &batches {
        rows.extend(batch_to_rows(batch)?);
    }

    log_operation_complete("read", path, rows.len(), Some(start.elapsed()));
    Ok(rows)
}

/// Find all Parquet files in a directory asynchronously, sorted by path
pub async fn find_parquet_files_async(dir: &Path) -> Result<Vec<PathBuf>> {
    validate_directory(dir)?;

    let mut files = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if fs::metadata(&path).await?.is_file() && path.extension().is_some_and(|ext| ext == "parquet") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        log_warning("No Parquet files found in directory", Some(dir));
    }
    Ok(files)
}

/// Read every Parquet file in a directory concurrently
///
/// Rows are concatenated in file-path order.
pub async fn load_sibling_dir_async(
    dir: &Path,
    config: &SiblingReaderConfig,
) -> Result<Vec<RawSiblingRow>> {
    let files = find_parquet_files_async(dir).await?;
    let per_file = try_join_all(files.iter().map(|path| read_sibling_rows_async(path, config))).await?;

    let rows: Vec<RawSiblingRow> = per_file.into_iter().flatten().collect();
    log::info!(
        "Loaded {} sibling rows from {} Parquet files",
        rows.len(),
        files.len()
    );
    Ok(rows)
}
