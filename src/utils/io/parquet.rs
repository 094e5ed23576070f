//! Parquet input for flat sibling tables
//!
//! The survey loader hands over one row per sibling with DHS recode column
//! names. Files are projected to those columns, each column is cast to the
//! type [`RawSiblingRow`] expects, and the batches are deserialized with
//! `serde_arrow`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, new_null_array};
use arrow::compute::cast;
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use itertools::Itertools;
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::schema::types::SchemaDescriptor;
use rayon::prelude::*;

use crate::config::SiblingReaderConfig;
use crate::error::{MmrError, Result};
use crate::models::{RawSiblingRow, SIBLING_COLUMNS};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Arrow schema of the flat sibling table after conforming
#[must_use]
pub fn sibling_schema() -> SchemaRef {
    let fields = SIBLING_COLUMNS
        .iter()
        .map(|&name| {
            let data_type = match name {
                "caseid" => DataType::Utf8,
                "v005" => DataType::Float64,
                _ => DataType::Int32,
            };
            Field::new(name, data_type, true)
        })
        .collect_vec();
    Arc::new(Schema::new(fields))
}

/// Validates that a directory exists and is a directory
pub fn validate_directory(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(MmrError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory does not exist: {}", dir.display()),
        )));
    }
    Ok(())
}

/// Projection onto the sibling columns present in the file
///
/// Missing columns are an error when `validate` is set; otherwise they are
/// skipped here and filled with nulls by [`conform_batch`].
pub fn create_projection(
    file_schema: &Schema,
    parquet_schema: &SchemaDescriptor,
    validate: bool,
) -> Result<ProjectionMask> {
    let mut indices = Vec::with_capacity(SIBLING_COLUMNS.len());
    for name in SIBLING_COLUMNS {
        match file_schema.index_of(name) {
            Ok(idx) => indices.push(idx),
            Err(_) if validate => {
                return Err(MmrError::Schema(format!(
                    "column '{name}' not found in sibling table"
                )));
            }
            Err(_) => log_warning(&format!("Column {name} not found, reading as null"), None),
        }
    }
    Ok(ProjectionMask::roots(parquet_schema, indices))
}

/// Cast or null-fill every column to match [`sibling_schema`]
pub fn conform_batch(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = sibling_schema();
    let columns = schema
        .fields()
        .iter()
        .map(|field| -> Result<ArrayRef> {
            match batch.column_by_name(field.name()) {
                Some(column) if column.data_type() == field.data_type() => Ok(Arc::clone(column)),
                Some(column) => Ok(cast(column, field.data_type())?),
                None => Ok(new_null_array(field.data_type(), batch.num_rows())),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Deserialize a conformed batch into sibling rows
pub fn batch_to_rows(batch: &RecordBatch) -> Result<Vec<RawSiblingRow>> {
    let conformed = conform_batch(batch)?;
    Ok(serde_arrow::from_record_batch(&conformed)?)
}

/// Read one Parquet file of sibling rows
pub fn read_sibling_rows(path: &Path, config: &SiblingReaderConfig) -> Result<Vec<RawSiblingRow>> {
    let start = std::time::Instant::now();
    log_operation_start("Reading sibling table", path);

    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let projection = create_projection(builder.schema(), builder.parquet_schema(), config.validate_schema)?;
    let reader = builder
        .with_projection(projection)
        .with_batch_size(config.batch_size)
        .build()?;

    let mut rows = Vec::new();
    for batch in reader {
        rows.extend(batch_to_rows(&batch?)?);
    }

    log_operation_complete("read", path, rows.len(), Some(start.elapsed()));
    Ok(rows)
}

/// Find all Parquet files in a directory, sorted by path
pub fn find_parquet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    validate_directory(dir)?;

    let files = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .filter_ok(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "parquet"))
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .sorted()
        .collect_vec();

    if files.is_empty() {
        log_warning("No Parquet files found in directory", Some(dir));
    }
    Ok(files)
}

/// Read every Parquet file in a directory in parallel
///
/// Rows are returned in file-path order, so the result does not depend on
/// which file finishes first.
pub fn load_sibling_dir(dir: &Path, config: &SiblingReaderConfig) -> Result<Vec<RawSiblingRow>> {
    let files = find_parquet_files(dir)?;

    let per_file = files
        .par_iter()
        .map(|path| read_sibling_rows(path, config))
        .collect::<Result<Vec<_>>>()?;

    let rows = per_file.into_iter().flatten().collect_vec();
    log::info!(
        "Loaded {} sibling rows from {} Parquet files",
        rows.len(),
        files.len()
    );
    Ok(rows)
}

/// Read a single file or a directory of files
pub fn read_sibling_source(path: &Path, config: &SiblingReaderConfig) -> Result<Vec<RawSiblingRow>> {
    if path.is_dir() {
        load_sibling_dir(path, config)
    } else {
        read_sibling_rows(path, config)
    }
}
