use sisterhood_mmr::config::DHS_WEIGHT_SCALE;
use sisterhood_mmr::models::RawSiblingRow;
use sisterhood_mmr::{
    MmrError, RateConfig, SiblingReaderConfig, estimate_rates, estimate_rates_from_rows,
    load_sibling_dir, read_sibling_rows, read_sibling_source,
};

use crate::utils::{maternal_death, scratch_dir, survivors_in_groups, write_sibling_parquet};

fn encoded_fixture() -> Vec<RawSiblingRow> {
    let mut records = survivors_in_groups(3..=9);
    records.push(maternal_death());
    records
        .iter()
        .map(|record| RawSiblingRow::encode(record, DHS_WEIGHT_SCALE))
        .collect()
}

#[test]
fn test_parquet_round_trip() -> sisterhood_mmr::Result<()> {
    let dir = scratch_dir("round-trip");
    let path = dir.join("siblings.parquet");
    let rows = encoded_fixture();
    write_sibling_parquet(&path, &rows)?;

    let read = read_sibling_rows(&path, &SiblingReaderConfig::default())?;
    assert_eq!(read, rows);

    let from_file = estimate_rates_from_rows(&read, DHS_WEIGHT_SCALE, &RateConfig::sequential())?;
    let decoded: Vec<_> = rows
        .iter()
        .map(|row| row.decode(DHS_WEIGHT_SCALE))
        .collect::<Result<_, _>>()
        .map_err(|reason| MmrError::InvalidRecord {
            case_id: String::new(),
            reason,
        })?;
    let in_memory = estimate_rates(&decoded, &RateConfig::sequential())?;
    assert_eq!(from_file.rates, in_memory.rates);
    assert!(from_file.screening.rejected.is_empty());

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_directory_of_files_keeps_path_order() -> sisterhood_mmr::Result<()> {
    let dir = scratch_dir("directory");
    let rows = encoded_fixture();
    let (head, tail) = rows.split_at(3);
    write_sibling_parquet(&dir.join("b.parquet"), tail)?;
    write_sibling_parquet(&dir.join("a.parquet"), head)?;
    std::fs::write(dir.join("notes.txt"), "not a parquet file")?;

    let read = load_sibling_dir(&dir, &SiblingReaderConfig::default())?;
    assert_eq!(read, rows);
    let via_source = read_sibling_source(&dir, &SiblingReaderConfig::default())?;
    assert_eq!(via_source, rows);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_undecodable_rows_are_rejected_not_fatal() -> sisterhood_mmr::Result<()> {
    let mut rows = encoded_fixture();
    rows.push(RawSiblingRow {
        case_id: "  bad ".to_string(),
        sex: Some(7),
        ..rows[0].clone()
    });
    rows.push(RawSiblingRow {
        case_id: "no-birth".to_string(),
        birth_month: None,
        ..rows[0].clone()
    });

    let estimate = estimate_rates_from_rows(&rows, DHS_WEIGHT_SCALE, &RateConfig::sequential())?;
    let screening = &estimate.screening;
    assert_eq!(screening.total_records, rows.len());
    assert_eq!(screening.exposed, 8);
    let rejected: Vec<&str> = screening
        .rejected
        .iter()
        .map(|r| r.case_id.as_str())
        .collect();
    assert_eq!(rejected, vec!["bad", "no-birth"]);
    assert!(matches!(
        screening.ensure_no_rejections(),
        Err(MmrError::InvalidRecord { .. })
    ));
    Ok(())
}

#[test]
fn test_missing_column_fails_validation() -> sisterhood_mmr::Result<()> {
    use std::sync::Arc;

    use arrow::array::{Int32Array, StringArray};
    use arrow::record_batch::RecordBatch;
    use arrow_schema::{DataType, Field, Schema};
    use parquet::arrow::ArrowWriter;

    let dir = scratch_dir("missing-column");
    let path = dir.join("partial.parquet");
    let schema = Arc::new(Schema::new(vec![
        Field::new("caseid", DataType::Utf8, false),
        Field::new("v008", DataType::Int32, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["1"])),
            Arc::new(Int32Array::from(vec![1300])),
        ],
    )?;
    let mut writer = ArrowWriter::try_new(std::fs::File::create(&path)?, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    assert!(matches!(
        read_sibling_rows(&path, &SiblingReaderConfig::default()),
        Err(MmrError::Schema(_))
    ));

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
