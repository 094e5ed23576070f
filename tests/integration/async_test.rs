use sisterhood_mmr::config::DHS_WEIGHT_SCALE;
use sisterhood_mmr::models::RawSiblingRow;
use sisterhood_mmr::{
    RateConfig, SiblingReaderConfig, estimate_rates_from_rows, load_sibling_dir,
    load_sibling_dir_async, read_sibling_rows_async,
};

use crate::utils::{maternal_death, scratch_dir, survivors_in_groups, write_sibling_parquet};

/// Async reading returns the same rows as the synchronous reader
#[tokio::test]
async fn test_async_read_matches_sync() -> sisterhood_mmr::Result<()> {
    let dir = scratch_dir("async");
    let mut records = survivors_in_groups(3..=9);
    records.push(maternal_death());
    let rows: Vec<RawSiblingRow> = records
        .iter()
        .map(|record| RawSiblingRow::encode(record, DHS_WEIGHT_SCALE))
        .collect();
    write_sibling_parquet(&dir.join("part-0.parquet"), &rows[..4])?;
    write_sibling_parquet(&dir.join("part-1.parquet"), &rows[4..])?;

    let config = SiblingReaderConfig::default();
    let single = read_sibling_rows_async(&dir.join("part-0.parquet"), &config).await?;
    assert_eq!(single, rows[..4]);

    let from_async = load_sibling_dir_async(&dir, &config).await?;
    let from_sync = load_sibling_dir(&dir, &config)?;
    assert_eq!(from_async, from_sync);
    assert_eq!(from_async, rows);

    let estimate =
        estimate_rates_from_rows(&from_async, DHS_WEIGHT_SCALE, &RateConfig::sequential())?;
    assert_eq!(estimate.rates.rows.len(), 7);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
