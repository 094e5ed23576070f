use std::fs::File;
use std::path::{Path, PathBuf};

use parquet::arrow::ArrowWriter;
use sisterhood_mmr::algorithm::mortality::{DerivedExposure, RecordOutcome, screen_record};
use sisterhood_mmr::utils::io::sibling_schema;
use sisterhood_mmr::{MaternalDeathCause, RawSiblingRow, Result, SiblingRecord};

/// Interview month shared by the hand-built fixtures
pub const INTERVIEW: i32 = 1300;

/// Fresh scratch directory under the system temp dir
#[must_use]
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sisterhood-mmr-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("Failed to create scratch directory");
    dir
}

/// Write sibling rows to a Parquet file with the flat sibling schema
pub fn write_sibling_parquet(path: &Path, rows: &[RawSiblingRow]) -> Result<()> {
    let schema = sibling_schema();
    let batch = serde_arrow::to_record_batch(schema.fields(), &rows)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Derived exposure of a record that is expected to contribute
#[must_use]
pub fn exposed(record: &SiblingRecord) -> DerivedExposure {
    match screen_record(record) {
        Ok(RecordOutcome::Exposed(exposure)) => exposure,
        other => panic!("expected exposure, got {other:?}"),
    }
}

/// Surviving sisters, one per age group, each in her 60th month of that
/// group at the end of the window
///
/// Each contributes 5 years to her own group and 2 years to the one before.
#[must_use]
pub fn survivors_in_groups(groups: std::ops::RangeInclusive<i32>) -> Vec<SiblingRecord> {
    groups
        .map(|group| {
            SiblingRecord::alive_sister(
                format!("s{group}"),
                1.0,
                INTERVIEW,
                INTERVIEW - 1 - (60 * group + 59),
            )
        })
        .collect()
}

/// A sister who died during delivery aged 29, weight 2
///
/// She contributes 35 months to age group 25-29 and one death.
#[must_use]
pub fn maternal_death() -> SiblingRecord {
    SiblingRecord::dead_sister(
        "d1",
        2.0,
        INTERVIEW,
        900,
        1250,
        MaternalDeathCause::DuringDelivery,
    )
}
