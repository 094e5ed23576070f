use sisterhood_mmr::algorithm::mortality::{AgeGroup, SyntheticSurvey};
use sisterhood_mmr::{MmrError, RateConfig, SiblingRecord, estimate_rates};

use crate::utils::{maternal_death, survivors_in_groups};

fn parallel_config(threads: usize) -> RateConfig {
    RateConfig::builder()
        .parallel(true)
        .num_threads(threads)
        .partition_size(64)
        .build()
}

#[test]
fn test_hand_computed_rates() -> sisterhood_mmr::Result<()> {
    let mut records = survivors_in_groups(3..=9);
    records.push(maternal_death());

    let estimate = estimate_rates(&records, &RateConfig::sequential())?;
    let rates = &estimate.rates;
    assert_eq!(rates.rows.len(), 7);
    assert_eq!(estimate.screening.exposed, 8);

    // 5 years in her own group plus 2 from the sister one group older
    let row = rates.row(AgeGroup::new(3)).unwrap();
    assert!((row.exposure_years - 7.0).abs() < 1e-9);
    assert!(row.rate.abs() < f64::EPSILON);

    let row = rates.row(AgeGroup::new(5)).unwrap();
    let exposure_years = 7.0 + 2.0 * 35.0 / 12.0;
    assert!((row.maternal_deaths - 2.0).abs() < 1e-9);
    assert!((row.exposure_years - exposure_years).abs() < 1e-9);
    assert!((row.rate - 1000.0 * 2.0 / exposure_years).abs() < 1e-6);

    // Nobody older contributes to the oldest group
    let row = rates.row(AgeGroup::new(9)).unwrap();
    assert_eq!(row.age_group_label, "45-49");
    assert!((row.exposure_years - 5.0).abs() < 1e-9);

    assert!((rates.total_deaths() - 2.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_group_without_exposure_fails() {
    let records = survivors_in_groups(3..=8);

    match estimate_rates(&records, &RateConfig::sequential()) {
        Err(MmrError::DivisionByZero { age_group }) => {
            assert_eq!(age_group, AgeGroup::new(9));
        }
        other => panic!("expected DivisionByZero, got {other:?}"),
    }
}

#[test]
fn test_rates_are_invariant_to_weight_scale() -> sisterhood_mmr::Result<()> {
    let records = SyntheticSurvey::default().generate();
    let scaled: Vec<SiblingRecord> = records
        .iter()
        .cloned()
        .map(|mut record| {
            record.weight *= 4.0;
            record
        })
        .collect();

    let base = estimate_rates(&records, &RateConfig::sequential())?.rates;
    let heavy = estimate_rates(&scaled, &RateConfig::sequential())?.rates;

    for (a, b) in base.rows.iter().zip(&heavy.rows) {
        assert!((b.exposure_years - 4.0 * a.exposure_years).abs() < 1e-6);
        assert!((b.maternal_deaths - 4.0 * a.maternal_deaths).abs() < 1e-9);
        assert!((b.rate - a.rate).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn test_single_weight_change_is_local() -> sisterhood_mmr::Result<()> {
    let mut records = survivors_in_groups(3..=9);
    records.push(maternal_death());
    let base = estimate_rates(&records, &RateConfig::sequential())?.rates;

    let factor = 3.0;
    let death = records.last_mut().unwrap();
    let weight = death.weight;
    death.weight *= factor;
    let heavy = estimate_rates(&records, &RateConfig::sequential())?.rates;

    let changed = AgeGroup::new(5);
    for (before, after) in base.rows.iter().zip(&heavy.rows) {
        if before.age_group == changed {
            let extra_years = (factor - 1.0) * weight * 35.0 / 12.0;
            assert!((after.exposure_years - before.exposure_years - extra_years).abs() < 1e-9);
            assert!((after.maternal_deaths - before.maternal_deaths - (factor - 1.0) * weight).abs() < 1e-9);
        } else {
            assert_eq!(after, before, "{}", before.age_group_label);
        }
    }
    Ok(())
}

#[test]
fn test_repeated_runs_are_identical() -> sisterhood_mmr::Result<()> {
    let records = SyntheticSurvey::default().generate();
    let config = parallel_config(4);

    let first = estimate_rates(&records, &config)?;
    let second = estimate_rates(&records, &config)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_parallel_matches_sequential_exactly() -> sisterhood_mmr::Result<()> {
    let records = SyntheticSurvey {
        respondents: 5_000,
        ..SyntheticSurvey::default()
    }
    .generate();
    let sequential = RateConfig::builder()
        .parallel(false)
        .partition_size(64)
        .build();

    let expected = estimate_rates(&records, &sequential)?;
    for threads in [1, 2, 8] {
        let actual = estimate_rates(&records, &parallel_config(threads))?;
        assert_eq!(actual.rates, expected.rates, "{threads} threads");
        assert_eq!(actual.screening, expected.screening);
    }
    Ok(())
}

#[test]
fn test_empty_input_fails() {
    assert!(matches!(
        estimate_rates(&[], &RateConfig::default()),
        Err(MmrError::EmptyInput)
    ));
}
