use sisterhood_mmr::algorithm::mortality::{
    AGE_GROUP_WIDTH_MONTHS, AgeGroup, ExclusionReason, REFERENCE_WINDOW_MONTHS, RecordOutcome,
    SyntheticSurvey, screen_record,
};
use sisterhood_mmr::{Sex, SiblingRecord, SurvivalStatus};

use crate::utils::{INTERVIEW, exposed, maternal_death};

#[test]
fn test_exposure_partitions_window_months() {
    let records = SyntheticSurvey::default().generate();
    let mut checked = 0;

    for record in &records {
        if let Ok(RecordOutcome::Exposed(exposure)) = screen_record(record) {
            let total = exposure.total_exposure_months;
            assert!((1..=REFERENCE_WINDOW_MONTHS).contains(&total));
            assert_eq!(
                exposure.expo_last + exposure.expo_mid + exposure.expo_first,
                total
            );
            assert!(exposure.expo_last >= 1 && exposure.expo_last <= AGE_GROUP_WIDTH_MONTHS);
            assert!(exposure.expo_mid >= 0 && exposure.expo_mid <= AGE_GROUP_WIDTH_MONTHS);
            assert!(exposure.expo_first >= 0);
            assert_eq!(exposure.mid_age_group, exposure.last_age_group.younger(1));
            assert_eq!(exposure.first_age_group, exposure.last_age_group.younger(2));
            checked += 1;
        }
    }

    assert!(checked > 1000, "only {checked} exposed sisters");
}

#[test]
fn test_older_survivors_have_full_window() {
    let records = SyntheticSurvey::default().generate();

    for record in records.iter().filter(|r| {
        r.sex == Sex::Female
            && r.survival_status == SurvivalStatus::Alive
            && r.birth_month.is_some_and(|b| b <= r.interview_month - REFERENCE_WINDOW_MONTHS)
    }) {
        let exposure = exposed(record);
        assert_eq!(exposure.total_exposure_months, REFERENCE_WINDOW_MONTHS);
        assert_eq!(exposure.upper_limit, record.interview_month - 1);
    }
}

#[test]
fn test_sister_aged_36_at_interview() {
    let record = SiblingRecord::alive_sister("a", 1.0, INTERVIEW, INTERVIEW - 36 * 12);
    let exposure = exposed(&record);

    assert_eq!(exposure.total_exposure_months, 84);
    assert_eq!(exposure.last_age_group.label(), "35-39");
    assert_eq!(exposure.mid_age_group.label(), "30-34");
    assert_eq!(exposure.first_age_group.label(), "25-29");
    assert_eq!(exposure.expo_last, 12);
    assert_eq!(exposure.expo_mid, 60);
    assert_eq!(exposure.expo_first, 12);
}

#[test]
fn test_maternal_death_ends_exposure() {
    let exposure = exposed(&maternal_death());

    assert!(exposure.is_maternal_death);
    assert_eq!(exposure.upper_limit, 1250);
    assert_eq!(exposure.lower_limit, INTERVIEW - REFERENCE_WINDOW_MONTHS);
    assert_eq!(exposure.last_age_group, AgeGroup::new(5));
    assert_eq!((exposure.expo_last, exposure.expo_mid, exposure.expo_first), (35, 0, 0));
}

#[test]
fn test_synthetic_exclusions_are_reported() {
    let records = SyntheticSurvey::default().generate();
    let outcomes: Vec<_> = records.iter().map(screen_record).collect();

    assert!(outcomes.iter().all(Result::is_ok));
    assert!(outcomes
        .iter()
        .any(|o| matches!(o, Ok(RecordOutcome::Excluded(ExclusionReason::Male)))));
    assert!(outcomes
        .iter()
        .any(|o| matches!(o, Ok(RecordOutcome::Excluded(ExclusionReason::UnknownSurvival)))));
}
