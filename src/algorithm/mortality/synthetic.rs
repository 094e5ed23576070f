//! Synthetic sibling histories
//!
//! Seeded populations for demonstrations and tests. The numbers are not
//! demographically calibrated; they only need to cover every reported age
//! group with exposure and a sprinkling of maternal deaths.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithm::mortality::window::REFERENCE_WINDOW_MONTHS;
use crate::models::{MaternalDeathCause, Sex, SiblingRecord, SurvivalStatus};
use crate::utils::cmc::cmc_from_ymd;

/// Parameters of a synthetic survey
#[derive(Debug, Clone)]
pub struct SyntheticSurvey {
    /// Number of interviewed women
    pub respondents: usize,
    /// Maximum siblings reported per respondent
    pub max_siblings: usize,
    /// Month of the first interview (CMC)
    pub first_interview_month: i32,
    /// Length of fieldwork in months
    pub fieldwork_months: i32,
    /// Probability that a sister died within the reference window
    pub window_death_probability: f64,
    /// Probability that such a death was pregnancy-related
    pub maternal_share: f64,
    /// RNG seed
    pub seed: u64,
}

impl Default for SyntheticSurvey {
    fn default() -> Self {
        Self {
            respondents: 2_000,
            max_siblings: 6,
            first_interview_month: cmc_from_ymd(2016, 1),
            fieldwork_months: 6,
            window_death_probability: 0.02,
            maternal_share: 0.25,
            seed: 42,
        }
    }
}

impl SyntheticSurvey {
    /// Generate the sibling records, brothers and unknown statuses included
    #[must_use]
    pub fn generate(&self) -> Vec<SiblingRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut records = Vec::with_capacity(self.respondents * self.max_siblings / 2);

        for respondent in 0..self.respondents {
            let case_id = format!("{respondent:>8} 1  2");
            let weight = rng.random_range(0.4..2.5);
            let interview_month =
                self.first_interview_month + rng.random_range(0..self.fieldwork_months.max(1));
            let siblings = rng.random_range(1..=self.max_siblings.max(1));

            for _ in 0..siblings {
                records.push(self.sibling(&mut rng, &case_id, weight, interview_month));
            }
        }

        records
    }

    fn sibling(
        &self,
        rng: &mut StdRng,
        case_id: &str,
        weight: f64,
        interview_month: i32,
    ) -> SiblingRecord {
        // Ages 10 to 60 at interview
        let birth_month = interview_month - rng.random_range(120..720);
        let mut record = SiblingRecord::alive_sister(case_id, weight, interview_month, birth_month);

        if rng.random_bool(0.5) {
            record.sex = Sex::Male;
        }
        if rng.random_bool(0.01) {
            record.survival_status = SurvivalStatus::Unknown;
            return record;
        }

        if rng.random_bool(self.window_death_probability) {
            let window_start = (interview_month - REFERENCE_WINDOW_MONTHS).max(birth_month);
            let death_month = rng.random_range(window_start..interview_month);
            let cause = if record.sex == Sex::Female && rng.random_bool(self.maternal_share) {
                MaternalDeathCause::try_from(rng.random_range(2..=6_i32))
                    .unwrap_or(MaternalDeathCause::WhilePregnant)
            } else {
                MaternalDeathCause::NotPregnancyRelated
            };
            record.survival_status = SurvivalStatus::Dead;
            record.death_month = Some(death_month);
            record.maternal_death_cause = Some(cause);
        } else if rng.random_bool(0.03) {
            // Died in childhood
            record.survival_status = SurvivalStatus::Dead;
            record.death_month = Some(birth_month + rng.random_range(0..60));
            record.maternal_death_cause = Some(MaternalDeathCause::NeverPregnant);
        }

        record
    }
}
