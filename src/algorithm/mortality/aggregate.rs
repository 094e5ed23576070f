//! Weighted aggregation of exposure and deaths by age group
//!
//! The same reduction runs once per [`ExposureSlot`]. Records are summed in
//! fixed-size partitions, sequentially or on the rayon pool, and the
//! partition sums are merged in partition order. The partitioning never
//! depends on the thread count, so every run over the same input produces
//! the same bits.

use std::collections::BTreeMap;

use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::algorithm::mortality::exposure::DerivedExposure;
use crate::algorithm::mortality::window::{AgeGroup, ExposureSlot};
use crate::config::RateConfig;

/// Weighted totals for one age group in one slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GroupSums {
    /// Weighted person-years of exposure
    pub person_years: f64,
    /// Weighted maternal deaths (always zero outside the last slot)
    pub weighted_deaths: f64,
    /// Number of sisters contributing at least one month
    pub observations: usize,
}

impl GroupSums {
    fn add(&mut self, exposure: &DerivedExposure, slot: ExposureSlot) {
        let months = exposure.months(slot);
        if months > 0 {
            self.person_years += exposure.weight * f64::from(months) / 12.0;
            self.observations += 1;
        }
        self.weighted_deaths += exposure.weighted_deaths(slot);
    }

    fn merge(&mut self, other: &Self) {
        self.person_years += other.person_years;
        self.weighted_deaths += other.weighted_deaths;
        self.observations += other.observations;
    }
}

/// Per-age-group totals for one exposure slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotTable {
    slot: ExposureSlot,
    groups: BTreeMap<AgeGroup, GroupSums>,
}

impl SlotTable {
    /// Build a table from already-computed group totals
    #[must_use]
    pub const fn from_groups(slot: ExposureSlot, groups: BTreeMap<AgeGroup, GroupSums>) -> Self {
        Self { slot, groups }
    }

    /// Slot this table was keyed on
    #[must_use]
    pub const fn slot(&self) -> ExposureSlot {
        self.slot
    }

    /// Totals for one age group
    #[must_use]
    pub fn get(&self, age_group: AgeGroup) -> Option<&GroupSums> {
        self.groups.get(&age_group)
    }

    /// All age groups in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (AgeGroup, &GroupSums)> {
        self.groups.iter().map(|(group, sums)| (*group, sums))
    }

    /// Weighted person-years summed over all groups
    #[must_use]
    pub fn total_person_years(&self) -> f64 {
        self.groups.values().map(|sums| sums.person_years).sum()
    }
}

/// The three per-slot tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupAggregates {
    /// Keyed by the last age group; carries the deaths
    pub last: SlotTable,
    /// Keyed by the mid age group
    pub mid: SlotTable,
    /// Keyed by the first age group
    pub first: SlotTable,
}

impl AgeGroupAggregates {
    /// Table for one slot
    #[must_use]
    pub const fn table(&self, slot: ExposureSlot) -> &SlotTable {
        match slot {
            ExposureSlot::Last => &self.last,
            ExposureSlot::Mid => &self.mid,
            ExposureSlot::First => &self.first,
        }
    }
}

type PartitionSums = FxHashMap<AgeGroup, GroupSums>;

fn partition_sums(exposures: &[DerivedExposure], slot: ExposureSlot) -> PartitionSums {
    let mut sums = PartitionSums::default();
    for exposure in exposures {
        sums.entry(exposure.age_group(slot))
            .or_default()
            .add(exposure, slot);
    }
    sums
}

/// Merge partition sums in order, keeping only the reported age groups
///
/// Every reported group gets an entry, zero-filled when nothing fell into it.
fn merge_partitions(slot: ExposureSlot, partitions: Vec<PartitionSums>) -> SlotTable {
    let mut groups: BTreeMap<AgeGroup, GroupSums> = AgeGroup::reproductive()
        .map(|group| (group, GroupSums::default()))
        .collect();

    for partition in &partitions {
        for (group, sums) in partition {
            if let Some(total) = groups.get_mut(group) {
                total.merge(sums);
            }
        }
    }

    SlotTable::from_groups(slot, groups)
}

/// Aggregate one exposure slot over all sisters
#[must_use]
pub fn aggregate_slot(
    exposures: &[DerivedExposure],
    slot: ExposureSlot,
    config: &RateConfig,
) -> SlotTable {
    let size = config.partition_size.max(1);
    let partitions: Vec<PartitionSums> = if config.parallel {
        exposures
            .par_chunks(size)
            .map(|chunk| partition_sums(chunk, slot))
            .collect()
    } else {
        exposures
            .chunks(size)
            .map(|chunk| partition_sums(chunk, slot))
            .collect()
    };
    debug!(
        "Reduced {} exposures for the {slot} slot in {} partitions",
        exposures.len(),
        partitions.len()
    );

    merge_partitions(slot, partitions)
}

/// Aggregate all three slots
#[must_use]
pub fn aggregate_exposures(exposures: &[DerivedExposure], config: &RateConfig) -> AgeGroupAggregates {
    AgeGroupAggregates {
        last: aggregate_slot(exposures, ExposureSlot::Last, config),
        mid: aggregate_slot(exposures, ExposureSlot::Mid, config),
        first: aggregate_slot(exposures, ExposureSlot::First, config),
    }
}
