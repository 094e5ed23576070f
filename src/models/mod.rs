//! Domain models for sibling histories
//!
//! This module contains the sibling record types and the categorical
//! vocabularies they are decoded into.

pub mod sibling;
pub mod types;

pub use sibling::{RawSiblingRow, SIBLING_COLUMNS, SiblingRecord};
pub use types::{MaternalDeathCause, Sex, SurvivalStatus};
