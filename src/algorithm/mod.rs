//! Estimation algorithms

pub mod mortality;
