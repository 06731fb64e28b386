//! Profile difference estimation.

mod estimator;

pub use estimator::{compare_profiles, ProfileComparison, ProfileDifference};
