//! Feature Extraction Error Types

use thiserror::Error;

/// Errors that invalidate a single crank record.
///
/// Each variant discards the record it occurred on; batch processing of the
/// remaining records continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Crank profile has no samples
    #[error("crank profile is empty")]
    EmptyProfile,

    /// No scaled difference exceeded the surge-detection limit, so the end
    /// of the averaging domain cannot be located
    #[error("no voltage surge above limit {limit:.4} after the minimum")]
    NoSurge { limit: f64 },

    /// The averaging slice for the mean crank voltage is empty
    #[error("mean crank voltage domain [{start}, {end}) is empty")]
    EmptyMeanDomain { start: usize, end: usize },
}
