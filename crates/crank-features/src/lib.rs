//! Battery Crank Feature Extraction
//!
//! Derives the three state-of-health coefficients (initial voltage, low
//! valley voltage, mean crank voltage) from a battery cranking voltage
//! trace. The pipeline is pure and single-pass: smoothing, segmentation,
//! then coefficient computation per crank record.

mod domain;
mod error;
mod features;
mod peaks;
mod smoothing;
mod statistics;

pub use domain::{end_of_mean_domain, project_last_maximum};
pub use error::FeatureError;
pub use features::{extract_features, CrankRecord, FeatureRecord};
pub use peaks::local_maxima;
pub use smoothing::smooth;
