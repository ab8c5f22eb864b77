//! Crank Feature Extraction
//!
//! Composes smoothing, segmentation, and coefficient computation into the
//! per-record pipeline. Any [`FeatureError`] raised along the way discards
//! the crank; there is never a partial feature record.

use crate::domain;
use crate::error::FeatureError;
use crate::peaks;
use crate::smoothing;
use crate::statistics;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single battery-cranking voltage event.
#[derive(Debug, Clone, Deserialize)]
pub struct CrankRecord {
    /// Voltage samples in chronological order
    pub crank_profile: Vec<f64>,
    /// Opaque generation timestamp, passed through unmodified
    pub time: String,
}

/// The three state-of-health coefficients for one crank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Initial voltage: peak before the first major dip
    pub iv: f64,
    /// Low valley voltage: global minimum of the smoothed trace
    pub lvv: f64,
    /// Mean crank voltage over the recovery segment, rounded to 2 decimals
    pub mcv: f64,
    /// Timestamp copied from the input record
    pub time: String,
}

/// Extract the feature record for one crank.
///
/// The minimum index is computed once on the raw profile and threaded
/// through every stage; all downstream indices are absolute.
pub fn extract_features(record: &CrankRecord) -> Result<FeatureRecord, FeatureError> {
    let min_index =
        statistics::argmin(&record.crank_profile).ok_or(FeatureError::EmptyProfile)?;
    let smoothed = smoothing::smooth(&record.crank_profile, min_index);
    debug!(samples = smoothed.len(), min_index, "smoothed crank profile");

    let iv = smoothed[..=min_index]
        .iter()
        .cloned()
        .fold(f64::MIN, f64::max);
    let lvv = smoothed.iter().cloned().fold(f64::MAX, f64::min);
    let mcv = mean_crank_voltage(&smoothed, min_index)?;

    Ok(FeatureRecord {
        iv,
        lvv,
        mcv,
        time: record.time.clone(),
    })
}

/// Mean of the recovery segment, bounded by surge and maximum detection.
fn mean_crank_voltage(smoothed: &[f64], min_index: usize) -> Result<f64, FeatureError> {
    let domain_end = domain::end_of_mean_domain(smoothed, min_index)?;
    let maxima = peaks::local_maxima(&smoothed[min_index..domain_end], min_index);

    let upper = match maxima.last() {
        Some(&last) => domain::project_last_maximum(smoothed, last).unwrap_or(domain_end),
        None => domain_end,
    };

    let window = &smoothed[min_index..upper];
    let mean = statistics::mean(window).ok_or(FeatureError::EmptyMeanDomain {
        start: min_index,
        end: upper,
    })?;
    Ok(round_to_cents(mean))
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(profile: Vec<f64>) -> CrankRecord {
        CrankRecord {
            crank_profile: profile,
            time: "2018-11-26T07:36".to_string(),
        }
    }

    /// 33-sample trace: minimum 2 at index 3, then a recovery bump and a
    /// long plateau that leaves no room for surge detection.
    fn plateau_profile() -> Vec<f64> {
        let mut profile = vec![
            10.0, 9.0, 8.0, 2.0, 3.0, 5.0, 9.0, 12.0, 11.0, 10.0, 9.0, 8.0, 7.0, 7.0,
        ];
        profile.extend(std::iter::repeat(6.0).take(19));
        profile
    }

    #[test]
    fn test_plateau_crank_round_trip() {
        let features = extract_features(&record(plateau_profile())).unwrap();
        assert_eq!(features.iv, 10.0);
        assert_eq!(features.lvv, 2.0);
        assert!((features.mcv - 6.45).abs() < 1e-9);
        assert_eq!(features.time, "2018-11-26T07:36");
    }

    #[test]
    fn test_mcv_is_rounded_to_two_decimals() {
        let features = extract_features(&record(plateau_profile())).unwrap();
        let cents = features.mcv * 100.0;
        assert!((cents - cents.round()).abs() < 1e-9);
    }

    #[test]
    fn test_constant_profile_is_discarded() {
        let result = extract_features(&record(vec![7.0; 60]));
        assert!(matches!(result, Err(FeatureError::NoSurge { .. })));
    }

    #[test]
    fn test_empty_profile_is_discarded() {
        let result = extract_features(&record(vec![]));
        assert_eq!(result, Err(FeatureError::EmptyProfile));
    }

    #[test]
    fn test_single_sample_profile() {
        let features = extract_features(&record(vec![12.4])).unwrap();
        assert_eq!(features.iv, 12.4);
        assert_eq!(features.lvv, 12.4);
        assert_eq!(features.mcv, 12.4);
    }

    /// Smoothed trace exercising the full segmentation path: a surge bounds
    /// the domain, one maximum is accepted, and its projection lands where
    /// the tail first exceeds the peak value.
    fn segmented_trace() -> Vec<f64> {
        let mut trace = vec![12.0, 11.5, 11.0, 10.5, 10.2, 6.0];
        // Recovery peak: rise to 9.0 at index 20, fall back to 7.0 at 30
        for step in 1..=15 {
            trace.push(6.0 + 0.2 * step as f64);
        }
        for step in 1..=10 {
            trace.push(9.0 - 0.2 * step as f64);
        }
        // Plateau at 7.0 through index 59, then the last surge to 9.5
        trace.extend(std::iter::repeat(7.0).take(29));
        trace.extend(std::iter::repeat(9.5).take(40));
        trace
    }

    #[test]
    fn test_projection_bounds_the_mean_domain() {
        let trace = segmented_trace();
        assert_eq!(trace.len(), 100);

        assert_eq!(crate::domain::end_of_mean_domain(&trace, 5), Ok(59));
        assert_eq!(crate::peaks::local_maxima(&trace[5..59], 5), vec![20]);
        assert_eq!(crate::domain::project_last_maximum(&trace, 20), Some(60));

        // Mean of trace[5..60] is 402/55, rounded to 7.31
        let mcv = mean_crank_voltage(&trace, 5).unwrap();
        assert!((mcv - 7.31).abs() < 1e-9);
    }

    #[test]
    fn test_crank_record_json_shape() {
        let record: CrankRecord = serde_json::from_str(
            r#"{"source_id": "353386065619625", "crank_profile": [12.3, 11.0, 3.4, 12.3],
                "time": "2018-11-26T07:36"}"#,
        )
        .unwrap();
        assert_eq!(record.crank_profile.len(), 4);
        assert_eq!(record.time, "2018-11-26T07:36");

        let missing_profile: Result<CrankRecord, _> =
            serde_json::from_str(r#"{"time": "2018-11-26T07:36"}"#);
        assert!(missing_profile.is_err());
    }
}
