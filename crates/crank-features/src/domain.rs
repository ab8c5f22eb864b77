//! Averaging-Domain Boundary Detection
//!
//! Locates the upper bound of the window used for the mean crank voltage:
//! first by spotting the last voltage surge after the minimum, then by
//! projecting the last accepted maximum back onto the curve.

use crate::error::FeatureError;
use crate::statistics;

/// Samples excluded from the end of the trace during surge detection.
const TAIL_EXCLUSION: usize = 30;

/// Scale applied to first differences before thresholding.
const DIFF_SCALE: f64 = 10.0;

/// Number of standard deviations a scaled difference must exceed to count
/// as a surge.
const SURGE_SIGMA: f64 = 2.5;

/// Gap kept on both sides of the projection scan window.
const PROJECTION_MARGIN: usize = 10;

/// Scaled first differences of a domain, one per adjacent pair.
fn scaled_differences(domain: &[f64]) -> Vec<f64> {
    domain
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) * DIFF_SCALE)
        .collect()
}

/// Locate the end of the averaging domain via surge detection.
///
/// Over `smoothed[min_index .. len-30]`, a sample pair whose scaled
/// difference exceeds 2.5 standard deviations of all the scaled differences
/// marks a surge; the result is the last such position, as an absolute
/// index. A window with no surge means the crank cannot be bounded and the
/// record is invalid ([`FeatureError::NoSurge`]).
///
/// When the minimum sits within 30 samples of the trace end there is no
/// window to analyze; the averaging domain then extends to the end of the
/// trace, so short plateau-tailed cranks still produce a finite mean.
pub fn end_of_mean_domain(smoothed: &[f64], min_index: usize) -> Result<usize, FeatureError> {
    let upper = smoothed.len().saturating_sub(TAIL_EXCLUSION);
    if upper <= min_index + 1 {
        return Ok(smoothed.len());
    }

    let differences = scaled_differences(&smoothed[min_index..upper]);
    let sigma = statistics::std_dev(&differences).unwrap_or(0.0);
    let limit = SURGE_SIGMA * sigma;

    differences
        .iter()
        .enumerate()
        .filter(|(_, &difference)| difference > limit)
        .map(|(index, _)| index + min_index)
        .last()
        .ok_or(FeatureError::NoSurge { limit })
}

/// Project the last accepted maximum forward onto the curve.
///
/// Scans `smoothed[last_maximum+10 .. len-10]` for the first sample whose
/// value exceeds the maximum's value, returning its absolute index. `None`
/// when no sample qualifies or the scan window is empty; callers fall back
/// to the surge-detected domain end.
pub fn project_last_maximum(smoothed: &[f64], last_maximum: usize) -> Option<usize> {
    let start = last_maximum + PROJECTION_MARGIN;
    let end = smoothed.len().saturating_sub(PROJECTION_MARGIN);
    if start >= end {
        return None;
    }

    let limit = smoothed[last_maximum];
    smoothed[start..end]
        .iter()
        .position(|&value| value > limit)
        .map(|offset| start + offset)
}
