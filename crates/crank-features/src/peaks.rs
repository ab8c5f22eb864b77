//! Local-Maxima Detection on the Smoothed Trace

/// Minimum index distance between two accepted peaks.
pub const PEAK_SEPARATION: usize = 10;

/// Minimum voltage rise over the 10-sample lookback for a peak to count.
pub const PEAK_PROMINENCE: f64 = 0.1;

/// Samples dropped from the end of the domain before candidate search.
const TAIL_MARGIN: usize = 10;

/// Find the accepted local maxima of a smoothed-trace domain.
///
/// `domain` is the slice of the smoothed trace starting at absolute offset
/// `min_index`; returned indices are absolute (offset re-added). Candidates
/// are strict local maxima of the domain with its last 10 points dropped. A
/// candidate is accepted when it sits at least [`PEAK_SEPARATION`] positions
/// after the previously accepted peak, rises more than [`PEAK_PROMINENCE`]
/// over the sample 10 positions back, and is strictly above the samples 10
/// positions on either side. This keeps genuine voltage recovery surges and
/// filters sampling noise.
///
/// Candidates closer than 10 positions to the domain start have no lookback
/// reference and are skipped. Domains of 10 or fewer points yield no
/// candidates at all.
pub fn local_maxima(domain: &[f64], min_index: usize) -> Vec<usize> {
    let mut accepted = Vec::new();
    let mut previous: Option<usize> = None;

    let truncated = domain.len().saturating_sub(TAIL_MARGIN);
    for peak in 1..truncated.saturating_sub(1) {
        if domain[peak] <= domain[peak - 1] || domain[peak] <= domain[peak + 1] {
            continue;
        }
        if peak < PEAK_SEPARATION {
            continue;
        }
        if let Some(previous) = previous {
            if peak - previous < PEAK_SEPARATION {
                continue;
            }
        }

        let back = domain[peak - PEAK_SEPARATION];
        let ahead = domain[peak + PEAK_SEPARATION];
        if (domain[peak] - back).abs() > PEAK_PROMINENCE && back < domain[peak] && ahead < domain[peak]
        {
            accepted.push(peak + min_index);
            previous = Some(peak);
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Baseline 1.0 with a triangular peak reaching `height` at `apex`.
    fn triangle(len: usize, apex: usize, height: f64) -> Vec<f64> {
        let mut trace = vec![1.0; len];
        let rise = (height - 1.0) / 10.0;
        for step in 1..=10 {
            trace[apex - 10 + step] = 1.0 + rise * step as f64;
            trace[apex + step] = height - rise * step as f64;
        }
        trace
    }

    #[test]
    fn test_single_prominent_peak() {
        let trace = triangle(40, 15, 2.0);
        assert_eq!(local_maxima(&trace, 0), vec![15]);
    }

    #[test]
    fn test_offset_is_reapplied() {
        let trace = triangle(40, 15, 2.0);
        assert_eq!(local_maxima(&trace, 100), vec![115]);
    }

    #[test]
    fn test_shallow_peak_is_rejected() {
        // Rises only 0.05 over the lookback, below the prominence threshold
        let trace = triangle(40, 15, 1.05);
        assert_eq!(local_maxima(&trace, 0), Vec::<usize>::new());
    }

    #[test]
    fn test_peaks_closer_than_separation_are_rejected() {
        let mut trace = vec![1.0; 45];
        for step in 1..=10 {
            trace[5 + step] = 1.0 + 0.1 * step as f64;
        }
        for step in 1..=4 {
            trace[15 + step] = 2.0 - 0.2 * step as f64;
        }
        trace[20] = 1.1;
        trace[21] = 1.4;
        trace[22] = 1.7;
        trace[23] = 2.0;
        for step in 1..=10 {
            trace[23 + step] = 2.0 - 0.1 * step as f64;
        }
        // Second peak at 23 is only 8 positions after the first
        assert_eq!(local_maxima(&trace, 0), vec![15]);
    }

    #[test]
    fn test_tiny_domain_has_no_candidates() {
        let trace = vec![1.0, 2.0, 1.0, 2.0, 1.0];
        assert_eq!(local_maxima(&trace, 0), Vec::<usize>::new());
    }

    proptest! {
        #[test]
        fn maxima_are_increasing_and_separated(
            trace in prop::collection::vec(0.0f64..20.0, 0..300),
        ) {
            let maxima = local_maxima(&trace, 0);
            for pair in maxima.windows(2) {
                prop_assert!(pair[1] > pair[0]);
                prop_assert!(pair[1] - pair[0] >= PEAK_SEPARATION);
            }
        }
    }
}
