//! Trailing Moving-Average Smoothing

/// Number of samples in the trailing average window.
pub const SMOOTHING_WINDOW: usize = 5;

/// Smooth a crank voltage profile with a trailing moving average.
///
/// The segment up to and including the global minimum is kept untouched so
/// the dip itself is never averaged away. Every sample after the minimum is
/// replaced by the mean of the trailing window, expanding at the start of
/// the suffix (the first smoothed point averages one sample, the second two,
/// and so on until the full window is available).
///
/// `min_index` must be the index of the global minimum of `profile`,
/// computed once and shared with every downstream stage. Output length
/// always equals input length.
///
/// Panics if `min_index` is out of bounds.
pub fn smooth(profile: &[f64], min_index: usize) -> Vec<f64> {
    assert!(min_index < profile.len(), "minimum index out of bounds");

    let mut smoothed = Vec::with_capacity(profile.len());
    smoothed.extend_from_slice(&profile[..=min_index]);

    let suffix = &profile[min_index + 1..];
    for i in 0..suffix.len() {
        let start = (i + 1).saturating_sub(SMOOTHING_WINDOW);
        let window = &suffix[start..=i];
        smoothed.push(window.iter().sum::<f64>() / window.len() as f64);
    }
    smoothed
}
