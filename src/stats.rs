use std::time::Duration;

/// Arithmetic mean of the recorded durations, in floating-point seconds.
///
/// Returns `None` for an empty sample set (caller decides whether that is
/// an error).
pub fn mean_secs(samples: &[Duration]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let total: f64 = samples.iter().map(Duration::as_secs_f64).sum();
    Some(total / samples.len() as f64)
}
