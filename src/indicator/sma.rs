/// Simple moving average over the `period` values ending at `idx` (inclusive).
///
/// Returns `None` while fewer than `period` values are available, when `idx`
/// is past the end of `values`, or when `period` is zero.
pub fn sma_at(values: &[f64], idx: usize, period: usize) -> Option<f64> {
    if period == 0 || idx >= values.len() || idx + 1 < period {
        return None;
    }
    let window = &values[idx + 1 - period..=idx];
    Some(window.iter().sum::<f64>() / period as f64)
}
