/// Nearest-rank percentile over an ascending slice: the value at index
/// `ceil(p/100 * n) - 1`, clamped to the slice bounds.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    let rank = (p * n as f64 / 100.0).ceil() as i64 - 1;
    let idx = rank.clamp(0, n as i64 - 1) as usize;
    Some(sorted[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tens() -> Vec<f64> {
        (1..=10).map(|i| (i * 10) as f64).collect()
    }

    #[test]
    fn ceiling_rank_on_ten_values() {
        let d = tens();
        assert_eq!(percentile(&d, 50.0), Some(50.0));
        assert_eq!(percentile(&d, 95.0), Some(100.0));
        assert_eq!(percentile(&d, 99.0), Some(100.0));
    }

    #[test]
    fn clamps_to_bounds() {
        let d = tens();
        assert_eq!(percentile(&d, 0.0), Some(10.0));
        assert_eq!(percentile(&d, 150.0), Some(100.0));
    }

    #[test]
    fn single_value() {
        assert_eq!(percentile(&[7.0], 99.0), Some(7.0));
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(percentile(&[], 50.0), None);
    }
}
