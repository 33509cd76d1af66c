use ticker_guess::indicator::sma::sma_at;

#[test]
fn trailing_window_average() {
    let closes = [10.0, 20.0, 30.0, 40.0, 50.0];
    assert_eq!(sma_at(&closes, 1, 3), None);
    assert!((sma_at(&closes, 2, 3).unwrap() - 20.0).abs() < f64::EPSILON);
    assert!((sma_at(&closes, 4, 3).unwrap() - 40.0).abs() < f64::EPSILON);
}

#[test]
fn matches_naive_mean_over_long_series() {
    let closes: Vec<f64> = (0..2_000u64).map(|i| (i as f64) * 0.1 + 0.01).collect();
    let period = 10;
    for idx in 0..closes.len() {
        match sma_at(&closes, idx, period) {
            None => assert!(idx + 1 < period),
            Some(avg) => {
                let window = &closes[idx + 1 - period..=idx];
                let naive = window.iter().sum::<f64>() / period as f64;
                assert!(
                    (avg - naive).abs() < 1e-9,
                    "Mismatch at idx={}: sma={} naive={}",
                    idx,
                    avg,
                    naive
                );
            }
        }
    }
}
