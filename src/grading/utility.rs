/// Allowed drift of a roster's weight sum from 100, in percentage points.
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// Absorbs representation error in values like `100.0 - 99.99`, which is
/// slightly above 0.01 in binary floating point.
const FLOAT_SLACK: f64 = 1e-9;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// True when `a` and `b` differ by at most `tolerance`.
pub fn within(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance + FLOAT_SLACK
}

/// True when `a >= b`, allowing `a` to fall short by `tolerance`.
pub fn at_least(a: f64, b: f64, tolerance: f64) -> bool {
    a + tolerance + FLOAT_SLACK >= b
}
