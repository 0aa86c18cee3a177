//! One-sample Kolmogorov-Smirnov test against an arbitrary CDF.

/// Returns `(statistic, p_value)` for the empirical sample against `cdf`.
/// The p-value uses the asymptotic Kolmogorov distribution with Stephens'
/// small-sample correction; it always lands in [0, 1].
pub fn ks_test<F>(data: &[f64], cdf: F) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len() as f64;
    let mut statistic: f64 = 0.0;
    for (i, &x) in sorted.iter().enumerate() {
        let f = cdf(x).clamp(0.0, 1.0);
        let d_plus = (i as f64 + 1.0) / n - f;
        let d_minus = f - i as f64 / n;
        statistic = statistic.max(d_plus).max(d_minus);
    }

    (statistic, p_value(statistic, sorted.len()))
}

fn p_value(statistic: f64, n: usize) -> f64 {
    if n == 0 || statistic <= 0.0 {
        return 1.0;
    }
    if statistic >= 1.0 {
        return 0.0;
    }
    let sqrt_n = (n as f64).sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * statistic;

    // below this the survival function is 1 to five decimal places and the
    // alternating series converges too slowly to be useful
    if lambda < 0.3 {
        return 1.0;
    }

    let mut sum = 0.0;
    let mut sign = 1.0;
    for j in 1..=100 {
        let j = j as f64;
        let term = (-2.0 * j * j * lambda * lambda).exp();
        sum += sign * term;
        sign = -sign;
        if term < 1.0e-10 {
            break;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sample_against_uniform_cdf() {
        // evenly spaced points are about as uniform as a sample gets
        let data: Vec<f64> = (1..=50).map(|i| i as f64 / 51.0).collect();
        let (stat, p) = ks_test(&data, |x| x.clamp(0.0, 1.0));
        assert!(stat < 0.05, "statistic = {}", stat);
        assert!(p > 0.9, "p = {}", p);
    }

    #[test]
    fn test_shifted_sample_is_rejected() {
        let data: Vec<f64> = (1..=50).map(|i| 0.5 + i as f64 / 102.0).collect();
        let (_, p) = ks_test(&data, |x| x.clamp(0.0, 1.0));
        assert!(p < 0.01, "p = {}", p);
    }

    #[test]
    fn test_p_value_bounds() {
        for d in [0.0, 1e-6, 0.1, 0.5, 0.9, 1.0, 2.0] {
            for n in [1, 5, 30, 500] {
                let p = p_value(d, n);
                assert!((0.0..=1.0).contains(&p), "d={}, n={}, p={}", d, n, p);
            }
        }
    }
}
