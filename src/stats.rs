//! Scalar summary statistics and the ordinary-least-squares estimator.
//!
//! The engine fits total sample time against evaluations-per-sample; the
//! slope of that line is the per-evaluation time with the fixed per-sample
//! overhead absorbed into the intercept.

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample variance with Bessel's correction. Zero below two elements.
pub fn variance(xs: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(xs);
    xs.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (n - 1) as f64
}

/// Standard error of the mean: `sqrt(variance / n)`.
pub fn std_err(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    (variance(xs) / xs.len() as f64).sqrt()
}

/// A fitted line `y ~ intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsFit {
    /// Fixed per-sample cost (measurement overhead).
    pub intercept: f64,
    /// Marginal cost per unit of `x`, here per evaluation.
    pub slope: f64,
    /// Goodness of fit: `1 - var(residuals) / var(y)`.
    pub r_squared: f64,
    /// Standard error of the slope.
    pub slope_stderr: f64,
}

/// Closed-form ordinary least squares over parallel slices.
///
/// Callers guarantee `x.len() == y.len()`, at least two points, and nonzero
/// variance in `x`; the engine upholds all three by construction.
pub fn ols(x: &[f64], y: &[f64]) -> OlsFit {
    let n = x.len();
    debug_assert_eq!(n, y.len(), "x and y must be parallel");
    debug_assert!(n >= 2, "a line needs two points");

    let x_mean = mean(x);
    let y_mean = mean(y);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for i in 0..n {
        let dx = x[i] - x_mean;
        sxx += dx * dx;
        sxy += dx * (y[i] - y_mean);
    }
    debug_assert!(sxx > 0.0, "x must vary");

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let residuals: Vec<f64> = (0..n)
        .map(|i| y[i] - intercept - slope * x[i])
        .collect();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();

    let y_var = variance(y);
    let r_squared = if y_var > 0.0 {
        1.0 - variance(&residuals) / y_var
    } else {
        1.0
    };

    let slope_stderr = if n > 2 {
        ((ss_res / (n - 2) as f64) / sxx).sqrt()
    } else {
        0.0
    };

    OlsFit {
        intercept,
        slope,
        r_squared,
        slope_stderr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_mean_and_variance() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((mean(&xs) - 3.0).abs() < TOL);
        assert!((variance(&xs) - 2.5).abs() < TOL);
        assert!((std_err(&xs) - (2.5f64 / 5.0).sqrt()).abs() < TOL);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[7.0]), 0.0);
        assert_eq!(std_err(&[]), 0.0);
    }

    #[test]
    fn test_exact_line_recovered() {
        // y = 3 + 5x exactly: intercept, slope, and r² are exact and the
        // slope's standard error vanishes.
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&v| 3.0 + 5.0 * v).collect();

        let fit = ols(&x, &y);
        assert!((fit.intercept - 3.0).abs() < TOL);
        assert!((fit.slope - 5.0).abs() < TOL);
        assert!((fit.r_squared - 1.0).abs() < TOL);
        assert!(fit.slope_stderr.abs() < TOL);
    }

    #[test]
    fn test_noisy_line_has_wide_error() {
        // Alternating +-1 noise around y = 2x keeps the slope near 2 but
        // leaves visible residual error.
        let x: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &v)| 2.0 * v + if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();

        let fit = ols(&x, &y);
        assert!((fit.slope - 2.0).abs() < 0.05);
        assert!(fit.r_squared < 1.0);
        assert!(fit.slope_stderr > 0.0);
    }

    #[test]
    fn test_two_points_exact_fit() {
        let fit = ols(&[1.0, 2.0], &[10.0, 30.0]);
        assert!((fit.slope - 20.0).abs() < TOL);
        assert!((fit.intercept + 10.0).abs() < TOL);
        // n = 2 leaves no residual degrees of freedom.
        assert_eq!(fit.slope_stderr, 0.0);
    }
}
