//! Statistical helpers for binomial accuracy estimates
//!
//! Normal-approximation intervals and tests. These are approximations and
//! are not corrected: the Wald interval degenerates for very
//! small samples and for rates near 0 or 1.

use crate::domain::ConfidenceInterval;

/// Two-tailed critical value for a confidence level in (0, 1)
///
/// `z_for_confidence(0.95)` ≈ 1.959964
pub fn z_for_confidence(confidence_level: f64) -> Option<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return None;
    }
    Some(inverse_normal_cdf(1.0 - (1.0 - confidence_level) / 2.0))
}

/// Wald interval `p ± z·sqrt(p(1-p)/n)` clamped to [0, 1]
///
/// # Returns
/// * `None` if `trials` is zero
pub fn wald_interval(
    successes: usize,
    trials: usize,
    z: f64,
    confidence_level: f64,
) -> Option<ConfidenceInterval> {
    if trials == 0 {
        return None;
    }

    let n = trials as f64;
    let p = successes as f64 / n;
    let margin = z * (p * (1.0 - p) / n).sqrt();

    Some(ConfidenceInterval {
        low: (p - margin).max(0.0),
        high: (p + margin).min(1.0),
        level: confidence_level,
    })
}

/// Two-proportion z-test with a pooled standard error
///
/// # Returns
/// * `Some(p_value)` (two-tailed)
/// * `None` if either sample is empty or the pooled variance is zero
pub fn two_proportion_z_test(
    successes_a: usize,
    trials_a: usize,
    successes_b: usize,
    trials_b: usize,
) -> Option<f64> {
    if trials_a == 0 || trials_b == 0 {
        return None;
    }

    let n1 = trials_a as f64;
    let n2 = trials_b as f64;
    let p1 = successes_a as f64 / n1;
    let p2 = successes_b as f64 / n2;
    let pooled = (successes_a + successes_b) as f64 / (n1 + n2);

    let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
    if se == 0.0 {
        return None;
    }

    let z = (p1 - p2) / se;
    Some((2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0))
}

/// Standard normal cumulative distribution function
fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Error function approximation
///
/// Uses Horner's method for the polynomial approximation.
/// Accurate to about 1.5e-7.
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// Inverse of the standard normal CDF (Acklam's rational approximation)
///
/// Relative error below 1.2e-9 on (0, 1).
fn inverse_normal_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    }
}
