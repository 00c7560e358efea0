//! Basic correlation

use num_traits::*;

use std::fmt::Debug;

/// pearson correlation coefficient. Returns NaN if one of the slices is constant.
pub fn pearson_cor<'a, F>(v1: &'a [F], v2: &'a [F]) -> F
where
    F: Float + std::iter::Sum<&'a F> + FromPrimitive + Debug,
{
    assert_eq!(v1.len(), v2.len());
    assert!(v1.len() >= 2, "pearson_cor needs at least 2 values");
    let n = F::from_usize(v1.len()).unwrap_or_else(F::nan);
    let n_1 = F::from_usize(v1.len() - 1).unwrap_or_else(F::nan);
    // means...
    let mean1: F = v1.iter().sum::<F>() / n;
    let mean2: F = v2.iter().sum::<F>() / n;
    // variances
    let (mut s1, mut s2) = v1
        .iter()
        .zip(v2.iter())
        .fold((F::zero(), F::zero()), |acc, (t1, t2)| {
            (
                acc.0 + (*t1 - mean1) * (*t1 - mean1),
                acc.1 + (*t2 - mean2) * (*t2 - mean2),
            )
        });
    //
    s1 = (s1 / n_1).sqrt();
    s2 = (s2 / n_1).sqrt();
    // covariance...
    let cov = v1
        .iter()
        .zip(v2.iter())
        .fold(F::zero(), |acc, (t1, t2)| acc + (*t1 - mean1) * (*t2 - mean2))
        / n_1;
    //
    let rho = cov / (s1 * s2);
    if rho.abs() > F::one() + F::epsilon() {
        log::error!("correlation : {:?}", rho);
    }
    //
    rho
} // end of pearson_cor

/// t statistic of a pearson correlation r computed on n couples: r * sqrt((n-2)/(1-r^2)).
/// Under the null hypothesis it follows a student law with n-2 degrees of freedom.
pub fn pearson_t_statistic(r: f64, n: usize) -> f64 {
    assert!(n > 2);
    let denom = 1. - r * r;
    if denom <= 0. {
        return f64::INFINITY.copysign(r);
    }
    r * ((n as f64 - 2.) / denom).sqrt()
} // end of pearson_t_statistic

// end of mod tests
