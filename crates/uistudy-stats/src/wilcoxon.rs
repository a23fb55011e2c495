//! Wilcoxon signed-rank test for two related samples.
//!
//! Zero differences are discarded before ranking. The two-sided p-value comes
//! from the exact null distribution of `W+` when the sample is small and free
//! of ties and zeros, and from the normal approximation (with tie-corrected
//! variance, no continuity correction) otherwise.

use statrs::distribution::{ContinuousCDF as _, Normal};

use crate::rank::Ranking;

/// How the p-value of a [`WilcoxonSignedRank`] test was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PValueMethod {
    /// Exact enumeration of the signed-rank null distribution.
    Exact,
    /// Normal approximation of the signed-rank statistic.
    Normal,
}

/// Result of a two-sided Wilcoxon signed-rank test.
#[derive(Debug, Clone, PartialEq)]
pub struct WilcoxonSignedRank {
    /// `min(W+, W-)`, the smaller of the positive and negative rank sums.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Number of non-zero differences that entered the ranking.
    pub num_nonzero: usize,
    /// Method used to compute the p-value.
    pub method: PValueMethod,
}

impl WilcoxonSignedRank {
    /// Largest sample for which the exact distribution is enumerated.
    pub const EXACT_LIMIT: usize = 50;

    /// Runs the test on paired observations `x[i]`, `y[i]`.
    ///
    /// When every difference is zero there is no evidence of a shift: the
    /// statistic is `0` and the p-value is `1`.
    ///
    /// # Returns
    ///
    /// * `None` - if `x` and `y` differ in length or are empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use uistudy_stats::wilcoxon::{PValueMethod, WilcoxonSignedRank};
    /// let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    /// let y = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    /// let test = WilcoxonSignedRank::new(&x, &y).unwrap();
    /// assert_eq!(test.statistic, 0.0);
    /// assert_eq!(test.method, PValueMethod::Exact);
    /// assert!((test.p_value - 0.03125).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn new(x: &[f64], y: &[f64]) -> Option<Self> {
        if x.len() != y.len() || x.is_empty() {
            return None;
        }

        let differences = x
            .iter()
            .zip(y)
            .map(|(a, b)| a - b)
            .filter(|d| *d != 0.0)
            .collect::<Vec<_>>();
        let has_zeros = differences.len() < x.len();
        let n = differences.len();

        if n == 0 {
            return Some(Self {
                statistic: 0.0,
                p_value: 1.0,
                num_nonzero: 0,
                method: PValueMethod::Exact,
            });
        }

        let magnitudes = differences.iter().map(|d| d.abs()).collect::<Vec<_>>();
        let ranking = Ranking::new(&magnitudes);
        let (r_plus, r_minus) = differences.iter().zip(&ranking.ranks).fold(
            (0.0, 0.0),
            |(plus, minus), (d, r)| {
                if *d > 0.0 {
                    (plus + r, minus)
                } else {
                    (plus, minus + r)
                }
            },
        );
        let statistic = f64::min(r_plus, r_minus);

        let use_exact = n <= Self::EXACT_LIMIT && !has_zeros && !ranking.has_ties();
        let (p_value, method) = if use_exact {
            (exact_p_value(n, r_plus), PValueMethod::Exact)
        } else {
            (
                normal_p_value(n, statistic, ranking.tie_term()),
                PValueMethod::Normal,
            )
        };

        Some(Self {
            statistic,
            p_value,
            num_nonzero: n,
            method,
        })
    }
}

/// Number of subsets of `{1, ..., n}` with each possible sum.
fn signed_rank_counts(n: usize) -> Vec<f64> {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0; max_sum + 1];
    counts[0] = 1.0;
    for rank in 1..=n {
        for sum in (rank..=max_sum).rev() {
            counts[sum] += counts[sum - rank];
        }
    }
    counts
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn exact_p_value(n: usize, r_plus: f64) -> f64 {
    let counts = signed_rank_counts(n);
    let total = counts.iter().sum::<f64>();
    // ranks are integers when there are no ties
    let w = r_plus.round() as usize;
    let lower = counts[..=w].iter().sum::<f64>() / total;
    let upper = counts[w..].iter().sum::<f64>() / total;
    (2.0 * f64::min(lower, upper)).min(1.0)
}

#[expect(clippy::cast_precision_loss)]
fn normal_p_value(n: usize, statistic: f64, tie_term: f64) -> f64 {
    let n = n as f64;
    let mean = n * (n + 1.0) / 4.0;
    let variance = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - tie_term / 48.0;
    if variance <= 0.0 {
        return 1.0;
    }
    let z = (statistic - mean) / variance.sqrt();
    Normal::new(0.0, 1.0).map_or(f64::NAN, |dist| (2.0 * dist.sf(z.abs())).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch() {
        assert!(WilcoxonSignedRank::new(&[1.0, 2.0], &[1.0]).is_none());
        assert!(WilcoxonSignedRank::new(&[], &[]).is_none());
    }

    #[test]
    fn test_signed_rank_counts() {
        // n = 3: subset sums of {1, 2, 3}
        assert_eq!(
            signed_rank_counts(3),
            vec![1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0]
        );
        assert!((signed_rank_counts(10).iter().sum::<f64>() - 1024.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_mixed_signs() {
        // differences: +1, -2, +3, +4, +5 -> W+ = 13, W- = 2
        let x = [2.0, 1.0, 6.0, 8.0, 10.0];
        let y = [1.0, 3.0, 3.0, 4.0, 5.0];
        let test = WilcoxonSignedRank::new(&x, &y).unwrap();
        assert_eq!(test.method, PValueMethod::Exact);
        assert!((test.statistic - 2.0).abs() < 1e-12);
        // P(W+ <= 2) for n = 5 is 3 / 32, doubled
        assert!((test.p_value - 6.0 / 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_in_argument_order() {
        let x = [5.0, 6.0, 4.0, 7.0, 5.0, 6.0, 3.0];
        let y = [3.0, 4.5, 2.0, 5.0, 6.0, 4.0, 3.5];
        let forward = WilcoxonSignedRank::new(&x, &y).unwrap();
        let backward = WilcoxonSignedRank::new(&y, &x).unwrap();
        assert!((forward.statistic - backward.statistic).abs() < 1e-12);
        assert!((forward.p_value - backward.p_value).abs() < 1e-12);
    }

    #[test]
    fn test_tied_differences_use_normal_approximation() {
        let x = [5.0, 6.0, 4.0, 7.0, 5.0, 6.0];
        let y = [3.0, 4.0, 2.0, 5.0, 3.0, 4.0];
        let test = WilcoxonSignedRank::new(&x, &y).unwrap();
        assert_eq!(test.method, PValueMethod::Normal);
        assert!(test.statistic.abs() < 1e-12);
        // mean 10.5, variance 22.75 - 210 / 48 = 18.375
        // z = 10.5 / sqrt(18.375) = sqrt(6)
        assert!((test.p_value - 0.014_305_878_435_430).abs() < 1e-9);
        assert!(test.p_value < 0.05);
    }

    #[test]
    fn test_zero_differences_are_dropped() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let test = WilcoxonSignedRank::new(&x, &y).unwrap();
        assert_eq!(test.num_nonzero, 5);
        assert_eq!(test.method, PValueMethod::Normal);
    }

    #[test]
    fn test_all_zero_differences() {
        let x = [3.0; 6];
        let test = WilcoxonSignedRank::new(&x, &x).unwrap();
        assert_eq!(test.num_nonzero, 0);
        assert!((test.p_value - 1.0).abs() < f64::EPSILON);
    }
}
