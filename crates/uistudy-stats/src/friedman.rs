//! Friedman rank test for repeated measures.
//!
//! The test compares `k >= 3` related samples (treatments) observed on the
//! same `n` subjects (blocks). Each block is ranked independently; under the
//! null hypothesis every treatment has the same rank distribution and the
//! tie-corrected statistic follows a chi-squared distribution with `k - 1`
//! degrees of freedom.

use statrs::distribution::{ChiSquared, ContinuousCDF as _};

use crate::rank::Ranking;

/// Result of a Friedman test.
#[derive(Debug, Clone, PartialEq)]
pub struct FriedmanTest {
    /// Tie-corrected Friedman chi-square statistic.
    ///
    /// `NaN` when every block is entirely tied, which leaves the statistic undefined.
    pub statistic: f64,
    /// Upper-tail p-value from the chi-squared distribution with `k - 1` degrees of freedom.
    pub p_value: f64,
    /// Number of blocks (complete subjects).
    pub num_blocks: usize,
    /// Number of treatments compared.
    pub num_treatments: usize,
}

impl FriedmanTest {
    /// Minimum number of treatments the test accepts.
    pub const MIN_TREATMENTS: usize = 3;

    /// Runs the test on complete blocks.
    ///
    /// `blocks[i][j]` is the observation of treatment `j` on subject `i`.
    ///
    /// # Returns
    ///
    /// * `None` - if there are no blocks, fewer than three treatments, or the
    ///   blocks do not all have the same length
    ///
    /// # Examples
    ///
    /// ```
    /// # use uistudy_stats::friedman::FriedmanTest;
    /// let blocks = vec![vec![1.0, 2.0, 3.0]; 4];
    /// let test = FriedmanTest::new(&blocks).unwrap();
    /// assert!((test.statistic - 8.0).abs() < 1e-12);
    /// assert!((test.p_value - (-4.0_f64).exp()).abs() < 1e-10);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(blocks: &[Vec<f64>]) -> Option<Self> {
        let num_treatments = blocks.first()?.len();
        if num_treatments < Self::MIN_TREATMENTS
            || blocks.iter().any(|block| block.len() != num_treatments)
        {
            return None;
        }
        let num_blocks = blocks.len();

        let mut rank_sums = vec![0.0; num_treatments];
        let mut tie_term = 0.0;
        for block in blocks {
            let ranking = Ranking::new(block);
            for (sum, rank) in rank_sums.iter_mut().zip(&ranking.ranks) {
                *sum += rank;
            }
            tie_term += ranking.tie_term();
        }

        let n = num_blocks as f64;
        let k = num_treatments as f64;
        let sum_of_squares = rank_sums.iter().map(|s| s * s).sum::<f64>();
        let correction = 1.0 - tie_term / (k * (k * k - 1.0) * n);

        let (statistic, p_value) = if correction <= 0.0 {
            (f64::NAN, f64::NAN)
        } else {
            let statistic =
                (12.0 / (k * n * (k + 1.0)) * sum_of_squares - 3.0 * n * (k + 1.0)) / correction;
            let p_value = ChiSquared::new(k - 1.0).map_or(f64::NAN, |dist| dist.sf(statistic));
            (statistic, p_value)
        };

        Some(Self {
            statistic,
            p_value,
            num_blocks,
            num_treatments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_too_few_treatments() {
        assert!(FriedmanTest::new(&[vec![1.0, 2.0], vec![2.0, 1.0]]).is_none());
    }

    #[test]
    fn test_rejects_empty_and_ragged_input() {
        assert!(FriedmanTest::new(&[]).is_none());
        assert!(FriedmanTest::new(&[vec![1.0, 2.0, 3.0], vec![1.0, 2.0]]).is_none());
    }

    #[test]
    fn test_no_difference_between_treatments() {
        // Every treatment receives each rank exactly once.
        let blocks = vec![
            vec![1.0, 2.0, 3.0],
            vec![2.0, 3.0, 1.0],
            vec![3.0, 1.0, 2.0],
        ];
        let test = FriedmanTest::new(&blocks).unwrap();
        assert!(test.statistic.abs() < 1e-12);
        assert!((test.p_value - 1.0).abs() < 1e-12);
        assert_eq!(test.num_blocks, 3);
        assert_eq!(test.num_treatments, 3);
    }

    #[test]
    fn test_tie_correction() {
        let blocks = vec![
            vec![5.0, 3.0, 3.0],
            vec![6.0, 4.0, 2.0],
            vec![7.0, 5.0, 5.0],
            vec![6.0, 2.0, 3.0],
        ];
        // Rank sums are 12, 6 and 6 with two tie groups of size two:
        // raw = 12 / 48 * 216 - 48 = 6, correction = 1 - 12 / 96 = 0.875
        let test = FriedmanTest::new(&blocks).unwrap();
        assert!((test.statistic - 6.0 / 0.875).abs() < 1e-12);
        assert!((test.p_value - (-test.statistic / 2.0).exp()).abs() < 1e-10);
    }

    #[test]
    fn test_four_treatments_use_three_degrees_of_freedom() {
        let blocks = vec![vec![1.0, 2.0, 3.0, 4.0]; 3];
        let test = FriedmanTest::new(&blocks).unwrap();
        assert!((test.statistic - 9.0).abs() < 1e-12);
        assert!((test.p_value - 0.029_290_886_534_888).abs() < 1e-9);
    }

    #[test]
    fn test_fully_tied_blocks_are_undefined() {
        let blocks = vec![vec![4.0, 4.0, 4.0]; 5];
        let test = FriedmanTest::new(&blocks).unwrap();
        assert!(test.statistic.is_nan());
        assert!(test.p_value.is_nan());
    }
}
