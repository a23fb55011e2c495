//! Tie-aware ranking.
//!
//! Rank-based tests replace observations with their ranks. Tied observations
//! share the average of the ranks they would have occupied, and the sizes of
//! the tie groups feed the variance corrections of those tests.

/// Ranks of a sample, 1-based, with ties resolved by averaging.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Rank of each value, in the order of the input.
    pub ranks: Vec<f64>,
    /// Sizes of every group of tied values (groups of size 1 are omitted).
    pub tie_groups: Vec<usize>,
}

impl Ranking {
    /// Ranks `values`, assigning tied values the average of their positions.
    ///
    /// # Examples
    ///
    /// ```
    /// # use uistudy_stats::rank::Ranking;
    /// let ranking = Ranking::new(&[10.0, 20.0, 10.0, 30.0]);
    /// assert_eq!(ranking.ranks, vec![1.5, 3.0, 1.5, 4.0]);
    /// assert_eq!(ranking.tie_groups, vec![2]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(values: &[f64]) -> Self {
        let mut order = (0..values.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let mut ranks = vec![0.0; values.len()];
        let mut tie_groups = vec![];

        let mut i = 0;
        while i < order.len() {
            let mut j = i;
            while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
                j += 1;
            }
            // positions i..=j are tied; their 1-based ranks are i+1..=j+1
            let average = (i + j) as f64 / 2.0 + 1.0;
            for &index in &order[i..=j] {
                ranks[index] = average;
            }
            let size = j - i + 1;
            if size > 1 {
                tie_groups.push(size);
            }
            i = j + 1;
        }

        Self { ranks, tie_groups }
    }

    /// Returns `true` if any two values were tied.
    #[must_use]
    pub fn has_ties(&self) -> bool {
        !self.tie_groups.is_empty()
    }

    /// Sum of `t^3 - t` over all tie groups.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn tie_term(&self) -> f64 {
        self.tie_groups
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum()
    }
}
