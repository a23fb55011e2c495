//! Multiple-comparison correction.

/// Holm-Bonferroni step-down correction of a family of p-values.
///
/// Both vectors are in the order of the input p-values.
#[derive(Debug, Clone, PartialEq)]
pub struct HolmCorrection {
    /// Holm-adjusted p-values, capped at `1`.
    pub adjusted: Vec<f64>,
    /// Whether each null hypothesis is rejected at the family-wise level `alpha`.
    pub reject: Vec<bool>,
}

impl HolmCorrection {
    /// Applies the Holm step-down procedure to `p_values` at level `alpha`.
    ///
    /// The p-values are tested in ascending order, the `i`-th smallest
    /// (0-based) against `alpha / (m - i)`. Testing stops at the first
    /// p-value that fails its threshold: it and every larger p-value are
    /// retained. Adjusted p-values are `(m - i) * p` made non-decreasing in
    /// that same order.
    ///
    /// `NaN` p-values sort last and are never rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// # use uistudy_stats::multitest::HolmCorrection;
    /// let holm = HolmCorrection::new(&[0.01, 0.04, 0.03], 0.05);
    /// assert_eq!(holm.reject, vec![true, false, false]);
    /// assert!((holm.adjusted[0] - 0.03).abs() < 1e-12);
    /// assert!((holm.adjusted[1] - 0.06).abs() < 1e-12);
    /// assert!((holm.adjusted[2] - 0.06).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(p_values: &[f64], alpha: f64) -> Self {
        let m = p_values.len();
        let mut order = (0..m).collect::<Vec<_>>();
        order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

        let mut adjusted = vec![f64::NAN; m];
        let mut reject = vec![false; m];
        let mut running_max = 0.0_f64;
        let mut still_rejecting = true;

        for (rank, &index) in order.iter().enumerate() {
            let p = p_values[index];
            if p.is_nan() {
                still_rejecting = false;
                continue;
            }
            let remaining = (m - rank) as f64;
            still_rejecting = still_rejecting && p <= alpha / remaining;
            reject[index] = still_rejecting;
            running_max = running_max.max((remaining * p).min(1.0));
            adjusted[index] = running_max;
        }

        Self { adjusted, reject }
    }
}
