/// Descriptive statistics summarizing a sample.
///
/// Dispersion uses the sample convention (divisor `n - 1`). A sample with a
/// single value therefore has an undefined (`NaN`) variance and standard
/// deviation, while its mean, median and range are well defined.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values in the sample.
    pub count: usize,
    /// The minimum value in the sample.
    pub min: f64,
    /// The maximum value in the sample.
    pub max: f64,
    /// The arithmetic mean of the sample.
    pub mean: f64,
    /// The median of the sample (mean of the two middle values for even counts).
    pub median: f64,
    /// The sample variance (`NaN` when `count < 2`).
    pub variance: f64,
    /// The sample standard deviation (`NaN` when `count < 2`).
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the sample contains at least one value
    /// * `None` - if the sample is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use uistudy_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.variance, 2.5);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use uistudy_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::from_sorted(&[7.0]).unwrap();
    /// assert_eq!(stats.mean, 7.0);
    /// assert!(stats.std_dev.is_nan());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let mid = count / 2;
        let median = if count % 2 == 0 {
            f64::midpoint(sorted_values[mid - 1], sorted_values[mid])
        } else {
            sorted_values[mid]
        };
        let variance = if count < 2 {
            f64::NAN
        } else {
            sorted_values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0)
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}
