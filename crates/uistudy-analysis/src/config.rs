use chrono::{DateTime, Utc};

use crate::annotation::BracketLayout;

/// Parameters of an analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Family-wise significance level for the Holm-corrected pairwise tests.
    pub alpha: f64,
    /// Minimum number of paired observations for a pairwise test to run.
    pub min_paired_observations: usize,
    /// Keep only ratings created strictly after this instant.
    pub created_after: Option<DateTime<Utc>>,
    /// Vertical placement of significance brackets in charts.
    pub bracket_layout: BracketLayout,
}

impl AnalysisConfig {
    pub const DEFAULT_ALPHA: f64 = 0.05;
    pub const DEFAULT_MIN_PAIRED_OBSERVATIONS: usize = 5;
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            min_paired_observations: Self::DEFAULT_MIN_PAIRED_OBSERVATIONS,
            created_after: None,
            bracket_layout: BracketLayout::default(),
        }
    }
}
