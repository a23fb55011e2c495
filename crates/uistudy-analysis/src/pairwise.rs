//! Post-hoc pairwise Wilcoxon signed-rank tests with Holm correction.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;
use uistudy_stats::{multitest::HolmCorrection, wilcoxon::WilcoxonSignedRank};

use crate::{
    config::AnalysisConfig,
    flatten::NormalizedRow,
    matrix::ScoreMatrix,
    study::{Interface, Question},
};

/// Outcome of the paired comparison of two interfaces on one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseComparison {
    pub interface_a: Interface,
    pub interface_b: Interface,
    /// Wilcoxon statistic `min(W+, W-)`.
    pub statistic: f64,
    /// Uncorrected two-sided p-value.
    pub p_value: f64,
    /// Holm-adjusted p-value within the question's family of tests.
    pub p_value_holm: f64,
    /// Whether the difference is significant after correction.
    pub reject_null: bool,
    /// Participants with a score for both interfaces on this question.
    pub n_paired: usize,
    /// Participants with any answered question under both interfaces.
    pub n: usize,
}

/// Runs every pairwise test per question and corrects each question's family.
///
/// Pairs are formed from the interfaces with data for the question, in
/// canonical order. A pair is skipped when fewer than
/// [`AnalysisConfig::min_paired_observations`] participants rated both
/// interfaces; a question is left out when none of its pairs was tested.
/// Results keep the pair order, not the p-value order.
#[must_use]
pub fn run_pairwise_wilcoxon(
    rows: &[NormalizedRow],
    config: &AnalysisConfig,
) -> BTreeMap<Question, Vec<PairwiseComparison>> {
    let mut results = BTreeMap::new();
    for question in Question::ALL {
        let matrix = ScoreMatrix::new(rows, question);
        let interfaces = matrix.present_interfaces();

        let mut tested = vec![];
        for (a, b) in Interface::pairs(&interfaces) {
            let (scores_a, scores_b) = matrix.paired(a, b);
            if scores_a.len() < config.min_paired_observations {
                debug!(%question, %a, %b, paired = scores_a.len(), "Skipping pair with too few observations");
                continue;
            }
            if let Some(test) = WilcoxonSignedRank::new(&scores_a, &scores_b) {
                tested.push((a, b, test, scores_a.len()));
            }
        }
        if tested.is_empty() {
            continue;
        }

        let p_values = tested
            .iter()
            .map(|(_, _, test, _)| test.p_value)
            .collect::<Vec<_>>();
        let holm = HolmCorrection::new(&p_values, config.alpha);

        let comparisons = tested
            .into_iter()
            .zip(holm.adjusted)
            .zip(holm.reject)
            .map(
                |(((a, b, test, n_paired), p_value_holm), reject_null)| PairwiseComparison {
                    interface_a: a,
                    interface_b: b,
                    statistic: test.statistic,
                    p_value: test.p_value,
                    p_value_holm,
                    reject_null,
                    n_paired,
                    n: count_participants_rating_both(rows, a, b),
                },
            )
            .collect();
        results.insert(question, comparisons);
    }
    results
}

fn count_participants_rating_both(rows: &[NormalizedRow], a: Interface, b: Interface) -> usize {
    let answered = |interface: Interface| {
        rows.iter()
            .filter(|row| row.interface == interface && row.scores.any_answered())
            .map(|row| row.participant_id.as_str())
            .collect::<BTreeSet<_>>()
    };
    answered(a).intersection(&answered(b)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::row;

    fn rows_for(scores: &[(Interface, [f64; 6])]) -> Vec<NormalizedRow> {
        let mut rows = vec![];
        for (interface, values) in scores {
            for (i, value) in values.iter().enumerate() {
                rows.push(row(
                    &format!("p{i}"),
                    *interface,
                    [Some(*value), None, None, None],
                ));
            }
        }
        rows
    }

    #[test]
    fn test_single_pair_holm_equals_raw() {
        let rows = rows_for(&[
            (Interface::C, [5.0, 6.0, 4.0, 7.0, 5.0, 6.0]),
            (Interface::D, [3.0, 4.0, 2.0, 5.0, 3.0, 4.0]),
        ]);
        let results = run_pairwise_wilcoxon(&rows, &AnalysisConfig::default());
        let q1 = &results[&Question::Q1];
        assert_eq!(q1.len(), 1);

        let pair = &q1[0];
        assert_eq!(
            (pair.interface_a, pair.interface_b),
            (Interface::C, Interface::D)
        );
        assert_eq!(pair.n_paired, 6);
        assert_eq!(pair.n, 6);
        assert!(pair.statistic.abs() < 1e-12);
        assert!(pair.p_value > 0.0 && pair.p_value < 0.05);
        assert!((pair.p_value_holm - pair.p_value).abs() < f64::EPSILON);
        assert!(pair.reject_null);
        assert!(!results.contains_key(&Question::Q2));
    }

    #[test]
    fn test_pairs_below_threshold_are_skipped() {
        let mut rows = rows_for(&[
            (Interface::C, [5.0, 6.0, 4.0, 7.0, 5.0, 6.0]),
            (Interface::D, [3.0, 4.0, 2.0, 5.0, 3.0, 4.0]),
        ]);
        // Y is rated by four participants only
        for i in 0..4 {
            rows.push(row(&format!("p{i}"), Interface::Y, [Some(1.0), None, None, None]));
        }
        let results = run_pairwise_wilcoxon(&rows, &AnalysisConfig::default());
        assert_eq!(results[&Question::Q1].len(), 1);

        let relaxed = AnalysisConfig {
            min_paired_observations: 4,
            ..AnalysisConfig::default()
        };
        let results = run_pairwise_wilcoxon(&rows, &relaxed);
        let pairs = results[&Question::Q1]
            .iter()
            .map(|c| (c.interface_a, c.interface_b))
            .collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![
                (Interface::C, Interface::D),
                (Interface::C, Interface::Y),
                (Interface::D, Interface::Y),
            ]
        );
    }

    #[test]
    fn test_holm_is_monotone_across_pairs() {
        let rows = rows_for(&[
            (Interface::C, [7.0, 6.0, 7.0, 6.0, 7.0, 6.0]),
            (Interface::D, [1.0, 2.0, 1.0, 2.0, 1.0, 2.0]),
            (Interface::D1, [6.0, 6.0, 7.0, 5.0, 7.0, 7.0]),
            (Interface::Y1, [4.0, 3.0, 5.0, 4.0, 2.0, 6.0]),
        ]);
        let results = run_pairwise_wilcoxon(&rows, &AnalysisConfig::default());
        let mut q1 = results[&Question::Q1].clone();
        assert_eq!(q1.len(), 6);
        assert_eq!(
            (q1[5].interface_a, q1[5].interface_b),
            (Interface::D1, Interface::Y1)
        );

        q1.sort_by(|x, y| x.p_value.total_cmp(&y.p_value));
        for pair in q1.windows(2) {
            assert!(pair[0].p_value_holm <= pair[1].p_value_holm);
            assert!(pair[0].reject_null || !pair[1].reject_null);
        }
        assert!(q1.iter().all(|c| c.p_value_holm >= c.p_value));
    }

    #[test]
    fn test_reporting_count_is_broader_than_paired_count() {
        let mut rows = rows_for(&[
            (Interface::C, [5.0, 6.0, 4.0, 7.0, 5.0, 6.0]),
            (Interface::D, [3.0, 4.0, 2.0, 5.0, 3.0, 4.0]),
        ]);
        // a seventh participant answered only Q2 under both interfaces
        rows.push(row("p6", Interface::C, [None, Some(3.0), None, None]));
        rows.push(row("p6", Interface::D, [None, Some(4.0), None, None]));
        let results = run_pairwise_wilcoxon(&rows, &AnalysisConfig::default());
        let pair = &results[&Question::Q1][0];
        assert_eq!(pair.n_paired, 6);
        assert_eq!(pair.n, 7);
    }
}
