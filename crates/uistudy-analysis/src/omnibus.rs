//! Friedman omnibus test per question.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;
use uistudy_stats::friedman::FriedmanTest;

use crate::{
    flatten::NormalizedRow,
    matrix::ScoreMatrix,
    study::{Interface, Question},
};

/// Outcome of the Friedman test for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OmnibusResult {
    /// Interfaces compared, in canonical order.
    pub interfaces: Vec<Interface>,
    pub statistic: f64,
    pub p_value: f64,
    /// Number of participants with a score for every compared interface.
    pub n: usize,
}

/// Runs the Friedman test on every question that has complete cases.
///
/// All interfaces with data for a question are compared, using only the
/// participants who rated every one of them. A question is left out when
/// fewer than three interfaces have data or no participant is complete.
#[must_use]
pub fn run_friedman_tests(rows: &[NormalizedRow]) -> BTreeMap<Question, OmnibusResult> {
    let mut results = BTreeMap::new();
    for question in Question::ALL {
        let matrix = ScoreMatrix::new(rows, question);
        let interfaces = matrix.present_interfaces();
        let blocks = matrix.complete_blocks(&interfaces);
        let Some(test) = FriedmanTest::new(&blocks) else {
            debug!(
                %question,
                interfaces = interfaces.len(),
                complete = blocks.len(),
                "Skipping Friedman test without enough complete cases"
            );
            continue;
        };
        results.insert(
            question,
            OmnibusResult {
                interfaces,
                statistic: test.statistic,
                p_value: test.p_value,
                n: test.num_blocks,
            },
        );
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::row;

    fn three_interface_rows() -> Vec<NormalizedRow> {
        let mut rows = vec![];
        for (i, (c, d, y)) in [(6.0, 4.0, 2.0), (7.0, 5.0, 3.0), (5.0, 4.0, 1.0), (6.0, 3.0, 2.0)]
            .into_iter()
            .enumerate()
        {
            let id = format!("p{i}");
            rows.push(row(&id, Interface::C, [Some(c), Some(c), None, None]));
            rows.push(row(&id, Interface::D, [Some(d), Some(d), None, None]));
            rows.push(row(&id, Interface::Y, [Some(y), None, None, None]));
        }
        rows
    }

    #[test]
    fn test_friedman_on_complete_question() {
        let results = run_friedman_tests(&three_interface_rows());
        let q1 = &results[&Question::Q1];
        assert_eq!(
            q1.interfaces,
            vec![Interface::C, Interface::D, Interface::Y]
        );
        assert_eq!(q1.n, 4);
        assert!((q1.statistic - 8.0).abs() < 1e-12);
        assert!(q1.p_value < 0.05);
    }

    #[test]
    fn test_question_with_two_interfaces_is_omitted() {
        let results = run_friedman_tests(&three_interface_rows());
        // Q2 only has data for C and D; Q3 and Q4 have none
        assert!(!results.contains_key(&Question::Q2));
        assert!(!results.contains_key(&Question::Q3));
        assert!(!results.contains_key(&Question::Q4));
    }

    #[test]
    fn test_no_complete_participant_is_omitted() {
        let rows = vec![
            row("p1", Interface::C, [Some(1.0); 4]),
            row("p1", Interface::D, [Some(2.0); 4]),
            row("p2", Interface::Y, [Some(3.0); 4]),
        ];
        assert!(run_friedman_tests(&rows).is_empty());
    }

    #[test]
    fn test_incomplete_participants_are_excluded() {
        let mut rows = three_interface_rows();
        rows.push(row("late", Interface::C, [Some(1.0), None, None, None]));
        rows.push(row("late", Interface::D, [Some(7.0), None, None, None]));
        let results = run_friedman_tests(&rows);
        assert_eq!(results[&Question::Q1].n, 4);
    }
}
