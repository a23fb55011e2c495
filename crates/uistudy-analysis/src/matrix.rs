//! Participant × interface score matrix for one question.
//!
//! Repeated-measures tests need the observations of one participant lined up
//! across interfaces. The matrix has one row per `participant_id` (sorted)
//! and one cell per interface; a participant rated twice on the same
//! interface gets the mean of those ratings.

use std::collections::BTreeMap;

use crate::{
    flatten::NormalizedRow,
    study::{Interface, Question},
};

#[derive(Debug, Clone)]
pub struct ScoreMatrix<'a> {
    cells: BTreeMap<&'a str, [Option<f64>; Interface::COUNT]>,
}

impl<'a> ScoreMatrix<'a> {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(rows: &'a [NormalizedRow], question: Question) -> Self {
        let mut sums = BTreeMap::<&str, [(f64, usize); Interface::COUNT]>::new();
        for row in rows {
            let Some(score) = row.score(question) else {
                continue;
            };
            let cell = &mut sums
                .entry(row.participant_id.as_str())
                .or_insert([(0.0, 0); Interface::COUNT])[row.interface.index()];
            cell.0 += score;
            cell.1 += 1;
        }

        let cells = sums
            .into_iter()
            .map(|(participant, cells)| {
                let means = cells.map(|(sum, count)| (count > 0).then(|| sum / count as f64));
                (participant, means)
            })
            .collect();
        Self { cells }
    }

    /// Interfaces with at least one observation, in canonical order.
    #[must_use]
    pub fn present_interfaces(&self) -> Vec<Interface> {
        Interface::ALL
            .into_iter()
            .filter(|interface| {
                self.cells
                    .values()
                    .any(|cells| cells[interface.index()].is_some())
            })
            .collect()
    }

    /// Rows of participants observed on every one of `interfaces`.
    ///
    /// Each returned block lists the scores in the order of `interfaces`.
    #[must_use]
    pub fn complete_blocks(&self, interfaces: &[Interface]) -> Vec<Vec<f64>> {
        self.cells
            .values()
            .filter_map(|cells| {
                interfaces
                    .iter()
                    .map(|interface| cells[interface.index()])
                    .collect::<Option<Vec<_>>>()
            })
            .collect()
    }

    /// Aligned scores of participants observed on both `a` and `b`.
    #[must_use]
    pub fn paired(&self, a: Interface, b: Interface) -> (Vec<f64>, Vec<f64>) {
        self.cells
            .values()
            .filter_map(|cells| Some((cells[a.index()]?, cells[b.index()]?)))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::row;

    #[test]
    fn test_present_interfaces_ignore_missing_scores() {
        let rows = vec![
            row("p1", Interface::C, [Some(5.0), None, None, None]),
            row("p1", Interface::Y, [None, Some(2.0), None, None]),
            row("p2", Interface::D, [Some(3.0), None, None, None]),
        ];
        let matrix = ScoreMatrix::new(&rows, Question::Q1);
        assert_eq!(
            matrix.present_interfaces(),
            vec![Interface::C, Interface::D]
        );
    }

    #[test]
    fn test_complete_blocks_drop_partial_participants() {
        let rows = vec![
            row("p1", Interface::C, [Some(5.0); 4]),
            row("p1", Interface::D, [Some(4.0); 4]),
            row("p1", Interface::Y, [Some(3.0); 4]),
            row("p2", Interface::C, [Some(6.0); 4]),
            row("p2", Interface::D, [None; 4]),
            row("p2", Interface::Y, [Some(1.0); 4]),
        ];
        let matrix = ScoreMatrix::new(&rows, Question::Q2);
        let blocks = matrix.complete_blocks(&[Interface::C, Interface::D, Interface::Y]);
        assert_eq!(blocks, vec![vec![5.0, 4.0, 3.0]]);

        let (c, y) = matrix.paired(Interface::C, Interface::Y);
        assert_eq!(c, vec![5.0, 6.0]);
        assert_eq!(y, vec![3.0, 1.0]);
    }

    #[test]
    fn test_duplicate_cells_are_averaged() {
        let rows = vec![
            row("p1", Interface::C, [Some(4.0), None, None, None]),
            row("p1", Interface::C, [Some(6.0), None, None, None]),
            row("p1", Interface::D, [Some(2.0), None, None, None]),
        ];
        let matrix = ScoreMatrix::new(&rows, Question::Q1);
        let (c, d) = matrix.paired(Interface::C, Interface::D);
        assert_eq!(c, vec![5.0]);
        assert_eq!(d, vec![2.0]);
    }
}
