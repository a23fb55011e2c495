//! Overall interface preference tallies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{demographics::unique_participants, flatten::NormalizedRow, study::Interface};

/// Preferred-interface answers of the distinct participants.
///
/// `matched + other + missing == participants` always holds, where
/// `matched` is the sum of [`PreferenceSummary::counts`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceSummary {
    pub participants: usize,
    /// Count per interface; every interface is present, possibly with zero.
    pub counts: BTreeMap<Interface, usize>,
    /// Answers that are not an interface code, keyed by normalized answer.
    pub other_codes: BTreeMap<String, usize>,
    /// Total of [`PreferenceSummary::other_codes`].
    pub other: usize,
    /// Participants without an answer.
    pub missing: usize,
}

impl PreferenceSummary {
    #[must_use]
    pub fn from_rows(rows: &[NormalizedRow]) -> Self {
        let participants = unique_participants(rows);
        let mut counts = Interface::ALL
            .into_iter()
            .map(|interface| (interface, 0))
            .collect::<BTreeMap<_, _>>();
        let mut other_codes = BTreeMap::<String, usize>::new();
        let mut missing = 0;

        for row in &participants {
            let answer = row
                .preferred_interface
                .as_deref()
                .map(|answer| answer.trim().to_uppercase())
                .filter(|answer| !answer.is_empty());
            match answer {
                None => missing += 1,
                Some(answer) => match Interface::from_code(&answer) {
                    Some(interface) => *counts.entry(interface).or_default() += 1,
                    None => *other_codes.entry(answer).or_default() += 1,
                },
            }
        }

        Self {
            participants: participants.len(),
            counts,
            other: other_codes.values().sum(),
            other_codes,
            missing,
        }
    }

    /// Participants whose answer is an interface code.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.counts.values().sum()
    }

    /// Share of all participants, in percent; `0` when there are no participants.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn rate(&self, count: usize) -> f64 {
        if self.participants == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.participants as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::row;

    fn participant(id: &str, preferred: Option<&str>) -> Vec<NormalizedRow> {
        [Interface::C, Interface::Y]
            .into_iter()
            .map(|interface| {
                let mut r = row(id, interface, [Some(3.0); 4]);
                r.preferred_interface = preferred.map(str::to_owned);
                r
            })
            .collect()
    }

    #[test]
    fn test_preference_partition() {
        let rows = [
            participant("p1", Some(" d1 ")),
            participant("p2", Some("C")),
            participant("p3", Some("c")),
            participant("p4", Some("none")),
            participant("p5", Some("")),
            participant("p6", None),
        ]
        .concat();
        let summary = PreferenceSummary::from_rows(&rows);

        assert_eq!(summary.participants, 6);
        assert_eq!(summary.counts[&Interface::C], 2);
        assert_eq!(summary.counts[&Interface::D1], 1);
        assert_eq!(summary.counts[&Interface::Y1], 0);
        assert_eq!(summary.other_codes.get("NONE"), Some(&1));
        assert_eq!(summary.other, 1);
        assert_eq!(summary.missing, 2);
        assert_eq!(
            summary.matched() + summary.other + summary.missing,
            summary.participants
        );
        assert!((summary.rate(summary.counts[&Interface::C]) - 100.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_rows() {
        let summary = PreferenceSummary::from_rows(&[]);
        assert_eq!(summary.participants, 0);
        assert!(summary.rate(0).abs() < f64::EPSILON);
    }
}
