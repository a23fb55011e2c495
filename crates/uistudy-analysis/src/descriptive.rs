//! Per-interface, per-question descriptive statistics.

use serde::Serialize;
use uistudy_stats::descriptive::DescriptiveStats;

use crate::{
    flatten::NormalizedRow,
    study::{Interface, Question},
};

/// Summary of the non-missing scores of one interface on one question.
///
/// `mean` and `std_dev` are `NaN` (serialized as `null`) when there are too
/// few observations: no observation for the mean, fewer than two for the
/// sample standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveStat {
    pub interface: Interface,
    pub question: Question,
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

/// Descriptive statistics for every interface and question.
///
/// Entries are ordered by interface, then question, and always cover all
/// interfaces and questions of the study.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveTable {
    pub entries: Vec<DescriptiveStat>,
}

impl DescriptiveTable {
    #[must_use]
    pub fn from_rows(rows: &[NormalizedRow]) -> Self {
        let entries = Interface::ALL
            .into_iter()
            .flat_map(|interface| {
                Question::ALL.into_iter().map(move |question| {
                    let scores = rows
                        .iter()
                        .filter(|row| row.interface == interface)
                        .filter_map(|row| row.score(question));
                    summarize(interface, question, scores)
                })
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, interface: Interface, question: Question) -> &DescriptiveStat {
        &self.entries[interface.index() * Question::COUNT + question.index()]
    }
}

fn summarize<I>(interface: Interface, question: Question, scores: I) -> DescriptiveStat
where
    I: IntoIterator<Item = f64>,
{
    match DescriptiveStats::new(scores) {
        Some(stats) => DescriptiveStat {
            interface,
            question,
            mean: stats.mean,
            std_dev: stats.std_dev,
            count: stats.count,
        },
        None => DescriptiveStat {
            interface,
            question,
            mean: f64::NAN,
            std_dev: f64::NAN,
            count: 0,
        },
    }
}
