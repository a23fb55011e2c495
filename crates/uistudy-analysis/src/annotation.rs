//! Chart data with significance brackets.
//!
//! Each question is drawn as one bar per interface (mean with a standard
//! deviation whisker). Every pair that stays significant after correction gets
//! a bracket above the bars. Brackets are stacked on their own level in
//! pairwise order so that they never overlap:
//!
//! ```text
//! y = max_bar_height + margin + level * step
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    descriptive::DescriptiveTable,
    pairwise::PairwiseComparison,
    study::{Interface, Question},
};

/// Vertical placement of significance brackets, in score units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BracketLayout {
    /// Gap between the tallest bar and the first bracket.
    pub margin: f64,
    /// Gap between consecutive bracket levels.
    pub step: f64,
}

impl BracketLayout {
    pub const DEFAULT_MARGIN: f64 = 0.2;
    pub const DEFAULT_STEP: f64 = 0.4;
}

impl Default for BracketLayout {
    fn default() -> Self {
        Self {
            margin: Self::DEFAULT_MARGIN,
            step: Self::DEFAULT_STEP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    pub interface: Interface,
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl Bar {
    /// Top of the whisker; `None` when the bar has no mean.
    ///
    /// An undefined standard deviation draws no whisker.
    #[must_use]
    pub fn top(&self) -> Option<f64> {
        if self.mean.is_nan() {
            return None;
        }
        let whisker = if self.std_dev.is_nan() {
            0.0
        } else {
            self.std_dev
        };
        Some(self.mean + whisker)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bracket {
    pub interface_a: Interface,
    pub interface_b: Interface,
    /// Stacking level, `0` being the lowest.
    pub level: usize,
    pub y: f64,
    pub p_value_holm: f64,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionChart {
    pub question: Question,
    pub bars: Vec<Bar>,
    pub brackets: Vec<Bracket>,
}

/// Chart data of one analysis group, one entry per question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub label: String,
    pub questions: Vec<QuestionChart>,
}

impl ChartData {
    /// Builds bars for every interface with data and brackets for every
    /// rejected pair.
    #[must_use]
    pub fn new(
        label: &str,
        descriptive: &DescriptiveTable,
        pairwise: &BTreeMap<Question, Vec<PairwiseComparison>>,
        layout: BracketLayout,
    ) -> Self {
        let questions = Question::ALL
            .into_iter()
            .map(|question| {
                let bars = Interface::ALL
                    .into_iter()
                    .map(|interface| descriptive.get(interface, question))
                    .filter(|stat| stat.count > 0)
                    .map(|stat| Bar {
                        interface: stat.interface,
                        mean: stat.mean,
                        std_dev: stat.std_dev,
                        count: stat.count,
                    })
                    .collect::<Vec<_>>();
                let comparisons = pairwise.get(&question).map_or(&[][..], Vec::as_slice);
                let brackets = layout_brackets(&bars, comparisons, layout);
                QuestionChart {
                    question,
                    bars,
                    brackets,
                }
            })
            .collect();
        Self {
            label: label.to_owned(),
            questions,
        }
    }
}

/// Height of the tallest whisker, `0` when no bar has a mean.
#[must_use]
pub fn max_bar_height(bars: &[Bar]) -> f64 {
    bars.iter()
        .filter_map(Bar::top)
        .fold(None, |max: Option<f64>, top| {
            Some(max.map_or(top, |max| max.max(top)))
        })
        .unwrap_or(0.0)
}

/// Places one bracket per rejected comparison, keeping the comparison order.
#[must_use]
pub fn layout_brackets(
    bars: &[Bar],
    comparisons: &[PairwiseComparison],
    layout: BracketLayout,
) -> Vec<Bracket> {
    let base = max_bar_height(bars) + layout.margin;
    comparisons
        .iter()
        .filter(|comparison| comparison.reject_null)
        .enumerate()
        .map(|(level, comparison)| {
            #[expect(clippy::cast_precision_loss)]
            let y = base + level as f64 * layout.step;
            Bracket {
                interface_a: comparison.interface_a,
                interface_b: comparison.interface_b,
                level,
                y,
                p_value_holm: comparison.p_value_holm,
                label: significance_label(comparison.p_value_holm),
            }
        })
        .collect()
}

/// Star notation of an adjusted p-value.
#[must_use]
pub fn significance_label(p_value: f64) -> &'static str {
    if p_value < 0.001 {
        "***"
    } else if p_value < 0.01 {
        "**"
    } else {
        "*"
    }
}
