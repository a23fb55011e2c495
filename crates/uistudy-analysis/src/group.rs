//! Analysis groups and their assembled results.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    annotation::ChartData,
    config::AnalysisConfig,
    demographics::{DemographicSummary, unique_participants},
    descriptive::DescriptiveTable,
    exposure::folder_name,
    flatten::NormalizedRow,
    omnibus::{OmnibusResult, run_friedman_tests},
    pairwise::{PairwiseComparison, run_pairwise_wilcoxon},
    preference::PreferenceSummary,
    study::Question,
};

/// Label of the group holding every row.
pub const OVERALL_LABEL: &str = "overall";

/// A subset of rows analyzed on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisGroup {
    pub label: String,
    pub rows: Vec<NormalizedRow>,
}

impl AnalysisGroup {
    #[must_use]
    pub fn overall(rows: &[NormalizedRow]) -> Self {
        Self {
            label: OVERALL_LABEL.to_owned(),
            rows: rows.to_vec(),
        }
    }

    /// One group per distinct data folder, ordered by label.
    ///
    /// Rows without a data folder, or with a blank one, form the `data_unknown`
    /// group. Folders whose labels coincide after sanitizing get a numeric
    /// suffix (`data_set_a`, `data_set_a_2`).
    #[must_use]
    pub fn by_data_folder(rows: &[NormalizedRow]) -> Vec<Self> {
        let mut folders = BTreeMap::<Option<&str>, Vec<NormalizedRow>>::new();
        for row in rows {
            let folder = row
                .data_folder
                .as_deref()
                .filter(|folder| !folder.trim().is_empty());
            folders.entry(folder).or_default().push(row.clone());
        }

        let mut taken = BTreeSet::new();
        let mut groups = folders
            .into_iter()
            .map(|(folder, rows)| {
                let base = folder_label(folder);
                let mut label = base.clone();
                let mut suffix = 2;
                while !taken.insert(label.clone()) {
                    label = format!("{base}_{suffix}");
                    suffix += 1;
                }
                Self { label, rows }
            })
            .collect::<Vec<_>>();
        groups.sort_by(|a, b| a.label.cmp(&b.label));
        groups
    }
}

/// `data_{folder}` with path separators replaced, so the label is a valid file name.
#[must_use]
pub fn folder_label(folder: Option<&str>) -> String {
    format!("data_{}", folder_name(folder)).replace(['/', '\\'], "_")
}

/// Everything computed for one analysis group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResult {
    pub label: String,
    pub num_rows: usize,
    pub num_participants: usize,
    pub descriptive: DescriptiveTable,
    pub friedman: BTreeMap<Question, OmnibusResult>,
    pub pairwise_wilcoxon: BTreeMap<Question, Vec<PairwiseComparison>>,
    pub demographics: DemographicSummary,
    pub preference: PreferenceSummary,
    pub chart: ChartData,
    /// Rows the results were computed from.
    #[serde(skip)]
    pub rows: Vec<NormalizedRow>,
}

impl GroupResult {
    #[must_use]
    pub fn analyze(group: AnalysisGroup, config: &AnalysisConfig) -> Self {
        let AnalysisGroup { label, rows } = group;
        let descriptive = DescriptiveTable::from_rows(&rows);
        let friedman = run_friedman_tests(&rows);
        let pairwise_wilcoxon = run_pairwise_wilcoxon(&rows, config);
        let chart = ChartData::new(
            &label,
            &descriptive,
            &pairwise_wilcoxon,
            config.bracket_layout,
        );
        Self {
            num_rows: rows.len(),
            num_participants: unique_participants(&rows).len(),
            demographics: DemographicSummary::from_rows(&rows),
            preference: PreferenceSummary::from_rows(&rows),
            label,
            descriptive,
            friedman,
            pairwise_wilcoxon,
            chart,
            rows,
        }
    }

    /// The significance tests alone.
    #[must_use]
    pub fn stats_report(&self) -> StatsReport<'_> {
        StatsReport {
            friedman: &self.friedman,
            pairwise_wilcoxon: &self.pairwise_wilcoxon,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatsReport<'a> {
    pub friedman: &'a BTreeMap<Question, OmnibusResult>,
    pub pairwise_wilcoxon: &'a BTreeMap<Question, Vec<PairwiseComparison>>,
}
