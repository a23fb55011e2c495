//! End-to-end analysis of a batch of survey records.

use tracing::info;

use crate::{
    config::AnalysisConfig,
    error::AnalysisError,
    flatten::{NormalizedRow, flatten_records, retain_created_after},
    group::{AnalysisGroup, GroupResult},
    record::RawRecord,
    report::OverallReport,
};

/// Results of every analysis group of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyAnalysis {
    pub overall: GroupResult,
    /// One result per data folder, ordered by label.
    pub folders: Vec<GroupResult>,
    pub report: OverallReport,
}

impl StudyAnalysis {
    /// The overall group followed by the data-folder groups.
    pub fn groups(&self) -> impl Iterator<Item = &GroupResult> {
        std::iter::once(&self.overall).chain(&self.folders)
    }
}

/// Flattens `records`, applies the time filter and analyzes every group.
///
/// # Errors
///
/// Fails when no row is left to analyze; see [`flatten_records`] and
/// [`retain_created_after`].
pub fn analyze(
    records: &[RawRecord],
    config: &AnalysisConfig,
) -> Result<StudyAnalysis, AnalysisError> {
    let mut rows = flatten_records(records)?;
    info!(
        records = records.len(),
        rows = rows.len(),
        "Flattened survey records"
    );
    if let Some(cutoff) = config.created_after {
        rows = retain_created_after(rows, cutoff)?;
        info!(%cutoff, rows = rows.len(), "Kept ratings created after cutoff");
    }
    Ok(analyze_rows(&rows, config))
}

/// Analyzes already normalized rows.
#[must_use]
pub fn analyze_rows(rows: &[NormalizedRow], config: &AnalysisConfig) -> StudyAnalysis {
    let overall = analyze_group(AnalysisGroup::overall(rows), config);
    let folders = AnalysisGroup::by_data_folder(rows)
        .into_iter()
        .map(|group| analyze_group(group, config))
        .collect();
    let report = OverallReport::new(&overall);
    StudyAnalysis {
        overall,
        folders,
        report,
    }
}

fn analyze_group(group: AnalysisGroup, config: &AnalysisConfig) -> GroupResult {
    let result = GroupResult::analyze(group, config);
    info!(
        label = %result.label,
        rows = result.num_rows,
        participants = result.num_participants,
        friedman = result.friedman.len(),
        pairwise = result.pairwise_wilcoxon.values().map(Vec::len).sum::<usize>(),
        "Analyzed group"
    );
    result
}
