use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::info;
use uistudy_analysis::{config::AnalysisConfig, flatten::parse_timestamp, pipeline, record::RawRecord};

use crate::{output, remote::RemoteArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Read survey responses from this JSON file instead of the remote table
    #[arg(long)]
    input: Option<PathBuf>,
    #[command(flatten)]
    remote: RemoteArg,
    /// Directory receiving one sub-directory per analysis group
    #[arg(long, default_value = "supabase_analysis")]
    output_dir: PathBuf,
    /// Only analyze ratings created strictly after this instant (RFC 3339)
    #[arg(long, value_parser = parse_cutoff)]
    created_after: Option<DateTime<Utc>>,
    /// Family-wise significance level of the pairwise tests
    #[arg(long, default_value_t = AnalysisConfig::DEFAULT_ALPHA)]
    alpha: f64,
    /// Minimum number of paired observations for a pairwise test
    #[arg(long, default_value_t = AnalysisConfig::DEFAULT_MIN_PAIRED_OBSERVATIONS)]
    min_paired: usize,
}

impl AnalyzeArg {
    pub(super) fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            alpha: self.alpha,
            min_paired_observations: self.min_paired,
            created_after: self.created_after,
            ..AnalysisConfig::default()
        }
    }
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let records: Vec<RawRecord> = match &arg.input {
        Some(path) => util::read_records_file(path)?,
        None => arg.remote.fetch_rows()?,
    };
    info!(records = records.len(), "Loaded survey responses");

    let analysis = pipeline::analyze(&records, &arg.config()).context("Analysis failed")?;
    output::write_analysis(&arg.output_dir, &analysis)?;
    info!(dir = %arg.output_dir.display(), "Saved all analysis results");
    Ok(())
}

fn parse_cutoff(text: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(text).ok_or_else(|| format!("invalid timestamp: {text}"))
}
