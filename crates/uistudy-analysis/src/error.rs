use chrono::{DateTime, Utc};

/// Conditions under which no analysis can be produced at all.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("No survey records to analyze")]
    EmptyInput,
    #[display("No usable interface ratings found in {records} survey records")]
    NoUsableData { records: usize },
    #[display("No ratings created after {cutoff} (out of {rows} rows)")]
    NoRowsAfterCutoff { cutoff: DateTime<Utc>, rows: usize },
}
