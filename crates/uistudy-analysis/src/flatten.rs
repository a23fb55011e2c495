//! Normalization of nested survey records into one row per rated interface.
//!
//! Every downstream statistic works on [`NormalizedRow`]s: a participant who
//! rated three interfaces contributes three rows that share the same
//! `participant_id`, which is the join key for all paired tests.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::{
    error::AnalysisError,
    record::{InterfacePayload, PairingInfo, RawRecord, ScoreKey},
    study::{Interface, Question},
};

/// Ratings of one participant for one interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub participant_id: String,
    pub name: Option<String>,
    /// Age as entered; coerced to a number only when aggregated.
    pub age: Option<String>,
    pub gender: Option<String>,
    pub interface: Interface,
    pub data_folder: Option<String>,
    pub html_file: Option<String>,
    pub scores: QuestionScores,
    pub preferred_interface: Option<String>,
    pub preferred_reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub pairing_index: Option<i64>,
    pub pairing_number: Option<i64>,
}

impl NormalizedRow {
    /// Score for `question`, `None` when missing.
    #[must_use]
    pub fn score(&self, question: Question) -> Option<f64> {
        self.scores.get(question)
    }
}

/// Scores for Q1 to Q4; missing answers stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct QuestionScores(pub [Option<f64>; Question::COUNT]);

impl QuestionScores {
    #[must_use]
    pub fn get(&self, question: Question) -> Option<f64> {
        self.0[question.index()]
    }

    /// Returns `true` if at least one question was answered.
    #[must_use]
    pub fn any_answered(&self) -> bool {
        self.0.iter().any(Option::is_some)
    }
}

/// Flattens one record into rows, one per recognized, non-empty interface entry.
///
/// Metadata keys (prefixed with `_`), unknown interface codes and empty
/// payloads produce no row.
#[must_use]
pub fn flatten_record(record: &RawRecord) -> Vec<NormalizedRow> {
    let participant_id = record.participant_key();
    let fields = record.participant_fields();
    let name = fields.text("name");
    let age = fields.text("age");
    let gender = fields.text("gender");
    let created_at = record.created_at.as_deref().and_then(parse_timestamp);
    let PairingInfo {
        permutation_index,
        permutation_number,
    } = record.pairing_info();

    let mut rows = vec![];
    for (key, value) in record.score_entries() {
        let interface = match ScoreKey::classify(key) {
            ScoreKey::Interface(interface) => interface,
            ScoreKey::Metadata(_) => continue,
            ScoreKey::Unrecognized(code) => {
                debug!(%participant_id, code, "Skipping unrecognized interface code");
                continue;
            }
        };
        let Some(payload) = InterfacePayload::from_value(value) else {
            debug!(%participant_id, %interface, "Skipping empty interface payload");
            continue;
        };

        rows.push(NormalizedRow {
            participant_id: participant_id.clone(),
            name: name.clone(),
            age: age.clone(),
            gender: gender.clone(),
            interface,
            data_folder: payload.data_folder,
            html_file: payload.html_file,
            scores: QuestionScores(payload.scores),
            preferred_interface: record.preferred_interface.clone(),
            preferred_reason: record.preferred_reason.clone(),
            created_at,
            pairing_index: permutation_index,
            pairing_number: permutation_number,
        });
    }
    rows
}

/// Flattens a batch of records, preserving record and key order.
///
/// # Errors
///
/// * [`AnalysisError::EmptyInput`] - if `records` is empty
/// * [`AnalysisError::NoUsableData`] - if no record yields a row
pub fn flatten_records(records: &[RawRecord]) -> Result<Vec<NormalizedRow>, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    let rows = records.iter().flat_map(flatten_record).collect::<Vec<_>>();
    if rows.is_empty() {
        return Err(AnalysisError::NoUsableData {
            records: records.len(),
        });
    }
    debug!(
        records = records.len(),
        rows = rows.len(),
        "Flattened survey records"
    );
    Ok(rows)
}

/// Keeps rows created strictly after `cutoff`; rows without a timestamp are dropped.
///
/// # Errors
///
/// * [`AnalysisError::NoRowsAfterCutoff`] - if no row remains
pub fn retain_created_after(
    rows: Vec<NormalizedRow>,
    cutoff: DateTime<Utc>,
) -> Result<Vec<NormalizedRow>, AnalysisError> {
    let total = rows.len();
    let kept = rows
        .into_iter()
        .filter(|row| row.created_at.is_some_and(|created| created > cutoff))
        .collect::<Vec<_>>();
    if kept.is_empty() {
        return Err(AnalysisError::NoRowsAfterCutoff {
            cutoff,
            rows: total,
        });
    }
    debug!(%cutoff, kept = kept.len(), dropped = total - kept.len(), "Applied time filter");
    Ok(kept)
}

/// Parses an RFC 3339 timestamp, or a naive ISO 8601 one interpreted as UTC.
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    fn sample_record() -> RawRecord {
        record(json!({
            "id": "p1",
            "participant": { "name": "Kim", "age": 27 },
            "gender": "M",
            "question_scores": {
                "D": { "dataFolder": "scene_b", "htmlFile": "d.html", "scores": { "Q1": 3, "Q2": 4 } },
                "X9": { "dataFolder": "scene_c", "scores": { "Q1": 1 } },
                "C": { "dataFolder": "scene_a", "htmlFile": "c.html", "scores": { "Q1": 5, "Q2": 6, "Q3": 4, "Q4": 7 } },
                "Y": null,
                "_pairing_info": { "permutation_index": 1, "permutation_number": 2 }
            },
            "preferred_interface": " c ",
            "created_at": "2025-11-26T09:12:44.512+09:00"
        }))
    }

    #[test]
    fn test_flatten_record_fields() {
        let rows = flatten_record(&sample_record());
        assert_eq!(rows.len(), 2);

        let d = &rows[0];
        assert_eq!(d.participant_id, "p1");
        assert_eq!(d.interface, Interface::D);
        assert_eq!(d.name.as_deref(), Some("Kim"));
        assert_eq!(d.age.as_deref(), Some("27"));
        assert_eq!(d.gender.as_deref(), Some("M"));
        assert_eq!(d.data_folder.as_deref(), Some("scene_b"));
        assert_eq!(d.score(Question::Q1), Some(3.0));
        assert_eq!(d.score(Question::Q3), None);
        assert_eq!(d.pairing_index, Some(1));
        assert_eq!(d.pairing_number, Some(2));
        assert_eq!(
            d.created_at,
            Some(Utc.with_ymd_and_hms(2025, 11, 26, 0, 12, 44).unwrap()
                + chrono::Duration::milliseconds(512))
        );

        let c = &rows[1];
        assert_eq!(c.interface, Interface::C);
        assert_eq!(c.participant_id, d.participant_id);
        assert_eq!(c.scores.0, [Some(5.0), Some(6.0), Some(4.0), Some(7.0)]);
    }

    #[test]
    fn test_metadata_only_record_yields_no_rows() {
        let only_metadata = record(json!({
            "id": 7,
            "question_scores": { "_pairing_info": { "permutation_index": 0 } }
        }));
        assert!(flatten_record(&only_metadata).is_empty());
    }

    #[test]
    fn test_flatten_records_errors() {
        assert!(matches!(
            flatten_records(&[]),
            Err(AnalysisError::EmptyInput)
        ));
        let useless = record(json!({ "question_scores": { "_pairing_info": {} } }));
        assert!(matches!(
            flatten_records(&[useless.clone(), useless]),
            Err(AnalysisError::NoUsableData { records: 2 })
        ));
    }

    #[test]
    fn test_flatten_is_deterministic_and_bounded() {
        let records = vec![sample_record(), sample_record()];
        let first = flatten_records(&records).unwrap();
        let second = flatten_records(&records).unwrap();
        assert_eq!(first, second);
        assert!(first.len() <= records.len() * Interface::COUNT);
        assert!(
            first
                .iter()
                .all(|row| Interface::ALL.contains(&row.interface))
        );
    }

    #[test]
    fn test_retain_created_after_is_strict() {
        let mut rows = flatten_record(&sample_record());
        let created = rows[0].created_at.unwrap();
        rows[1].created_at = None;

        assert!(matches!(
            retain_created_after(rows.clone(), created),
            Err(AnalysisError::NoRowsAfterCutoff { rows: 2, .. })
        ));
        let kept =
            retain_created_after(rows, created - chrono::Duration::seconds(1)).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].interface, Interface::D);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-03-01T12:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T21:00:00+09:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01 12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T12:00:00.000"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
