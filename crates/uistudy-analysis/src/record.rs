//! Raw survey records as stored by the study front end.
//!
//! One record is written per participant when they finish the study:
//!
//! ```json
//! {
//!   "id": 17,
//!   "participant": { "name": "Kim", "age": "27", "gender": "여" },
//!   "question_scores": {
//!     "C":  { "dataFolder": "scene_a", "htmlFile": "c.html", "scores": { "Q1": 5, "Q2": 6, "Q3": 4, "Q4": 5 } },
//!     "D1": { "dataFolder": "scene_b", "htmlFile": "d1.html", "scores": { "Q1": 3, "Q2": "4", "Q3": null, "Q4": 2 } },
//!     "_pairing_info": { "permutation_index": 2, "permutation_number": 3 }
//!   },
//!   "preferred_interface": "c",
//!   "preferred_reason": "...",
//!   "created_at": "2025-11-26T09:12:44.512+00:00"
//! }
//! ```
//!
//! Records are loosely typed: participant fields may live in the
//! `participant` object or at the top level, scores may be numbers or numeric
//! strings, and the interface mapping carries metadata entries whose keys
//! start with `_`. This module keeps the record close to its JSON form and
//! offers the typed accessors the flattener needs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::study::{Interface, Question};

/// Prefix marking metadata entries in the interface mapping.
pub const METADATA_PREFIX: char = '_';

/// Metadata entry carrying the counterbalancing permutation of the participant.
pub const PAIRING_INFO_KEY: &str = "_pairing_info";

/// A survey record as received from the data store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Unique identifier assigned by the data store (string or number).
    #[serde(default)]
    pub id: Option<Value>,
    /// Participant sub-object (`name`, `age`, `gender`).
    #[serde(default)]
    pub participant: Option<Map<String, Value>>,
    /// Mapping from interface code to per-interface payload, plus metadata entries.
    #[serde(default, alias = "scores")]
    pub question_scores: Option<Map<String, Value>>,
    /// Free-form interface code the participant preferred overall.
    #[serde(default)]
    pub preferred_interface: Option<String>,
    /// Free-text reason for the preference.
    #[serde(default)]
    pub preferred_reason: Option<String>,
    /// Creation timestamp as written by the data store.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Remaining top-level fields, used as fallback for participant fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRecord {
    /// Entries of the interface mapping in document order.
    pub fn score_entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.question_scores
            .iter()
            .flat_map(|map| map.iter().map(|(key, value)| (key.as_str(), value)))
    }

    /// Counterbalancing metadata shared by all interfaces of this record.
    #[must_use]
    pub fn pairing_info(&self) -> PairingInfo {
        self.question_scores
            .as_ref()
            .and_then(|map| map.get(PAIRING_INFO_KEY))
            .map(PairingInfo::from_value)
            .unwrap_or_default()
    }

    /// Ordered lookup of participant-level fields: the `participant`
    /// sub-object first, then the top-level record.
    #[must_use]
    pub fn participant_fields(&self) -> FieldSources<'_> {
        let mut sources = Vec::with_capacity(2);
        if let Some(participant) = &self.participant {
            sources.push(participant);
        }
        sources.push(&self.extra);
        FieldSources { sources }
    }

    /// Identity of the participant used to join their ratings.
    ///
    /// This is the record `id` when present, else `"{name}_{created_at}"`.
    #[must_use]
    pub fn participant_key(&self) -> String {
        if let Some(id) = self.id.as_ref().and_then(value_as_text) {
            return id;
        }
        let name = self
            .participant_fields()
            .text("name")
            .unwrap_or_else(|| "unknown".to_owned());
        format!("{name}_{}", self.created_at.as_deref().unwrap_or_default())
    }
}

/// Classification of a key of the interface mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKey<'a> {
    /// Metadata entry such as `_pairing_info`.
    Metadata(&'a str),
    /// A known interface code.
    Interface(Interface),
    /// Anything else; ignored.
    Unrecognized(&'a str),
}

impl<'a> ScoreKey<'a> {
    #[must_use]
    pub fn classify(key: &'a str) -> Self {
        if key.starts_with(METADATA_PREFIX) {
            Self::Metadata(key)
        } else if let Some(interface) = Interface::from_code(key) {
            Self::Interface(interface)
        } else {
            Self::Unrecognized(key)
        }
    }
}

/// Counterbalancing permutation assigned to a participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingInfo {
    pub permutation_index: Option<i64>,
    pub permutation_number: Option<i64>,
}

impl PairingInfo {
    fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(value_as_i64);
        Self {
            permutation_index: field("permutation_index"),
            permutation_number: field("permutation_number"),
        }
    }
}

/// Ratings and stimulus of one interface inside a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfacePayload {
    pub data_folder: Option<String>,
    pub html_file: Option<String>,
    pub scores: [Option<f64>; Question::COUNT],
}

impl InterfacePayload {
    /// Reads a payload, returning `None` for null, empty or non-object values.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object().filter(|object| !object.is_empty())?;
        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| object.get(*key).and_then(value_as_text))
        };
        let scores = object.get("scores").and_then(Value::as_object);
        let score = |question: Question| {
            scores
                .and_then(|scores| scores.get(question.key()))
                .and_then(value_as_f64)
        };

        Some(Self {
            data_folder: text(&["dataFolder", "data_folder"]),
            html_file: text(&["htmlFile", "html_file"]),
            scores: Question::ALL.map(score),
        })
    }
}

/// Ordered list of JSON objects searched for a field.
#[derive(Debug, Clone)]
pub struct FieldSources<'a> {
    sources: Vec<&'a Map<String, Value>>,
}

impl FieldSources<'_> {
    /// First non-empty textual value of `key` across the sources.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.sources
            .iter()
            .find_map(|source| source.get(key).and_then(value_as_text))
    }
}

/// Textual form of a scalar value; empty strings and non-scalars yield `None`.
pub(crate) fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numeric form of a number or numeric string; anything else is missing.
pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Parses a trimmed decimal number; non-numeric or non-finite text is missing.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
