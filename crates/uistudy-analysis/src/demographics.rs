//! Participant-level demographic summary.
//!
//! Participant fields are repeated on each of a participant's interface rows,
//! so everything here works on one row per `participant_id`.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use uistudy_stats::descriptive::DescriptiveStats;

use crate::{flatten::NormalizedRow, record::parse_number};

/// One row per participant, keeping the first occurrence in row order.
#[must_use]
pub fn unique_participants(rows: &[NormalizedRow]) -> Vec<&NormalizedRow> {
    let mut seen = HashSet::new();
    let mut unique = vec![];
    for row in rows {
        if seen.insert(row.participant_id.as_str()) {
            unique.push(row);
        }
    }
    unique
}

/// Canonical gender category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[display("male")]
    Male,
    #[display("female")]
    Female,
    #[display("other")]
    Other,
    #[display("unknown")]
    Unknown,
}

impl Gender {
    pub const ALL: [Self; 4] = [Self::Male, Self::Female, Self::Other, Self::Unknown];

    const MALE_TOKENS: &[&str] = &["m", "male", "man", "boy", "남", "남자", "남성"];
    const FEMALE_TOKENS: &[&str] = &["f", "female", "woman", "girl", "여", "여자", "여성"];

    /// Maps a free-text answer onto a category.
    ///
    /// Matching is case-insensitive on the trimmed answer. Unmatched
    /// non-empty answers are [`Gender::Other`]; empty or absent answers are
    /// [`Gender::Unknown`].
    #[must_use]
    pub fn normalize(answer: Option<&str>) -> Self {
        let answer = answer.map(str::trim).unwrap_or_default().to_lowercase();
        if answer.is_empty() {
            Self::Unknown
        } else if Self::MALE_TOKENS.contains(&answer.as_str()) {
            Self::Male
        } else if Self::FEMALE_TOKENS.contains(&answer.as_str()) {
            Self::Female
        } else {
            Self::Other
        }
    }
}

/// Summary of the numeric ages reported by participants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeSummary {
    /// Participants with a numeric age.
    pub valid: usize,
    /// Participants whose age is missing or not a number.
    pub missing: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; requires at least two valid ages.
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicSummary {
    pub participants: usize,
    pub age: AgeSummary,
    /// Count per category; every category is present, possibly with zero.
    pub gender: BTreeMap<Gender, usize>,
}

impl DemographicSummary {
    #[must_use]
    pub fn from_rows(rows: &[NormalizedRow]) -> Self {
        let participants = unique_participants(rows);

        let ages = participants
            .iter()
            .filter_map(|row| row.age.as_deref().and_then(parse_number))
            .collect::<Vec<_>>();
        let stats = DescriptiveStats::new(ages.iter().copied());
        let age = AgeSummary {
            valid: ages.len(),
            missing: participants.len() - ages.len(),
            mean: stats.as_ref().map(|s| s.mean),
            std_dev: stats
                .as_ref()
                .filter(|s| s.count >= 2)
                .map(|s| s.std_dev),
            min: stats.as_ref().map(|s| s.min),
            max: stats.as_ref().map(|s| s.max),
        };

        let mut gender = Gender::ALL
            .into_iter()
            .map(|g| (g, 0))
            .collect::<BTreeMap<_, _>>();
        for row in &participants {
            *gender
                .entry(Gender::normalize(row.gender.as_deref()))
                .or_default() += 1;
        }

        Self {
            participants: participants.len(),
            age,
            gender,
        }
    }
}
