//! Fixed design of the study: the interfaces under test and the questionnaire items.

use serde::{Deserialize, Serialize};

/// One of the interface variants rated by participants.
///
/// The declaration order is the canonical presentation order used for
/// tables, pair enumeration and charts.
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
    Deserialize,
    derive_more::Display,
)]
pub enum Interface {
    C,
    D,
    D1,
    Y,
    Y1,
}

impl Interface {
    /// All interfaces in canonical order.
    pub const ALL: [Self; 5] = [Self::C, Self::D, Self::D1, Self::Y, Self::Y1];

    /// Number of interfaces in the study.
    pub const COUNT: usize = Self::ALL.len();

    /// Code used for this interface in survey records.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::D => "D",
            Self::D1 => "D1",
            Self::Y => "Y",
            Self::Y1 => "Y1",
        }
    }

    /// Position of this interface in [`Interface::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parses an exact interface code (`"C"`, `"D"`, `"D1"`, `"Y"`, `"Y1"`).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|interface| interface.code() == code)
    }

    /// Every unordered pair of `interfaces`, in the order they are given.
    #[must_use]
    pub fn pairs(interfaces: &[Self]) -> Vec<(Self, Self)> {
        interfaces
            .iter()
            .enumerate()
            .flat_map(|(i, &a)| interfaces[i + 1..].iter().map(move |&b| (a, b)))
            .collect()
    }
}

/// A Likert-scale questionnaire item asked for every interface.
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
    Deserialize,
    derive_more::Display,
)]
pub enum Question {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Question {
    /// All questions in questionnaire order.
    pub const ALL: [Self; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    /// Number of questions per interface.
    pub const COUNT: usize = Self::ALL.len();

    /// Key of this question inside a record's `scores` object.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }

    /// Position of this question in [`Question::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_is_exact() {
        assert_eq!(Interface::from_code("D1"), Some(Interface::D1));
        assert_eq!(Interface::from_code("Y"), Some(Interface::Y));
        assert_eq!(Interface::from_code("d1"), None);
        assert_eq!(Interface::from_code("X"), None);
        assert_eq!(Interface::from_code("_pairing_info"), None);
    }

    #[test]
    fn test_index_matches_canonical_order() {
        for (i, interface) in Interface::ALL.into_iter().enumerate() {
            assert_eq!(interface.index(), i);
        }
        assert!(Interface::C < Interface::Y1);
    }

    #[test]
    fn test_pairs_preserve_order() {
        let pairs = Interface::pairs(&[Interface::C, Interface::D, Interface::Y]);
        assert_eq!(
            pairs,
            vec![
                (Interface::C, Interface::D),
                (Interface::C, Interface::Y),
                (Interface::D, Interface::Y),
            ]
        );
        assert_eq!(Interface::pairs(&Interface::ALL).len(), 10);
    }

    #[test]
    fn test_display_uses_code() {
        assert_eq!(Interface::D1.to_string(), "D1");
        assert_eq!(Question::Q3.to_string(), "Q3");
    }
}
