//! Outcome interpretation.
//!
//! Scores are interpreted per dimension. Dimensions are never summed into a
//! composite score.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::profile::ProfileSnapshot;

/// Threshold at or above which a score is a strong positive alignment.
pub const STRONG_POSITIVE_THRESHOLD: i64 = 2;

/// Three-tier categorical summary of one dimension's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualitativeLabel {
    /// Score of 2 or more.
    StrongPositive,
    /// Score of 0 or 1.
    Moderate,
    /// Negative score.
    Weak,
}

impl QualitativeLabel {
    /// Interprets a score.
    ///
    /// # Examples
    ///
    /// ```
    /// use tradeoff::QualitativeLabel;
    ///
    /// assert_eq!(QualitativeLabel::from_score(2), QualitativeLabel::StrongPositive);
    /// assert_eq!(QualitativeLabel::from_score(0), QualitativeLabel::Moderate);
    /// assert_eq!(QualitativeLabel::from_score(-1), QualitativeLabel::Weak);
    /// ```
    #[must_use]
    pub const fn from_score(score: i64) -> Self {
        if score >= STRONG_POSITIVE_THRESHOLD {
            Self::StrongPositive
        } else if score >= 0 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    /// Participant-facing wording.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::StrongPositive => "Strong positive alignment",
            Self::Moderate => "Moderate alignment",
            Self::Weak => "Weak alignment",
        }
    }
}

impl fmt::Display for QualitativeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Interprets a score. Shorthand for [`QualitativeLabel::from_score`].
#[must_use]
pub const fn label(score: i64) -> QualitativeLabel {
    QualitativeLabel::from_score(score)
}

/// Score and label for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionOutcome {
    /// Final score.
    pub score: i64,
    /// Interpretation of the score.
    pub label: QualitativeLabel,
}

/// Per-dimension interpretation of a profile, ordered by dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinalOutcome(BTreeMap<Dimension, DimensionOutcome>);

impl FinalOutcome {
    /// Interprets every dimension of `profile` independently.
    #[must_use]
    pub fn interpret(profile: &ProfileSnapshot) -> Self {
        Self(
            profile
                .iter()
                .map(|(d, score)| {
                    (
                        d.clone(),
                        DimensionOutcome {
                            score,
                            label: label(score),
                        },
                    )
                })
                .collect(),
        )
    }

    /// Outcome for `dimension`.
    #[must_use]
    pub fn get(&self, dimension: &Dimension) -> Option<DimensionOutcome> {
        self.0.get(dimension).copied()
    }

    /// Outcome looked up by dimension name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<DimensionOutcome> {
        self.0.iter().find(|(d, _)| d.as_str() == name).map(|(_, o)| *o)
    }

    /// `(dimension, outcome)` pairs in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (&Dimension, &DimensionOutcome)> {
        self.0.iter()
    }

    /// One line per dimension, e.g. "Environmental: Strong positive alignment".
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|(d, o)| format!("{}: {}", d.display_name(), o.label))
            .collect()
    }
}
