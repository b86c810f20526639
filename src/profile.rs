//! Profile accumulator.
//!
//! Holds the running per-dimension score and applies or reverses impact
//! vectors. Exactly one applied impact is retained as the rollback target.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dimension::Dimension;
use crate::impact::ImpactVector;

/// Immutable copy of a profile, safe to hand to a UI or an export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileSnapshot(BTreeMap<Dimension, i64>);

impl ProfileSnapshot {
    /// Score for `dimension`, if declared.
    #[must_use]
    pub fn get(&self, dimension: &Dimension) -> Option<i64> {
        self.0.get(dimension).copied()
    }

    /// Score looked up by dimension name.
    #[must_use]
    pub fn score(&self, name: &str) -> Option<i64> {
        self.0.iter().find(|(d, _)| d.as_str() == name).map(|(_, v)| *v)
    }

    /// `(dimension, score)` pairs in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (&Dimension, i64)> {
        self.0.iter().map(|(d, v)| (d, *v))
    }

    /// Number of dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no dimension is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Running multi-dimensional score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    scores: BTreeMap<Dimension, i64>,
    last_applied: Option<ImpactVector>,
}

impl Profile {
    /// Zero profile over the given dimensions.
    #[must_use]
    pub fn new(dimensions: &[Dimension]) -> Self {
        Self {
            scores: dimensions.iter().map(|d| (d.clone(), 0)).collect(),
            last_applied: None,
        }
    }

    /// Adds `vector` to the profile and makes it the rollback target.
    ///
    /// Any previous rollback target is overwritten. Dimensions the profile does
    /// not track are ignored; scenario validation rules them out upstream.
    /// Scores saturate at the `i64` bounds; callers that need exact totals
    /// check [`Profile::overflowing_dimension`] first.
    pub fn apply_impact(&mut self, vector: &ImpactVector) {
        for (dimension, delta) in vector.iter() {
            if let Some(score) = self.scores.get_mut(dimension) {
                *score = score.saturating_add(delta);
            }
        }
        trace!(target: "tradeoff::profile", entries = vector.len(), "impact applied");
        self.last_applied = Some(vector.clone());
    }

    /// Subtracts the rollback target and clears it.
    ///
    /// A no-op when there is nothing to reverse, so a repeated rollback can
    /// never move the profile twice. Returns whether anything was reversed.
    pub fn reverse_impact(&mut self) -> bool {
        let Some(vector) = self.last_applied.take() else {
            return false;
        };
        for (dimension, delta) in vector.iter() {
            if let Some(score) = self.scores.get_mut(dimension) {
                *score = score.saturating_sub(delta);
            }
        }
        trace!(target: "tradeoff::profile", entries = vector.len(), "impact reversed");
        true
    }

    /// First tracked dimension whose score would leave the `i64` range if
    /// `vector` were applied, if any.
    #[must_use]
    pub fn overflowing_dimension(&self, vector: &ImpactVector) -> Option<&Dimension> {
        vector.iter().find_map(|(dimension, delta)| {
            let (tracked, score) = self.scores.get_key_value(dimension)?;
            score.checked_add(delta).is_none().then_some(tracked)
        })
    }

    /// Drops the rollback target, making the last application permanent.
    pub fn commit(&mut self) {
        self.last_applied = None;
    }

    /// The pending rollback target, if any.
    #[must_use]
    pub const fn last_applied(&self) -> Option<&ImpactVector> {
        self.last_applied.as_ref()
    }

    /// Current score for `dimension`.
    #[must_use]
    pub fn score(&self, dimension: &Dimension) -> Option<i64> {
        self.scores.get(dimension).copied()
    }

    /// Copy of the current scores.
    #[must_use]
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot(self.scores.clone())
    }
}
