//! Impact vectors: signed per-dimension deltas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

/// Signed per-dimension delta applied when an option is chosen.
///
/// Only affected dimensions are stored; an absent dimension is a zero delta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImpactVector(BTreeMap<Dimension, i64>);

impl ImpactVector {
    /// Creates an empty (all-zero) impact.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a delta for `dimension`, returning the updated vector.
    ///
    /// Repeated calls for the same dimension accumulate, saturating at the
    /// `i64` bounds.
    #[must_use]
    pub fn with(mut self, dimension: Dimension, delta: i64) -> Self {
        let entry = self.0.entry(dimension).or_insert(0);
        *entry = entry.saturating_add(delta);
        self
    }

    /// Delta for `dimension` (zero when absent).
    #[must_use]
    pub fn get(&self, dimension: &Dimension) -> i64 {
        self.0.get(dimension).copied().unwrap_or(0)
    }

    /// Dimensions that carry an explicit entry.
    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.0.keys()
    }

    /// Iterate `(dimension, delta)` pairs in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (&Dimension, i64)> {
        self.0.iter().map(|(d, v)| (d, *v))
    }

    /// Returns true if no dimension carries an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of explicit entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(Dimension, i64)> for ImpactVector {
    fn from_iter<I: IntoIterator<Item = (Dimension, i64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |acc, (dimension, delta)| acc.with(dimension, delta))
    }
}
