//! Stacking ranks for semantic layer types and individual layer ids.

use crate::layers::base::LayerType;
use crate::prelude::HashMap;
use serde::{Deserialize, Serialize};

/// Stacking rank of a layer. Higher ranks render on top.
///
/// Layers whose rank cannot be determined are [`Rank::Top`], which sorts above
/// every finite rank so they are appended on top of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Finite(i32),
    Top,
}

impl Rank {
    pub fn is_finite(&self) -> bool {
        matches!(self, Rank::Finite(_))
    }
}

impl From<i32> for Rank {
    fn from(value: i32) -> Self {
        Rank::Finite(value)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::Finite(value) => write!(f, "{}", value),
            Rank::Top => write!(f, "top"),
        }
    }
}

/// Immutable mapping from layer type to rank.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankTable {
    ranks: HashMap<LayerType, i32>,
}

impl RankTable {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (LayerType, i32)>,
    {
        Self {
            ranks: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, layer_type: LayerType) -> Option<i32> {
        self.ranks.get(&layer_type).copied()
    }

    /// Returns a copy with `layer_type` ranked at `rank`.
    pub fn with(mut self, layer_type: LayerType, rank: i32) -> Self {
        self.ranks.insert(layer_type, rank);
        self
    }

    /// Overlays `other` on top of this table.
    pub fn merged(mut self, other: &RankTable) -> Self {
        self.ranks.extend(other.ranks.iter().map(|(k, v)| (*k, *v)));
        self
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Per-layer-id ranks that supersede the type-based rank.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdOverrides {
    ranks: HashMap<String, i32>,
}

impl IdOverrides {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Self {
            ranks: entries.into_iter().map(|(id, rank)| (id.into(), rank)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<i32> {
        self.ranks.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ranks.contains_key(id)
    }

    pub fn with(mut self, id: impl Into<String>, rank: i32) -> Self {
        self.ranks.insert(id.into(), rank);
        self
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
