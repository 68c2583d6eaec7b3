//! Prelude module for common atlasmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use atlasmap::prelude::*;`

pub use crate::core::config::{OrderingOptions, OrderingProfile, TieBreak};

pub use crate::layers::{
    base::{LayerType, NewLayer},
    manager::{LayerManager, StyleStack},
    order::LayerOrderResolver,
    rank::{IdOverrides, Rank, RankTable},
    style::{LayerMetadata, StyleLayer},
};

pub use crate::data::atlas::{AtlasConfig, ConfiguredOrder, LayerDescriptor};

pub use crate::traits::StyleEngine;

pub use crate::{Error as AtlasError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
