//! # atlasmap
//!
//! Atlas configuration and layer stacking for web map front ends.
//!
//! An atlas is a curated, ordered set of map layers (vector tiles, raster
//! tiles, GeoJSON, WMS/WMTS, ...) declared in a JSON document. This crate
//! parses that document, and decides where each newly activated layer belongs
//! in the rendering engine's layer stack so that the visual order matches the
//! configured semantic order.

pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::config::{OrderingOptions, OrderingProfile, TieBreak};

pub use layers::{
    base::{LayerType, NewLayer},
    manager::{LayerManager, StyleStack},
    order::LayerOrderResolver,
    rank::{IdOverrides, Rank, RankTable},
    style::{LayerMetadata, StyleLayer},
};

pub use data::atlas::{AtlasConfig, ConfiguredOrder, LayerDescriptor};

pub use traits::StyleEngine;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Style engine error: {0}")]
    Engine(String),
}

/// Error type alias for convenience
pub type Error = AtlasError;
