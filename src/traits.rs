//! Shared trait abstractions
//!
//! The rendering engine is an external collaborator. Everything in this crate
//! that needs to read or mutate its layer list goes through [`StyleEngine`], so
//! a browser binding and the in-memory [`StyleStack`](crate::layers::manager::StyleStack)
//! are interchangeable.

use crate::{layers::style::StyleLayer, Result};

/// Trait for the rendering engine's style layer list
pub trait StyleEngine {
    /// Snapshot of the current layers, bottom first.
    fn style_layers(&self) -> Vec<StyleLayer>;

    /// Inserts `layer` immediately below `before`, or on top when `before` is `None`.
    fn add_layer(&mut self, layer: StyleLayer, before: Option<&str>) -> Result<()>;

    /// Removes the layer with the given id.
    fn remove_layer(&mut self, id: &str) -> Result<()>;

    /// Check if a layer with the given id exists
    fn has_layer(&self, id: &str) -> bool {
        self.style_layers().iter().any(|layer| layer.id == id)
    }
}
