//! Atlas configuration documents.
//!
//! An atlas document lists the layers a map offers, in the order the author
//! intends them to stack. That order is the tie-break key for layers of equal
//! rank, so the parsed form keeps an index by layer id next to the list.

use crate::layers::base::{normalize_type, LayerType};
use crate::prelude::HashMap;
use crate::{AtlasError, Result};
use serde::{Deserialize, Serialize};

/// One configured layer as declared in the atlas document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_type: Option<String>,
    /// Everything else the document carries (styles, legends, attribution...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LayerDescriptor {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    /// The rankable type, or `None` when the declared type is unknown.
    pub fn layer_kind(&self) -> Option<LayerType> {
        normalize_type(self.kind.as_deref(), self.layer_type.as_deref())
    }
}

/// Layers in configured order with O(1) position lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfiguredOrder {
    layers: Vec<LayerDescriptor>,
    positions: HashMap<String, usize>,
}

impl ConfiguredOrder {
    /// Builds the order. A repeated id keeps the position of its first occurrence.
    pub fn new(layers: Vec<LayerDescriptor>) -> Self {
        let mut positions = HashMap::default();
        for (index, layer) in layers.iter().enumerate() {
            if positions.contains_key(&layer.id) {
                #[cfg(feature = "debug")]
                log::warn!("duplicate layer id '{}' at position {}", layer.id, index);
                continue;
            }
            positions.insert(layer.id.clone(), index);
        }
        Self { layers, positions }
    }

    /// Shorthand for `(id, type)` pairs.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(id, kind)| LayerDescriptor::new(id, kind))
                .collect(),
        )
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&LayerDescriptor> {
        self.index_of(id).map(|index| &self.layers[index])
    }

    /// Configured type of the layer `id`, if it is configured with a known type.
    pub fn layer_type_of(&self, id: &str) -> Option<LayerType> {
        self.get(id).and_then(LayerDescriptor::layer_kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerDescriptor> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// A parsed atlas document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub layers: Vec<LayerDescriptor>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Accepted top-level shapes of an atlas document.
#[derive(Deserialize)]
#[serde(untagged)]
enum AtlasDocument {
    Layers(Vec<LayerDescriptor>),
    Atlas(AtlasConfig),
}

impl AtlasConfig {
    /// Parses an atlas document: either an object with a `layers` array or a
    /// bare array of layers.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: AtlasDocument = serde_json::from_str(json)
            .map_err(|e| AtlasError::Config(format!("invalid atlas document: {}", e)))?;

        let config = match document {
            AtlasDocument::Layers(layers) => AtlasConfig {
                layers,
                ..Default::default()
            },
            AtlasDocument::Atlas(config) => config,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if let Some(position) = self.layers.iter().position(|l| l.id.trim().is_empty()) {
            return Err(AtlasError::Config(format!(
                "layer at position {} has an empty id",
                position
            )));
        }
        Ok(())
    }

    pub fn configured_order(&self) -> ConfiguredOrder {
        ConfiguredOrder::new(self.layers.clone())
    }
}

impl std::str::FromStr for AtlasConfig {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATLAS: &str = r#"{
        "name": "goa",
        "title": "Goa Atlas",
        "center": [73.9, 15.4],
        "layers": [
            {"id": "mask", "type": "geojson", "url": "mask.geojson"},
            {"id": "roads", "type": "vector", "title": "Roads", "layerType": "line"},
            {"id": "imagery", "type": "tms", "url": "https://tiles.example/{z}/{x}/{y}.png", "opacity": 0.8},
            {"id": "survey", "type": "mystery"}
        ]
    }"#;

    #[test]
    fn test_parse_atlas_document() {
        let atlas: AtlasConfig = ATLAS.parse().unwrap();
        assert_eq!(atlas.name.as_deref(), Some("goa"));
        assert_eq!(atlas.layers.len(), 4);
        assert!(atlas.extra.contains_key("center"));
        assert_eq!(atlas.layers[2].extra.get("opacity"), Some(&serde_json::json!(0.8)));

        let order = atlas.configured_order();
        assert_eq!(order.index_of("roads"), Some(1));
        assert_eq!(order.index_of("nowhere"), None);
        assert_eq!(order.layer_type_of("imagery"), Some(LayerType::Tms));
        assert_eq!(order.layer_type_of("roads"), Some(LayerType::Vector));
        assert_eq!(order.layer_type_of("survey"), None);
    }

    #[test]
    fn test_parse_bare_layer_array() {
        let atlas = AtlasConfig::from_json(r#"[{"id": "a", "type": "csv"}, {"id": "b"}]"#).unwrap();
        assert_eq!(atlas.name, None);
        assert_eq!(atlas.layers.len(), 2);
        assert_eq!(atlas.layers[1].kind, None);
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = AtlasConfig::from_json(r#"{"layers": [{"id": "a"}, {"id": " "}]}"#).unwrap_err();
        assert!(err.to_string().contains("position 1"));
        assert!(AtlasConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_duplicate_ids_keep_first_position() {
        let order = ConfiguredOrder::from_pairs([("a", "vector"), ("b", "tms"), ("a", "csv")]);
        assert_eq!(order.len(), 3);
        assert_eq!(order.index_of("a"), Some(0));
        assert_eq!(order.layer_type_of("a"), Some(LayerType::Vector));
    }
}
