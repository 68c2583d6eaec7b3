use crate::core::constants::VECTOR_SUB_TYPES;
use crate::{AtlasError, Result};
use serde::{Deserialize, Serialize};

/// Semantic layer types an atlas can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerType {
    Terrain,
    Style,
    Vector,
    Tms,
    Wms,
    Wmts,
    Csv,
    Geojson,
    Img,
    Markers,
    LayerGroup,
}

impl LayerType {
    pub const ALL: [LayerType; 11] = [
        LayerType::Terrain,
        LayerType::Style,
        LayerType::Vector,
        LayerType::Tms,
        LayerType::Wms,
        LayerType::Wmts,
        LayerType::Csv,
        LayerType::Geojson,
        LayerType::Img,
        LayerType::Markers,
        LayerType::LayerGroup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Terrain => "terrain",
            LayerType::Style => "style",
            LayerType::Vector => "vector",
            LayerType::Tms => "tms",
            LayerType::Wms => "wms",
            LayerType::Wmts => "wmts",
            LayerType::Csv => "csv",
            LayerType::Geojson => "geojson",
            LayerType::Img => "img",
            LayerType::Markers => "markers",
            LayerType::LayerGroup => "layer-group",
        }
    }

    /// Parses a semantic type name, folding vector sub-types (`fill`, `line`, ...)
    /// into [`LayerType::Vector`]. Unknown names yield `None`.
    pub fn normalize(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(layer_type) = Self::ALL.iter().find(|t| t.as_str() == name) {
            return Some(*layer_type);
        }
        if VECTOR_SUB_TYPES.contains(&name) {
            return Some(LayerType::Vector);
        }
        None
    }

    /// Tile-based raster sources that stack directly above satellite imagery.
    pub fn is_raster_family(&self) -> bool {
        matches!(self, LayerType::Tms | LayerType::Wms | LayerType::Wmts)
    }

    /// Types that fall back to sitting under the base style's labels.
    pub fn sits_below_labels(&self) -> bool {
        matches!(self, LayerType::Vector | LayerType::Geojson)
    }
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayerType {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::normalize(s).ok_or_else(|| AtlasError::Config(format!("unknown layer type '{}'", s)))
    }
}

/// Resolves the rankable type of a layer from its declared `type` and its
/// optional engine-level `layerType`. The declared type wins when it is known.
pub fn normalize_type(kind: Option<&str>, layer_type: Option<&str>) -> Option<LayerType> {
    kind.and_then(LayerType::normalize)
        .or_else(|| layer_type.and_then(LayerType::normalize))
}

/// A layer about to be activated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLayer {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub layer_type: Option<String>,
}

impl NewLayer {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: Some(kind.into()),
            layer_type: None,
        }
    }

    /// Sets the engine-level sub-type (`fill`, `line`, `raster`, ...).
    pub fn with_layer_type(mut self, layer_type: impl Into<String>) -> Self {
        self.layer_type = Some(layer_type.into());
        self
    }

    pub fn normalized_type(&self) -> Option<LayerType> {
        normalize_type(self.kind.as_deref(), self.layer_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_type_display() {
        assert_eq!(LayerType::Tms.to_string(), "tms");
        assert_eq!(LayerType::Geojson.to_string(), "geojson");
        assert_eq!(LayerType::LayerGroup.to_string(), "layer-group");
    }

    #[test]
    fn test_vector_sub_types_normalize() {
        for sub_type in ["fill", "line", "circle", "symbol"] {
            assert_eq!(LayerType::normalize(sub_type), Some(LayerType::Vector));
        }
        assert_eq!(LayerType::normalize("raster"), None);
        assert_eq!(LayerType::normalize(" wmts "), Some(LayerType::Wmts));
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!("csv".parse::<LayerType>().unwrap(), LayerType::Csv);
        assert!("parquet".parse::<LayerType>().is_err());
    }

    #[test]
    fn test_normalize_type_prefers_declared_type() {
        assert_eq!(normalize_type(Some("tms"), Some("fill")), Some(LayerType::Tms));
        assert_eq!(normalize_type(Some("vector"), Some("line")), Some(LayerType::Vector));
        assert_eq!(normalize_type(None, Some("circle")), Some(LayerType::Vector));
        assert_eq!(normalize_type(Some("unknown"), Some("wms")), Some(LayerType::Wms));
        assert_eq!(normalize_type(None, None), None);
    }

    #[test]
    fn test_new_layer_deserializes_engine_shape() {
        let layer: NewLayer =
            serde_json::from_str(r#"{"id":"roads","type":"vector","layerType":"line"}"#).unwrap();
        assert_eq!(layer, NewLayer::new("roads", "vector").with_layer_type("line"));
        assert_eq!(layer.normalized_type(), Some(LayerType::Vector));
    }

    #[test]
    fn test_raster_family() {
        assert!(LayerType::Tms.is_raster_family());
        assert!(LayerType::Wmts.is_raster_family());
        assert!(!LayerType::Img.is_raster_family());
    }
}
