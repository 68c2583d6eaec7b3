use crate::layers::base::{normalize_type, LayerType};
use serde::{Deserialize, Serialize};

/// Tags linking an engine layer back to the configured layer it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerMetadata {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub layer_type: Option<String>,
}

/// One entry of the rendering engine's style layer list, in the shape the
/// engine reports it (`{ id, type, metadata: { groupId, layerType } }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleLayer {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LayerMetadata>,
}

impl StyleLayer {
    /// An untagged base/system layer.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            metadata: None,
        }
    }

    /// A layer owned by the configured layer `group_id`.
    pub fn tagged(
        id: impl Into<String>,
        kind: impl Into<String>,
        group_id: impl Into<String>,
        layer_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            metadata: Some(LayerMetadata {
                group_id: Some(group_id.into()),
                layer_type: Some(layer_type.into()),
            }),
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        self.metadata.as_ref()?.group_id.as_deref()
    }

    pub fn tagged_layer_type(&self) -> Option<&str> {
        self.metadata.as_ref()?.layer_type.as_deref()
    }

    /// Rankable type from the metadata tag, folding vector sub-types.
    pub fn normalized_type(&self) -> Option<LayerType> {
        normalize_type(self.tagged_layer_type(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_layer_from_engine_json() {
        let layers: Vec<StyleLayer> = serde_json::from_str(
            r#"[
                {"id": "background", "type": "background"},
                {"id": "roads-line", "type": "line", "metadata": {"groupId": "roads", "layerType": "line"}},
                {"id": "mapbox-extra", "type": "fill", "metadata": {"mapbox:group": "x"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(layers[0].group_id(), None);
        assert_eq!(layers[1].group_id(), Some("roads"));
        assert_eq!(layers[1].normalized_type(), Some(LayerType::Vector));
        assert_eq!(layers[2].group_id(), None);
    }

    #[test]
    fn test_tagged_constructor() {
        let layer = StyleLayer::tagged("imagery-raster", "raster", "imagery", "tms");
        assert_eq!(layer.group_id(), Some("imagery"));
        assert_eq!(layer.normalized_type(), Some(LayerType::Tms));
        assert_eq!(StyleLayer::new("water", "fill").normalized_type(), None);
    }
}
