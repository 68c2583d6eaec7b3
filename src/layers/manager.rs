use crate::{
    core::config::OrderingOptions,
    data::atlas::{AtlasConfig, ConfiguredOrder},
    layers::{base::NewLayer, order::LayerOrderResolver, style::{LayerMetadata, StyleLayer}},
    traits::StyleEngine,
    AtlasError, Result,
};

use crate::prelude::HashSet;

/// In-memory model of the rendering engine's style layer list, bottom first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleStack {
    layers: Vec<StyleLayer>,
}

impl StyleStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a stack from layers listed bottom first. Repeated ids are rejected.
    pub fn from_layers(layers: Vec<StyleLayer>) -> Result<Self> {
        let mut stack = Self::new();
        for layer in layers {
            stack.add_layer(layer, None)?;
        }
        Ok(stack)
    }

    /// Parses the engine's `style.layers` JSON array.
    pub fn from_json(json: &str) -> Result<Self> {
        let layers: Vec<StyleLayer> = serde_json::from_str(json)?;
        Self::from_layers(layers)
    }

    /// Gets the position of a layer, 0 being the bottom
    pub fn position(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    /// Lists all layer IDs, bottom first
    pub fn ids(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.id.as_str()).collect()
    }

    pub fn layers(&self) -> &[StyleLayer] {
        &self.layers
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl StyleEngine for StyleStack {
    fn style_layers(&self) -> Vec<StyleLayer> {
        self.layers.clone()
    }

    fn add_layer(&mut self, layer: StyleLayer, before: Option<&str>) -> Result<()> {
        if self.position(&layer.id).is_some() {
            return Err(AtlasError::Engine(format!("layer '{}' already exists", layer.id)));
        }

        let insert_pos = match before {
            Some(before_id) => self.position(before_id).ok_or_else(|| {
                AtlasError::Engine(format!(
                    "cannot insert '{}' before missing layer '{}'",
                    layer.id, before_id
                ))
            })?,
            None => self.layers.len(),
        };

        self.layers.insert(insert_pos, layer);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<()> {
        let pos = self
            .position(id)
            .ok_or_else(|| AtlasError::Engine(format!("layer '{}' does not exist", id)))?;
        self.layers.remove(pos);
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.position(id).is_some()
    }
}

/// Activates and deactivates configured layers on a style engine, keeping the
/// engine's stacking in line with the atlas' configured order.
#[derive(Debug, Clone, Default)]
pub struct LayerManager {
    resolver: LayerOrderResolver,
    configured: ConfiguredOrder,
}

impl LayerManager {
    pub fn new(resolver: LayerOrderResolver, configured: ConfiguredOrder) -> Self {
        Self {
            resolver,
            configured,
        }
    }

    pub fn from_atlas(atlas: &AtlasConfig, options: OrderingOptions) -> Self {
        Self::new(LayerOrderResolver::new(options), atlas.configured_order())
    }

    pub fn resolver(&self) -> &LayerOrderResolver {
        &self.resolver
    }

    pub fn configured(&self) -> &ConfiguredOrder {
        &self.configured
    }

    /// Where `layer` would be inserted on the engine's current stack.
    pub fn insertion_point<E>(&self, engine: &E, layer: &NewLayer) -> Option<String>
    where
        E: StyleEngine + ?Sized,
    {
        self.resolver
            .resolve_insertion_point(layer, &engine.style_layers(), &self.configured)
    }

    /// Adds the engine layers backing the configured layer `group_id`.
    ///
    /// Each engine layer is tagged with the group and resolved against a fresh
    /// snapshot of the stack, so layers added earlier in the batch are taken
    /// into account. Returns the ids that were added, in insertion order.
    pub fn activate<E>(
        &self,
        engine: &mut E,
        group_id: &str,
        engine_layers: Vec<StyleLayer>,
    ) -> Result<Vec<String>>
    where
        E: StyleEngine + ?Sized,
    {
        let kind = self
            .configured
            .get(group_id)
            .and_then(|descriptor| descriptor.kind.clone());

        #[cfg(feature = "debug")]
        if kind.is_none() {
            log::warn!("activating '{}' which has no configured type", group_id);
        }

        let mut added = Vec::with_capacity(engine_layers.len());
        for mut layer in engine_layers {
            if engine.has_layer(&layer.id) {
                return Err(AtlasError::Layer(format!(
                    "engine layer '{}' of '{}' is already active",
                    layer.id, group_id
                )));
            }

            let layer_type = layer
                .tagged_layer_type()
                .map(str::to_string)
                .or_else(|| kind.clone())
                .unwrap_or_else(|| layer.kind.clone());
            layer.metadata = Some(LayerMetadata {
                group_id: Some(group_id.to_string()),
                layer_type: Some(layer_type.clone()),
            });

            let new_layer = NewLayer {
                id: group_id.to_string(),
                kind: kind.clone(),
                layer_type: Some(layer_type),
            };
            let before = self.insertion_point(&*engine, &new_layer);

            #[cfg(feature = "debug")]
            log::debug!("adding '{}' of '{}' before {:?}", layer.id, group_id, before);

            let id = layer.id.clone();
            engine.add_layer(layer, before.as_deref())?;
            added.push(id);
        }
        Ok(added)
    }

    /// Removes every engine layer tagged with `group_id`. Returns how many were removed.
    pub fn deactivate<E>(&self, engine: &mut E, group_id: &str) -> Result<usize>
    where
        E: StyleEngine + ?Sized,
    {
        let ids: Vec<String> = engine
            .style_layers()
            .into_iter()
            .filter(|layer| layer.group_id() == Some(group_id))
            .map(|layer| layer.id)
            .collect();

        for id in &ids {
            engine.remove_layer(id)?;
        }

        #[cfg(feature = "debug")]
        log::debug!("removed {} engine layers of '{}'", ids.len(), group_id);

        Ok(ids.len())
    }

    /// Groups present on the engine, topmost first.
    pub fn active_groups<E>(&self, engine: &E) -> Vec<String>
    where
        E: StyleEngine + ?Sized,
    {
        let mut seen = HashSet::default();
        engine
            .style_layers()
            .iter()
            .rev()
            .filter_map(|layer| layer.group_id())
            .filter(|group_id| seen.insert(group_id.to_string()))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_stack_insertion() {
        let mut stack = StyleStack::new();
        stack.add_layer(StyleLayer::new("water", "fill"), None).unwrap();
        stack.add_layer(StyleLayer::new("road-label", "symbol"), None).unwrap();
        stack
            .add_layer(StyleLayer::new("roads", "line"), Some("road-label"))
            .unwrap();

        assert_eq!(stack.ids(), vec!["water", "roads", "road-label"]);
        assert_eq!(stack.position("roads"), Some(1));
        assert!(stack.has_layer("water"));
    }

    #[test]
    fn test_style_stack_rejects_bad_mutations() {
        let mut stack = StyleStack::from_layers(vec![StyleLayer::new("water", "fill")]).unwrap();
        assert!(stack.add_layer(StyleLayer::new("water", "fill"), None).is_err());
        assert!(stack
            .add_layer(StyleLayer::new("roads", "line"), Some("missing"))
            .is_err());
        assert!(stack.remove_layer("missing").is_err());
        stack.remove_layer("water").unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_style_stack_from_json() {
        let stack = StyleStack::from_json(
            r#"[{"id": "background", "type": "background"}, {"id": "satellite", "type": "raster"}]"#,
        )
        .unwrap();
        assert_eq!(stack.len(), 2);
        assert!(StyleStack::from_json(r#"[{"id": "a"}, {"id": "a"}]"#).is_err());
    }

    #[test]
    fn test_activate_and_deactivate() {
        let configured = ConfiguredOrder::from_pairs([("roads", "vector"), ("imagery", "tms")]);
        let manager = LayerManager::new(LayerOrderResolver::default(), configured);
        let mut stack = StyleStack::new();

        manager
            .activate(&mut stack, "imagery", vec![StyleLayer::new("imagery-raster", "raster")])
            .unwrap();
        let added = manager
            .activate(
                &mut stack,
                "roads",
                vec![StyleLayer::new("roads-casing", "line"), StyleLayer::new("roads-line", "line")],
            )
            .unwrap();

        assert_eq!(added, vec!["roads-casing", "roads-line"]);
        assert_eq!(stack.ids(), vec!["roads-casing", "roads-line", "imagery-raster"]);
        assert_eq!(stack.layers()[0].group_id(), Some("roads"));
        assert_eq!(stack.layers()[0].tagged_layer_type(), Some("vector"));
        assert_eq!(manager.active_groups(&stack), vec!["imagery", "roads"]);

        assert!(manager
            .activate(&mut stack, "roads", vec![StyleLayer::new("roads-line", "line")])
            .is_err());

        assert_eq!(manager.deactivate(&mut stack, "roads").unwrap(), 2);
        assert_eq!(stack.ids(), vec!["imagery-raster"]);
        assert_eq!(manager.deactivate(&mut stack, "roads").unwrap(), 0);
    }
}
