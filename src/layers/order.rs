//! Insertion-point resolution for newly activated layers.
//!
//! The rendering engine stacks layers in insertion order: index 0 is drawn
//! first (bottom), the last entry is drawn on top, and `add_layer(def, before)`
//! places the new layer immediately below `before`. Given a snapshot of that
//! stack and the atlas' configured order, [`LayerOrderResolver`] picks the
//! `before` id that keeps ranks ascending from bottom to top, breaking ties
//! between equal ranks with the configured order.

use crate::core::config::{OrderingOptions, OrderingProfile};
use crate::core::constants::SATELLITE_MARKER;
use crate::data::atlas::ConfiguredOrder;
use crate::layers::base::{LayerType, NewLayer};
use crate::layers::rank::Rank;
use crate::layers::style::StyleLayer;

/// Pure, immutable layer stacking policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerOrderResolver {
    options: OrderingOptions,
}

impl LayerOrderResolver {
    pub fn new(options: OrderingOptions) -> Self {
        Self { options }
    }

    pub fn from_profile(profile: &OrderingProfile) -> Self {
        Self::new(profile.resolve())
    }

    pub fn options(&self) -> &OrderingOptions {
        &self.options
    }

    /// Rank of a layer: its id override if any, else its type's rank, else [`Rank::Top`].
    pub fn rank_of(&self, id: &str, layer_type: Option<LayerType>) -> Rank {
        if let Some(rank) = self.options.id_overrides.get(id) {
            return Rank::Finite(rank);
        }
        layer_type
            .and_then(|t| self.options.rank_table.get(t))
            .map_or(Rank::Top, Rank::Finite)
    }

    /// Rank of a tagged engine layer, or `None` when it cannot be ranked.
    fn existing_rank(
        &self,
        layer: &StyleLayer,
        group_id: &str,
        configured: &ConfiguredOrder,
    ) -> Option<Rank> {
        let overrides = &self.options.id_overrides;
        if let Some(rank) = overrides.get(group_id).or_else(|| overrides.get(&layer.id)) {
            return Some(Rank::Finite(rank));
        }
        let layer_type = layer
            .normalized_type()
            .or_else(|| configured.layer_type_of(group_id))?;
        self.options.rank_table.get(layer_type).map(Rank::Finite)
    }

    /// Returns the id of the engine layer `new_layer` must be inserted before,
    /// or `None` to append it on top of the stack.
    ///
    /// `live_stack` is the engine's layer list, bottom first. The result only
    /// holds for that snapshot; callers inserting several layers must take a
    /// fresh snapshot before each call.
    pub fn resolve_insertion_point(
        &self,
        new_layer: &NewLayer,
        live_stack: &[StyleLayer],
        configured: &ConfiguredOrder,
    ) -> Option<String> {
        if live_stack.is_empty() {
            return None;
        }

        let new_type = new_layer.normalized_type();
        let order_value = self.rank_of(&new_layer.id, new_type);
        let current_index = configured.index_of(&new_layer.id);

        #[cfg(feature = "debug")]
        log::trace!(
            "resolving '{}' ({:?}) rank {} configured at {:?}",
            new_layer.id,
            new_type,
            order_value,
            current_index
        );

        if self.options.pin_raster_above_satellite
            && new_type.map_or(false, |t| t.is_raster_family())
        {
            if let Some(satellite) = live_stack
                .iter()
                .rposition(|layer| layer.id.contains(SATELLITE_MARKER))
            {
                // Step over engine layers of the same group so a batch keeps its order.
                let above = live_stack[satellite + 1..]
                    .iter()
                    .position(|layer| layer.group_id() != Some(new_layer.id.as_str()))
                    .map(|offset| satellite + 1 + offset);
                let before = above.map(|i| live_stack[i].id.clone());
                #[cfg(feature = "debug")]
                log::debug!(
                    "pinning raster '{}' above '{}' (before {:?})",
                    new_layer.id,
                    live_stack[satellite].id,
                    before
                );
                return before;
            }
        }

        // Bottom entry of the lowest group seen so far that must stay above the new layer.
        let mut boundary: Option<usize> = None;
        // First ranked entry (from the top) that belongs below the new layer.
        let mut floor: Option<usize> = None;

        for (i, existing) in live_stack.iter().enumerate().rev() {
            let Some(group_id) = existing.group_id() else {
                if let Some(rank) = self.options.id_overrides.get(&existing.id) {
                    let rank = Rank::Finite(rank);
                    if rank < order_value {
                        let before = live_stack.get(i + 1).map(|layer| layer.id.clone());
                        #[cfg(feature = "debug")]
                        log::debug!(
                            "'{}' goes directly above overridden '{}' (before {:?})",
                            new_layer.id,
                            existing.id,
                            before
                        );
                        return before;
                    }
                    if rank > order_value {
                        boundary = Some(i);
                    }
                }
                continue;
            };

            let Some(existing_rank) = self.existing_rank(existing, group_id, configured) else {
                continue;
            };

            let stays_above = existing_rank > order_value
                || (existing_rank == order_value
                    && self
                        .options
                        .tie_break
                        .places_below(current_index, configured.index_of(group_id)));

            if stays_above {
                boundary = Some(i);
            } else {
                floor = Some(i);
                break;
            }
        }

        if let Some(i) = boundary {
            #[cfg(feature = "debug")]
            log::debug!("'{}' goes before '{}'", new_layer.id, live_stack[i].id);
            return Some(live_stack[i].id.clone());
        }

        // Overridden layers keep their place even against the base style's labels.
        let overridden = self.options.id_overrides.contains(&new_layer.id);
        if !overridden && new_type.map_or(false, |t| t.sits_below_labels()) {
            let from = floor.map_or(0, |i| i + 1);
            if let Some(label) = live_stack[from..]
                .iter()
                .find(|layer| self.options.label_patterns.matches(&layer.id))
            {
                #[cfg(feature = "debug")]
                log::debug!("'{}' goes below label layer '{}'", new_layer.id, label.id);
                return Some(label.id.clone());
            }
        }

        None
    }
}
