//! Configuration system for layer stacking
//!
//! The resolver never reads global tables. Everything it needs (type ranks,
//! per-id overrides, tie-break direction, satellite pinning) lives in an
//! [`OrderingOptions`] value, built from a named [`OrderingProfile`] preset or
//! loaded from JSON, and handed to the resolver at construction.

use crate::core::constants::{
    LABEL_SUBSTRINGS, MASK_LAYER_ID, MASK_RANK, OSM_LAYER_ID, OSM_RANK, POI_LABEL_ID,
};
use crate::layers::base::LayerType;
use crate::layers::rank::{IdOverrides, RankTable};
use crate::{AtlasError, Result};
use serde::{Deserialize, Serialize};

/// How two layers of equal rank are ordered relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// The layer configured earlier renders above the one configured later.
    #[default]
    EarlierOnTop,
    /// The layer configured later renders above the one configured earlier.
    LaterBelow,
}

impl TieBreak {
    /// Whether a new layer at `new_index` belongs below an existing group at
    /// `existing_index` of the same rank. `None` means "not configured" and
    /// counts as the earliest index, so under `EarlierOnTop` an unconfigured
    /// layer renders above equal-rank configured groups.
    pub fn places_below(&self, new_index: Option<usize>, existing_index: Option<usize>) -> bool {
        match self {
            TieBreak::EarlierOnTop => existing_index < new_index,
            TieBreak::LaterBelow => existing_index > new_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderingProfile {
    /// Uniform raster ranks, satellite pinning, earlier-configured layers on top.
    Standard,
    /// Split WMS/WMTS ranks, OSM override, no satellite pinning.
    Legacy,
    Custom(OrderingOptions),
}

impl OrderingProfile {
    pub fn resolve(&self) -> OrderingOptions {
        match self {
            Self::Standard => OrderingOptions {
                rank_table: standard_rank_table(),
                id_overrides: IdOverrides::new([(MASK_LAYER_ID, MASK_RANK)]),
                tie_break: TieBreak::EarlierOnTop,
                pin_raster_above_satellite: true,
                label_patterns: LabelPatterns::default(),
            },
            Self::Legacy => OrderingOptions {
                rank_table: standard_rank_table()
                    .with(LayerType::Wms, 35)
                    .with(LayerType::Wmts, 36),
                id_overrides: IdOverrides::new([(MASK_LAYER_ID, MASK_RANK), (OSM_LAYER_ID, OSM_RANK)]),
                tie_break: TieBreak::LaterBelow,
                pin_raster_above_satellite: false,
                label_patterns: LabelPatterns::default(),
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for OrderingProfile {
    fn default() -> Self {
        Self::Standard
    }
}

impl std::str::FromStr for OrderingProfile {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "legacy" => Ok(Self::Legacy),
            other => Err(AtlasError::Config(format!("unknown ordering profile '{}'", other))),
        }
    }
}

fn standard_rank_table() -> RankTable {
    RankTable::new([
        (LayerType::Terrain, 0),
        (LayerType::Style, 10),
        (LayerType::Vector, 20),
        (LayerType::Tms, 30),
        (LayerType::Wms, 30),
        (LayerType::Wmts, 30),
        (LayerType::Csv, 40),
        (LayerType::Geojson, 50),
        (LayerType::Img, 60),
        (LayerType::Markers, 70),
        (LayerType::LayerGroup, 80),
    ])
}

/// Rules recognising the base style's label layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPatterns {
    pub substrings: Vec<String>,
    pub exact_ids: Vec<String>,
}

impl LabelPatterns {
    pub fn matches(&self, layer_id: &str) -> bool {
        self.exact_ids.iter().any(|id| id == layer_id)
            || self.substrings.iter().any(|s| layer_id.contains(s.as_str()))
    }
}

impl Default for LabelPatterns {
    fn default() -> Self {
        Self {
            substrings: LABEL_SUBSTRINGS.iter().map(|s| s.to_string()).collect(),
            exact_ids: vec![POI_LABEL_ID.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderingOptions {
    pub rank_table: RankTable,
    pub id_overrides: IdOverrides,
    pub tie_break: TieBreak,
    pub pin_raster_above_satellite: bool,
    pub label_patterns: LabelPatterns,
}

impl Default for OrderingOptions {
    fn default() -> Self {
        OrderingProfile::default().resolve()
    }
}

/// Partial options document; omitted fields keep the profile's values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OrderingDocument {
    profile: Option<String>,
    rank_table: Option<RankTable>,
    id_overrides: Option<IdOverrides>,
    tie_break: Option<TieBreak>,
    pin_raster_above_satellite: Option<bool>,
    label_patterns: Option<LabelPatterns>,
}

impl OrderingOptions {
    /// Loads options from JSON. Rank table entries are merged over the base
    /// profile's table, all other present fields replace it.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: OrderingDocument = serde_json::from_str(json)
            .map_err(|e| AtlasError::Config(format!("invalid ordering options: {}", e)))?;

        let profile = match doc.profile.as_deref() {
            Some(name) => name.parse::<OrderingProfile>()?,
            None => OrderingProfile::default(),
        };
        let mut options = profile.resolve();

        if let Some(rank_table) = doc.rank_table {
            options.rank_table = options.rank_table.merged(&rank_table);
        }
        if let Some(id_overrides) = doc.id_overrides {
            options.id_overrides = id_overrides;
        }
        if let Some(tie_break) = doc.tie_break {
            options.tie_break = tie_break;
        }
        if let Some(pin) = doc.pin_raster_above_satellite {
            options.pin_raster_above_satellite = pin;
        }
        if let Some(label_patterns) = doc.label_patterns {
            options.label_patterns = label_patterns;
        }
        Ok(options)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_profile_presets() {
        let standard = OrderingProfile::Standard.resolve();
        let legacy = OrderingProfile::Legacy.resolve();

        assert_eq!(standard.rank_table.get(LayerType::Vector), Some(20));
        assert_eq!(standard.rank_table.get(LayerType::Wms), Some(30));
        assert_eq!(standard.rank_table.get(LayerType::Wmts), Some(30));
        assert_eq!(standard.id_overrides.get("mask"), Some(200));
        assert!(standard.pin_raster_above_satellite);
        assert_eq!(standard.tie_break, TieBreak::EarlierOnTop);

        assert_eq!(legacy.rank_table.get(LayerType::Wms), Some(35));
        assert_eq!(legacy.rank_table.get(LayerType::Wmts), Some(36));
        assert_eq!(legacy.id_overrides.get("osm"), Some(29));
        assert!(!legacy.pin_raster_above_satellite);
        assert_eq!(legacy.tie_break, TieBreak::LaterBelow);

        assert_eq!(OrderingOptions::default(), standard);
    }

    #[test]
    fn test_tie_break_directions() {
        assert!(TieBreak::EarlierOnTop.places_below(Some(3), Some(1)));
        assert!(!TieBreak::EarlierOnTop.places_below(Some(1), Some(3)));
        assert!(TieBreak::LaterBelow.places_below(Some(1), Some(3)));
        assert!(!TieBreak::LaterBelow.places_below(Some(3), Some(1)));

        // An unconfigured new layer never wins the earlier-on-top tie-break.
        assert!(!TieBreak::EarlierOnTop.places_below(None, Some(0)));
        assert!(TieBreak::LaterBelow.places_below(None, Some(0)));
        assert!(!TieBreak::EarlierOnTop.places_below(Some(2), Some(2)));
    }

    #[test]
    fn test_label_patterns() {
        let patterns = LabelPatterns::default();
        assert!(patterns.matches("road-label"));
        assert!(patterns.matches("place-city"));
        assert!(patterns.matches("water-name"));
        assert!(patterns.matches("poi-label"));
        assert!(!patterns.matches("building"));
    }

    #[test]
    fn test_from_json_overlays_profile() {
        let options = OrderingOptions::from_json(
            r#"{
                "profile": "legacy",
                "rankTable": { "csv": 45 },
                "tieBreak": "earlier-on-top"
            }"#,
        )
        .unwrap();

        assert_eq!(options.rank_table.get(LayerType::Csv), Some(45));
        assert_eq!(options.rank_table.get(LayerType::Wmts), Some(36));
        assert_eq!(options.tie_break, TieBreak::EarlierOnTop);
        assert_eq!(options.id_overrides.get("osm"), Some(29));
    }

    #[test]
    fn test_from_json_rejects_bad_documents() {
        assert!(OrderingOptions::from_json(r#"{"rankTable": {"parquet": 1}}"#).is_err());
        assert!(OrderingOptions::from_json(r#"{"profile": "fancy"}"#).is_err());
        assert!(OrderingOptions::from_json(r#"{"rankTabel": {}}"#).is_err());
        assert_eq!(OrderingOptions::from_json("{}").unwrap(), OrderingOptions::default());
    }
}
