//! Core constants for layer stacking conventions.
//! Keeping them in a single place makes it easier to tweak the stacking magic numbers.

/// Rank given to the atlas mask layer; nothing configured outranks it.
pub const MASK_RANK: i32 = 200;

/// Identifier of the mask layer that always renders above everything else.
pub const MASK_LAYER_ID: &str = "mask";

/// Identifier of the OpenStreetMap raster base layer.
pub const OSM_LAYER_ID: &str = "osm";

/// Rank pinning the OSM base layer just under the other raster layers (legacy ordering).
pub const OSM_RANK: i32 = 29;

/// Substring identifying satellite imagery base layers.
pub const SATELLITE_MARKER: &str = "satellite";

/// Id fragments marking label/symbol layers of the base style.
pub const LABEL_SUBSTRINGS: [&str; 3] = ["label", "place-", "-name"];

/// Exact id of the base style's point-of-interest label layer.
pub const POI_LABEL_ID: &str = "poi-label";

/// Engine primitive names that all rank as a generic vector layer.
pub const VECTOR_SUB_TYPES: [&str; 6] = [
    "fill",
    "line",
    "circle",
    "symbol",
    "fill-extrusion",
    "heatmap",
];
