// src/style/mod.rs
//! Depth coloring, marker styles and the depth legend

mod depth;
mod marker;

pub use depth::{classify_depth, legend_entries, DepthColor, LegendEntry, DEPTH_BOUNDARIES};
pub use marker::{
    describe_feature, marker_radius, style_features, style_marker, MarkerStyle, StyledMarker,
    FILL_OPACITY, RADIUS_SCALE, STROKE_COLOR, STROKE_WEIGHT,
};
