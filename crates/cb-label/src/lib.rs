//! Connected-component labeling of binary masks.
//!
//! Components are discovered in raster order (top row first, left to right)
//! and numbered `1..=n` in that order; label `0` is background. Every
//! operation built on top of the labeling inherits this order, which keeps
//! downstream output reproducible.
//!
//! - [`label_components`] produces the [`LabelMap`] and per-component
//!   [`ComponentStats`].
//! - [`remove_small_components`] drops speckle below an area threshold.
//! - [`split_by_area`] partitions a mask into solid and line masks using
//!   area alone.

mod classify;
mod labeling;

pub use classify::{
    ComponentClass, DEFAULT_MIN_SOLID_AREA, MIN_SPECK_AREA, SolidLineSplit, classify_area,
    remove_small_components, split_by_area,
};
pub use labeling::{BBox, ComponentStats, Connectivity, LabelMap, Labeling, label_components};
