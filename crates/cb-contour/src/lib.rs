//! Vector geometry extraction from binary masks.
//!
//! Two tracers live here:
//! - **Outlines** ([`trace_solid_outlines`]): Suzuki-Abe outer border
//!   following per 8-connected component, then closed Douglas-Peucker
//!   simplification. Holes are not extracted; every component becomes one
//!   simple filled polygon.
//! - **Centerlines** ([`trace_centerlines`]): a [`SkeletonGraph`] over a 1px
//!   skeleton. Pixels whose linked-neighbor count is not 2 are nodes; runs of
//!   degree-2 pixels between them are branches. A closed curve with no node
//!   becomes one closed branch on a `LoopAnchor`.
//! - **Strokes** ([`trace_line_strokes`]): centerlines plus a closed border
//!   for every line component whose skeleton yields no stroke.
//!
//! Connectivity options:
//! - [`Connectivity::C4`]: axis-aligned neighbors only.
//! - [`Connectivity::C8`]: includes diagonals (recommended for skeletons).
//!
//! Points are pixel centers. No smoothing or curve fitting is applied.

mod border;
mod centerline;
mod graph;
mod simplify;
mod strokes;

pub use border::{OutlineConfig, outlines_from_labeling, trace_outer_border, trace_solid_outlines};
pub use cb_label::Connectivity;
pub use centerline::{
    CenterlineConfig, MIN_POLYLINE_POINTS, build_graph_from_skeleton, trace_centerlines,
};
pub use graph::{Branch, BranchId, NodeId, NodeKind, SkeletonGraph, SkeletonNode};
pub use simplify::{DEFAULT_EPSILON, simplify_closed, simplify_open};
pub use strokes::trace_line_strokes;
