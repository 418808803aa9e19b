//! Layered coloring-book vector document and its SVG serialization.
//!
//! Layers, bottom to top:
//! 1. optional white paint plate (`<rect class="paintable">`) covering the
//!    whole canvas, so fill-bucket tools can color the background;
//! 2. `<g id="solidos">`: filled black outlines without stroke;
//! 3. `<g id="traco">`: open centerline paths sharing one black round-capped
//!    stroke.
//!
//! Fills can therefore never hide linework and the plate hides neither.
//! Serialization is a pure function of the document: the same document
//! always yields the same bytes.

mod document;
mod write;

pub use document::{
    DEFAULT_STROKE_WIDTH, INK_COLOR, PAINTABLE_CLASS, PLATE_COLOR, SOLID_LAYER_ID,
    STROKE_LAYER_ID, VectorDocument,
};
pub use write::{polygon_path_data, polyline_path_data};
