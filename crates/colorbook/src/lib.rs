//! Raster line art to layered coloring-book SVG.
//!
//! The pipeline is a pure function of the input image and a
//! [`VectorizeConfig`]:
//!
//! 1. composite over white and convert to grayscale;
//! 2. Otsu binarization (ink is darker than the threshold);
//! 3. elliptical closing and speckle removal;
//! 4. area split of 8-connected components into solid and line masks;
//! 5. outer outlines of solids, simplified with Douglas-Peucker;
//! 6. Zhang-Suen thinning of the line mask and centerline tracing;
//! 7. serialization into a [`VectorDocument`].
//!
//! Image and geometry types are re-exported at the root; the stage crates
//! are re-exported under short module names for callers that need the
//! intermediates.

mod config;
mod error;
mod pipeline;

pub use config::VectorizeConfig;
pub use error::VectorizeError;
pub use pipeline::{
    Stages, compute_stages, convert_file, decode_bytes, decode_path, document_from_stages,
    rgba_from_dynamic, vectorize, vectorize_bytes, vectorize_image, vectorize_path,
    vectorize_with_stages,
};

pub use cb_core::*;
pub use cb_svg::VectorDocument;

pub use cb_binarize as binarize;
pub use cb_contour as contour;
pub use cb_label as label;
pub use cb_morph as morph;
pub use cb_skeleton as skeleton;
pub use cb_svg as svg;
