//! Raster preparation: alpha compositing, grayscale and Otsu binarization.
//!
//! Ink is assumed darker than paper. [`composite_over_white`] flattens RGBA
//! onto a white page, [`otsu_threshold`] picks the cutoff that maximizes
//! between-class variance and [`binarize_below`] marks every pixel strictly
//! darker than the cutoff as ink.

mod composite;
mod otsu;

pub use composite::{composite_over_white, luma_bt601};
pub use otsu::{
    OtsuThreshold, UNIFORM_FALLBACK_THRESHOLD, binarize_below, binarize_otsu, histogram_u8,
    otsu_threshold,
};
