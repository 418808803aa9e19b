//! Foundational primitives for the colorbook vectorizer.
//!
//! ## Images and Masks
//! [`Image<T>`] is an owned, row-major buffer and [`ImageView`] a borrowed
//! one with the same packed layout. Views also wrap foreign pixel buffers.
//!
//! Binary masks are plain `Image<u8>` values: `0` is paper, [`INK`] (`255`)
//! is ink, and any non-zero value reads as ink. Pipeline stages never mutate
//! their input mask; they return a new one with the same dimensions.
//!
//! ## Coordinates
//! Points use pixel-center coordinates: `x` is the column and `y` the row,
//! so pixel `(3, 7)` maps to `Point2f { x: 3.0, y: 7.0 }`.

mod error;
mod geom;
mod image;
mod mask;

pub use error::Error;
pub use geom::{Point2f, Polygon2f, Polyline2f, Vec2f};
pub use image::{Image, ImageView, ensure_same_dims};
pub use mask::{INK, PAPER, count_ink, is_ink, mask_from_fn};
