//! Binary morphology with elliptical structuring elements.
//!
//! Pixels are treated as binary with threshold `> 0`.
//! Outputs are `0` or `255` in `u8`.
//!
//! Outside the image, dilation sees paper and erosion sees ink. A closing
//! therefore never removes ink that touches the frame.

use cb_core::{INK, Image, ImageView, PAPER, is_ink};

/// Offsets of a centered, symmetric structuring element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    radius: usize,
    offsets: Vec<(isize, isize)>,
}

impl StructuringElement {
    /// Ellipse inscribed in a `(2r+1) x (2r+1)` box.
    ///
    /// Row `dy` spans `|dx| <= round(r * sqrt(1 - dy^2 / r^2))`, so `r = 1`
    /// is the 3x3 cross and `r = 0` is the single center pixel.
    pub fn ellipse(radius: usize) -> Self {
        let r = radius as isize;
        let mut offsets = Vec::new();
        for dy in -r..=r {
            let half = if r == 0 {
                0
            } else {
                let t = 1.0 - (dy * dy) as f64 / (r * r) as f64;
                (radius as f64 * t.max(0.0).sqrt()).round() as isize
            };
            for dx in -half..=half {
                offsets.push((dx, dy));
            }
        }

        Self { radius, offsets }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }
}

pub fn erode_binary_u8(src: &ImageView<'_, u8>, se: &StructuringElement) -> Image<u8> {
    let mut out = Image::new_fill(src.width(), src.height(), PAPER);
    if src.is_empty() {
        return out;
    }

    for y in 0..src.height() {
        for x in 0..src.width() {
            let all_set = se.offsets().iter().all(|&(dx, dy)| {
                match src.get_signed(x as isize + dx, y as isize + dy) {
                    Some(&v) => is_ink(v),
                    None => true,
                }
            });

            if all_set {
                *out.get_mut(x, y).expect("in-bounds write in erode_binary_u8") = INK;
            }
        }
    }

    out
}

pub fn dilate_binary_u8(src: &ImageView<'_, u8>, se: &StructuringElement) -> Image<u8> {
    let mut out = Image::new_fill(src.width(), src.height(), PAPER);
    if src.is_empty() {
        return out;
    }

    for y in 0..src.height() {
        for x in 0..src.width() {
            let any_set = se.offsets().iter().any(|&(dx, dy)| {
                src.get_signed(x as isize - dx, y as isize - dy)
                    .is_some_and(|&v| is_ink(v))
            });

            if any_set {
                *out.get_mut(x, y).expect("in-bounds write in dilate_binary_u8") = INK;
            }
        }
    }

    out
}

pub fn close_binary_u8(src: &ImageView<'_, u8>, se: &StructuringElement) -> Image<u8> {
    let dilated = dilate_binary_u8(src, se);
    erode_binary_u8(&dilated.as_view(), se)
}

/// Closing with an elliptical element of `radius`; `0` returns a normalized
/// copy of the input.
pub fn close_ellipse(src: &ImageView<'_, u8>, radius: usize) -> Image<u8> {
    if radius == 0 {
        return src.to_image().map(|&v| if is_ink(v) { INK } else { PAPER });
    }
    close_binary_u8(src, &StructuringElement::ellipse(radius))
}
