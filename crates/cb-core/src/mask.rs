use crate::{Image, ImageView};

/// Mask value written for ink pixels.
pub const INK: u8 = 255;
/// Mask value written for background pixels.
pub const PAPER: u8 = 0;

#[inline]
pub fn is_ink(v: u8) -> bool {
    v != 0
}

pub fn count_ink(mask: &ImageView<'_, u8>) -> usize {
    let mut n = 0;
    for y in 0..mask.height() {
        n += mask.row(y).iter().filter(|&&v| is_ink(v)).count();
    }
    n
}

/// Builds a `0`/`255` mask from a per-pixel predicate.
pub fn mask_from_fn(
    width: usize,
    height: usize,
    mut f: impl FnMut(usize, usize) -> bool,
) -> Image<u8> {
    Image::from_fn(width, height, |x, y| if f(x, y) { INK } else { PAPER })
}
