use cb_core::{Image, ImageView};

/// ITU-R BT.601 luma of an RGB triple, unrounded.
#[inline]
pub fn luma_bt601(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Flattens RGBA pixels onto a white page and converts to 8-bit grayscale.
///
/// `out = round(luma(rgb) * a + 255 * (1 - a))` with `a = alpha / 255`, so a
/// fully transparent pixel always reads as paper.
pub fn composite_over_white(src: &ImageView<'_, [u8; 4]>) -> Image<u8> {
    let mut out = Vec::with_capacity(src.width() * src.height());
    for y in 0..src.height() {
        for &[r, g, b, a] in src.row(y) {
            let alpha = a as f32 / 255.0;
            let v = luma_bt601(r, g, b) * alpha + 255.0 * (1.0 - alpha);
            out.push(v.round().clamp(0.0, 255.0) as u8);
        }
    }

    Image::from_vec(src.width(), src.height(), out).expect("one output pixel per input pixel")
}
