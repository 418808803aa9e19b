use cb_core::{Image, ImageView, mask_from_fn};

/// Threshold used when the histogram has no positive between-class variance.
///
/// A cutoff of `0` marks nothing as ink: a uniform page, whether blank or
/// fully dark, vectorizes to an empty document.
pub const UNIFORM_FALLBACK_THRESHOLD: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OtsuThreshold {
    /// Pixels with intensity `< threshold` are ink.
    pub threshold: u8,
    /// Unnormalized between-class variance `w0 * w1 * (mu0 - mu1)^2` at the
    /// chosen threshold (pixel counts as weights).
    pub variance: f64,
    /// True when the fallback was applied.
    pub uniform: bool,
}

pub fn histogram_u8(img: &ImageView<'_, u8>) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for y in 0..img.height() {
        for &v in img.row(y) {
            hist[v as usize] += 1;
        }
    }
    hist
}

/// Otsu's threshold over a 256-bin histogram.
///
/// Candidate `t` splits intensities into `[0, t)` and `[t, 255]`. The lowest
/// `t` reaching the maximum variance wins.
pub fn otsu_threshold(img: &ImageView<'_, u8>) -> OtsuThreshold {
    let hist = histogram_u8(img);

    let total: f64 = hist.iter().map(|&c| c as f64).sum();
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut best_t = UNIFORM_FALLBACK_THRESHOLD;
    let mut best_var = 0.0_f64;

    let mut w0 = 0.0_f64;
    let mut sum0 = 0.0_f64;
    for t in 1..=255usize {
        w0 += hist[t - 1] as f64;
        sum0 += (t - 1) as f64 * hist[t - 1] as f64;

        let w1 = total - w0;
        if w0 == 0.0 || w1 == 0.0 {
            continue;
        }

        let mu0 = sum0 / w0;
        let mu1 = (sum_total - sum0) / w1;
        let d = mu0 - mu1;
        let var = w0 * w1 * d * d;
        if var > best_var {
            best_var = var;
            best_t = t as u8;
        }
    }

    OtsuThreshold {
        threshold: best_t,
        variance: best_var,
        uniform: best_var <= 0.0,
    }
}

/// Ink mask of every pixel strictly darker than `threshold`.
pub fn binarize_below(img: &ImageView<'_, u8>, threshold: u8) -> Image<u8> {
    mask_from_fn(img.width(), img.height(), |x, y| {
        img.get(x, y).is_some_and(|&v| v < threshold)
    })
}

pub fn binarize_otsu(img: &ImageView<'_, u8>) -> (Image<u8>, OtsuThreshold) {
    let t = otsu_threshold(img);
    (binarize_below(img, t.threshold), t)
}
