use std::path::Path;

use cb_binarize::{OtsuThreshold, binarize_otsu, composite_over_white};
use cb_contour::{CenterlineConfig, OutlineConfig, trace_line_strokes, trace_solid_outlines};
use cb_core::{Image, ImageView, count_ink, ensure_same_dims};
use cb_label::{MIN_SPECK_AREA, remove_small_components, split_by_area};
use cb_morph::close_ellipse;
use cb_skeleton::{ThinningStats, thin_zhang_suen_with_stats};
use cb_svg::VectorDocument;
use image::DynamicImage;

use crate::{VectorizeConfig, VectorizeError};

/// Every intermediate raster of one conversion. Masks are `0`/`255` and share
/// the input's dimensions.
#[derive(Debug, Clone)]
pub struct Stages {
    pub gray: Image<u8>,
    pub threshold: OtsuThreshold,
    pub ink: Image<u8>,
    pub closed: Image<u8>,
    pub cleaned: Image<u8>,
    pub solid: Image<u8>,
    pub line: Image<u8>,
    pub skeleton: Image<u8>,
    pub solid_components: usize,
    pub line_components: usize,
    pub thinning: ThinningStats,
}

impl Stages {
    pub fn dims(&self) -> (usize, usize) {
        self.gray.dims()
    }
}

/// Runs the raster half of the pipeline, up to and including thinning.
pub fn compute_stages(
    rgba: &ImageView<'_, [u8; 4]>,
    cfg: &VectorizeConfig,
) -> Result<Stages, VectorizeError> {
    cfg.validate()?;

    let (width, height) = rgba.dims();
    if rgba.is_empty() {
        return Err(VectorizeError::EmptyImage { width, height });
    }

    let span = tracing::debug_span!("stages", width, height);
    let _guard = span.enter();

    let gray = composite_over_white(rgba);
    let (ink, threshold) = binarize_otsu(&gray.as_view());
    tracing::debug!(
        threshold = threshold.threshold,
        uniform = threshold.uniform,
        ink = count_ink(&ink.as_view()),
        "binarized"
    );

    let closed = close_ellipse(&ink.as_view(), cfg.close_radius);
    let cleaned = remove_small_components(&closed.as_view(), MIN_SPECK_AREA);
    tracing::debug!(
        radius = cfg.close_radius,
        closed = count_ink(&closed.as_view()),
        cleaned = count_ink(&cleaned.as_view()),
        "cleaned"
    );

    let split = split_by_area(&cleaned.as_view(), cfg.min_solid_area);
    tracing::debug!(
        min_solid_area = cfg.min_solid_area,
        solids = split.solid_components,
        lines = split.line_components,
        "classified"
    );

    let (skeleton, thinning) = thin_zhang_suen_with_stats(&split.line.as_view());
    tracing::debug!(
        iterations = thinning.iterations,
        removed = thinning.removed,
        skeleton = count_ink(&skeleton.as_view()),
        "thinned"
    );

    for stage in [&gray, &ink, &closed, &cleaned, &split.solid, &split.line, &skeleton] {
        ensure_same_dims((width, height), stage.dims())?;
    }

    Ok(Stages {
        gray,
        threshold,
        ink,
        closed,
        cleaned,
        solid: split.solid,
        line: split.line,
        skeleton,
        solid_components: split.solid_components,
        line_components: split.line_components,
        thinning,
    })
}

/// Traces the solid, line and skeleton masks and assembles the layered document.
pub fn document_from_stages(stages: &Stages, cfg: &VectorizeConfig) -> VectorDocument {
    let (width, height) = stages.dims();
    let span = tracing::debug_span!("trace", width, height);
    let _guard = span.enter();

    let solids = trace_solid_outlines(&stages.solid.as_view(), &OutlineConfig::default());
    let strokes = trace_line_strokes(
        &stages.line.as_view(),
        &stages.skeleton.as_view(),
        &CenterlineConfig::default(),
    );
    tracing::debug!(paths = solids.len(), polylines = strokes.len(), "traced");

    VectorDocument {
        width,
        height,
        background_plate: cfg.background_plate,
        solids,
        strokes,
        stroke_width: cfg.stroke_width,
    }
}

pub fn vectorize_with_stages(
    rgba: &ImageView<'_, [u8; 4]>,
    cfg: &VectorizeConfig,
) -> Result<(VectorDocument, Stages), VectorizeError> {
    let stages = compute_stages(rgba, cfg)?;
    let doc = document_from_stages(&stages, cfg);
    Ok((doc, stages))
}

pub fn vectorize(
    rgba: &ImageView<'_, [u8; 4]>,
    cfg: &VectorizeConfig,
) -> Result<VectorDocument, VectorizeError> {
    vectorize_with_stages(rgba, cfg).map(|(doc, _)| doc)
}

/// Expands any decoded color type to 8-bit RGBA.
pub fn rgba_from_dynamic(img: &DynamicImage) -> Result<Image<[u8; 4]>, VectorizeError> {
    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    let pixels = rgba.pixels().map(|p| p.0).collect();
    Ok(Image::from_vec(width, height, pixels)?)
}

pub fn vectorize_image(
    img: &DynamicImage,
    cfg: &VectorizeConfig,
) -> Result<VectorDocument, VectorizeError> {
    let rgba = rgba_from_dynamic(img)?;
    vectorize(&rgba.as_view(), cfg)
}

/// Decodes an encoded PNG, JPEG or WebP buffer. The format is sniffed from
/// the content, not taken from a file name.
pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage, VectorizeError> {
    Ok(image::load_from_memory(bytes)?)
}

pub fn decode_path(path: &Path) -> Result<DynamicImage, VectorizeError> {
    let bytes = std::fs::read(path).map_err(|source| VectorizeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_bytes(&bytes)
}

pub fn vectorize_bytes(
    bytes: &[u8],
    cfg: &VectorizeConfig,
) -> Result<VectorDocument, VectorizeError> {
    vectorize_image(&decode_bytes(bytes)?, cfg)
}

pub fn vectorize_path(path: &Path, cfg: &VectorizeConfig) -> Result<VectorDocument, VectorizeError> {
    vectorize_image(&decode_path(path)?, cfg)
}

/// Converts `input` and writes the SVG to `output`.
pub fn convert_file(
    input: &Path,
    output: &Path,
    cfg: &VectorizeConfig,
) -> Result<VectorDocument, VectorizeError> {
    let doc = vectorize_path(input, cfg)?;
    std::fs::write(output, doc.to_svg_string()).map_err(|source| VectorizeError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use cb_core::{Image, count_ink};

    use super::{compute_stages, vectorize};
    use crate::{VectorizeConfig, VectorizeError};

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn empty_canvas_is_an_input_error() {
        let img: Image<[u8; 4]> = Image::from_vec(0, 5, Vec::new()).expect("empty image");
        let err = vectorize(&img.as_view(), &VectorizeConfig::default())
            .expect_err("zero width must fail");
        assert!(matches!(err, VectorizeError::EmptyImage { width: 0, height: 5 }));
        assert!(err.is_input_error());
    }

    #[test]
    fn invalid_config_is_rejected_before_work() {
        let img = Image::new_fill(4, 4, WHITE);
        let cfg = VectorizeConfig {
            stroke_width: 0.0,
            ..VectorizeConfig::default()
        };
        assert!(matches!(
            vectorize(&img.as_view(), &cfg),
            Err(VectorizeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn stages_share_dimensions() {
        let img = Image::from_fn(30, 20, |x, y| {
            if (5..25).contains(&x) && y == 10 {
                BLACK
            } else {
                WHITE
            }
        });
        let stages = compute_stages(&img.as_view(), &VectorizeConfig::default())
            .expect("stages");

        for mask in [
            &stages.gray,
            &stages.ink,
            &stages.closed,
            &stages.cleaned,
            &stages.solid,
            &stages.line,
            &stages.skeleton,
        ] {
            assert_eq!(mask.dims(), (30, 20));
        }
        assert_eq!(count_ink(&stages.ink.as_view()), 20);
        assert_eq!(stages.solid_components, 0);
        assert_eq!(stages.line_components, 1);
    }
}
