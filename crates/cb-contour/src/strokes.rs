use cb_core::{ImageView, Point2f, Polyline2f};
use cb_label::{Connectivity, label_components};

use crate::border::trace_outer_border;
use crate::centerline::{CenterlineConfig, trace_centerlines};

/// Stroke layer for a line mask and its skeleton.
///
/// Centerlines come first, in tracing order. A line component that none of
/// them touches (a compact blob whose skeleton collapsed to a few pixels)
/// is drawn as its closed outer border instead, in component discovery
/// order, so no line component disappears from the output. Borders shorter
/// than `cfg.min_points` are dropped like any other stroke.
pub fn trace_line_strokes(
    line: &ImageView<'_, u8>,
    skeleton: &ImageView<'_, u8>,
    cfg: &CenterlineConfig,
) -> Vec<Polyline2f> {
    let mut strokes = trace_centerlines(skeleton, cfg);

    let labeling = label_components(line, Connectivity::C8);
    if labeling.num_components() == 0 {
        return strokes;
    }

    let mut covered = vec![false; labeling.num_components() + 1];
    for p in strokes.iter().flat_map(|s| s.points.iter()) {
        if let Some(&id) = labeling.labels.get(p.x as usize, p.y as usize) {
            covered[id as usize] = true;
        }
    }

    let labels = labeling.labels.as_view();
    for c in &labeling.stats {
        if covered[c.id as usize] {
            continue;
        }

        let border = trace_outer_border(&labels, c.id, c.seed);
        let mut points: Vec<Point2f> = border
            .iter()
            .map(|&(x, y)| Point2f::from_pixel(x, y))
            .collect();
        if let Some(&first) = points.first() {
            points.push(first);
        }
        if points.len() >= cfg.min_points {
            strokes.push(Polyline2f::new(points));
        }
    }

    strokes
}
