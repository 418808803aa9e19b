use cb_core::{ImageView, Point2f, Polygon2f};
use cb_label::{Connectivity, Labeling, label_components};

use crate::simplify::{DEFAULT_EPSILON, simplify_closed};

/// Direction `d` steps by `(DX[d], DY[d])`. Increasing `d` turns
/// counterclockwise on screen (y points down).
const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [isize; 8] = [0, -1, -1, -1, 0, 1, 1, 1];
const WEST: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineConfig {
    /// Douglas-Peucker tolerance in pixels.
    pub epsilon: f32,
    /// Outlines with fewer vertices after simplification are dropped.
    pub min_points: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            min_points: 3,
        }
    }
}

/// Outer border of component `id`, starting from its raster-order `seed`.
///
/// Suzuki-Abe border following restricted to the outer border: pixels are
/// returned once per visit in counterclockwise screen order, starting at the
/// seed, with the closing step back to the seed left implicit. Interior holes
/// are not followed. A single-pixel component yields just the seed.
pub fn trace_outer_border(
    labels: &ImageView<'_, u32>,
    id: u32,
    seed: (usize, usize),
) -> Vec<(usize, usize)> {
    let inside = |x: isize, y: isize| labels.get_signed(x, y) == Some(&id);
    let step = |p: (usize, usize), d: usize| (p.0 as isize + DX[d], p.1 as isize + DY[d]);

    let start = seed;
    let mut last = None;
    for k in 0..8 {
        let d = (WEST + 8 - k) % 8;
        let (nx, ny) = step(start, d);
        if inside(nx, ny) {
            last = Some((nx as usize, ny as usize));
            break;
        }
    }
    let Some(last) = last else {
        return vec![start];
    };

    let mut out = Vec::new();
    let mut prev = last;
    let mut cur = start;
    let max_steps = 4 * labels.width() * labels.height() + 8;
    for _ in 0..max_steps {
        let back = dir_towards(cur, prev);
        let mut next = prev;
        for k in 1..=8 {
            let d = (back + k) % 8;
            let (nx, ny) = step(cur, d);
            if inside(nx, ny) {
                next = (nx as usize, ny as usize);
                break;
            }
        }

        out.push(cur);
        if next == start && cur == last {
            break;
        }
        prev = cur;
        cur = next;
    }

    out
}

/// Closed, simplified outer outline of every component in `labeling`, in
/// component id order.
pub fn outlines_from_labeling(labeling: &Labeling, cfg: &OutlineConfig) -> Vec<Polygon2f> {
    let labels = labeling.labels.as_view();
    let mut out = Vec::with_capacity(labeling.stats.len());

    for c in &labeling.stats {
        let border = trace_outer_border(&labels, c.id, c.seed);
        if border.len() < 3 {
            continue;
        }

        let ring: Vec<Point2f> = border
            .iter()
            .map(|&(x, y)| Point2f::from_pixel(x, y))
            .collect();
        let simplified = simplify_closed(&ring, cfg.epsilon);
        if simplified.len() < cfg.min_points {
            continue;
        }
        out.push(Polygon2f::new(simplified));
    }

    out
}

/// Labels `solid` with 8-connectivity and traces one outline per component.
pub fn trace_solid_outlines(solid: &ImageView<'_, u8>, cfg: &OutlineConfig) -> Vec<Polygon2f> {
    let labeling = label_components(solid, Connectivity::C8);
    outlines_from_labeling(&labeling, cfg)
}

fn dir_towards(from: (usize, usize), to: (usize, usize)) -> usize {
    let dx = to.0 as isize - from.0 as isize;
    let dy = to.1 as isize - from.1 as isize;
    (0..8)
        .find(|&d| DX[d] == dx && DY[d] == dy)
        .expect("border pixels are 8-adjacent")
}

#[cfg(test)]
mod tests {
    use cb_core::{Point2f, mask_from_fn};
    use cb_label::{Connectivity, label_components};

    use super::{OutlineConfig, trace_outer_border, trace_solid_outlines};

    #[test]
    fn square_border_runs_counterclockwise_from_seed() {
        let img = mask_from_fn(5, 5, |x, y| (1..4).contains(&x) && (1..4).contains(&y));
        let l = label_components(&img.as_view(), Connectivity::C8);
        let b = trace_outer_border(&l.labels.as_view(), 1, l.stats[0].seed);

        assert_eq!(
            b,
            vec![
                (1, 1),
                (1, 2),
                (1, 3),
                (2, 3),
                (3, 3),
                (3, 2),
                (3, 1),
                (2, 1)
            ]
        );
    }

    #[test]
    fn tiny_components() {
        let img = mask_from_fn(6, 3, |x, y| (x, y) == (1, 1) || (y == 1 && (3..5).contains(&x)));
        let l = label_components(&img.as_view(), Connectivity::C8);
        let labels = l.labels.as_view();

        assert_eq!(trace_outer_border(&labels, 1, l.stats[0].seed), vec![(1, 1)]);
        assert_eq!(
            trace_outer_border(&labels, 2, l.stats[1].seed),
            vec![(3, 1), (4, 1)]
        );

        assert!(trace_solid_outlines(&img.as_view(), &OutlineConfig::default()).is_empty());
    }

    #[test]
    fn border_ignores_holes() {
        let img = mask_from_fn(12, 12, |x, y| {
            let outer = (1..11).contains(&x) && (1..11).contains(&y);
            let hole = (4..8).contains(&x) && (4..8).contains(&y);
            outer && !hole
        });
        let l = label_components(&img.as_view(), Connectivity::C8);
        let b = trace_outer_border(&l.labels.as_view(), 1, l.stats[0].seed);

        assert_eq!(b.len(), 4 * 9);
        assert!(b.iter().all(|&(x, y)| x == 1 || x == 10 || y == 1 || y == 10));
    }

    #[test]
    fn filled_square_simplifies_to_corners() {
        let img = mask_from_fn(50, 50, |x, y| (10..40).contains(&x) && (10..40).contains(&y));
        let outlines = trace_solid_outlines(&img.as_view(), &OutlineConfig::default());

        assert_eq!(outlines.len(), 1);
        assert_eq!(
            outlines[0].points,
            vec![
                Point2f::new(10.0, 10.0),
                Point2f::new(10.0, 39.0),
                Point2f::new(39.0, 39.0),
                Point2f::new(39.0, 10.0),
            ]
        );
        // Counterclockwise on screen is negative with y pointing down.
        assert!((outlines[0].signed_area() + 29.0 * 29.0).abs() < 1e-3);
    }

    #[test]
    fn diagonal_pinch_is_followed_through() {
        // Two squares touching at one corner form a single 8-connected blob.
        let img = mask_from_fn(10, 10, |x, y| {
            ((1..4).contains(&x) && (1..4).contains(&y))
                || ((4..7).contains(&x) && (4..7).contains(&y))
        });
        let l = label_components(&img.as_view(), Connectivity::C8);
        assert_eq!(l.num_components(), 1);

        let b = trace_outer_border(&l.labels.as_view(), 1, l.stats[0].seed);
        assert!(b.contains(&(6, 6)));
        assert!(b.contains(&(3, 1)));
        assert_eq!(b.iter().filter(|&&p| p == (3, 3)).count(), 2);
        assert_eq!(b.iter().filter(|&&p| p == (4, 4)).count(), 2);
    }

    #[test]
    fn outlines_follow_component_order() {
        let img = mask_from_fn(40, 40, |x, y| {
            ((20..30).contains(&x) && (2..12).contains(&y))
                || ((2..12).contains(&x) && (20..30).contains(&y))
        });
        let outlines = trace_solid_outlines(&img.as_view(), &OutlineConfig::default());
        assert_eq!(outlines.len(), 2);
        assert_eq!(outlines[0].points[0], Point2f::new(20.0, 2.0));
        assert_eq!(outlines[1].points[0], Point2f::new(2.0, 20.0));
    }
}
