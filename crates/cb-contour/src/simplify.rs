use cb_core::Point2f;

/// Default vertex tolerance for solid outlines, in pixels.
pub const DEFAULT_EPSILON: f32 = 0.5;

/// Ramer-Douglas-Peucker on an open chain. Endpoints are always kept and a
/// vertex survives only if it lies farther than `epsilon` from the chord of
/// its current span.
pub fn simplify_open(points: &[Point2f], epsilon: f32) -> Vec<Point2f> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((lo, hi)) = stack.pop() {
        if hi <= lo + 1 {
            continue;
        }

        let mut best = lo;
        let mut best_d = -1.0_f32;
        for (i, &p) in points.iter().enumerate().take(hi).skip(lo + 1) {
            let d = distance_to_chord(p, points[lo], points[hi]);
            if d > best_d {
                best_d = d;
                best = i;
            }
        }

        if best_d > epsilon {
            keep[best] = true;
            stack.push((lo, best));
            stack.push((best, hi));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Ramer-Douglas-Peucker on a closed ring (first point not repeated).
///
/// The ring is cut at its first vertex and at the vertex farthest from it;
/// both halves are simplified as open chains and joined again.
pub fn simplify_closed(points: &[Point2f], epsilon: f32) -> Vec<Point2f> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let origin = points[0];
    let mut far = 0;
    let mut far_d = 0.0_f32;
    for (i, &p) in points.iter().enumerate().skip(1) {
        let d = p.distance(origin);
        if d > far_d {
            far_d = d;
            far = i;
        }
    }
    if far == 0 {
        return vec![origin];
    }

    let head = simplify_open(&points[..=far], epsilon);

    let mut tail_src = points[far..].to_vec();
    tail_src.push(origin);
    let tail = simplify_open(&tail_src, epsilon);

    let mut out = head;
    out.extend_from_slice(&tail[1..tail.len() - 1]);
    out
}

fn distance_to_chord(p: Point2f, a: Point2f, b: Point2f) -> f32 {
    let ab = b - a;
    let len = ab.norm();
    if len == 0.0 {
        return p.distance(a);
    }
    ab.cross(p - a).abs() / len
}

#[cfg(test)]
mod tests {
    use cb_core::Point2f;

    use super::{simplify_closed, simplify_open};

    fn pts(raw: &[(f32, f32)]) -> Vec<Point2f> {
        raw.iter().map(|&(x, y)| Point2f::new(x, y)).collect()
    }

    #[test]
    fn collinear_run_collapses_to_endpoints() {
        let line: Vec<Point2f> = (0..20).map(|i| Point2f::new(i as f32, 3.0)).collect();
        let out = simplify_open(&line, 0.5);
        assert_eq!(out, pts(&[(0.0, 3.0), (19.0, 3.0)]));
    }

    #[test]
    fn deviation_within_tolerance_is_dropped() {
        let raw = pts(&[(0.0, 0.0), (5.0, 0.4), (10.0, 0.0)]);
        assert_eq!(simplify_open(&raw, 0.5).len(), 2);

        let raw = pts(&[(0.0, 0.0), (5.0, 0.6), (10.0, 0.0)]);
        assert_eq!(simplify_open(&raw, 0.5).len(), 3);
    }

    #[test]
    fn closed_square_ring_keeps_four_corners() {
        let mut ring = Vec::new();
        for y in 0..10 {
            ring.push((0.0, y as f32));
        }
        for x in 1..10 {
            ring.push((x as f32, 9.0));
        }
        for y in (0..9).rev() {
            ring.push((9.0, y as f32));
        }
        for x in (1..9).rev() {
            ring.push((x as f32, 0.0));
        }

        let out = simplify_closed(&pts(&ring), 0.5);
        assert_eq!(out, pts(&[(0.0, 0.0), (0.0, 9.0), (9.0, 9.0), (9.0, 0.0)]));
    }

    #[test]
    fn degenerate_rings() {
        let single = pts(&[(2.0, 2.0)]);
        assert_eq!(simplify_closed(&single, 0.5), single);

        let same = pts(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        assert_eq!(simplify_closed(&same, 0.5), pts(&[(1.0, 1.0)]));
    }
}
