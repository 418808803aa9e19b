use cb_core::{ImageView, Point2f, Polyline2f, is_ink};
use cb_label::Connectivity;

use crate::graph::{Branch, NodeId, NodeKind, SkeletonGraph, SkeletonNode};

/// Direction `d` steps by `(DX[d], DY[d])`, counterclockwise from east.
const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [isize; 8] = [0, -1, -1, -1, 0, 1, 1, 1];
const ORTHOGONAL_DIRS: [u8; 4] = [0, 2, 4, 6];
const ALL_DIRS: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Strokes shorter than this many points are treated as noise.
pub const MIN_POLYLINE_POINTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterlineConfig {
    pub connectivity: Connectivity,
    pub min_points: usize,
}

impl Default for CenterlineConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::C8,
            min_points: MIN_POLYLINE_POINTS,
        }
    }
}

/// Polylines along a 1px skeleton, chained through junctions with short
/// spurs left out.
pub fn trace_centerlines(skeleton: &ImageView<'_, u8>, cfg: &CenterlineConfig) -> Vec<Polyline2f> {
    build_graph_from_skeleton(skeleton, cfg.connectivity).into_polylines(cfg.min_points)
}

/// Junction-aware graph over skeleton pixels.
///
/// Pixels with a linked-neighbor count other than 2 are nodes, created in
/// raster order. Every link leaving a node is walked through degree-2 pixels
/// until the next node, giving one branch per walk. Closed curves without
/// any node get a `LoopAnchor` at their first pixel in raster order and a
/// single closed branch.
pub fn build_graph_from_skeleton(
    skeleton: &ImageView<'_, u8>,
    connectivity: Connectivity,
) -> SkeletonGraph {
    let grid = PixelGrid::from_mask(skeleton, connectivity);
    if grid.on.is_empty() {
        return SkeletonGraph {
            width: grid.width,
            height: grid.height,
            ..SkeletonGraph::default()
        };
    }

    let mut builder = GraphBuilder::new(&grid);
    builder.trace_from_nodes();
    builder.trace_loops();
    builder.finish()
}

struct PixelGrid {
    width: usize,
    height: usize,
    on: Vec<bool>,
    connectivity: Connectivity,
}

impl PixelGrid {
    fn from_mask(mask: &ImageView<'_, u8>, connectivity: Connectivity) -> Self {
        let (width, height) = mask.dims();
        let mut on = Vec::with_capacity(width * height);
        for y in 0..height {
            on.extend(mask.row(y).iter().map(|&v| is_ink(v)));
        }

        Self {
            width,
            height,
            on,
            connectivity,
        }
    }

    fn dirs(&self) -> &'static [u8] {
        match self.connectivity {
            Connectivity::C4 => &ORTHOGONAL_DIRS,
            Connectivity::C8 => &ALL_DIRS,
        }
    }

    fn index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    fn is_on(&self, x: isize, y: isize) -> bool {
        self.index(x, y).is_some_and(|i| self.on[i])
    }

    fn pixel(&self, p: usize) -> (usize, usize) {
        (p % self.width, p / self.width)
    }

    fn point(&self, p: usize) -> Point2f {
        let (x, y) = self.pixel(p);
        Point2f::from_pixel(x, y)
    }

    /// Neighbor of `p` in `dir` if the two pixels are linked.
    ///
    /// A diagonal pair is not linked when either orthogonal pixel beside the
    /// step is on: the path through that pixel already joins them, and
    /// counting both would turn every staircase corner into a junction.
    fn link(&self, p: usize, dir: u8) -> Option<usize> {
        let (x, y) = self.pixel(p);
        let (x, y) = (x as isize, y as isize);
        let (dx, dy) = (DX[dir as usize], DY[dir as usize]);

        let q = self.index(x + dx, y + dy)?;
        if !self.on[q] {
            return None;
        }
        if dx != 0 && dy != 0 && (self.is_on(x + dx, y) || self.is_on(x, y + dy)) {
            return None;
        }
        Some(q)
    }

    fn links(&self, p: usize) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.dirs()
            .iter()
            .filter_map(move |&dir| self.link(p, dir).map(|q| (dir, q)))
    }
}

/// One bit per (pixel, direction) already walked. Marking a step marks both
/// of its ends.
struct LinkSet {
    bits: Vec<u8>,
}

impl LinkSet {
    fn new(len: usize) -> Self {
        Self {
            bits: vec![0; len],
        }
    }

    fn contains(&self, p: usize, dir: u8) -> bool {
        self.bits[p] & (1 << dir) != 0
    }

    fn insert(&mut self, p: usize, dir: u8, q: usize) {
        self.bits[p] |= 1 << dir;
        self.bits[q] |= 1 << ((dir + 4) & 7);
    }
}

struct Walk {
    points: Vec<Point2f>,
    end: usize,
    end_node: Option<NodeId>,
    closed: bool,
}

struct GraphBuilder<'g> {
    grid: &'g PixelGrid,
    degree: Vec<u8>,
    node_at: Vec<Option<NodeId>>,
    walked: LinkSet,
    nodes: Vec<SkeletonNode>,
    branches: Vec<Branch>,
}

impl<'g> GraphBuilder<'g> {
    fn new(grid: &'g PixelGrid) -> Self {
        let n = grid.on.len();
        let degree = (0..n)
            .map(|p| if grid.on[p] { grid.links(p).count() as u8 } else { 0 })
            .collect();

        let mut builder = Self {
            grid,
            degree,
            node_at: vec![None; n],
            walked: LinkSet::new(n),
            nodes: Vec::new(),
            branches: Vec::new(),
        };
        for p in 0..n {
            if grid.on[p] && builder.degree[p] != 2 {
                builder.node_for(p, NodeKind::Endpoint);
            }
        }
        builder
    }

    /// Node at pixel `p`, created on first use. `degree_two_kind` is the
    /// kind given to a degree-2 pixel promoted to a node.
    fn node_for(&mut self, p: usize, degree_two_kind: NodeKind) -> NodeId {
        if let Some(id) = self.node_at[p] {
            return id;
        }

        let degree = self.degree[p] as usize;
        let kind = match degree {
            0 => NodeKind::Isolated,
            1 => NodeKind::Endpoint,
            2 => degree_two_kind,
            _ => NodeKind::Junction,
        };

        let id = self.nodes.len();
        self.node_at[p] = Some(id);
        self.nodes.push(SkeletonNode {
            kind,
            pixel: self.grid.pixel(p),
            degree,
            branches: Vec::new(),
        });
        id
    }

    /// Walks every unwalked link leaving a node, including nodes created at
    /// the end of earlier walks.
    fn trace_from_nodes(&mut self) {
        let grid = self.grid;
        let mut from = 0;
        while from < self.nodes.len() {
            let (x, y) = self.nodes[from].pixel;
            let start = y * grid.width + x;

            for (dir, first) in grid.links(start) {
                if self.walked.contains(start, dir) {
                    continue;
                }
                let walk = self.walk(start, dir, first);
                let to = match walk.end_node {
                    Some(id) => id,
                    None => self.node_for(walk.end, NodeKind::Endpoint),
                };
                self.push_branch(from, to, walk);
            }

            from += 1;
        }
    }

    /// Whatever is left unwalked belongs to curves made only of degree-2
    /// pixels.
    fn trace_loops(&mut self) {
        let grid = self.grid;
        for p in 0..grid.on.len() {
            if !grid.on[p] {
                continue;
            }

            for (dir, first) in grid.links(p) {
                if self.walked.contains(p, dir) {
                    continue;
                }
                let anchor = self.node_for(p, NodeKind::LoopAnchor);
                let walk = self.walk(p, dir, first);
                let to = if walk.closed {
                    anchor
                } else {
                    self.node_for(walk.end, NodeKind::Endpoint)
                };
                self.push_branch(anchor, to, walk);
            }
        }
    }

    /// Follows links from `start` through `first` until reaching a node,
    /// coming back to `start`, or running out of pixels.
    fn walk(&mut self, start: usize, dir: u8, first: usize) -> Walk {
        let grid = self.grid;
        let mut points = vec![grid.point(start)];
        let (mut prev, mut cur, mut dir) = (start, first, dir);
        let mut closed = false;

        for _ in 0..grid.on.len() {
            self.walked.insert(prev, dir, cur);
            points.push(grid.point(cur));

            if cur == start {
                closed = true;
                break;
            }
            if self.node_at[cur].is_some() {
                break;
            }

            let Some((next_dir, next)) = self.next_link(cur, prev) else {
                break;
            };
            if next == start {
                self.walked.insert(cur, next_dir, start);
                points.push(grid.point(start));
                closed = true;
                cur = start;
                break;
            }

            prev = cur;
            cur = next;
            dir = next_dir;
        }

        Walk {
            points,
            end: cur,
            end_node: self.node_at[cur],
            closed,
        }
    }

    /// First unwalked link out of `cur` other than the way back, else the
    /// first walked one.
    fn next_link(&self, cur: usize, prev: usize) -> Option<(u8, usize)> {
        let mut walked = None;
        for (dir, q) in self.grid.links(cur) {
            if q == prev {
                continue;
            }
            if !self.walked.contains(cur, dir) {
                return Some((dir, q));
            }
            if walked.is_none() {
                walked = Some((dir, q));
            }
        }
        walked
    }

    fn push_branch(&mut self, from: NodeId, to: NodeId, walk: Walk) {
        let id = self.branches.len();
        self.nodes[from].branches.push(id);
        if to != from {
            self.nodes[to].branches.push(id);
        }
        self.branches.push(Branch {
            from,
            to,
            points: walk.points,
            closed: walk.closed,
        });
    }

    fn finish(self) -> SkeletonGraph {
        SkeletonGraph {
            width: self.grid.width,
            height: self.grid.height,
            nodes: self.nodes,
            branches: self.branches,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use cb_core::{Point2f, count_ink, mask_from_fn};
    use cb_label::Connectivity;

    use crate::{
        CenterlineConfig, MIN_POLYLINE_POINTS, NodeKind, build_graph_from_skeleton,
        trace_centerlines,
    };

    #[test]
    fn straight_segment_is_one_polyline() {
        let img = mask_from_fn(60, 10, |x, y| y == 5 && (10..50).contains(&x));
        let lines = trace_centerlines(&img.as_view(), &CenterlineConfig::default());

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.len(), 40);
        assert_eq!(line.first(), Some(Point2f::new(10.0, 5.0)));
        assert_eq!(line.last(), Some(Point2f::new(49.0, 5.0)));
        assert!((line.length() - 39.0).abs() < 1e-4);
    }

    #[test]
    fn t_junction_graph() {
        let img = mask_from_fn(9, 9, |x, y| {
            (x == 4 && (1..=7).contains(&y)) || (y == 4 && (5..=7).contains(&x))
        });
        let g = build_graph_from_skeleton(&img.as_view(), Connectivity::C8);

        assert_eq!(g.count_kind(NodeKind::Junction), 1);
        assert_eq!(g.count_kind(NodeKind::Endpoint), 3);
        assert_eq!(g.branches.len(), 3);

        let (_, j) = g.junctions().next().expect("junction should be present");
        assert_eq!(j.pixel, (4, 4));
        assert_eq!(j.degree, 3);
        assert_eq!(j.branches.len(), 3);

        assert!(g.branches.iter().all(|b| b.len() >= 2 && !b.closed));
        // 3 + 3 + 3 unit steps from the junction.
        assert!((g.total_length() - 9.0).abs() < 1e-4);
    }

    #[test]
    fn y_junction_graph() {
        let img = mask_from_fn(9, 9, |x, y| {
            (x == 4 && (1..=4).contains(&y)) || [(3, 5), (2, 6), (5, 5), (6, 6)].contains(&(x, y))
        });
        let g = build_graph_from_skeleton(&img.as_view(), Connectivity::C8);

        assert_eq!(g.count_kind(NodeKind::Junction), 1);
        assert_eq!(g.count_kind(NodeKind::Endpoint), 3);
        assert_eq!(g.branches.len(), 3);
    }

    #[test]
    fn staircase_has_no_pseudo_junctions() {
        // Zhang-Suen style diagonal made of L-steps.
        let img = mask_from_fn(30, 30, |x, y| {
            let k = y as isize - 2;
            (0..20).contains(&k) && (x as isize == k + 2 || x as isize == k + 3)
        });
        let g = build_graph_from_skeleton(&img.as_view(), Connectivity::C8);

        assert_eq!(g.count_kind(NodeKind::Junction), 0);
        assert_eq!(g.count_kind(NodeKind::Endpoint), 2);
        assert_eq!(g.branches.len(), 1);
    }

    #[test]
    fn ring_becomes_one_closed_branch() {
        let img = mask_from_fn(20, 20, |x, y| {
            let on_x = (2..=12).contains(&x) && (y == 2 || y == 12);
            let on_y = (2..=12).contains(&y) && (x == 2 || x == 12);
            on_x || on_y
        });
        let g = build_graph_from_skeleton(&img.as_view(), Connectivity::C4);

        assert_eq!(g.count_kind(NodeKind::Junction), 0);
        assert_eq!(g.count_kind(NodeKind::Endpoint), 0);
        assert_eq!(g.branches.len(), 1);
        assert!(g.branches[0].closed);
        assert_eq!(g.branches[0].from, g.branches[0].to);
        assert_eq!(g.nodes.len(), 1);
        assert_eq!(g.nodes[0].kind, NodeKind::LoopAnchor);
        assert_eq!(g.nodes[0].pixel, (2, 2));

        let points = &g.branches[0].points;
        assert_eq!(points.first(), points.last());
        assert_eq!(points.len(), 40 + 1);

        let lines = trace_centerlines(&img.as_view(), &CenterlineConfig::default());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn isolated_pixel_is_a_node_without_branches() {
        let img = mask_from_fn(5, 5, |x, y| (x, y) == (2, 2));
        let g = build_graph_from_skeleton(&img.as_view(), Connectivity::C8);

        assert_eq!(g.count_kind(NodeKind::Isolated), 1);
        assert!(g.branches.is_empty());
    }

    #[test]
    fn short_strokes_are_dropped() {
        let img = mask_from_fn(30, 10, |x, y| {
            (y == 2 && (1..8).contains(&x)) || (y == 6 && (1..9).contains(&x))
        });
        let lines = trace_centerlines(&img.as_view(), &CenterlineConfig::default());

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 8);
        assert_eq!(lines[0].first(), Some(Point2f::new(1.0, 6.0)));
    }

    #[test]
    fn short_spur_is_dropped_and_line_runs_through_junction() {
        let img = mask_from_fn(32, 12, |x, y| {
            (y == 5 && x < 30) || (x == 15 && (6..=8).contains(&y))
        });
        let g = build_graph_from_skeleton(&img.as_view(), Connectivity::C8);
        assert_eq!(g.count_kind(NodeKind::Junction), 1);
        assert_eq!(g.branches.len(), 3);

        let lines = g.into_polylines(MIN_POLYLINE_POINTS);
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.len(), 30);
        assert_eq!(line.first(), Some(Point2f::new(0.0, 5.0)));
        assert_eq!(line.last(), Some(Point2f::new(29.0, 5.0)));
        assert!(line.points.iter().all(|p| p.y == 5.0));
    }

    #[test]
    fn dense_grid_is_fully_traced() {
        // 1px grid with junctions every 5 pixels: each run between two
        // junctions has only 6 points.
        let img = mask_from_fn(41, 41, |x, y| x % 5 == 0 || y % 5 == 0);
        let lines = trace_centerlines(&img.as_view(), &CenterlineConfig::default());

        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| l.len() >= MIN_POLYLINE_POINTS));

        let covered: HashSet<(usize, usize)> = lines
            .iter()
            .flat_map(|l| l.points.iter())
            .map(|p| (p.x as usize, p.y as usize))
            .collect();
        assert_eq!(covered.len(), count_ink(&img.as_view()));
        assert!(covered.iter().all(|&(x, y)| x % 5 == 0 || y % 5 == 0));
    }

    #[test]
    fn bridge_between_two_junctions_is_kept() {
        // H shape: the crossbar runs between two junctions and is shorter
        // than a stroke on its own.
        let img = mask_from_fn(30, 30, |x, y| {
            let legs = (x == 5 || x == 10) && (2..=27).contains(&y);
            legs || (y == 15 && (5..=10).contains(&x))
        });
        let g = build_graph_from_skeleton(&img.as_view(), Connectivity::C8);
        assert_eq!(g.count_kind(NodeKind::Junction), 2);
        assert!(g.branches.iter().any(|b| b.len() == 6));

        let lines = g.into_polylines(MIN_POLYLINE_POINTS);
        let covered: HashSet<(usize, usize)> = lines
            .iter()
            .flat_map(|l| l.points.iter())
            .map(|p| (p.x as usize, p.y as usize))
            .collect();
        assert!((6..10).all(|x| covered.contains(&(x, 15))));
        assert_eq!(covered.len(), count_ink(&img.as_view()));
    }

    #[test]
    fn empty_skeleton_gives_empty_graph() {
        let img = mask_from_fn(10, 10, |_, _| false);
        let g = build_graph_from_skeleton(&img.as_view(), Connectivity::C8);
        assert!(g.nodes.is_empty());
        assert!(g.branches.is_empty());

        let none = mask_from_fn(0, 0, |_, _| true);
        assert!(trace_centerlines(&none.as_view(), &CenterlineConfig::default()).is_empty());
    }
}
