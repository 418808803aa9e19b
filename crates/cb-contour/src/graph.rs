use cb_core::{Point2f, Polyline2f};

pub type NodeId = usize;
pub type BranchId = usize;

/// Role of a skeleton pixel that terminates branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Exactly one linked neighbor.
    Endpoint,
    /// Three or more linked neighbors.
    Junction,
    /// No linked neighbor.
    Isolated,
    /// Pixel chosen to open a closed curve that has no endpoint or junction.
    LoopAnchor,
}

#[derive(Debug, Clone)]
pub struct SkeletonNode {
    pub kind: NodeKind,
    pub pixel: (usize, usize),
    /// Linked neighbors of the pixel.
    pub degree: usize,
    pub branches: Vec<BranchId>,
}

impl SkeletonNode {
    pub fn point(&self) -> Point2f {
        Point2f::from_pixel(self.pixel.0, self.pixel.1)
    }
}

/// Pixel-center path between two nodes, both ends included. A closed branch
/// starts and ends on the same anchor pixel.
#[derive(Debug, Clone)]
pub struct Branch {
    pub from: NodeId,
    pub to: NodeId,
    pub points: Vec<Point2f>,
    pub closed: bool,
}

impl Branch {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

/// Nodes and branches of a 1px skeleton.
#[derive(Debug, Clone, Default)]
pub struct SkeletonGraph {
    pub width: usize,
    pub height: usize,
    pub nodes: Vec<SkeletonNode>,
    pub branches: Vec<Branch>,
}

impl SkeletonGraph {
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    pub fn junctions(&self) -> impl Iterator<Item = (NodeId, &SkeletonNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Junction)
    }

    pub fn total_length(&self) -> f32 {
        self.branches.iter().map(Branch::length).sum()
    }

    /// Strokes for the stroke layer.
    ///
    /// A branch ending in an endpoint is a spur and is dropped on its own
    /// when shorter than `min_points`. Every other open branch is chained
    /// with its neighbors through junctions, so runs between close junctions
    /// survive as part of a longer stroke. A chain that runs out of fresh
    /// branches while still short continues over branches already drawn.
    /// Closed branches stay single strokes. Strokes with fewer than
    /// `min_points` points are dropped.
    pub fn into_polylines(self, min_points: usize) -> Vec<Polyline2f> {
        let chainable: Vec<bool> = self
            .branches
            .iter()
            .map(|b| {
                let internal = self.is_junction(b.from) && self.is_junction(b.to);
                !b.closed && (internal || b.len() >= min_points)
            })
            .collect();
        let mut used = vec![false; self.branches.len()];
        let mut out = Vec::new();

        for (id, branch) in self.branches.iter().enumerate() {
            if used[id] {
                continue;
            }
            if branch.closed {
                used[id] = true;
                if branch.len() >= min_points {
                    out.push(Polyline2f::new(branch.points.clone()));
                }
                continue;
            }
            if !chainable[id] {
                continue;
            }

            used[id] = true;
            let mut chain = Chain {
                points: branch.points.clone(),
                head: branch.to,
                head_branch: id,
                tail: branch.from,
                tail_branch: id,
            };
            for borrow in [false, true] {
                if borrow && chain.points.len() >= min_points {
                    break;
                }
                let reuse = borrow.then_some(min_points);
                self.extend_head(&mut chain, &chainable, &mut used, reuse);
                chain.flip();
                self.extend_head(&mut chain, &chainable, &mut used, reuse);
                chain.flip();
            }

            if chain.points.len() >= min_points {
                out.push(Polyline2f::new(chain.points));
            }
        }

        out
    }

    fn is_junction(&self, id: NodeId) -> bool {
        self.nodes[id].kind == NodeKind::Junction
    }

    /// Appends branches at the head of `chain` while it sits on a junction.
    /// Fresh branches come first; with `reuse = Some(min)` an already drawn
    /// one is taken while the chain is shorter than `min`.
    fn extend_head(
        &self,
        chain: &mut Chain,
        chainable: &[bool],
        used: &mut [bool],
        reuse: Option<usize>,
    ) {
        while self.is_junction(chain.head) {
            let last = chain.head_branch;
            let mut candidates = self.nodes[chain.head]
                .branches
                .iter()
                .copied()
                .filter(|&b| chainable[b] && b != last);
            let first = candidates.clone().next();
            let fresh = candidates.find(|&b| !used[b]);

            let next = match (fresh, first, reuse) {
                (Some(b), _, _) => b,
                (None, Some(b), Some(min)) if chain.points.len() < min => b,
                _ => break,
            };

            used[next] = true;
            let branch = &self.branches[next];
            if branch.from == chain.head {
                chain.points.extend_from_slice(&branch.points[1..]);
                chain.head = branch.to;
            } else {
                chain.points.extend(branch.points.iter().rev().skip(1));
                chain.head = branch.from;
            }
            chain.head_branch = next;
        }
    }
}

/// Polyline under construction, growing at `head`.
struct Chain {
    points: Vec<Point2f>,
    head: NodeId,
    head_branch: BranchId,
    tail: NodeId,
    tail_branch: BranchId,
}

impl Chain {
    fn flip(&mut self) {
        self.points.reverse();
        std::mem::swap(&mut self.head, &mut self.tail);
        std::mem::swap(&mut self.head_branch, &mut self.tail_branch);
    }
}
