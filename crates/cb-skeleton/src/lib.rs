//! Zhang-Suen thinning of binary masks.
//!
//! Each iteration runs two sub-iterations. A sub-iteration first marks every
//! removable pixel against the current state, then deletes them all at once.
//! Pixels outside the image count as paper. Thinning stops at the first
//! iteration that deletes nothing, so the result is a fixed point: thinning
//! it again returns it unchanged.
//!
//! A component whose pixels would all be marked in one sub-iteration (the
//! classic 2x2 block) is left alone instead of vanishing.

use cb_core::{INK, Image, ImageView, PAPER, is_ink};

/// Neighbor offsets in Zhang-Suen order `P2..P9`: N, NE, E, SE, S, SW, W, NW.
const RING: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThinningStats {
    /// Full iterations run, including the final one that removed nothing.
    pub iterations: usize,
    pub removed: usize,
}

pub fn thin_zhang_suen(src: &ImageView<'_, u8>) -> Image<u8> {
    thin_zhang_suen_with_stats(src).0
}

pub fn thin_zhang_suen_with_stats(src: &ImageView<'_, u8>) -> (Image<u8>, ThinningStats) {
    let width = src.width();
    let height = src.height();
    let mut stats = ThinningStats::default();

    let mut grid = Grid {
        width,
        height,
        cells: src.to_image().map(|&v| is_ink(v)).into_vec(),
    };
    if src.is_empty() || !grid.cells.iter().any(|&c| c) {
        return (Image::new_fill(width, height, PAPER), stats);
    }

    let mut marked = Vec::new();
    loop {
        stats.iterations += 1;
        let mut removed = 0;
        for pass in [SubIteration::First, SubIteration::Second] {
            grid.mark_removable(pass, &mut marked);
            grid.keep_vanishing_components(&mut marked);
            for &p in &marked {
                grid.cells[p] = false;
            }
            removed += marked.len();
        }

        stats.removed += removed;
        if removed == 0 {
            break;
        }
    }

    let img = Image::from_fn(width, height, |x, y| {
        if grid.cells[y * width + x] { INK } else { PAPER }
    });
    (img, stats)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubIteration {
    First,
    Second,
}

struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    #[inline]
    fn at(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    #[inline]
    fn ring(&self, x: usize, y: usize) -> [bool; 8] {
        let mut p = [false; 8];
        for (slot, &(dx, dy)) in p.iter_mut().zip(RING.iter()) {
            *slot = self.at(x as isize + dx, y as isize + dy);
        }
        p
    }

    fn mark_removable(&self, pass: SubIteration, marked: &mut Vec<usize>) {
        marked.clear();
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                if !self.cells[idx] {
                    continue;
                }

                let p = self.ring(x, y);
                let b = p.iter().filter(|&&v| v).count();
                if !(2..=6).contains(&b) {
                    continue;
                }

                let a = (0..8).filter(|&i| !p[i] && p[(i + 1) % 8]).count();
                if a != 1 {
                    continue;
                }

                let [p2, _, p4, _, p6, _, p8, _] = p;
                let removable = match pass {
                    SubIteration::First => !(p2 && p4 && p6) && !(p4 && p6 && p8),
                    SubIteration::Second => !(p2 && p4 && p8) && !(p2 && p6 && p8),
                };
                if removable {
                    marked.push(idx);
                }
            }
        }
    }

    /// Unmarks every 8-connected cluster of marked pixels that has no
    /// surviving ink neighbor, i.e. a whole component about to disappear.
    fn keep_vanishing_components(&self, marked: &mut Vec<usize>) {
        if marked.is_empty() {
            return;
        }

        let n = self.cells.len();
        let mut is_marked = vec![false; n];
        for &p in marked.iter() {
            is_marked[p] = true;
        }

        let mut seen = vec![false; n];
        let mut keep = vec![false; n];
        let mut stack = Vec::new();
        let mut cluster = Vec::new();

        for &start in marked.iter() {
            if seen[start] {
                continue;
            }

            seen[start] = true;
            stack.clear();
            cluster.clear();
            stack.push(start);
            let mut touches_survivor = false;

            while let Some(p) = stack.pop() {
                cluster.push(p);
                let (x, y) = ((p % self.width) as isize, (p / self.width) as isize);
                for &(dx, dy) in &RING {
                    if !self.at(x + dx, y + dy) {
                        continue;
                    }
                    let q = (y + dy) as usize * self.width + (x + dx) as usize;
                    if !is_marked[q] {
                        touches_survivor = true;
                    } else if !seen[q] {
                        seen[q] = true;
                        stack.push(q);
                    }
                }
            }

            if !touches_survivor {
                for &p in &cluster {
                    keep[p] = true;
                }
            }
        }

        marked.retain(|&p| !keep[p]);
    }
}
