use cb_core::{INK, Image, ImageView, PAPER, is_ink};

pub type LabelMap = Image<u32>;

const N4: [(isize, isize); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];
const N8: [(isize, isize); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    C4,
    C8,
}

impl Connectivity {
    pub fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Self::C4 => &N4,
            Self::C8 => &N8,
        }
    }
}

/// Inclusive pixel bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl BBox {
    fn at(x: usize, y: usize) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }

    pub fn width(&self) -> usize {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0 + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStats {
    pub id: u32,
    pub area: usize,
    /// First pixel in raster order; always lies on the outer border.
    pub seed: (usize, usize),
    pub bbox: BBox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Labeling {
    pub labels: LabelMap,
    /// Indexed by `id - 1`.
    pub stats: Vec<ComponentStats>,
}

impl Labeling {
    pub fn num_components(&self) -> usize {
        self.stats.len()
    }

    pub fn component(&self, id: u32) -> Option<&ComponentStats> {
        let idx = (id as usize).checked_sub(1)?;
        self.stats.get(idx)
    }

    /// Mask of the pixels whose component satisfies `keep`.
    pub fn select(&self, mut keep: impl FnMut(&ComponentStats) -> bool) -> Image<u8> {
        let kept: Vec<bool> = self.stats.iter().map(&mut keep).collect();
        self.labels.map(|&id| {
            if id != 0 && kept[id as usize - 1] {
                INK
            } else {
                PAPER
            }
        })
    }
}

pub fn label_components(src: &ImageView<'_, u8>, connectivity: Connectivity) -> Labeling {
    let width = src.width();
    let height = src.height();
    let mut labels = Image::new_fill(width, height, 0u32);
    let mut stats: Vec<ComponentStats> = Vec::new();
    if src.is_empty() {
        return Labeling { labels, stats };
    }

    let offsets = connectivity.offsets();
    let mut stack = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if !is_ink(src.row(y)[x]) || labels.data()[y * width + x] != 0 {
                continue;
            }

            let id = u32::try_from(stats.len() + 1).expect("component count exceeds u32");
            let mut area = 0usize;
            let mut bbox = BBox::at(x, y);

            labels.data_mut()[y * width + x] = id;
            stack.clear();
            stack.push((x, y));

            while let Some((px, py)) = stack.pop() {
                area += 1;
                bbox.include(px, py);

                for &(dx, dy) in offsets {
                    let nx = px as isize + dx;
                    let ny = py as isize + dy;
                    let Some(&v) = src.get_signed(nx, ny) else {
                        continue;
                    };
                    if !is_ink(v) {
                        continue;
                    }

                    let idx = ny as usize * width + nx as usize;
                    if labels.data()[idx] == 0 {
                        labels.data_mut()[idx] = id;
                        stack.push((nx as usize, ny as usize));
                    }
                }
            }

            stats.push(ComponentStats {
                id,
                area,
                seed: (x, y),
                bbox,
            });
        }
    }

    Labeling { labels, stats }
}

#[cfg(test)]
mod tests {
    use cb_core::mask_from_fn;

    use super::{Connectivity, label_components};

    #[test]
    fn diagonal_touch_depends_on_connectivity() {
        let img = mask_from_fn(4, 4, |x, y| (x, y) == (1, 1) || (x, y) == (2, 2));

        let c8 = label_components(&img.as_view(), Connectivity::C8);
        assert_eq!(c8.num_components(), 1);
        assert_eq!(c8.stats[0].area, 2);

        let c4 = label_components(&img.as_view(), Connectivity::C4);
        assert_eq!(c4.num_components(), 2);
    }

    #[test]
    fn ids_follow_raster_discovery_order() {
        // The short vertical stub on the right starts on row 0, so it gets
        // id 1 even though the L shape on the left is larger.
        let img = mask_from_fn(8, 6, |x, y| {
            (x == 6 && y <= 1) || (y == 2 && x <= 2) || (x == 0 && y >= 2)
        });
        let l = label_components(&img.as_view(), Connectivity::C8);

        assert_eq!(l.num_components(), 2);
        assert_eq!(l.stats[0].seed, (6, 0));
        assert_eq!(l.stats[0].area, 2);
        assert_eq!(l.stats[1].seed, (0, 2));
        assert_eq!(l.stats[1].area, 3 + 3);
        assert_eq!(l.labels.get(0, 5), Some(&2));
        assert_eq!(l.labels.get(6, 1), Some(&1));
        assert_eq!(l.labels.get(7, 5), Some(&0));
    }

    #[test]
    fn ids_are_unique_and_dense() {
        let img = mask_from_fn(20, 20, |x, y| x % 4 == 0 && y % 4 == 0);
        let l = label_components(&img.as_view(), Connectivity::C8);

        assert_eq!(l.num_components(), 25);
        for (i, s) in l.stats.iter().enumerate() {
            assert_eq!(s.id as usize, i + 1);
            assert_eq!(l.component(s.id), Some(s));
        }
        assert!(l.component(0).is_none());
        assert!(l.component(26).is_none());
    }

    #[test]
    fn bbox_and_select() {
        let img = mask_from_fn(10, 10, |x, y| (2..5).contains(&x) && (3..9).contains(&y));
        let l = label_components(&img.as_view(), Connectivity::C8);
        let s = &l.stats[0];

        assert_eq!(s.area, 18);
        assert_eq!((s.bbox.x0, s.bbox.y0, s.bbox.x1, s.bbox.y1), (2, 3, 4, 8));
        assert_eq!((s.bbox.width(), s.bbox.height()), (3, 6));

        assert_eq!(l.select(|_| true), img);
        assert!(l.select(|_| false).data().iter().all(|&v| v == 0));
    }
}
