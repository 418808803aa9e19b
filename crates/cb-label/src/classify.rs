use cb_core::{Image, ImageView};

use crate::{Connectivity, label_components};

/// Components smaller than this are speckle.
pub const MIN_SPECK_AREA: usize = 16;

pub const DEFAULT_MIN_SOLID_AREA: usize = 2500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentClass {
    Solid,
    Line,
}

/// Area-only discriminant; `area == min_solid_area` is solid.
#[inline]
pub fn classify_area(area: usize, min_solid_area: usize) -> ComponentClass {
    if area >= min_solid_area {
        ComponentClass::Solid
    } else {
        ComponentClass::Line
    }
}

/// Drops 8-connected components with fewer than `min_area` pixels.
pub fn remove_small_components(src: &ImageView<'_, u8>, min_area: usize) -> Image<u8> {
    let labeling = label_components(src, Connectivity::C8);
    labeling.select(|c| c.area >= min_area)
}

/// Disjoint solid/line partition of an ink mask.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidLineSplit {
    pub solid: Image<u8>,
    pub line: Image<u8>,
    pub solid_components: usize,
    pub line_components: usize,
}

/// Assigns every 8-connected component wholly to the solid or the line mask
/// by [`classify_area`].
pub fn split_by_area(src: &ImageView<'_, u8>, min_solid_area: usize) -> SolidLineSplit {
    let labeling = label_components(src, Connectivity::C8);

    let classes: Vec<ComponentClass> = labeling
        .stats
        .iter()
        .map(|c| classify_area(c.area, min_solid_area))
        .collect();

    let solid = labeling.select(|c| classes[c.id as usize - 1] == ComponentClass::Solid);
    let line = labeling.select(|c| classes[c.id as usize - 1] == ComponentClass::Line);
    let solid_components = classes
        .iter()
        .filter(|&&c| c == ComponentClass::Solid)
        .count();

    SolidLineSplit {
        solid,
        line,
        solid_components,
        line_components: classes.len() - solid_components,
    }
}
