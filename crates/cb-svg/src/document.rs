use std::io;

use cb_core::{Polygon2f, Polyline2f};

pub const SOLID_LAYER_ID: &str = "solidos";
pub const STROKE_LAYER_ID: &str = "traco";
pub const PAINTABLE_CLASS: &str = "paintable";
pub const INK_COLOR: &str = "#000000";
pub const PLATE_COLOR: &str = "#ffffff";
pub const DEFAULT_STROKE_WIDTH: f32 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct VectorDocument {
    pub width: usize,
    pub height: usize,
    pub background_plate: bool,
    /// Solid layer, in component discovery order.
    pub solids: Vec<Polygon2f>,
    /// Stroke layer, in tracing order.
    pub strokes: Vec<Polyline2f>,
    pub stroke_width: f32,
}

impl VectorDocument {
    /// Empty document with the default stroke width and a paint plate.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            background_plate: true,
            solids: Vec::new(),
            strokes: Vec::new(),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty() && self.strokes.is_empty()
    }

    pub fn to_svg_string(&self) -> String {
        crate::write::render_svg(self)
    }

    pub fn write_svg<W: io::Write>(&self, mut w: W) -> io::Result<()> {
        w.write_all(self.to_svg_string().as_bytes())
    }
}
