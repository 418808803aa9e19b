use std::fmt::Write;

use cb_core::{Polygon2f, Polyline2f};

use crate::document::{
    INK_COLOR, PAINTABLE_CLASS, PLATE_COLOR, SOLID_LAYER_ID, STROKE_LAYER_ID, VectorDocument,
};

/// `M x,y x,y ... z` with vertices at full precision (pixel centers print as
/// integers).
pub fn polygon_path_data(polygon: &Polygon2f) -> String {
    let mut d = String::from("M");
    for p in &polygon.points {
        let _ = write!(d, " {},{}", p.x, p.y);
    }
    d.push_str(" z");
    d
}

/// `M x,y x,y ...` with two decimals per coordinate.
pub fn polyline_path_data(polyline: &Polyline2f) -> String {
    let mut d = String::from("M");
    for p in &polyline.points {
        let _ = write!(d, " {:.2},{:.2}", p.x, p.y);
    }
    d
}

pub(crate) fn render_svg(doc: &VectorDocument) -> String {
    let mut s = String::with_capacity(256 + 64 * (doc.solids.len() + doc.strokes.len()));

    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        s,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{w}\" height=\"{h}\" viewBox=\"{vb}\">",
        w = doc.width,
        h = doc.height,
        vb = doc.view_box(),
    );

    if doc.background_plate {
        let _ = writeln!(
            s,
            "  <rect class=\"{PAINTABLE_CLASS}\" x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{PLATE_COLOR}\"/>",
            doc.width, doc.height,
        );
    }

    let solid_open = format!("<g id=\"{SOLID_LAYER_ID}\" fill=\"{INK_COLOR}\" stroke=\"none\"");
    let solid_paths = doc.solids.iter().filter(|p| !p.is_empty()).map(|p| {
        format!(
            "<path d=\"{}\" fill=\"{INK_COLOR}\" stroke=\"none\"/>",
            polygon_path_data(p)
        )
    });
    write_group(&mut s, &solid_open, solid_paths);

    let stroke_open = format!(
        "<g id=\"{STROKE_LAYER_ID}\" stroke=\"{INK_COLOR}\" fill=\"none\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"",
        doc.stroke_width
    );
    let stroke_paths = doc
        .strokes
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| format!("<path d=\"{}\"/>", polyline_path_data(p)));
    write_group(&mut s, &stroke_open, stroke_paths);

    s.push_str("</svg>\n");
    s
}

fn write_group(s: &mut String, open: &str, children: impl Iterator<Item = String>) {
    let mut children = children.peekable();
    if children.peek().is_none() {
        let _ = writeln!(s, "  {open}/>");
        return;
    }

    let _ = writeln!(s, "  {open}>");
    for child in children {
        let _ = writeln!(s, "    {child}");
    }
    s.push_str("  </g>\n");
}
