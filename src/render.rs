//! Raster previews of drawings.
//!
//! Strokes become kurbo polylines, are stroked with tiny-skia using round
//! caps and joins, and are encoded as PNG. The comparison view puts the
//! original and simplified drawings side by side at one shared scale.

use kurbo::{BezPath, PathEl, Rect};

use crate::error::InkError;
use crate::geom::bounding_box;
use crate::stroke::{Drawing, Stroke};

const DEFAULT_RGB: (u8, u8, u8) = (0x22, 0x22, 0x22);
const DEFAULT_WIDTH: f64 = 3.0;
const PADDING: f64 = 20.0;
const SEPARATOR: u32 = 2;

/// Stroke as an open polyline in drawing coordinates.
fn stroke_to_bezpath(stroke: &Stroke) -> BezPath {
    let mut path = BezPath::new();
    let mut points = stroke.points.iter().map(|p| p.pos());
    if let Some(first) = points.next() {
        path.move_to(first);
        for p in points {
            path.line_to(p);
        }
    }
    path
}

/// Flatten a kurbo path into a `tiny_skia::Path` in pixel space.
fn kurbo_to_tinyskia(bezpath: &BezPath, transform: tiny_skia::Transform) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    kurbo::flatten(bezpath.iter(), 0.1, |el| match el {
        PathEl::MoveTo(p) => {
            let (x, y) = transform_point(p.x, p.y, transform);
            pb.move_to(x, y);
        }
        PathEl::LineTo(p) => {
            let (x, y) = transform_point(p.x, p.y, transform);
            pb.line_to(x, y);
        }
        PathEl::ClosePath => pb.close(),
        // flatten only emits the three variants above
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    pb.finish()
}

/// Apply a scale+translate transform to a point (f64 → f32).
fn transform_point(x: f64, y: f64, t: tiny_skia::Transform) -> (f32, f32) {
    let (x, y) = (x as f32, y as f32);
    (t.sx * x + t.kx * y + t.tx, t.ky * x + t.sy * y + t.ty)
}

/// Parse `#rrggbb`. Anything else is `None`.
pub fn parse_hex_color(text: &str) -> Option<(u8, u8, u8)> {
    let hex = text.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn new_pixmap(width: u32, height: u32) -> Result<tiny_skia::Pixmap, InkError> {
    tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| InkError::Render(format!("invalid canvas size {width}x{height}")))
}

/// Paint every stroke of `drawing` onto `pixmap`.
///
/// Brush size is scaled with the geometry so the preview keeps its weight.
fn paint_drawing(pixmap: &mut tiny_skia::Pixmap, drawing: &Drawing, transform: tiny_skia::Transform) {
    let scale = f64::from(transform.sx.abs()).max(f64::EPSILON);
    for stroke in &drawing.strokes {
        let Some(first) = stroke.first() else { continue };
        let (r, g, b) = first
            .color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(DEFAULT_RGB);
        let width = first.size.filter(|s| s.is_finite() && *s > 0.0).unwrap_or(DEFAULT_WIDTH) * scale;

        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(r, g, b, 255);
        paint.anti_alias = true;

        if stroke.is_degenerate() {
            // A lone point is drawn as a dot.
            let (x, y) = transform_point(first.x, first.y, transform);
            if let Some(dot) = tiny_skia::PathBuilder::from_circle(x, y, (width / 2.0) as f32) {
                pixmap.fill_path(
                    &dot,
                    &paint,
                    tiny_skia::FillRule::Winding,
                    tiny_skia::Transform::identity(),
                    None,
                );
            }
            continue;
        }

        let Some(path) = kurbo_to_tinyskia(&stroke_to_bezpath(stroke), transform) else {
            continue;
        };
        let line = tiny_skia::Stroke {
            width: width as f32,
            line_cap: tiny_skia::LineCap::Round,
            line_join: tiny_skia::LineJoin::Round,
            ..tiny_skia::Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &line, tiny_skia::Transform::identity(), None);
    }
}

/// Encode a pixmap to PNG bytes.
fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, InkError> {
    let mut buf = Vec::new();
    let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| InkError::Render(e.to_string()))?;
    writer
        .write_image_data(pixmap.data())
        .map_err(|e| InkError::Render(e.to_string()))?;
    drop(writer);
    Ok(buf)
}

/// Render `drawing` 1:1 in canvas coordinates onto a white `width`×`height` PNG.
pub fn render_drawing(drawing: &Drawing, width: u32, height: u32) -> Result<Vec<u8>, InkError> {
    let mut pixmap = new_pixmap(width, height)?;
    pixmap.fill(tiny_skia::Color::WHITE);
    paint_drawing(&mut pixmap, drawing, tiny_skia::Transform::identity());
    encode_png(&pixmap)
}

/// Transform fitting `bounds` into a `panel`-sized square with padding.
fn fit_transform(bounds: Option<Rect>, panel: u32) -> tiny_skia::Transform {
    let Some(bounds) = bounds else {
        return tiny_skia::Transform::identity();
    };
    let content = (f64::from(panel) - PADDING * 2.0).max(1.0);
    let extent = bounds.width().max(bounds.height());
    let scale = if extent > 0.0 { content / extent } else { 1.0 };
    let center = bounds.center();
    let half = f64::from(panel) / 2.0;
    tiny_skia::Transform::from_row(
        scale as f32,
        0.0,
        0.0,
        scale as f32,
        (half - center.x * scale) as f32,
        (half - center.y * scale) as f32,
    )
}

/// Side-by-side PNG: `original` on the left, `simplified` on the right.
///
/// Both panels are `panel` pixels square and share the scale that fits
/// the original, so removed detail is visible at a glance.
pub fn render_comparison(original: &Drawing, simplified: &Drawing, panel: u32) -> Result<Vec<u8>, InkError> {
    let transform = fit_transform(bounding_box(original.points()), panel);

    let mut left = new_pixmap(panel, panel)?;
    left.fill(tiny_skia::Color::WHITE);
    paint_drawing(&mut left, original, transform);

    let mut right = new_pixmap(panel, panel)?;
    right.fill(tiny_skia::Color::WHITE);
    paint_drawing(&mut right, simplified, transform);

    let total_w = panel * 2 + SEPARATOR;
    let mut composite = new_pixmap(total_w, panel)?;
    composite.fill(tiny_skia::Color::from_rgba8(200, 200, 200, 255));
    let (lp, rp) = (left.pixels(), right.pixels());
    let out = composite.pixels_mut();
    for y in 0..panel {
        for x in 0..panel {
            let idx = (y * panel + x) as usize;
            out[(y * total_w + x) as usize] = lp[idx];
            out[(y * total_w + panel + SEPARATOR + x) as usize] = rp[idx];
        }
    }

    tracing::debug!(
        panel,
        original = original.total_points(),
        simplified = simplified.total_points(),
        "rendered comparison"
    );
    encode_png(&composite)
}
