//! Template strokes for named shapes.
//!
//! When a user picks a suggestion, the canvas is replaced with a clean
//! outline of that shape. Every template is a single stroke centred on
//! `center` and scaled by `size` (roughly the half-extent in pixels).
//! Unknown names fall back to the circle.

use std::f64::consts::PI;

use kurbo::Point as Pos;

use crate::stroke::{Point, Stroke};

/// Colour and width stamped on every generated point.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub color: String,
    pub size: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: "#ff6b6b".to_string(),
            size: 5.0,
        }
    }
}

/// Names with a dedicated template.
pub const STENCIL_NAMES: &[&str] = &[
    "circle", "square", "triangle", "star", "heart", "house", "flower", "car", "tree",
];

/// Build the template stroke for `name` (case-insensitive).
pub fn stencil(name: &str, center: Pos, size: f64, brush: &Brush) -> Stroke {
    let (cx, cy) = (center.x, center.y);
    let coords: Vec<(f64, f64)> = match name.to_lowercase().as_str() {
        "square" => vec![
            (cx - size, cy - size),
            (cx + size, cy - size),
            (cx + size, cy + size),
            (cx - size, cy + size),
            (cx - size, cy - size),
        ],
        "triangle" => vec![
            (cx, cy - size),
            (cx + size, cy + size),
            (cx - size, cy + size),
            (cx, cy - size),
        ],
        "star" => (0..10)
            .map(|i| {
                let angle = i as f64 * PI / 5.0;
                let radius = if i % 2 == 0 { size } else { size * 0.5 };
                (cx + angle.cos() * radius, cy + angle.sin() * radius)
            })
            .collect(),
        "heart" => heart(cx, cy, size),
        "house" => vec![
            (cx - size, cy + size / 2.0),
            (cx + size, cy + size / 2.0),
            (cx + size, cy - size / 4.0),
            (cx - size, cy - size / 4.0),
            (cx - size, cy + size / 2.0),
            (cx - size, cy - size / 4.0),
            (cx, cy - size),
            (cx + size, cy - size / 4.0),
        ],
        "flower" => flower(cx, cy, size),
        "car" => car(cx, cy, size),
        "tree" => tree(cx, cy, size),
        _ => ring(cx, cy, size, 5),
    };

    coords
        .into_iter()
        .map(|(x, y)| {
            Point::new(x, y)
                .with_color(brush.color.clone())
                .with_size(brush.size)
        })
        .collect()
}

/// Closed ring sampled every `step_deg` degrees, 0 through 360 inclusive.
fn ring(cx: f64, cy: f64, radius: f64, step_deg: usize) -> Vec<(f64, f64)> {
    (0..=360)
        .step_by(step_deg)
        .map(|deg| {
            let a = (deg as f64).to_radians();
            (cx + a.cos() * radius, cy + a.sin() * radius)
        })
        .collect()
}

fn heart(cx: f64, cy: f64, size: f64) -> Vec<(f64, f64)> {
    let mut coords = Vec::new();
    let mut t = 0.0_f64;
    while t <= 2.0 * PI {
        let x = cx + size * 0.5 * (16.0 * t.sin().powi(3));
        let y = cy
            - size
                * 0.5
                * (13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
        coords.push((x, y));
        t += 0.1;
    }
    coords
}

fn flower(cx: f64, cy: f64, size: f64) -> Vec<(f64, f64)> {
    let mut coords = Vec::new();
    for i in 0..8 {
        let angle = i as f64 * PI / 4.0;
        let mut r = size * 0.3;
        while r <= size {
            coords.push((cx + angle.cos() * r, cy + angle.sin() * r));
            r += 10.0;
        }
    }
    coords.extend(ring(cx, cy, size * 0.2, 10));
    coords
}

fn car(cx: f64, cy: f64, size: f64) -> Vec<(f64, f64)> {
    let mut coords = vec![
        (cx - size, cy + size / 3.0),
        (cx + size, cy + size / 3.0),
        (cx + size, cy - size / 3.0),
        (cx + size / 2.0, cy - size / 2.0),
        (cx - size / 2.0, cy - size / 2.0),
        (cx - size, cy - size / 3.0),
        (cx - size, cy + size / 3.0),
    ];
    // Both wheels, interleaved.
    for deg in (0..=360).step_by(15) {
        let a = (deg as f64).to_radians();
        let (dx, dy) = (a.cos() * size / 6.0, a.sin() * size / 6.0);
        coords.push((cx - size / 2.0 + dx, cy + size / 3.0 + dy));
        coords.push((cx + size / 2.0 + dx, cy + size / 3.0 + dy));
    }
    coords
}

fn tree(cx: f64, cy: f64, size: f64) -> Vec<(f64, f64)> {
    let mut coords = vec![
        (cx - size / 8.0, cy + size),
        (cx + size / 8.0, cy + size),
        (cx + size / 8.0, cy + size / 4.0),
        (cx - size / 8.0, cy + size / 4.0),
        (cx - size / 8.0, cy + size),
    ];
    coords.extend(ring(cx, cy - size / 4.0, size * 0.7, 5));
    coords
}
