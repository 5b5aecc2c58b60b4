//! Shared geometry utilities.

use kurbo::{Point, Rect};

/// Axis-aligned bounds of a point set. `None` when empty.
///
/// Width or height may be zero for a single point or an axis-aligned stroke.
pub fn bounding_box<'a, I>(points: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a crate::Point>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?.pos();
    let rect = iter.fold(Rect::from_points(first, first), |rect, p| {
        rect.union_pt(p.pos())
    });
    Some(rect)
}

/// Sum of consecutive point distances. 0 for fewer than two points.
pub fn path_length(points: &[crate::Point]) -> f64 {
    points
        .windows(2)
        .map(|w| w[0].pos().distance(w[1].pos()))
        .sum()
}

/// Distance from `p` to the segment `start`→`end`.
///
/// The perpendicular foot is clamped to the segment, so points beyond
/// either end measure to that endpoint. A zero-length chord measures
/// to `start`.
pub fn perpendicular_distance(p: Point, start: Point, end: Point) -> f64 {
    let ab = end - start;
    let ap = p - start;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return ap.hypot();
    }
    let t = ab.dot(ap) / len_sq;
    let foot = if t < 0.0 {
        start
    } else if t > 1.0 {
        end
    } else {
        start + ab * t
    };
    p.distance(foot)
}

/// Unsigned triangle area via the shoelace formula.
pub fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    ((a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)) / 2.0).abs()
}

/// Three-point moving average over interior points.
///
/// Endpoints are kept as-is; each interior point keeps its own metadata.
/// Fewer than three points come back unchanged.
pub fn smooth(points: &[crate::Point]) -> Vec<crate::Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(n);
    out.push(points[0].clone());
    for w in points.windows(3) {
        let (prev, curr, next) = (&w[0], &w[1], &w[2]);
        out.push(crate::Point {
            x: (prev.x + curr.x + next.x) / 3.0,
            y: (prev.y + curr.y + next.y) / 3.0,
            ..curr.clone()
        });
    }
    out.push(points[n - 1].clone());
    out
}

fn lerp_opt(a: Option<f64>, b: Option<f64>, t: f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        (a, b) => b.or(a),
    }
}

/// Resample a stroke to `target` points spaced evenly along its length.
///
/// The first point is kept; samples land at multiples of
/// `length / target`, so the last input point only appears when fewer
/// than `target` samples were produced. Size and time are interpolated
/// linearly; colour comes from the segment's far end. Strokes with at most
/// `target` points come back unchanged.
pub fn resample(points: &[crate::Point], target: usize) -> Vec<crate::Point> {
    if points.len() <= target || target == 0 {
        return points.to_vec();
    }
    let step = path_length(points) / target as f64;

    let mut out = Vec::with_capacity(target);
    out.push(points[0].clone());
    let mut walked = 0.0;
    let mut next_mark = step;
    for w in points.windows(2) {
        let (prev, curr) = (&w[0], &w[1]);
        let seg = prev.pos().distance(curr.pos());
        if seg == 0.0 {
            continue;
        }
        walked += seg;
        while walked >= next_mark && out.len() < target {
            let t = (next_mark - (walked - seg)) / seg;
            out.push(crate::Point {
                x: prev.x + (curr.x - prev.x) * t,
                y: prev.y + (curr.y - prev.y) * t,
                color: curr.color.clone(),
                size: lerp_opt(prev.size, curr.size, t),
                time: lerp_opt(prev.time, curr.time, t),
            });
            next_mark += step;
        }
    }
    if out.len() < target {
        out.push(points[points.len() - 1].clone());
    }
    out
}

/// Fit a stroke into a `width`×`height` box, centred, keeping its aspect.
///
/// A stroke with zero extent on both axes is only re-centred.
pub fn normalize(points: &[crate::Point], width: f64, height: f64) -> Vec<crate::Point> {
    let Some(bounds) = bounding_box(points) else {
        return Vec::new();
    };
    let scale = (width / bounds.width()).min(height / bounds.height());
    let scale = if scale.is_finite() { scale } else { 1.0 };
    let center = bounds.center();
    points
        .iter()
        .map(|p| crate::Point {
            x: (p.x - center.x) * scale + width / 2.0,
            y: (p.y - center.y) * scale + height / 2.0,
            ..p.clone()
        })
        .collect()
}

/// Angle in radians of the first-to-last chord. 0 for fewer than two points.
pub fn direction(points: &[crate::Point]) -> f64 {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) if points.len() >= 2 => (b.y - a.y).atan2(b.x - a.x),
        _ => 0.0,
    }
}

/// Winding of the implicitly closed stroke by shoelace sign, taking y as up.
///
/// False for fewer than three points.
pub fn is_clockwise(points: &[crate::Point]) -> bool {
    if points.len() < 3 {
        return false;
    }
    let area: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| (b.x - a.x) * (b.y + a.y))
        .sum();
    area > 0.0
}
