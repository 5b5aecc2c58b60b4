//! Minimum-area simplification (Visvalingam-Whyatt family).
//!
//! Each interior point is weighted by the area of the triangle it forms
//! with its current neighbours. The least significant point is dropped
//! until three points remain or every remaining weight exceeds the
//! threshold. Endpoints are never removed.
//!
//! Points live in an index-linked list; a min-heap holds candidate
//! weights and stale entries are skipped on pop, so only the two
//! neighbours of a removed point are re-weighed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::geom::triangle_area;
use crate::Point;

use super::Tolerance;

/// Fewest points the algorithm ever leaves behind.
const MIN_POINTS: usize = 3;

/// Heap entry: smallest area first, then earliest index.
type Candidate = Reverse<(OrderedFloat<f64>, usize)>;

/// Simplify an open polyline by removing low-area points.
///
/// Strokes of three or fewer points are returned unchanged.
pub fn simplify(points: &[Point], min_area: Tolerance) -> Vec<Point> {
    let n = points.len();
    if n <= MIN_POINTS {
        return points.to_vec();
    }

    let mut prev: Vec<usize> = (0..n).map(|i| i.saturating_sub(1)).collect();
    let mut next: Vec<usize> = (0..n).map(|i| (i + 1).min(n - 1)).collect();
    let mut alive = vec![true; n];
    let mut area = vec![f64::INFINITY; n];
    let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(n);

    for i in 1..n - 1 {
        area[i] = weigh(points, i - 1, i, i + 1);
        heap.push(Reverse((OrderedFloat(area[i]), i)));
    }

    let mut remaining = n;
    while remaining > MIN_POINTS {
        let Some(Reverse((OrderedFloat(weight), i))) = heap.pop() else {
            break;
        };
        if !alive[i] || weight != area[i] {
            continue;
        }
        if weight > min_area.get() {
            break;
        }

        alive[i] = false;
        remaining -= 1;
        let (p, q) = (prev[i], next[i]);
        next[p] = q;
        prev[q] = p;

        for j in [p, q] {
            if j != 0 && j != n - 1 {
                area[j] = weigh(points, prev[j], j, next[j]);
                heap.push(Reverse((OrderedFloat(area[j]), j)));
            }
        }
    }

    points
        .iter()
        .zip(alive)
        .filter_map(|(p, keep)| keep.then(|| p.clone()))
        .collect()
}

fn weigh(points: &[Point], a: usize, b: usize, c: usize) -> f64 {
    triangle_area(points[a].pos(), points[b].pos(), points[c].pos())
}
