//! Pure geometry helpers shared by hit-testing, snapping and routing.

use crate::model::Point;

/// Snap a scalar to the nearest multiple of `grid`. A non-positive grid
/// leaves the value untouched.
pub fn snap(value: f64, grid: f64) -> f64 {
    if grid > 0.0 {
        (value / grid).round() * grid
    } else {
        value
    }
}

/// Snap both coordinates of a point to the grid.
pub fn snap_point(p: Point, grid: f64) -> Point {
    Point::new(snap(p.x, grid), snap(p.y, grid))
}

/// The point on segment `a`-`b` closest to `p` (projection clamped to the
/// segment). Degenerate segments return `a`.
pub fn nearest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return a;
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    Point::new(a.x + t * dx, a.y + t * dy)
}

/// Euclidean distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    p.distance_to(nearest_point_on_segment(p, a, b))
}

/// Coarse segment/rectangle intersection: rejects segments whose endpoints
/// both lie outside the rectangle on the same side, accepts everything else.
/// Sufficient for the mostly-orthogonal segments a schematic produces.
pub fn segment_intersects_rect(
    a: Point,
    b: Point,
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
) -> bool {
    !((a.x < left && b.x < left)
        || (a.x > right && b.x > right)
        || (a.y < top && b.y < top)
        || (a.y > bottom && b.y > bottom))
}
