use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Even-odd point containment test against a closed polygon.
///
/// Points exactly on the boundary may report either side.
#[must_use]
pub fn point_in_polygon(p: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&polygon[i], &polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Returns the minimum distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return (p - a).norm();
    }
    // Project onto the infinite line, clamp to the segment.
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Returns the minimum distance from `p` to the boundary of a closed polygon.
#[must_use]
pub fn point_to_polygon_dist(p: &Point2, polygon: &[Point2]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| point_to_segment_dist(p, &polygon[i], &polygon[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Twice the signed area of triangle `a, b, c`; positive when counter-clockwise.
#[must_use]
pub fn orient_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b - a).perp(&(c - a))
}

/// Returns `true` if segments `a`-`b` and `c`-`d` cross at a single interior
/// point. Touching at endpoints and collinear overlap do not count.
#[must_use]
pub fn segments_cross(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    let d1 = orient_2d(a, b, c);
    let d2 = orient_2d(a, b, d);
    let d3 = orient_2d(c, d, a);
    let d4 = orient_2d(c, d, b);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
