use crate::math::Point2;

use super::{Curve, CurveDomain};

/// A straight segment between two points.
///
/// The parametric form is: `P(t) = start + t * (end - start)`, `t ∈ [0, 1]`.
#[derive(Debug, Clone)]
pub struct Segment {
    start: Point2,
    end: Point2,
}

impl Segment {
    /// Creates a new segment. Zero-length segments are allowed.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &Point2 {
        &self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> &Point2 {
        &self.end
    }
}

impl Curve for Segment {
    fn evaluate(&self, t: f64) -> Point2 {
        // Pin the endpoints exactly so shared vertices sample to identical bits.
        if t <= 0.0 {
            return self.start;
        }
        if t >= 1.0 {
            return self.end;
        }
        self.start + (self.end - self.start) * t
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn approx_length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn evaluates_midpoint() {
        let s = Segment::new(Point2::new(0.0, 0.0), Point2::new(2.0, 4.0));
        let m = s.evaluate(0.5);
        assert_relative_eq!(m.x, 1.0);
        assert_relative_eq!(m.y, 2.0);
    }

    #[test]
    fn sample_hits_endpoints_exactly() {
        let a = Point2::new(0.1, 0.7);
        let b = Point2::new(0.3, 0.9);
        let pts = Segment::new(a, b).sample(7);
        assert_eq!(pts.len(), 8);
        assert_eq!(pts[0], a);
        assert_eq!(pts[7], b);
    }

    #[test]
    fn length_is_exact() {
        let s = Segment::new(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
        assert_relative_eq!(s.approx_length(), 5.0);
    }
}
