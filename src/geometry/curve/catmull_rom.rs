use crate::error::{GeometryError, Result};
use crate::math::Point2;

use super::{Curve, CurveDomain};

/// An interpolating Catmull-Rom spline through an ordered set of points.
///
/// The curve passes through every control point. Parameter `t ∈ [0, n - 1]`
/// where `n` is the number of control points; integer parameters land on
/// control points. Open ends use reflected phantom points.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<Point2>,
}

impl CatmullRom {
    /// Creates a new spline through `points`.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 3 control points are given.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewControlPoints(points.len()).into());
        }
        Ok(Self { points })
    }

    /// Returns the control points.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Control point `i`, with reflected phantoms beyond either end.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn control(&self, i: isize) -> Point2 {
        let n = self.points.len();
        let last = n as isize - 1;
        if i < 0 {
            let (p0, p1) = (self.points[0], self.points[1]);
            return p0 + (p0 - p1);
        }
        if i > last {
            let (pn, pm) = (self.points[n - 1], self.points[n - 2]);
            return pn + (pn - pm);
        }
        self.points[i as usize]
    }
}

impl Curve for CatmullRom {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss
    )]
    fn evaluate(&self, t: f64) -> Point2 {
        let domain = self.domain();
        let t = t.clamp(domain.t_min, domain.t_max);
        let span = (t.floor() as isize).min(self.points.len() as isize - 2);
        let u = t - span as f64;
        if u <= 0.0 {
            return self.control(span);
        }
        if u >= 1.0 {
            return self.control(span + 1);
        }

        let p0 = self.control(span - 1).coords;
        let p1 = self.control(span).coords;
        let p2 = self.control(span + 1).coords;
        let p3 = self.control(span + 2).coords;

        let u2 = u * u;
        let u3 = u2 * u;
        let c = (p1 * 2.0
            + (p2 - p0) * u
            + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * u2
            + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * u3)
            * 0.5;
        Point2::from(c)
    }

    #[allow(clippy::cast_precision_loss)]
    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, (self.points.len() - 1) as f64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn arch() -> CatmullRom {
        CatmullRom::new(vec![
            Point2::new(0.0, 0.9),
            Point2::new(0.25, 1.01),
            Point2::new(0.5, 0.9),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_two_points() {
        let r = CatmullRom::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(r.is_err());
    }

    #[test]
    fn interpolates_control_points() {
        let s = arch();
        for (i, p) in s.points().iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let q = s.evaluate(i as f64);
            assert_relative_eq!(q.x, p.x);
            assert_relative_eq!(q.y, p.y);
        }
    }

    #[test]
    fn bulges_between_controls() {
        let s = arch();
        let q = s.evaluate(0.5);
        assert!(q.y > 0.9 && q.y < 1.05, "unexpected height {}", q.y);
        assert!(q.x > 0.0 && q.x < 0.25);
    }

    #[test]
    fn sample_endpoints_are_controls() {
        let s = arch();
        let pts = s.sample(10);
        assert_eq!(pts[0], s.points()[0]);
        assert_eq!(pts[10], s.points()[2]);
    }
}
