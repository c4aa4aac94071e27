use crate::error::Result;
use crate::geometry::{CatmullRom, Curve, Segment};
use crate::math::{Point2, TOLERANCE};
use crate::topology::{CurveId, CurveKind, TopologyStore};

/// Upper bound on segments per curve, whatever the size hint.
const MAX_SEGMENTS: usize = 20_000;

/// Discretises a topological curve into a polyline.
///
/// The element size is the smallest mesh-size hint among the curve's
/// vertices. The returned points run from the curve's start vertex to its
/// end vertex, and both endpoints are the exact vertex positions.
pub struct SampleCurve {
    curve: CurveId,
}

impl SampleCurve {
    /// Creates a new `SampleCurve` query.
    #[must_use]
    pub fn new(curve: CurveId) -> Self {
        Self { curve }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve or one of its vertices is missing.
    pub fn execute(&self, store: &TopologyStore) -> Result<Vec<Point2>> {
        let data = store.curve(self.curve)?;
        let mut points = Vec::with_capacity(data.vertices.len());
        let mut size = f64::INFINITY;
        for &v in &data.vertices {
            let vd = store.vertex(v)?;
            points.push(vd.point);
            size = size.min(vd.mesh_size);
        }

        let curve: Box<dyn Curve> = match data.kind {
            CurveKind::Line => Box::new(Segment::new(points[0], points[points.len() - 1])),
            CurveKind::Spline => Box::new(CatmullRom::new(points)?),
        };
        Ok(curve.sample(segment_count(curve.approx_length(), size)))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn segment_count(length: f64, size: f64) -> usize {
    if !size.is_finite() || size < TOLERANCE || length < TOLERANCE {
        return 1;
    }
    ((length / size).ceil() as usize).clamp(1, MAX_SEGMENTS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{MakeLine, MakeSpline};

    #[test]
    fn line_respects_size_hint() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(Point2::new(0.0, 0.0), 0.1);
        let b = store.add_vertex(Point2::new(1.0, 0.0), 0.25);
        let c = MakeLine::new(a, b).execute(&mut store).unwrap();
        let pts = SampleCurve::new(c).execute(&store).unwrap();
        // min size 0.1 over length 1.0
        assert_eq!(pts.len(), 11);
        assert_eq!(pts[0], Point2::new(0.0, 0.0));
        assert_eq!(pts[10], Point2::new(1.0, 0.0));
    }

    #[test]
    fn spline_passes_middle_vertex_region() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(Point2::new(0.0, 0.9), 0.05);
        let m = store.add_vertex(Point2::new(0.25, 1.01), 0.05);
        let b = store.add_vertex(Point2::new(0.5, 0.9), 0.05);
        let s = MakeSpline::new(vec![a, m, b]).execute(&mut store).unwrap();
        let pts = SampleCurve::new(s).execute(&store).unwrap();
        assert!(pts.len() > 10);
        assert_eq!(pts[0], Point2::new(0.0, 0.9));
        assert_eq!(*pts.last().unwrap(), Point2::new(0.5, 0.9));
        let top = pts.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!(top > 1.0);
    }

    #[test]
    fn degenerate_line_yields_single_segment() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(Point2::new(0.2, 0.0), 0.01);
        let b = store.add_vertex(Point2::new(0.2, 0.0), 0.01);
        let c = MakeLine::new(a, b).execute(&mut store).unwrap();
        assert_eq!(SampleCurve::new(c).execute(&store).unwrap().len(), 2);
    }
}
