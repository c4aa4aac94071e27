use crate::error::{GeometryError, Result};
use crate::topology::{CurveId, CurveKind, TopologyStore, VertexId};

/// Creates a straight curve between two existing vertices.
pub struct MakeLine {
    start: VertexId,
    end: VertexId,
}

impl MakeLine {
    /// Creates a new `MakeLine` operation.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId) -> Self {
        Self { start, end }
    }

    /// Executes the operation, creating the curve in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is not in the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<CurveId> {
        store.vertex(self.start)?;
        store.vertex(self.end)?;
        Ok(store.insert_curve(CurveKind::Line, vec![self.start, self.end]))
    }
}

/// Creates an interpolating curve through three or more existing vertices.
pub struct MakeSpline {
    points: Vec<VertexId>,
}

impl MakeSpline {
    /// Creates a new `MakeSpline` operation.
    #[must_use]
    pub fn new(points: Vec<VertexId>) -> Self {
        Self { points }
    }

    /// Executes the operation, creating the curve in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 3 vertices are given or any vertex is
    /// not in the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<CurveId> {
        if self.points.len() < 3 {
            return Err(GeometryError::TooFewControlPoints(self.points.len()).into());
        }
        for &v in &self.points {
            store.vertex(v)?;
        }
        Ok(store.insert_curve(CurveKind::Spline, self.points.clone()))
    }
}
