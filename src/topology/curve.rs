use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a curve in the topology store.
    pub struct CurveId;
}

/// How a curve connects its vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// A straight segment between exactly two vertices.
    Line,
    /// A smooth interpolating curve through three or more vertices.
    Spline,
}

/// Data associated with a topological curve.
///
/// The curve runs from the first to the last of its vertices, passing
/// through the others in order.
#[derive(Debug, Clone)]
pub struct CurveData {
    /// Integer tag, unique among the store's curves.
    pub tag: u32,
    /// Straight or interpolating.
    pub kind: CurveKind,
    /// Ordered vertices the curve passes through.
    pub vertices: Vec<VertexId>,
}

impl CurveData {
    /// Start vertex of the curve.
    #[must_use]
    pub fn start(&self) -> VertexId {
        self.vertices[0]
    }

    /// End vertex of the curve.
    #[must_use]
    pub fn end(&self) -> VertexId {
        self.vertices[self.vertices.len() - 1]
    }
}
