use super::curve::{CurveData, CurveId};
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a curve loop in the topology store.
    pub struct CurveLoopId;
}

/// A curve with orientation information within a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedCurve {
    /// The curve identifier.
    pub curve: CurveId,
    /// If `true`, the curve is traversed in its natural direction (start → end).
    /// If `false`, the curve is traversed in reverse (end → start).
    pub forward: bool,
}

impl OrientedCurve {
    /// Creates a new oriented curve.
    #[must_use]
    pub fn new(curve: CurveId, forward: bool) -> Self {
        Self { curve, forward }
    }

    /// Natural-direction traversal of `curve`.
    #[must_use]
    pub fn forward(curve: CurveId) -> Self {
        Self::new(curve, true)
    }

    /// Reverse traversal of `curve`.
    #[must_use]
    pub fn reversed(curve: CurveId) -> Self {
        Self::new(curve, false)
    }

    /// Vertex where this traversal begins.
    #[must_use]
    pub fn first_vertex(&self, data: &CurveData) -> VertexId {
        if self.forward {
            data.start()
        } else {
            data.end()
        }
    }

    /// Vertex where this traversal ends.
    #[must_use]
    pub fn last_vertex(&self, data: &CurveData) -> VertexId {
        if self.forward {
            data.end()
        } else {
            data.start()
        }
    }

    /// Signed tag form: negative means reversed.
    #[must_use]
    pub fn signed_tag(&self, data: &CurveData) -> i64 {
        let tag = i64::from(data.tag);
        if self.forward {
            tag
        } else {
            -tag
        }
    }
}

/// Data associated with a closed curve loop.
#[derive(Debug, Clone)]
pub struct CurveLoopData {
    /// Integer tag, unique among the store's loops.
    pub tag: u32,
    /// The ordered, closed sequence of oriented curves.
    pub curves: Vec<OrientedCurve>,
}
