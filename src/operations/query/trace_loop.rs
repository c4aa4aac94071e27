use crate::error::{Result, TopologyError};
use crate::topology::{OrientedCurve, TopologyStore, VertexId};

/// Walks a sequence of oriented curves and checks that it closes.
///
/// On success returns the corner vertices in traversal order: the first
/// vertex of every traversal, so `corners[i]` is where curve `i` begins.
pub struct TraceLoop<'a> {
    curves: &'a [OrientedCurve],
}

impl<'a> TraceLoop<'a> {
    /// Creates a new `TraceLoop` query.
    #[must_use]
    pub fn new(curves: &'a [OrientedCurve]) -> Self {
        Self { curves }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EmptyLoop`] for an empty sequence,
    /// [`TopologyError::EntityNotFound`] for an unknown curve, and
    /// [`TopologyError::LoopNotClosed`] with the index of the first curve
    /// whose end does not meet the start of its successor.
    pub fn execute(&self, store: &TopologyStore) -> Result<Vec<VertexId>> {
        if self.curves.is_empty() {
            return Err(TopologyError::EmptyLoop.into());
        }

        let mut ends = Vec::with_capacity(self.curves.len());
        for oc in self.curves {
            let data = store.curve(oc.curve)?;
            ends.push((oc.first_vertex(data), oc.last_vertex(data)));
        }

        let n = ends.len();
        for i in 0..n {
            let (_, last) = ends[i];
            let (next_first, _) = ends[(i + 1) % n];
            if last != next_first {
                return Err(TopologyError::LoopNotClosed { position: i }.into());
            }
        }

        Ok(ends.into_iter().map(|(first, _)| first).collect())
    }
}
