use crate::error::Result;
use crate::operations::query::TraceLoop;
use crate::topology::{CurveLoopId, OrientedCurve, TopologyStore};

/// Creates a closed curve loop from oriented curves.
pub struct MakeCurveLoop {
    curves: Vec<OrientedCurve>,
}

impl MakeCurveLoop {
    /// Creates a new `MakeCurveLoop` operation.
    #[must_use]
    pub fn new(curves: Vec<OrientedCurve>) -> Self {
        Self { curves }
    }

    /// Executes the operation, creating the loop in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop is empty, references a missing curve,
    /// or does not close. Nothing is stored in that case.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<CurveLoopId> {
        TraceLoop::new(&self.curves).execute(store)?;
        Ok(store.insert_curve_loop(self.curves.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{PinError, TopologyError};
    use crate::math::Point2;
    use crate::operations::creation::MakeLine;
    use crate::topology::CurveId;

    /// Unit square with curves 0→1, 1→2, 2→3, 3→0.
    fn square(store: &mut TopologyStore) -> Vec<CurveId> {
        let v: Vec<_> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .iter()
            .map(|&(x, y)| store.add_vertex(Point2::new(x, y), 0.1))
            .collect();
        (0..4)
            .map(|i| MakeLine::new(v[i], v[(i + 1) % 4]).execute(store).unwrap())
            .collect()
    }

    #[test]
    fn closed_loop_is_stored() {
        let mut store = TopologyStore::new();
        let c = square(&mut store);
        let id = MakeCurveLoop::new(c.iter().map(|&c| OrientedCurve::forward(c)).collect())
            .execute(&mut store)
            .unwrap();
        let data = store.curve_loop(id).unwrap();
        assert_eq!(data.tag, 1);
        assert_eq!(data.curves.len(), 4);
    }

    #[test]
    fn reversed_traversal_closes() {
        let mut store = TopologyStore::new();
        let c = square(&mut store);
        let curves = c.iter().rev().map(|&c| OrientedCurve::reversed(c)).collect();
        assert!(MakeCurveLoop::new(curves).execute(&mut store).is_ok());
    }

    #[test]
    fn flipped_sign_is_rejected() {
        let mut store = TopologyStore::new();
        let c = square(&mut store);
        let curves = vec![
            OrientedCurve::forward(c[0]),
            OrientedCurve::reversed(c[1]),
            OrientedCurve::forward(c[2]),
            OrientedCurve::forward(c[3]),
        ];
        let err = MakeCurveLoop::new(curves).execute(&mut store).unwrap_err();
        assert!(matches!(
            err,
            PinError::Topology(TopologyError::LoopNotClosed { position: 0 })
        ));
        assert_eq!(store.curve_loop_count(), 0);
    }

    #[test]
    fn empty_loop_is_rejected() {
        let mut store = TopologyStore::new();
        let err = MakeCurveLoop::new(vec![]).execute(&mut store).unwrap_err();
        assert!(matches!(err, PinError::Topology(TopologyError::EmptyLoop)));
    }
}
