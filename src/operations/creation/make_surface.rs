use crate::error::Result;
use crate::topology::{CurveLoopId, SurfaceId, TopologyStore};

/// Creates a planar surface filling a closed curve loop.
pub struct MakeSurface {
    curve_loop: CurveLoopId,
}

impl MakeSurface {
    /// Creates a new `MakeSurface` operation.
    #[must_use]
    pub fn new(curve_loop: CurveLoopId) -> Self {
        Self { curve_loop }
    }

    /// Executes the operation, creating the surface in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop is not in the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SurfaceId> {
        store.curve_loop(self.curve_loop)?;
        Ok(store.insert_surface(self.curve_loop))
    }
}
