use super::curve_loop::CurveLoopId;

slotmap::new_key_type! {
    /// Unique identifier for a surface in the topology store.
    pub struct SurfaceId;
}

/// A planar patch filling exactly one closed curve loop.
#[derive(Debug, Clone)]
pub struct SurfaceData {
    /// Integer tag, unique among the store's surfaces.
    pub tag: u32,
    /// The boundary loop.
    pub curve_loop: CurveLoopId,
}
