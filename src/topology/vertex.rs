use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the topology store.
    pub struct VertexId;
}

/// Data associated with a topological vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Integer tag, unique among the store's vertices.
    pub tag: u32,
    /// Position in the section plane (z = 0).
    pub point: Point2,
    /// Target element size near this vertex.
    pub mesh_size: f64,
}
