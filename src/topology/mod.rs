pub mod curve;
pub mod curve_loop;
pub mod group;
pub mod surface;
pub mod tag;
pub mod vertex;

pub use curve::{CurveData, CurveId, CurveKind};
pub use curve_loop::{CurveLoopData, CurveLoopId, OrientedCurve};
pub use group::{Dimension, GroupId, GroupMembers, PhysicalGroupData};
pub use surface::{SurfaceData, SurfaceId};
pub use tag::TagCounter;
pub use vertex::{VertexData, VertexId};

use crate::error::TopologyError;
use crate::math::Point2;
use slotmap::SlotMap;

/// Central arena that owns all entities of one cross-section model.
///
/// Entities reference each other via typed IDs (generational indices).
/// Each entity kind also carries an integer tag from its own
/// [`TagCounter`]; tags are what mesh formats see. Entities are never
/// removed, so iteration yields them in creation (tag) order.
///
/// Insertion goes through the operations in [`crate::operations::creation`],
/// which check references and loop closure before storing anything.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    curves: SlotMap<CurveId, CurveData>,
    loops: SlotMap<CurveLoopId, CurveLoopData>,
    surfaces: SlotMap<SurfaceId, SurfaceData>,
    groups: SlotMap<GroupId, PhysicalGroupData>,
    vertex_tags: TagCounter,
    curve_tags: TagCounter,
    loop_tags: TagCounter,
    surface_tags: TagCounter,
    group_tags: TagCounter,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, point: Point2, mesh_size: f64) -> VertexId {
        let tag = self.vertex_tags.next_tag();
        self.vertices.insert(VertexData {
            tag,
            point,
            mesh_size,
        })
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Iterates over all vertices in creation order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Curve operations ---

    pub(crate) fn insert_curve(&mut self, kind: CurveKind, vertices: Vec<VertexId>) -> CurveId {
        let tag = self.curve_tags.next_tag();
        self.curves.insert(CurveData {
            tag,
            kind,
            vertices,
        })
    }

    /// Returns a reference to the curve data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn curve(&self, id: CurveId) -> Result<&CurveData, TopologyError> {
        self.curves
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("curve".into()))
    }

    /// Iterates over all curves in creation order.
    pub fn curves(&self) -> impl Iterator<Item = (CurveId, &CurveData)> {
        self.curves.iter()
    }

    /// Number of curves.
    #[must_use]
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    // --- Curve loop operations ---

    pub(crate) fn insert_curve_loop(&mut self, curves: Vec<OrientedCurve>) -> CurveLoopId {
        let tag = self.loop_tags.next_tag();
        self.loops.insert(CurveLoopData { tag, curves })
    }

    /// Returns a reference to the loop data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn curve_loop(&self, id: CurveLoopId) -> Result<&CurveLoopData, TopologyError> {
        self.loops
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("curve loop".into()))
    }

    /// Iterates over all curve loops in creation order.
    pub fn curve_loops(&self) -> impl Iterator<Item = (CurveLoopId, &CurveLoopData)> {
        self.loops.iter()
    }

    /// Number of curve loops.
    #[must_use]
    pub fn curve_loop_count(&self) -> usize {
        self.loops.len()
    }

    // --- Surface operations ---

    pub(crate) fn insert_surface(&mut self, curve_loop: CurveLoopId) -> SurfaceId {
        let tag = self.surface_tags.next_tag();
        self.surfaces.insert(SurfaceData { tag, curve_loop })
    }

    /// Returns a reference to the surface data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn surface(&self, id: SurfaceId) -> Result<&SurfaceData, TopologyError> {
        self.surfaces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("surface".into()))
    }

    /// Iterates over all surfaces in creation order.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &SurfaceData)> {
        self.surfaces.iter()
    }

    /// Number of surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    // --- Physical group operations ---

    pub(crate) fn insert_group(&mut self, name: String, members: GroupMembers) -> GroupId {
        let tag = self.group_tags.next_tag();
        self.groups.insert(PhysicalGroupData { tag, name, members })
    }

    /// Returns a reference to the group data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn group(&self, id: GroupId) -> Result<&PhysicalGroupData, TopologyError> {
        self.groups
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("physical group".into()))
    }

    /// Iterates over all physical groups in creation order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &PhysicalGroupData)> {
        self.groups.iter()
    }

    /// Number of physical groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Looks up a group by dimension and name.
    #[must_use]
    pub fn find_group(&self, dim: Dimension, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, g)| g.dimension() == dim && g.name == name)
            .map(|(id, _)| id)
    }
}
