//! Realising a cross-section model as a 2-D mesh.
//!
//! A [`MeshingService`] is driven through a fixed session:
//! `initialize → build_entities → set_compound → generate → write → finalize`.
//! Calls out of order fail with [`MeshError::InvalidState`].

mod cdt;
mod compound;
mod geo_script;
mod model;
mod msh;

pub use cdt::CdtMesher;
pub use compound::merge_boundaries;
pub use geo_script::{GeoScript, GmshScriptMesher};
pub use model::{MeshModel, ModelCurve, ModelGroup, ModelLoop, ModelPoint, ModelSurface};
pub use msh::write_msh2;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::math::Point2;
use crate::topology::{SurfaceId, TopologyStore};

/// Default mesh file name.
pub const DEFAULT_MESH_FILE: &str = "breeder_pin.msh";

/// An external or in-process meshing engine.
pub trait MeshingService {
    /// Prepares the engine for one model.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is already in use.
    fn initialize(&mut self) -> Result<()>;

    /// Transfers every entity of `store` into the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if called out of order or the model is inconsistent.
    fn build_entities(&mut self, store: &TopologyStore) -> Result<()>;

    /// Marks `surfaces` to be meshed together as one seamless patch.
    ///
    /// # Errors
    ///
    /// Returns an error if called out of order or a surface is unknown.
    fn set_compound(&mut self, surfaces: &[SurfaceId]) -> Result<()>;

    /// Generates the mesh up to dimension `dim`.
    ///
    /// # Errors
    ///
    /// Returns an error if called out of order or meshing fails.
    fn generate(&mut self, dim: u8) -> Result<()>;

    /// Writes the generated mesh to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if no mesh has been generated or the file cannot be
    /// written.
    fn write(&mut self, path: &Path) -> Result<()>;

    /// Releases the engine. Safe to call in any state.
    fn finalize(&mut self);
}

/// Where a meshing session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Initialized,
    Built,
    Meshed,
}

impl SessionState {
    fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Initialized => "initialized",
            Self::Built => "built",
            Self::Meshed => "meshed",
        }
    }

    /// Fails unless the session is in one of `allowed`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidState`] naming the attempted `action`.
    pub fn require(self, allowed: &[SessionState], action: &'static str) -> Result<()> {
        if allowed.contains(&self) {
            Ok(())
        } else {
            Err(MeshError::InvalidState {
                state: self.name(),
                action,
            }
            .into())
        }
    }
}

/// A 2-node line element on a tagged curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineElement {
    /// Zero-based node indices.
    pub nodes: [usize; 2],
    /// Tag of the curve the element lies on.
    pub curve: u32,
}

/// A 3-node triangle on a tagged surface, counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleElement {
    /// Zero-based node indices.
    pub nodes: [usize; 3],
    /// Tag of the surface the element lies on.
    pub surface: u32,
}

/// A generated 2-D mesh.
#[derive(Debug, Clone, Default)]
pub struct Mesh2D {
    /// Node positions. Nodes are shared between elements.
    pub nodes: Vec<Point2>,
    /// Line elements, grouped by curve.
    pub lines: Vec<LineElement>,
    /// Triangles, grouped by meshing target.
    pub triangles: Vec<TriangleElement>,
}

impl Mesh2D {
    /// Total triangle area of the elements on `surface`.
    #[must_use]
    pub fn surface_area(&self, surface: u32) -> f64 {
        self.triangles
            .iter()
            .filter(|t| t.surface == surface)
            .map(|t| {
                let [a, b, c] = t.nodes.map(|i| self.nodes[i]);
                ((b - a).perp(&(c - a)) * 0.5).abs()
            })
            .sum()
    }
}
