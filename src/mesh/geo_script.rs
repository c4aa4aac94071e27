use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{ExternalToolError, MeshError, PinError, Result};
use crate::topology::{CurveKind, Dimension, SurfaceId, TopologyStore};

use super::compound::resolve_compound;
use super::model::MeshModel;
use super::{MeshingService, SessionState};

/// A model rendered as a gmsh `.geo` script.
///
/// The script declares every entity with its tag, the physical groups, the
/// compound surfaces, then meshes up to `dim` and saves an MSH 2.2 file.
#[derive(Debug, Clone, Copy)]
pub struct GeoScript<'a> {
    model: &'a MeshModel,
    compounds: &'a [Vec<u32>],
    dim: u8,
    output: &'a str,
}

impl<'a> GeoScript<'a> {
    /// Creates a script that saves its mesh to `output`, relative to the
    /// script's directory.
    #[must_use]
    pub fn new(model: &'a MeshModel, compounds: &'a [Vec<u32>], dim: u8, output: &'a str) -> Self {
        Self {
            model,
            compounds,
            dim,
            output,
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for GeoScript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.model;
        for p in &m.points {
            writeln!(
                f,
                "Point({}) = {{{}, {}, 0, {}}};",
                p.tag, p.point.x, p.point.y, p.mesh_size
            )?;
        }
        for c in &m.curves {
            let keyword = match c.kind {
                CurveKind::Line => "Line",
                CurveKind::Spline => "Spline",
            };
            writeln!(f, "{keyword}({}) = {{{}}};", c.tag, join(&c.vertex_tags))?;
        }
        for l in &m.loops {
            writeln!(f, "Curve Loop({}) = {{{}}};", l.tag, join(&l.curves))?;
        }
        for s in &m.surfaces {
            writeln!(f, "Surface({}) = {{{}}};", s.tag, s.loop_tag)?;
        }
        for g in &m.groups {
            let keyword = match g.dim {
                Dimension::Curve => "Curve",
                Dimension::Surface => "Surface",
            };
            writeln!(
                f,
                "Physical {keyword}(\"{}\", {}) = {{{}}};",
                g.name,
                g.tag,
                join(&g.members)
            )?;
        }
        for c in self.compounds {
            writeln!(f, "Compound Surface{{{}}};", join(c))?;
        }
        writeln!(f, "Mesh.MshFileVersion = 2.2;")?;
        writeln!(f, "Mesh {};", self.dim)?;
        writeln!(f, "Save \"{}\";", self.output.replace('\\', "/"))
    }
}

/// Meshing service that delegates to the `gmsh` executable.
///
/// `generate` writes a `.geo` script into the work directory and runs gmsh
/// on it there; `write` copies the mesh gmsh saved to the requested path.
#[derive(Debug)]
pub struct GmshScriptMesher {
    executable: PathBuf,
    work_dir: PathBuf,
    state: SessionState,
    model: Option<MeshModel>,
    compounds: Vec<Vec<u32>>,
    staged: Option<PathBuf>,
}

impl GmshScriptMesher {
    /// Script file written into the work directory.
    pub const SCRIPT_FILE: &'static str = "breeder_pin.geo";
    const STAGED_FILE: &'static str = "breeder_pin.staged.msh";

    #[must_use]
    pub fn new(executable: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            work_dir: work_dir.into(),
            state: SessionState::Idle,
            model: None,
            compounds: Vec::new(),
            staged: None,
        }
    }

    fn loaded_model(&self) -> Result<&MeshModel> {
        self.model.as_ref().ok_or_else(|| {
            MeshError::InvalidState {
                state: "initialized",
                action: "use the model",
            }
            .into()
        })
    }

    fn tool(&self) -> String {
        self.executable.display().to_string()
    }
}

impl MeshingService for GmshScriptMesher {
    fn initialize(&mut self) -> Result<()> {
        self.state.require(&[SessionState::Idle], "initialize")?;
        self.state = SessionState::Initialized;
        Ok(())
    }

    fn build_entities(&mut self, store: &TopologyStore) -> Result<()> {
        self.state
            .require(&[SessionState::Initialized], "build entities")?;
        self.model = Some(MeshModel::from_store(store)?);
        self.state = SessionState::Built;
        Ok(())
    }

    fn set_compound(&mut self, surfaces: &[SurfaceId]) -> Result<()> {
        self.state.require(&[SessionState::Built], "set a compound")?;
        let tags = resolve_compound(self.loaded_model()?, &self.compounds, surfaces)?;
        self.compounds.push(tags);
        Ok(())
    }

    fn generate(&mut self, dim: u8) -> Result<()> {
        self.state
            .require(&[SessionState::Built, SessionState::Meshed], "generate")?;
        if !(1..=2).contains(&dim) {
            return Err(MeshError::UnsupportedDimension(dim).into());
        }

        let script = GeoScript::new(self.loaded_model()?, &self.compounds, dim, Self::STAGED_FILE)
            .to_string();
        let script_path = self.work_dir.join(Self::SCRIPT_FILE);
        fs::write(&script_path, script).map_err(|e| PinError::io(&script_path, e))?;
        debug!(script = %script_path.display(), "wrote gmsh script");

        let output = Command::new(&self.executable)
            .arg(Self::SCRIPT_FILE)
            .arg("-")
            .current_dir(&self.work_dir)
            .output()
            .map_err(|source| ExternalToolError::Unavailable {
                tool: self.tool(),
                source,
            })?;
        if !output.status.success() {
            return Err(ExternalToolError::Failed {
                tool: self.tool(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let staged = self.work_dir.join(Self::STAGED_FILE);
        if !staged.is_file() {
            return Err(MeshError::Triangulation(format!(
                "{} produced no mesh at {}",
                self.tool(),
                staged.display()
            ))
            .into());
        }
        info!(mesh = %staged.display(), "gmsh generated {dim}-D mesh");
        self.staged = Some(staged);
        self.state = SessionState::Meshed;
        Ok(())
    }

    fn write(&mut self, path: &Path) -> Result<()> {
        self.state.require(&[SessionState::Meshed], "write")?;
        let Some(staged) = self.staged.as_ref() else {
            return Err(MeshError::InvalidState {
                state: "built",
                action: "write",
            }
            .into());
        };
        if staged != path {
            fs::copy(staged, path).map_err(|e| PinError::io(path, e))?;
        }
        info!(path = %path.display(), "wrote mesh");
        Ok(())
    }

    fn finalize(&mut self) {
        self.model = None;
        self.compounds.clear();
        self.staged = None;
        self.state = SessionState::Idle;
    }
}
