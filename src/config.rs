//! Pipeline configuration, loaded from TOML.
//!
//! Every field is optional in the file; missing ones take the defaults of
//! the reference sweep.
//!
//! ```toml
//! working_dir = "runs/case-1"
//! fingerprint_order = "big-endian"
//!
//! [params]
//! inner_bore = 0.06
//!
//! [mesh]
//! size = 0.02
//! engine = "cdt"
//!
//! [solver]
//! executable = "/opt/moose/bin/combined-opt"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PinError, Result};
use crate::mesh::DEFAULT_MESH_FILE;
use crate::pin::{DesignParameters, HexOrder};
use crate::solver::{
    DEFAULT_EXECUTABLE, DEFAULT_INPUT_DECK, DEFAULT_RESULT_FILE, DEFAULT_STALE_PREFIX,
};

/// Which meshing service realises the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeshEngine {
    /// The built-in constrained Delaunay mesher.
    #[default]
    Cdt,
    /// The `gmsh` executable, driven through a `.geo` script.
    Gmsh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshConfig {
    /// Target element size, assigned to every vertex.
    pub size: f64,
    /// Mesh file name, relative to the working directory.
    pub file: PathBuf,
    pub engine: MeshEngine,
    pub gmsh_executable: PathBuf,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            size: 0.01,
            file: DEFAULT_MESH_FILE.into(),
            engine: MeshEngine::Cdt,
            gmsh_executable: "gmsh".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub executable: PathBuf,
    pub input_deck: String,
    /// Result table name, relative to the working directory.
    pub result_file: PathBuf,
    pub stale_prefix: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.into(),
            input_deck: DEFAULT_INPUT_DECK.into(),
            result_file: DEFAULT_RESULT_FILE.into(),
            stale_prefix: DEFAULT_STALE_PREFIX.into(),
        }
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub params: DesignParameters,
    pub mesh: MeshConfig,
    pub solver: SolverConfig,
    /// Directory the mesh, solver outputs and summary live in.
    pub working_dir: PathBuf,
    pub fingerprint_order: HexOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            params: DesignParameters::default(),
            mesh: MeshConfig::default(),
            solver: SolverConfig::default(),
            working_dir: PathBuf::from("."),
            fingerprint_order: HexOrder::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] for a non-positive mesh size.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PinError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| PinError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the mesh size is not a positive
    /// finite number.
    pub fn validate(&self) -> Result<()> {
        if !(self.mesh.size.is_finite() && self.mesh.size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "mesh size must be positive, got {}",
                self.mesh.size
            ))
            .into());
        }
        Ok(())
    }

    #[must_use]
    pub fn mesh_path(&self) -> PathBuf {
        self.working_dir.join(&self.mesh.file)
    }

    #[must_use]
    pub fn result_path(&self) -> PathBuf {
        self.working_dir.join(&self.solver.result_file)
    }
}
