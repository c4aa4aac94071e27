use std::path::PathBuf;

use thiserror::Error;

use crate::pin::Constraint;

/// Top-level error type for the breeder-pin pipeline.
#[derive(Debug, Error)]
pub enum PinError {
    #[error(transparent)]
    Feasibility(#[from] FeasibilityError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PinError {
    /// Wraps an I/O error with the path it occurred on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// The parameter set failed one or more feasibility rules.
#[derive(Debug, Error)]
pub enum FeasibilityError {
    #[error("inconsistent parameter set: {}", join_violations(.violations))]
    Rejected { violations: Vec<Constraint> },
}

fn join_violations(violations: &[Constraint]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("spline needs at least 3 control points, got {0}")]
    TooFewControlPoints(usize),
}

/// Errors related to topological construction.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("curve loop is empty")]
    EmptyLoop,

    #[error("curve loop is not closed at position {position}")]
    LoopNotClosed { position: usize },

    #[error("physical group {name:?} already exists in dimension {dim}")]
    DuplicateGroup { dim: u8, name: String },
}

/// Errors raised by a meshing service.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("meshing service is in state {state}, cannot {action}")]
    InvalidState {
        state: &'static str,
        action: &'static str,
    },

    #[error("unsupported mesh dimension {0}")]
    UnsupportedDimension(u8),

    #[error("surface is not part of the model")]
    UnknownSurface,

    #[error("triangulation failed: {0}")]
    Triangulation(String),
}

/// Errors running an external executable.
#[derive(Debug, Error)]
pub enum ExternalToolError {
    #[error("cannot start {tool}: {source}")]
    Unavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed ({status}): {stderr}")]
    Failed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Errors reading back a tool's output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("result file {0} does not exist")]
    Missing(PathBuf),

    #[error("result file {0} has no rows")]
    Empty(PathBuf),

    #[error("malformed result file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors loading the pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Convenience type alias for results using [`PinError`].
pub type Result<T> = std::result::Result<T, PinError>;
