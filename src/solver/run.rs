use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::{debug, info, warn};

use crate::error::{ExternalToolError, PinError, Result};

use super::{DEFAULT_INPUT_DECK, DEFAULT_STALE_PREFIX};

/// One invocation of the solver in a working directory.
///
/// The run is best effort: a non-zero exit status is logged and returned,
/// never turned into an error. Whether it produced usable output is decided
/// when the result table is collected.
#[derive(Debug, Clone)]
pub struct SolverRun {
    executable: PathBuf,
    input_deck: String,
    working_dir: PathBuf,
    stale_prefix: String,
}

impl SolverRun {
    /// Runs `executable -i breeder-pin.i` inside `working_dir`.
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            input_deck: DEFAULT_INPUT_DECK.to_string(),
            working_dir: working_dir.into(),
            stale_prefix: DEFAULT_STALE_PREFIX.to_string(),
        }
    }

    #[must_use]
    pub fn with_input_deck(mut self, deck: impl Into<String>) -> Self {
        self.input_deck = deck.into();
        self
    }

    #[must_use]
    pub fn with_stale_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.stale_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Deletes files in the working directory left by a previous run.
    ///
    /// Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`PinError::Io`] if the directory cannot be listed or a stale
    /// file cannot be removed.
    pub fn remove_stale(&self) -> Result<usize> {
        let dir = &self.working_dir;
        let mut removed = 0;
        for entry in fs::read_dir(dir).map_err(|e| PinError::io(dir, e))? {
            let entry = entry.map_err(|e| PinError::io(dir, e))?;
            let path = entry.path();
            let stale = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(&self.stale_prefix));
            if stale && path.is_file() {
                fs::remove_file(&path).map_err(|e| PinError::io(&path, e))?;
                debug!(path = %path.display(), "removed stale output");
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Removes stale outputs, then runs the solver and waits for it.
    ///
    /// # Errors
    ///
    /// Returns [`ExternalToolError::Unavailable`] if the executable cannot be
    /// started, or an I/O error from stale-file removal.
    pub fn execute(&self) -> Result<ExitStatus> {
        self.remove_stale()?;

        let tool = self.executable.display().to_string();
        info!(solver = %tool, deck = %self.input_deck, "running solver");
        let output = Command::new(&self.executable)
            .arg("-i")
            .arg(&self.input_deck)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|source| ExternalToolError::Unavailable {
                tool: tool.clone(),
                source,
            })?;

        debug!(
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "solver finished"
        );
        if !output.status.success() {
            warn!(
                solver = %tool,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "solver exited unsuccessfully, continuing"
            );
        }
        Ok(output.status)
    }
}
