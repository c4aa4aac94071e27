//! One end-to-end run: validate, build, mesh, solve, summarise.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tracing::info;

use crate::config::{MeshEngine, PipelineConfig};
use crate::error::Result;
use crate::mesh::{CdtMesher, GmshScriptMesher, MeshingService};
use crate::pin::{BuildPinSection, Fingerprint, PinSection};
use crate::solver::{ResultSummary, SolverRun};
use crate::topology::TopologyStore;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub fingerprint: Fingerprint,
    pub mesh_path: PathBuf,
    pub summary_path: PathBuf,
    pub solver_status: ExitStatus,
}

/// Sequential driver for one parameter set.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fingerprint naming this run's summary.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.config.params, self.config.fingerprint_order)
    }

    /// Runs every stage and writes `<fingerprint>.csv` to the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage. Infeasible parameters fail
    /// before anything is written. A solver that exits unsuccessfully is
    /// not an error by itself; its missing or empty result table is.
    pub fn run(&self) -> Result<PipelineReport> {
        let mesh_path = self.mesh()?;
        let fingerprint = self.fingerprint();

        let solver = &self.config.solver;
        let solver_status = SolverRun::new(&solver.executable, &self.config.working_dir)
            .with_input_deck(solver.input_deck.clone())
            .with_stale_prefix(solver.stale_prefix.clone())
            .execute()?;

        let summary = ResultSummary::collect(&self.config.result_path())?;
        let summary_path = self.config.working_dir.join(fingerprint.file_name());
        summary.write(&summary_path)?;
        info!(summary = %summary_path.display(), "run complete");

        Ok(PipelineReport {
            fingerprint,
            mesh_path,
            summary_path,
            solver_status,
        })
    }

    /// Validates, builds and meshes the cross-section, returning the mesh
    /// file path.
    ///
    /// # Errors
    ///
    /// Returns a feasibility error for rejected parameters, or any topology
    /// or meshing error.
    pub fn mesh(&self) -> Result<PathBuf> {
        let params = self.config.params;
        params.check()?;
        info!(fingerprint = %self.fingerprint(), "parameters accepted");

        let mut store = TopologyStore::new();
        let section = BuildPinSection::new(params, self.config.mesh.size).execute(&mut store)?;
        info!(
            vertices = store.vertex_count(),
            curves = store.curve_count(),
            surfaces = store.surface_count(),
            "built cross-section"
        );

        let path = self.config.mesh_path();
        match self.config.mesh.engine {
            MeshEngine::Cdt => mesh_section(&mut CdtMesher::new(), &store, &section, &path)?,
            MeshEngine::Gmsh => mesh_section(
                &mut GmshScriptMesher::new(
                    &self.config.mesh.gmsh_executable,
                    &self.config.working_dir,
                ),
                &store,
                &section,
                &path,
            )?,
        }
        Ok(path)
    }
}

/// Runs a full meshing session over a built section.
///
/// The fluid patches are meshed as one compound. The service is finalized
/// whether or not the session succeeds.
///
/// # Errors
///
/// Returns the first error raised by the service.
pub fn mesh_section<M: MeshingService + ?Sized>(
    mesher: &mut M,
    store: &TopologyStore,
    section: &PinSection,
    path: &Path,
) -> Result<()> {
    let result = run_session(mesher, store, section, path);
    mesher.finalize();
    result
}

fn run_session<M: MeshingService + ?Sized>(
    mesher: &mut M,
    store: &TopologyStore,
    section: &PinSection,
    path: &Path,
) -> Result<()> {
    mesher.initialize()?;
    mesher.build_entities(store)?;
    mesher.set_compound(&section.fluid_surfaces())?;
    mesher.generate(2)?;
    mesher.write(path)
}
