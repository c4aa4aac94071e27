//! breeder-pin: build, mesh and solve one breeder-pin cross-section.
//!
//! # Logging
//!
//! `RUST_LOG` takes precedence over the `-v` flags:
//! - `RUST_LOG=breeder_pin=debug` - entity counts and per-target mesh sizes
//! - `RUST_LOG=debug` - everything
//!
//! # Example
//!
//! ```bash
//! # Mesh the reference pin with a coarser size, skip the solver
//! breeder-pin --mesh-size 0.02 --mesh-only
//!
//! # Full run from a config file, overriding one parameter
//! breeder-pin -c sweep.toml --inner-bore 0.06 -v
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use breeder_pin::config::{MeshEngine, PipelineConfig};
use breeder_pin::pin::{DesignParameters, HexOrder};
use breeder_pin::pipeline::Pipeline;

/// Build a breeder-pin cross-section from ten design parameters, mesh it,
/// run the solver on it and keep the first and last rows of its results.
#[derive(Parser)]
#[command(name = "breeder-pin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory for the mesh, solver outputs and summary
    #[arg(long)]
    working_dir: Option<PathBuf>,

    /// Target mesh element size
    #[arg(long)]
    mesh_size: Option<f64>,

    /// Meshing engine
    #[arg(long)]
    engine: Option<Engine>,

    /// Solver executable
    #[arg(long)]
    solver: Option<PathBuf>,

    /// Name the summary with byte-swapped hex tokens, as older sweeps did
    #[arg(long)]
    little_endian_fingerprint: bool,

    /// Stop after writing the mesh
    #[arg(long)]
    mesh_only: bool,

    #[command(flatten)]
    params: ParamOverrides,

    /// Suppress all non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Engine {
    /// Built-in constrained Delaunay mesher
    Cdt,
    /// External gmsh executable
    Gmsh,
}

/// Design parameter overrides, applied on top of the configuration.
#[derive(Args)]
struct ParamOverrides {
    #[arg(long)]
    inner_bore: Option<f64>,
    #[arg(long)]
    outer_bore: Option<f64>,
    #[arg(long)]
    bore_turning_point_x: Option<f64>,
    #[arg(long)]
    bore_turning_point_y: Option<f64>,
    #[arg(long)]
    pin_radial_thickness: Option<f64>,
    #[arg(long)]
    breeder_inner_length: Option<f64>,
    #[arg(long)]
    breeder_outer_length: Option<f64>,
    #[arg(long)]
    outer_turning_point_x: Option<f64>,
    #[arg(long)]
    outer_turning_point_y: Option<f64>,
    #[arg(long)]
    outer_length: Option<f64>,
}

impl ParamOverrides {
    fn apply(&self, p: &mut DesignParameters) {
        let fields = [
            (self.inner_bore, &mut p.inner_bore),
            (self.outer_bore, &mut p.outer_bore),
            (self.bore_turning_point_x, &mut p.bore_turning_point_x),
            (self.bore_turning_point_y, &mut p.bore_turning_point_y),
            (self.pin_radial_thickness, &mut p.pin_radial_thickness),
            (self.breeder_inner_length, &mut p.breeder_inner_length),
            (self.breeder_outer_length, &mut p.breeder_outer_length),
            (self.outer_turning_point_x, &mut p.outer_turning_point_x),
            (self.outer_turning_point_y, &mut p.outer_turning_point_y),
            (self.outer_length, &mut p.outer_length),
        ];
        for (value, field) in fields {
            if let Some(v) = value {
                *field = v;
            }
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn,breeder_pin=info",
            1 => "warn,breeder_pin=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    cli.params.apply(&mut config.params);
    if let Some(dir) = &cli.working_dir {
        config.working_dir.clone_from(dir);
    }
    if let Some(size) = cli.mesh_size {
        config.mesh.size = size;
    }
    if let Some(engine) = cli.engine {
        config.mesh.engine = match engine {
            Engine::Cdt => MeshEngine::Cdt,
            Engine::Gmsh => MeshEngine::Gmsh,
        };
    }
    if let Some(solver) = &cli.solver {
        config.solver.executable.clone_from(solver);
    }
    if cli.little_endian_fingerprint {
        config.fingerprint_order = HexOrder::LittleEndian;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let pipeline = Pipeline::new(config);

    if cli.mesh_only {
        let mesh = pipeline.mesh()?;
        if !cli.quiet {
            println!("{}", mesh.display());
        }
        return Ok(());
    }

    let report = pipeline.run()?;
    if !report.solver_status.success() {
        tracing::warn!(status = %report.solver_status, "summary written from a failed solver run");
    }
    if !cli.quiet {
        println!("{}", report.summary_path.display());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}
