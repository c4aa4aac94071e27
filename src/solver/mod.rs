//! Driving the external solver and reading back its result table.

pub mod run;
pub mod summary;

pub use run::SolverRun;
pub use summary::ResultSummary;

/// Default solver executable.
pub const DEFAULT_EXECUTABLE: &str = "combined-opt";
/// Default input deck passed with `-i`.
pub const DEFAULT_INPUT_DECK: &str = "breeder-pin.i";
/// Default result table written by the solver.
pub const DEFAULT_RESULT_FILE: &str = "breeder-pin_out.csv";
/// Files starting with this are removed before each run.
pub const DEFAULT_STALE_PREFIX: &str = "breeder-pin_out.";
