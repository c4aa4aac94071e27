pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod pin;
pub mod pipeline;
pub mod solver;
pub mod topology;

pub use error::{PinError, Result};
