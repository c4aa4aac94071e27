pub mod curve;

pub use curve::{CatmullRom, Curve, CurveDomain, Segment};
