mod sample_curve;
mod trace_loop;

pub use sample_curve::SampleCurve;
pub use trace_loop::TraceLoop;
