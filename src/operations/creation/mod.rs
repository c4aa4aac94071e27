mod make_curve;
mod make_curve_loop;
mod make_group;
mod make_surface;

pub use make_curve::{MakeLine, MakeSpline};
pub use make_curve_loop::MakeCurveLoop;
pub use make_group::MakePhysicalGroup;
pub use make_surface::MakeSurface;
