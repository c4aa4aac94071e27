pub mod fingerprint;
pub mod params;
pub mod section;

pub use fingerprint::{Fingerprint, HexOrder};
pub use params::{Constraint, DesignParameters};
pub use section::{BuildPinSection, PinSection, GROUP_NAMES};
