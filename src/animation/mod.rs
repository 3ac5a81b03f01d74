pub mod displacement;
pub mod motion;

pub use displacement::{displace, BaseMesh, DisplacementEngine, DisplacementParams};
pub use motion::{AxisMotion, Orbit, OrbitPlane, Spin, Wobble};
