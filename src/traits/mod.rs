pub mod frame;
pub mod resize;
pub mod visual;

pub use frame::*;
pub use resize::*;
pub use visual::*;
