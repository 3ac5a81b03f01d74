mod aabb;
pub mod color;
pub mod noise;

pub use aabb::AABB;
pub use color::{hex_to_rgb, parse_hex, Gradient};
pub use noise::Simplex3;
