//! Shared value types: the vector alias, time units and random sampling

pub mod sampling;
pub mod units;

pub use sampling::{coin_flip, uniform};
pub use units::{is_advancing, Seconds};

/// 3D vector used for every position, velocity, scale and RGB color in the scene
pub type Vec3 = nalgebra::Vector3<f32>;
