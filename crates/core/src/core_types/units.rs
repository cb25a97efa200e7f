//! Semantic unit types for time quantities
//!
//! Particle lifetimes are held as [`Seconds`] so a negative lifetime is
//! rejected at the call site that produced it, instead of surfacing later as a
//! particle that dies before its first frame.
//!
//! Per-frame timesteps stay plain `f32`: a zero or negative tick is a valid
//! (if useless) input that the simulation treats as "no motion this frame".
//!
//! # Usage
//! ```
//! use splash_sim_core::core_types::units::Seconds;
//!
//! let ttl = Seconds::new(2.75);
//! assert_eq!(ttl.value(), 2.75);
//! assert_eq!(Seconds::new(1.0) - Seconds::new(2.0), Seconds::ZERO);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// Time duration in seconds, never negative
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Seconds(f32);

impl Seconds {
    /// Zero-length duration
    pub const ZERO: Seconds = Seconds(0.0);

    /// Create a new duration in seconds. Asserts the value is finite and non-negative.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f32) -> Self {
        assert!(value >= 0.0, "Seconds::new: negative duration is invalid");
        assert!(value <= f32::MAX, "Seconds::new: duration must be finite");
        Seconds(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Sub for Seconds {
    type Output = Seconds;
    /// Saturates at zero; a duration never goes negative.
    fn sub(self, rhs: Seconds) -> Seconds {
        Seconds((self.0 - rhs.0).max(0.0))
    }
}

/// Whether a frame timestep should move anything.
///
/// Zero, negative and non-finite ticks skip integration. Expiry checks still run.
#[inline]
#[must_use]
pub fn is_advancing(dt: f32) -> bool {
    dt > 0.0 && dt.is_finite()
}
