//! Splash ("corona") particles
//!
//! Spawned by the splash trigger at the position of each live water drop.
//! A splash particle lives for a fixed time, drifts with damped velocity, and
//! is pushed around by a random acceleration that is re-drawn every step.

use crate::config::SceneConfig;
use crate::core_types::sampling::{scale_vec3, splash_acceleration, uniform_vec3};
use crate::core_types::{is_advancing, Seconds, Vec3};
use crate::particles::{Entity, EntityKind, StepContext};
use crate::render::Appearance;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// RGB color of every splash particle
pub const SPLASH_COLOR: [f32; 3] = [0.25, 1.0, 0.25];

/// Short-lived particle thrown off by a splash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplashParticle {
    position: Vec3,
    velocity: Vec3,
    scale: Vec3,
    color: Vec3,
    time_to_live: Seconds,
}

impl SplashParticle {
    /// Create a splash particle that expires after `time_to_live`
    pub fn new(position: Vec3, velocity: Vec3, scale: Vec3, time_to_live: Seconds) -> Self {
        SplashParticle {
            position,
            velocity,
            scale,
            color: Vec3::from(SPLASH_COLOR),
            time_to_live,
        }
    }

    /// Create a splash particle at `position` with sampled launch velocity and size
    ///
    /// # Panics
    ///
    /// Panics if the configured time-to-live is negative.
    pub fn sampled<R: Rng + ?Sized>(position: Vec3, config: &SceneConfig, rng: &mut R) -> Self {
        let velocity = uniform_vec3(rng, &config.splash_velocity);
        let scale = scale_vec3(rng, &config.splash_scale);
        SplashParticle::new(
            position,
            velocity,
            scale,
            Seconds::new(config.splash_time_to_live),
        )
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Visual scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Remaining lifetime in seconds; zero means expired
    pub fn time_to_live(&self) -> f32 {
        self.time_to_live.value()
    }
}

impl Entity for SplashParticle {
    fn update(&mut self, dt: f32, ctx: &mut StepContext<'_>) -> bool {
        let advancing = is_advancing(dt);
        if advancing {
            self.time_to_live = self.time_to_live - Seconds::new(dt);
        }
        if self.time_to_live <= Seconds::ZERO {
            return false;
        }
        if !advancing {
            return true;
        }

        let config = ctx.config();
        self.position += self.velocity * (dt * config.splash_damping);
        let accel = splash_acceleration(ctx.rng(), &config.splash_acceleration);
        self.velocity += accel * dt;

        true
    }

    fn liquid_info(&self) -> Option<Vec3> {
        None
    }

    fn appearance(&self) -> Appearance {
        Appearance {
            kind: EntityKind::SplashParticle,
            position: self.position,
            velocity: self.velocity,
            scale: self.scale,
            color: self.color,
        }
    }
}
