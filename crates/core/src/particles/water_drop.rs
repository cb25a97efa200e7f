//! Falling water drops
//!
//! Drops fall under constant gravity until they pass below the floor plane.
//! Position integration is damped (only a fraction of the velocity is applied
//! each step) so the fall reads slower on screen than the physical velocity.
//! The velocity update itself is undamped.

use crate::config::SceneConfig;
use crate::core_types::sampling::{scale_vec3, spawn_position, uniform_vec3};
use crate::core_types::{is_advancing, Vec3};
use crate::particles::{Entity, EntityKind, StepContext};
use crate::render::Appearance;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// RGB color of every water drop
pub const WATER_COLOR: [f32; 3] = [0.0, 0.5, 0.8];

/// Water drop falling under gravity
///
/// # Example
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use splash_sim_core::particles::{Entity, StepContext, WaterDrop};
/// use splash_sim_core::{SceneConfig, Vec3};
///
/// let config = SceneConfig::default();
/// let mut rng = StdRng::seed_from_u64(1);
/// let mut spawned = Vec::new();
/// let mut ctx = StepContext::new(&config, &mut rng, &mut spawned);
///
/// let mut drop = WaterDrop::new(Vec3::new(0.0, 5.0, 0.0), Vec3::zeros(), Vec3::repeat(0.2));
/// assert!(drop.update(0.1, &mut ctx));
/// assert!(drop.velocity().y < 0.0);
/// assert_eq!(drop.liquid_info(), Some(drop.position()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterDrop {
    position: Vec3,
    velocity: Vec3,
    scale: Vec3,
    color: Vec3,
}

impl WaterDrop {
    /// Create a drop at `position` moving with `velocity`
    pub fn new(position: Vec3, velocity: Vec3, scale: Vec3) -> Self {
        WaterDrop {
            position,
            velocity,
            scale,
            color: Vec3::from(WATER_COLOR),
        }
    }

    /// Create a drop somewhere in the configured spawn region with small random drift
    pub fn sampled<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let position = spawn_position(
            rng,
            &config.drop_spawn_x,
            &config.drop_spawn_y,
            &config.drop_spawn_z,
        );
        let velocity = uniform_vec3(rng, &config.drop_velocity);
        let scale = scale_vec3(rng, &config.drop_scale);
        WaterDrop::new(position, velocity, scale)
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
}

impl Entity for WaterDrop {
    fn update(&mut self, dt: f32, ctx: &mut StepContext<'_>) -> bool {
        let config = ctx.config();

        if self.position.y < config.floor_y {
            return false;
        }
        if !is_advancing(dt) {
            return true;
        }

        self.position += self.velocity * (dt * config.drop_damping);
        self.velocity += Vec3::new(0.0, -config.gravity, 0.0) * dt;

        true
    }

    fn liquid_info(&self) -> Option<Vec3> {
        Some(self.position)
    }

    fn appearance(&self) -> Appearance {
        Appearance {
            kind: EntityKind::WaterDrop,
            position: self.position,
            velocity: self.velocity,
            scale: self.scale,
            color: self.color,
        }
    }
}
