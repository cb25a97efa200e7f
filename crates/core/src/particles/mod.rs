//! Scene entities
//!
//! Every simulated object implements [`Entity`]: a per-step `update` that
//! reports whether the entity survives, a capability query telling the splash
//! trigger whether the entity is liquid (and where), and a read-only
//! [`Appearance`] for rendering.
//!
//! Entities never hold references to each other. The only way an entity can
//! affect the rest of the scene is by spawning through the [`StepContext`] it
//! receives during `update`; those spawns are buffered and join the live set
//! after the current pass.

pub mod splash;
pub mod water_drop;

pub use splash::SplashParticle;
pub use water_drop::WaterDrop;

use crate::config::SceneConfig;
use crate::core_types::Vec3;
use crate::render::Appearance;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete kind of a scene entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Falling drop, removed at the floor
    WaterDrop,
    /// Short-lived corona particle
    SplashParticle,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::WaterDrop => write!(f, "water drop"),
            EntityKind::SplashParticle => write!(f, "splash particle"),
        }
    }
}

/// A simulated object owned by the scene
pub trait Entity: fmt::Debug {
    /// Advance the entity by `dt` seconds
    ///
    /// Returns `false` when the entity is dead and must be removed. New
    /// entities may be requested through `ctx`; they are not updated until
    /// the next step.
    fn update(&mut self, dt: f32, ctx: &mut StepContext<'_>) -> bool;

    /// Position of the entity if it is liquid, `None` otherwise
    ///
    /// Liquid entities are the sources the splash trigger spawns from.
    fn liquid_info(&self) -> Option<Vec3>;

    /// Render attributes at the current state
    fn appearance(&self) -> Appearance;

    /// Concrete kind of this entity
    fn kind(&self) -> EntityKind {
        self.appearance().kind
    }
}

/// Borrowed scene state handed to entities during one update pass
///
/// Gives access to the configuration and the scene's random generator, and
/// collects spawn requests in a side buffer the scene merges once the pass is
/// complete.
pub struct StepContext<'a> {
    config: &'a SceneConfig,
    rng: &'a mut StdRng,
    spawned: &'a mut Vec<Box<dyn Entity>>,
}

impl<'a> StepContext<'a> {
    /// Create a context over the given config, generator and spawn buffer
    pub fn new(
        config: &'a SceneConfig,
        rng: &'a mut StdRng,
        spawned: &'a mut Vec<Box<dyn Entity>>,
    ) -> Self {
        Self {
            config,
            rng,
            spawned,
        }
    }

    /// Scene configuration
    pub fn config(&self) -> &'a SceneConfig {
        self.config
    }

    /// Scene random generator
    pub fn rng(&mut self) -> &mut StdRng {
        self.rng
    }

    /// Request a new entity; it joins the scene after the current pass
    pub fn spawn<E: Entity + 'static>(&mut self, entity: E) {
        self.spawned.push(Box::new(entity));
    }

    /// Number of spawn requests buffered so far
    pub fn spawned_len(&self) -> usize {
        self.spawned.len()
    }
}

impl fmt::Debug for StepContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContext")
            .field("spawned", &self.spawned.len())
            .finish_non_exhaustive()
    }
}
