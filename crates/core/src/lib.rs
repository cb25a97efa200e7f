//! Splash Particle Scene Core Library
//!
//! A small frame-stepped particle simulation: water drops spawn at random,
//! fall under gravity and disappear at the floor; a splash trigger throws a
//! short-lived corona particle off every drop in the scene.
//!
//! ## Structure
//!
//! - [`core_types`] - vector alias, time units, random sampling helpers
//! - [`particles`] - the [`Entity`] trait and the two entity kinds
//! - [`scene`] - the owning [`Scene`] and the per-frame [`SimulationDriver`]
//! - [`render`] - read-only [`Appearance`] view and the [`RenderSink`] seam
//! - [`config`] - [`SceneConfig`] with the tuned defaults and JSON loading
//!
//! ## Example
//!
//! ```
//! use splash_sim_core::{FixedTimestep, NullSink, Scene, SceneConfig, SimulationDriver};
//!
//! let scene = Scene::seeded(SceneConfig::default(), 42).unwrap();
//! let mut driver = SimulationDriver::new(scene);
//! let mut clock = FixedTimestep::new(1.0 / 60.0);
//!
//! // Splash once a second
//! let summary = driver.run(&mut clock, 600, |frame| frame % 60 == 0, &mut NullSink);
//! assert_eq!(summary.frames, 600);
//! ```

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod particles;
pub mod render;
pub mod scene;

// Re-export core types
pub use core_types::{Seconds, Vec3};

pub use config::{ConfigError, ConfigResult, SceneConfig};
pub use particles::{Entity, EntityKind, SplashParticle, StepContext, WaterDrop};
pub use render::{Appearance, NullSink, RenderSink};
pub use scene::{
    FixedTimestep, FrameClock, FrameReport, RunSummary, Scene, SceneStats, SimulationDriver,
    StepOutcome, WallClock,
};
