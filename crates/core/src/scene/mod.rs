//! Particle scene: ownership, stepping and spawning
//!
//! [`Scene`] owns every live entity. Structural changes happen only at pass
//! boundaries:
//!
//! - spawn requests (from entities mid-step, the splash trigger, the continuous
//!   spawner or callers) land in a pending buffer;
//! - `step` merges pending entities, runs one update pass over the live set,
//!   drops every entity whose update returned `false`, then merges the spawns
//!   made during the pass.
//!
//! An entity spawned during a pass is therefore first updated on the next
//! step, and an entity that dies is never updated or rendered again.

pub mod driver;

pub use driver::{FixedTimestep, FrameClock, FrameReport, RunSummary, SimulationDriver, WallClock};

use crate::config::{ConfigResult, SceneConfig};
use crate::core_types::is_advancing;
use crate::particles::{Entity, EntityKind, SplashParticle, StepContext, WaterDrop};
use crate::render::RenderSink;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Result of one update pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Entities updated during the pass
    pub updated: usize,
    /// Entities removed at the end of the pass
    pub expired: usize,
    /// Entities spawned during the pass, merged at its end
    pub spawned: usize,
}

/// Snapshot of scene population and counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneStats {
    /// Water drops in the live set
    pub live_drops: usize,
    /// Splash particles in the live set
    pub live_splashes: usize,
    /// Spawn requests waiting for the next merge
    pub pending: usize,
    /// Steps run since creation or the last `clear`
    pub frames: u64,
    /// Sum of advancing timesteps (seconds)
    pub simulation_time: f32,
    /// Entities merged into the live set so far
    pub total_spawned: usize,
    /// Entities removed by the update pass so far
    pub total_expired: usize,
}

/// Owning collection of live entities
pub struct Scene {
    config: SceneConfig,
    rng: StdRng,

    entities: Vec<Box<dyn Entity>>,
    /// Spawn requests not yet in the live set
    pending: Vec<Box<dyn Entity>>,

    // Statistics
    frames: u64,
    simulation_time: f32,
    total_spawned: usize,
    total_expired: usize,
}

impl Scene {
    /// Create an empty scene with an OS-seeded generator
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `config` fails validation.
    pub fn new(config: SceneConfig) -> ConfigResult<Self> {
        info!("Creating scene with OS-seeded generator");
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create an empty scene whose random draws are reproducible from `seed`
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `config` fails validation.
    pub fn seeded(config: SceneConfig, seed: u64) -> ConfigResult<Self> {
        info!("Creating scene with seed {}", seed);
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create an empty scene using the given generator
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `config` fails validation.
    pub fn with_rng(config: SceneConfig, rng: StdRng) -> ConfigResult<Self> {
        config.validate()?;
        debug!(
            spawn_probability = config.spawn_probability,
            floor_y = config.floor_y,
            splash_ttl = config.splash_time_to_live,
            "Scene configured"
        );
        Ok(Self::from_parts(config, rng))
    }

    fn from_parts(config: SceneConfig, rng: StdRng) -> Self {
        Scene {
            config,
            rng,
            entities: Vec::new(),
            pending: Vec::new(),
            frames: 0,
            simulation_time: 0.0,
            total_spawned: 0,
            total_expired: 0,
        }
    }

    /// Scene configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Queue a new entity; it joins the live set at the next merge
    pub fn spawn<E: Entity + 'static>(&mut self, entity: E) {
        self.pending.push(Box::new(entity));
    }

    /// Move every pending entity into the live set, returning how many moved
    ///
    /// `step` calls this before and after its update pass. Callers only need
    /// it to make spawns visible without stepping.
    pub fn merge_pending(&mut self) -> usize {
        let merged = self.pending.len();
        self.total_spawned += merged;
        self.entities.append(&mut self.pending);
        merged
    }

    /// Advance every live entity by `dt` seconds
    ///
    /// Entities returning `false` are removed after the pass. Entities spawned
    /// during the pass are merged after removal and are not updated until the
    /// next call. A non-positive `dt` still runs expiry checks but moves
    /// nothing.
    pub fn step(&mut self, dt: f32) -> StepOutcome {
        self.merge_pending();

        let updated = self.entities.len();
        let mut ctx = StepContext::new(&self.config, &mut self.rng, &mut self.pending);
        self.entities.retain_mut(|entity| entity.update(dt, &mut ctx));
        let expired = updated - self.entities.len();

        let spawned = self.merge_pending();

        self.frames += 1;
        if is_advancing(dt) {
            self.simulation_time += dt;
        }
        self.total_expired += expired;

        trace!(
            frame = self.frames,
            live = self.entities.len(),
            expired,
            spawned,
            "Scene stepped"
        );

        StepOutcome {
            updated,
            expired,
            spawned,
        }
    }

    /// Spawn one splash particle at every live liquid entity
    ///
    /// Only the live set is scanned; pending entities and the particles
    /// spawned by this call are not sources. Source drops are left untouched.
    /// Returns the number of splash particles queued.
    pub fn trigger_splash(&mut self) -> usize {
        let mut spawned = 0;
        for entity in &self.entities {
            if let Some(position) = entity.liquid_info() {
                let splash = SplashParticle::sampled(position, &self.config, &mut self.rng);
                self.pending.push(Box::new(splash));
                spawned += 1;
            }
        }

        debug!(spawned, "Splash triggered");
        spawned
    }

    /// Roll the per-frame spawn chance and queue a drop on success
    ///
    /// The chance is per call, not per second, so `dt` does not scale it.
    /// Returns whether a drop was queued.
    pub fn continuous_spawn(&mut self, _dt: f32) -> bool {
        if self.rng.random::<f32>() >= self.config.spawn_probability {
            return false;
        }

        let drop = WaterDrop::sampled(&self.config, &mut self.rng);
        debug!(
            "Spawned drop at ({:.2}, {:.2}, {:.2})",
            drop.position().x,
            drop.position().y,
            drop.position().z
        );
        self.pending.push(Box::new(drop));
        true
    }

    /// Hand every live entity to `sink`
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for entity in &self.entities {
            sink.draw(&entity.appearance());
        }
    }

    /// Live entities, read-only
    pub fn entities(&self) -> impl Iterator<Item = &(dyn Entity + 'static)> + '_ {
        self.entities.iter().map(|entity| &**entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the live set is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of spawn requests waiting for the next merge
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of live entities of `kind`
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }

    /// Current population and counters
    pub fn stats(&self) -> SceneStats {
        SceneStats {
            live_drops: self.count_kind(EntityKind::WaterDrop),
            live_splashes: self.count_kind(EntityKind::SplashParticle),
            pending: self.pending.len(),
            frames: self.frames,
            simulation_time: self.simulation_time,
            total_spawned: self.total_spawned,
            total_expired: self.total_expired,
        }
    }

    /// Drop every live and pending entity and reset counters
    ///
    /// Configuration and generator state are kept.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending.clear();
        self.frames = 0;
        self.simulation_time = 0.0;
        self.total_spawned = 0;
        self.total_expired = 0;
    }
}

impl Default for Scene {
    /// Default configuration with an OS-seeded generator
    fn default() -> Self {
        Self::from_parts(SceneConfig::default(), StdRng::from_os_rng())
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("live", &self.entities.len())
            .field("pending", &self.pending.len())
            .field("frames", &self.frames)
            .field("simulation_time", &self.simulation_time)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Seconds, Vec3};
    use crate::render::Appearance;

    fn drop_at(x: f32, y: f32) -> WaterDrop {
        WaterDrop::new(Vec3::new(x, y, 0.0), Vec3::zeros(), Vec3::repeat(0.2))
    }

    fn splash_with_ttl(ttl: f32) -> SplashParticle {
        SplashParticle::new(Vec3::zeros(), Vec3::zeros(), Vec3::repeat(0.1), Seconds::new(ttl))
    }

    fn scene() -> Scene {
        Scene::seeded(SceneConfig::default(), 1234).unwrap()
    }

    #[test]
    fn test_new_scene_is_empty() {
        let scene = scene();
        assert!(scene.is_empty());
        assert_eq!(scene.pending_len(), 0);
        assert_eq!(scene.stats(), SceneStats::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SceneConfig {
            spawn_probability: -0.1,
            ..SceneConfig::default()
        };
        assert!(Scene::seeded(config, 1).is_err());
    }

    #[test]
    fn test_spawn_is_deferred_until_merge() {
        let mut scene = scene();
        scene.spawn(drop_at(0.0, 0.0));
        assert_eq!(scene.len(), 0);
        assert_eq!(scene.pending_len(), 1);

        assert_eq!(scene.merge_pending(), 1);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.pending_len(), 0);
    }

    #[test]
    fn test_step_removes_dead_entities() {
        let mut scene = scene();
        scene.spawn(drop_at(0.0, 0.0));
        scene.spawn(drop_at(0.0, -10.0)); // below the floor
        scene.spawn(splash_with_ttl(0.05));

        let outcome = scene.step(0.1);
        assert_eq!(outcome.updated, 3);
        assert_eq!(outcome.expired, 2);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.count_kind(EntityKind::WaterDrop), 1);
    }

    #[test]
    fn test_trigger_with_no_liquid_spawns_nothing() {
        let mut scene = scene();
        assert_eq!(scene.trigger_splash(), 0);

        scene.spawn(splash_with_ttl(1.0));
        scene.merge_pending();
        assert_eq!(scene.trigger_splash(), 0);
        assert_eq!(scene.pending_len(), 0);
    }

    #[test]
    fn test_trigger_ignores_pending_drops() {
        let mut scene = scene();
        scene.spawn(drop_at(0.0, 1.0));
        assert_eq!(scene.trigger_splash(), 0);
    }

    #[test]
    fn test_trigger_places_splashes_at_drops() {
        let mut scene = scene();
        let sources = [Vec3::new(1.0, 2.0, 0.0), Vec3::new(-3.0, 0.5, 0.0)];
        for p in sources {
            scene.spawn(drop_at(p.x, p.y));
        }
        scene.merge_pending();

        assert_eq!(scene.trigger_splash(), 2);
        scene.merge_pending();

        let mut splash_positions: Vec<Vec3> = scene
            .entities()
            .filter(|e| e.kind() == EntityKind::SplashParticle)
            .map(|e| e.appearance().position)
            .collect();
        splash_positions.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(splash_positions, vec![sources[1], sources[0]]);
        // Sources still there
        assert_eq!(scene.count_kind(EntityKind::WaterDrop), 2);
    }

    #[test]
    fn test_continuous_spawn_probability_bounds() {
        let never = SceneConfig {
            spawn_probability: 0.0,
            ..SceneConfig::default()
        };
        let mut scene = Scene::seeded(never, 5).unwrap();
        assert!((0..1000).all(|_| !scene.continuous_spawn(0.016)));
        assert_eq!(scene.pending_len(), 0);

        let always = SceneConfig {
            spawn_probability: 1.0,
            ..SceneConfig::default()
        };
        let mut scene = Scene::seeded(always, 5).unwrap();
        assert!((0..10).all(|_| scene.continuous_spawn(0.016)));
        assert_eq!(scene.pending_len(), 10);
    }

    #[test]
    fn test_continuous_spawn_rate_is_about_one_percent() {
        let mut scene = scene();
        let spawned = (0..20_000).filter(|_| scene.continuous_spawn(0.016)).count();
        // Expect ~200
        assert!((120..=280).contains(&spawned), "spawned = {spawned}");
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let run = |seed| {
            let mut scene = Scene::seeded(SceneConfig::default(), seed).unwrap();
            let mut spawned_frames = Vec::new();
            for frame in 0..2_000 {
                if scene.continuous_spawn(0.016) {
                    spawned_frames.push(frame);
                }
                scene.step(0.016);
            }
            (spawned_frames, scene.stats().live_drops)
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_stats_track_counters() {
        let mut scene = scene();
        scene.spawn(drop_at(0.0, 0.0));
        scene.spawn(splash_with_ttl(0.15));
        scene.step(0.1);
        scene.step(0.1);

        let stats = scene.stats();
        assert_eq!(stats.frames, 2);
        assert!((stats.simulation_time - 0.2).abs() < 1e-6);
        assert_eq!(stats.total_spawned, 2);
        assert_eq!(stats.total_expired, 1);
        assert_eq!(stats.live_drops, 1);
        assert_eq!(stats.live_splashes, 0);
    }

    #[test]
    fn test_negative_dt_does_not_advance_clock() {
        let mut scene = scene();
        scene.step(-1.0);
        assert_eq!(scene.stats().frames, 1);
        assert_eq!(scene.stats().simulation_time, 0.0);
    }

    #[test]
    fn test_render_sees_only_live_entities() {
        let mut scene = scene();
        scene.spawn(drop_at(0.0, 0.0));
        scene.step(0.1);
        scene.spawn(drop_at(1.0, 0.0));

        let mut drawn: Vec<Appearance> = Vec::new();
        scene.render(&mut drawn);
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].kind, EntityKind::WaterDrop);
    }

    #[test]
    fn test_clear_resets() {
        let mut scene = scene();
        scene.spawn(drop_at(0.0, 0.0));
        scene.step(0.1);
        scene.spawn(drop_at(0.0, 0.0));
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.pending_len(), 0);
        assert_eq!(scene.stats(), SceneStats::default());
    }
}
