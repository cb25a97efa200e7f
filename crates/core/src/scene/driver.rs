//! Per-frame simulation loop
//!
//! Every frame runs the same fixed sequence:
//!
//! 1. roll the continuous drop spawner,
//! 2. step the scene,
//! 3. fire the splash trigger if the input asked for it this frame,
//! 4. hand the live entities to the render sink.
//!
//! The driver does not own a window, a clock or an input device. Time comes
//! from a [`FrameClock`] (or is passed per frame) and the trigger is a plain
//! boolean, so the loop runs the same headless, in tests, or under a renderer.

use crate::render::RenderSink;
use crate::scene::{Scene, StepOutcome};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Source of per-frame timesteps
pub trait FrameClock {
    /// Seconds elapsed since the previous tick
    fn tick(&mut self) -> f32;
}

/// Clock that always reports the same timestep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    dt: f32,
}

impl FixedTimestep {
    /// Create a clock ticking `dt` seconds per frame
    pub fn new(dt: f32) -> Self {
        FixedTimestep { dt }
    }

    /// The fixed timestep
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

impl FrameClock for FixedTimestep {
    fn tick(&mut self) -> f32 {
        self.dt
    }
}

/// Clock measuring real elapsed time between ticks
///
/// The first tick reports zero: there is no previous frame to measure from.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock {
    last: Option<Instant>,
}

impl WallClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameClock for WallClock {
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last = Some(now);
        dt
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Timestep used
    pub dt: f32,
    /// Whether the continuous spawner queued a drop
    pub drop_spawned: bool,
    /// Update pass result
    pub step: StepOutcome,
    /// Splash particles queued by the trigger (0 if it did not fire)
    pub splashes: usize,
    /// Live entities handed to the render sink
    pub live: usize,
}

/// Totals over a multi-frame run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Frames run
    pub frames: u64,
    /// Drops queued by the continuous spawner
    pub drops_spawned: usize,
    /// Frames on which the splash trigger fired
    pub triggers: usize,
    /// Splash particles queued by the trigger
    pub splashes_spawned: usize,
    /// Entities removed by update passes
    pub expired: usize,
    /// Largest live set seen after any frame
    pub peak_live: usize,
}

impl RunSummary {
    fn record(&mut self, report: &FrameReport, triggered: bool) {
        self.frames += 1;
        self.drops_spawned += usize::from(report.drop_spawned);
        self.triggers += usize::from(triggered);
        self.splashes_spawned += report.splashes;
        self.expired += report.step.expired;
        self.peak_live = self.peak_live.max(report.live);
    }

    /// Fold a later run into this one
    pub fn merge(&mut self, later: &RunSummary) {
        self.frames += later.frames;
        self.drops_spawned += later.drops_spawned;
        self.triggers += later.triggers;
        self.splashes_spawned += later.splashes_spawned;
        self.expired += later.expired;
        self.peak_live = self.peak_live.max(later.peak_live);
    }
}

/// Runs the spawn, step, trigger, render sequence over a scene
#[derive(Debug)]
pub struct SimulationDriver {
    scene: Scene,
    frame: u64,
}

impl SimulationDriver {
    /// Drive `scene` from its current state
    pub fn new(scene: Scene) -> Self {
        SimulationDriver { scene, frame: 0 }
    }

    /// The driven scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access for setup between frames
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Give the scene back
    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Run one frame
    ///
    /// `trigger` is the splash input for this frame. The sink only sees the
    /// live set after the step; splashes queued by the trigger are drawn from
    /// the next frame on.
    pub fn frame<S: RenderSink + ?Sized>(
        &mut self,
        dt: f32,
        trigger: bool,
        sink: &mut S,
    ) -> FrameReport {
        self.frame += 1;

        let drop_spawned = self.scene.continuous_spawn(dt);
        let step = self.scene.step(dt);
        let splashes = if trigger {
            self.scene.trigger_splash()
        } else {
            0
        };
        self.scene.render(sink);

        FrameReport {
            frame: self.frame,
            dt,
            drop_spawned,
            step,
            splashes,
            live: self.scene.len(),
        }
    }

    /// Run `frames` frames, reading time from `clock` and the trigger from `trigger`
    ///
    /// `trigger` receives the frame number about to run.
    pub fn run<C, T, S>(
        &mut self,
        clock: &mut C,
        frames: u64,
        mut trigger: T,
        sink: &mut S,
    ) -> RunSummary
    where
        C: FrameClock + ?Sized,
        T: FnMut(u64) -> bool,
        S: RenderSink + ?Sized,
    {
        let mut summary = RunSummary::default();
        for _ in 0..frames {
            let dt = clock.tick();
            let fire = trigger(self.frame + 1);
            let report = self.frame(dt, fire, sink);
            summary.record(&report, fire);
        }

        debug!(
            frames = summary.frames,
            drops = summary.drops_spawned,
            splashes = summary.splashes_spawned,
            "Run finished"
        );
        summary
    }
}
