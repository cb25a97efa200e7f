//! Read-only render view of scene entities
//!
//! The simulation never draws anything itself. Each frame the driver hands the
//! live entities to a [`RenderSink`] as [`Appearance`] values: copies of the
//! state a renderer needs, so a sink cannot reach back into the scene.

use crate::core_types::Vec3;
use crate::particles::EntityKind;
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// Render attributes of one entity at the end of a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    /// Which kind of entity this is
    pub kind: EntityKind,
    /// World-space position
    pub position: Vec3,
    /// Current velocity (available for orientation; unused by the built-in sinks)
    pub velocity: Vec3,
    /// Non-uniform scale of the mesh
    pub scale: Vec3,
    /// RGB color in 0-1
    pub color: Vec3,
}

impl Appearance {
    /// Model matrix placing a unit mesh at this entity: translate, then scale
    ///
    /// ```
    /// use splash_sim_core::render::Appearance;
    /// use splash_sim_core::{EntityKind, Vec3};
    ///
    /// let look = Appearance {
    ///     kind: EntityKind::WaterDrop,
    ///     position: Vec3::new(1.0, 2.0, 3.0),
    ///     velocity: Vec3::zeros(),
    ///     scale: Vec3::new(0.5, 0.5, 0.1),
    ///     color: Vec3::new(0.0, 0.5, 0.8),
    /// };
    /// let p = look.model_matrix().transform_point(&nalgebra::Point3::new(2.0, 2.0, 10.0));
    /// assert!((p - nalgebra::Point3::new(2.0, 3.0, 4.0)).norm() < 1e-6);
    /// ```
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position) * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

/// Receiver for the per-frame render pass
pub trait RenderSink {
    /// Called once per live entity, in scene order
    fn draw(&mut self, appearance: &Appearance);
}

/// Collects every drawn appearance
impl RenderSink for Vec<Appearance> {
    fn draw(&mut self, appearance: &Appearance) {
        self.push(*appearance);
    }
}

/// Sink that discards everything, for headless stepping
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn draw(&mut self, _appearance: &Appearance) {}
}
