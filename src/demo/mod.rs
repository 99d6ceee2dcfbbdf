// Demo scenes and the record the host uses to run them
//
// Each demo owns its physics scene. The host calls `update` once per tick with
// the keyboard vector, draws the scene through the default renderer and calls
// `destroy` when switching away.

mod expand;
mod platform;
mod scene;
mod stretch;

use expand::ExpandDemo;
use stretch::StretchDemo;

use crate::config::AppConfig;
use crate::engine::physics::{PhysicsWorld, Real, Vector};
use crate::engine::renderer::Renderer;

/// Scene construction and update errors
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Degenerate box of size {width}x{height}")]
    DegenerateShape { width: Real, height: Real },

    #[error("Minimum platform size must be positive, got {0}")]
    InvalidMinSize(Real),

    #[error("Platform body or collider is missing from the scene")]
    MissingPlatform,
}

/// A runnable demo scene
pub trait Demo {
    /// Display name
    fn name(&self) -> &'static str;

    /// Advance the scene by one displayed frame
    ///
    /// `ticks` counts frames since the host started; `keyboard` has each axis
    /// in -1.0..=1.0.
    fn update(&mut self, ticks: u64, keyboard: Vector<Real>) -> Result<(), SceneError>;

    /// The physics scene, for drawing and pointer queries
    fn world(&self) -> &PhysicsWorld;

    fn world_mut(&mut self) -> &mut PhysicsWorld;

    /// Draw with the default scene renderer
    fn draw(&self, renderer: &mut Renderer) -> anyhow::Result<()> {
        renderer.render(self.world())
    }

    /// Release every body and collider, then the scene itself
    fn destroy(self: Box<Self>);
}

/// Registration record for a demo
pub struct DemoEntry {
    /// Key used in configuration
    pub key: &'static str,
    pub name: &'static str,
    pub init: fn(&AppConfig) -> Result<Box<dyn Demo>, SceneError>,
}

/// All registered demos, in selection order
pub const DEMOS: &[DemoEntry] = &[
    DemoEntry {
        key: "expand",
        name: ExpandDemo::NAME,
        init: ExpandDemo::init,
    },
    DemoEntry {
        key: "stretch",
        name: StretchDemo::NAME,
        init: StretchDemo::init,
    },
];

/// Index of the demo registered under `key`
pub fn find(key: &str) -> Option<usize> {
    DEMOS.iter().position(|entry| entry.key.eq_ignore_ascii_case(key))
}
