// "Changing Shape": a platform that grows and shrinks in both directions

use log::info;

use crate::config::AppConfig;
use crate::engine::physics::{vector, Arbiter, PhysicsWorld, Point, PreSolve, Real, Vector};

use super::platform::{MassModel, PlatformState, ResizeAxes, ResizePolicy};
use super::scene::Scene;
use super::{Demo, SceneError};

/// Velocity of the platform surface at `local` while it scales by `scale_dt`
/// over one step
///
/// A point at `local` moves to `local * scale_dt` during the step, so its
/// velocity is the displacement times the inverse time delta.
pub fn expand_surface_velocity(
    local: Point<Real>,
    scale_dt: Vector<Real>,
    inv_dt: Real,
) -> Vector<Real> {
    vector![
        local.x * (scale_dt.x - 1.0) * inv_dt,
        local.y * (scale_dt.y - 1.0) * inv_dt
    ]
}

/// Pre-solve handler dragging contacts along with the expanding surface
pub struct ExpandSurface {
    pub state: PlatformState,
    pub inv_dt: Real,
}

impl PreSolve for ExpandSurface {
    fn pre_solve(&self, arbiter: &mut Arbiter<'_, '_>) {
        let Some(platform) = arbiter.first_body() else {
            return;
        };
        let pose = platform.position();

        for i in 0..arbiter.count() {
            let Some(point) = arbiter.point(i) else {
                continue;
            };
            let local = pose.inverse_transform_point(&point);
            let velocity = expand_surface_velocity(local, self.state.scale_dt, self.inv_dt);
            arbiter.set_surface_velocity(i, pose.rotation * velocity);
        }
    }
}

/// Platform resized on both axes with its inertia recomputed every sub-step
pub struct ExpandDemo {
    scene: Scene,
}

impl ExpandDemo {
    pub const NAME: &'static str = "Changing Shape";

    pub fn init(config: &AppConfig) -> Result<Box<dyn Demo>, SceneError> {
        Ok(Box::new(Self::new(config)?))
    }

    pub fn new(config: &AppConfig) -> Result<Self, SceneError> {
        let policy = ResizePolicy::new(
            ResizeAxes::Both,
            config.platform.expand_rate,
            config.platform.min_size,
        )?;
        let scene = Scene::build(config, MassModel::Recomputed, policy)?;
        info!("{}: arrow keys change the platform's width and height", Self::NAME);
        Ok(Self { scene })
    }
}

impl Demo for ExpandDemo {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, ticks: u64, keyboard: Vector<Real>) -> Result<(), SceneError> {
        self.scene.advance(ticks, keyboard, |state, inv_dt| ExpandSurface {
            state: *state,
            inv_dt,
        })
    }

    fn world(&self) -> &PhysicsWorld {
        &self.scene.world
    }

    fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.scene.world
    }

    fn destroy(mut self: Box<Self>) {
        self.scene.release();
    }
}
