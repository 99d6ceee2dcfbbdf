// "Stretching Platform": width-only resizing on a rotation-locked platform

use log::info;

use crate::config::AppConfig;
use crate::engine::physics::{vector, Arbiter, PhysicsWorld, PreSolve, Real, Vector};

use super::platform::{MassModel, PlatformState, ResizeAxes, ResizePolicy};
use super::scene::Scene;
use super::{Demo, SceneError};

/// Share of the expansion speed seen at the platform's edge
///
/// Both edges move apart, so each one travels at half the rate the width
/// changes.
const EDGE_SPEED_FRACTION: Real = 0.5;

/// Horizontal surface speed at `local_x` on a platform of `half_width`
/// whose width changes at `expand_speed` per second
pub fn stretch_surface_speed(local_x: Real, half_width: Real, expand_speed: Real) -> Real {
    if half_width <= 0.0 {
        return 0.0;
    }
    (local_x / half_width) * EDGE_SPEED_FRACTION * expand_speed
}

/// Pre-solve handler sliding contacts sideways as the platform stretches
pub struct StretchSurface {
    pub state: PlatformState,
}

impl PreSolve for StretchSurface {
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
            let speed = stretch_surface_speed(
                local.x,
                self.state.half_width(),
                self.state.expand_speed.x,
            );
            arbiter.set_surface_velocity(i, pose.rotation * vector![speed, 0.0]);
        }
    }
}

/// Platform stretched horizontally, rotation locked
pub struct StretchDemo {
    scene: Scene,
}

impl StretchDemo {
    pub const NAME: &'static str = "Stretching Platform";

    pub fn init(config: &AppConfig) -> Result<Box<dyn Demo>, SceneError> {
        Ok(Box::new(Self::new(config)?))
    }

    pub fn new(config: &AppConfig) -> Result<Self, SceneError> {
        let policy = ResizePolicy::new(
            ResizeAxes::WidthOnly,
            config.platform.expand_rate,
            config.platform.min_size,
        )?;
        let scene = Scene::build(config, MassModel::RotationLocked, policy)?;
        info!("{}: left/right arrows stretch the platform", Self::NAME);
        Ok(Self { scene })
    }
}

impl Demo for StretchDemo {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, ticks: u64, keyboard: Vector<Real>) -> Result<(), SceneError> {
        self.scene
            .advance(ticks, keyboard, |state, _inv_dt| StretchSurface { state: *state })
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_surface_speed_scales_with_position() {
        assert_eq!(stretch_surface_speed(0.0, 200.0, 100.0), 0.0);
        assert_relative_eq!(stretch_surface_speed(200.0, 200.0, 100.0), 50.0);
        assert_relative_eq!(stretch_surface_speed(-100.0, 200.0, 100.0), -25.0);
        assert_relative_eq!(stretch_surface_speed(100.0, 200.0, -100.0), -25.0);
    }

    #[test]
    fn test_no_expansion_no_speed() {
        assert_eq!(stretch_surface_speed(150.0, 200.0, 0.0), 0.0);
    }

    #[test]
    fn test_degenerate_width_is_still() {
        assert_eq!(stretch_surface_speed(10.0, 0.0, 100.0), 0.0);
    }

    #[test]
    fn test_height_is_fixed() {
        let config = AppConfig::default();
        let mut demo = StretchDemo::new(&config).expect("demo builds");
        for tick in 1..=60 {
            demo.update(tick, vector![1.0, 1.0]).expect("update");
        }
        let state = demo.scene.platform.state;
        assert_eq!(state.height, 50.0);
        assert!(state.width > 400.0);
    }

    #[test]
    fn test_width_grows_every_frame_under_input() {
        let config = AppConfig::default();
        let mut demo = StretchDemo::new(&config).expect("demo builds");
        let mut last = demo.scene.platform.state.width;
        for tick in 1..=60 {
            demo.update(tick, vector![1.0, 0.0]).expect("update");
            let width = demo.scene.platform.state.width;
            assert!(width > last);
            last = width;
        }
    }

    #[test]
    fn test_zero_input_keeps_width() {
        let config = AppConfig::default();
        let mut demo = StretchDemo::new(&config).expect("demo builds");
        for tick in 1..=60 {
            demo.update(tick, Vector::zeros()).expect("update");
        }
        assert_eq!(demo.scene.platform.state.width, 400.0);
    }

    #[test]
    fn test_platform_does_not_rotate() {
        let config = AppConfig::default();
        let mut demo = StretchDemo::new(&config).expect("demo builds");
        for tick in 1..=120 {
            demo.update(tick, vector![-1.0, 0.0]).expect("update");
        }
        let platform = demo
            .world()
            .get_rigid_body(demo.scene.platform.body)
            .expect("platform");
        assert_eq!(platform.rotation().angle(), 0.0);
    }

    /// Let the boxes land, then resize for one second and report how far the
    /// outer box moved relative to the platform centre
    fn outer_box_drift(keyboard: Vector<Real>) -> Real {
        let mut demo = StretchDemo::new(&AppConfig::default()).expect("demo builds");
        let mut tick = 0;
        for _ in 0..120 {
            tick += 1;
            demo.update(tick, Vector::zeros()).expect("update");
        }
        let (handle, before) = demo.scene.outer_crate().expect("boxes");

        for _ in 0..60 {
            tick += 1;
            demo.update(tick, keyboard).expect("update");
        }
        let after = demo.scene.crate_offset(handle).expect("box");
        after - before
    }

    #[test]
    fn test_growing_platform_carries_boxes_outward() {
        assert!(outer_box_drift(vector![1.0, 0.0]) > 10.0);
    }

    #[test]
    fn test_shrinking_platform_carries_boxes_inward() {
        assert!(outer_box_drift(vector![-1.0, 0.0]) < -10.0);
    }
}
