// Shared scene layout: walls, platform, falling boxes

use log::{debug, info};

use crate::config::AppConfig;
use crate::engine::physics::body::presets;
use crate::engine::physics::{
    point, vector, CollisionPair, CollisionType, PairHandler, PhysicsWorld, PreSolve, Real,
    RigidBodyHandle, Vector,
};

use super::platform::{MassModel, Platform, PlatformState, ResizePolicy};
use super::SceneError;

/// A walled screen box with a resizable platform and boxes dropped on it
pub struct Scene {
    pub world: PhysicsWorld,
    pub platform: Platform,
    pub crates: Vec<RigidBodyHandle>,
    /// Tags the pre-solve handler is registered for
    pub handler_pair: CollisionPair,
    policy: ResizePolicy,
    substeps: u32,
    dt: Real,
    report_interval: u64,
}

impl Scene {
    /// Build the scene described by `config`
    pub fn build(
        config: &AppConfig,
        mass_model: MassModel,
        policy: ResizePolicy,
    ) -> Result<Self, SceneError> {
        let physics = &config.physics;
        let mut world = PhysicsWorld::with_gravity(vector![0.0, -physics.gravity]);
        world.set_iterations(physics.iterations);
        world.set_length_unit(physics.length_unit);

        // Screen-sized box of walls
        let hx = physics.bounds[0] / 2.0;
        let hy = physics.bounds[1] / 2.0;
        let walls = world.add_rigid_body(presets::static_body());
        for (a, b) in [
            (point![-hx, -hy], point![-hx, hy]),
            (point![hx, -hy], point![hx, hy]),
            (point![-hx, -hy], point![hx, -hy]),
            (point![-hx, hy], point![hx, hy]),
        ] {
            world.add_collider(presets::boundary_segment(a, b), walls);
        }

        let platform = Platform::spawn(&mut world, &config.platform, mass_model)?;

        let crate_config = &config.crates;
        let mut crates = Vec::with_capacity(crate_config.count);
        for i in 0..crate_config.count {
            let x = crate_config.first[0] + i as Real * crate_config.spacing;
            let y = crate_config.first[1];
            let body = world.add_rigid_body(presets::box_body(
                x,
                y,
                crate_config.mass,
                crate_config.size,
                crate_config.size,
            ));
            let collider = presets::box_collider(
                crate_config.size,
                crate_config.size,
                crate_config.friction,
                CollisionType::DEFAULT,
            )
            .ok_or(SceneError::DegenerateShape {
                width: crate_config.size,
                height: crate_config.size,
            })?;
            world.add_collider(collider, body);
            crates.push(body);
        }

        let handler_pair = CollisionPair::new(CollisionType::PLATFORM, CollisionType::DEFAULT);
        info!(
            "Scene built: {} boxes, platform {}x{}, pre-solve on {:?}",
            crates.len(),
            platform.state.width,
            platform.state.height,
            handler_pair
        );

        Ok(Self {
            world,
            platform,
            crates,
            handler_pair,
            policy,
            substeps: physics.substeps.max(1),
            dt: physics.substep_dt(),
            report_interval: config.debug.report_interval,
        })
    }

    /// Run one displayed frame: resize, sync and step for every sub-step
    ///
    /// `handler` builds the pre-solve handler for a sub-step from the platform
    /// state written just before it and the step's inverse time delta.
    pub fn advance<H, F>(
        &mut self,
        ticks: u64,
        keyboard: Vector<Real>,
        handler: F,
    ) -> Result<(), SceneError>
    where
        H: PreSolve,
        F: Fn(&PlatformState, Real) -> H,
    {
        for _ in 0..self.substeps {
            let mut next = self.platform.state;
            next.resize(keyboard, self.dt, &self.policy);
            self.platform.apply(&mut self.world, next)?;

            let hooks = PairHandler::new(
                self.handler_pair,
                handler(&self.platform.state, 1.0 / self.dt),
            );
            self.world.step(self.dt, &hooks);
        }

        if self.report_interval > 0 && ticks % self.report_interval == 0 {
            debug!(
                "tick {}: platform {:.1}x{:.1}, step {:.4}s",
                ticks,
                self.platform.state.width,
                self.platform.state.height,
                self.world.timestep()
            );
        }

        Ok(())
    }

    /// Remove every body and collider from the world
    pub fn release(&mut self) -> usize {
        let removed = self.world.remove_all();
        self.crates.clear();
        info!("Scene released: {} bodies removed", removed);
        removed
    }
}

#[cfg(test)]
impl Scene {
    /// Horizontal distance of a box from the platform centre
    pub fn crate_offset(&self, handle: RigidBodyHandle) -> Option<Real> {
        let platform = self.world.get_rigid_body(self.platform.body)?;
        let body = self.world.get_rigid_body(handle)?;
        Some(body.translation().x - platform.translation().x)
    }

    /// The box furthest right of the platform centre, with its offset
    pub fn outer_crate(&self) -> Option<(RigidBodyHandle, Real)> {
        self.crates
            .iter()
            .filter_map(|&handle| Some((handle, self.crate_offset(handle)?)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use super::super::platform::ResizeAxes;
    use super::*;
    use crate::engine::physics::Arbiter;

    struct Noop;

    impl PreSolve for Noop {
        fn pre_solve(&self, _arbiter: &mut Arbiter<'_, '_>) {}
    }

    const POLICY: ResizePolicy = ResizePolicy {
        axes: ResizeAxes::Both,
        rate: 100.0,
        min_size: Some(50.0),
    };

    #[test]
    fn test_scene_layout() {
        let scene = Scene::build(&AppConfig::default(), MassModel::Recomputed, POLICY)
            .expect("scene builds");

        // walls + platform + 6 boxes
        assert_eq!(scene.world.body_count(), 8);
        // 4 segments + platform + 6 boxes
        assert_eq!(scene.world.collider_count(), 11);
        assert_eq!(scene.crates.len(), 6);

        let first = scene.world.get_rigid_body(scene.crates[0]).expect("box");
        assert_eq!(first.translation().x, -150.0);
        assert_eq!(first.translation().y, 150.0);

        let platform = scene.world.get_rigid_body(scene.platform.body).expect("platform");
        assert_eq!(platform.translation().y, -200.0);
        assert!((scene.dt - 1.0 / 180.0).abs() < 1e-7);
    }

    #[test]
    fn test_advance_runs_substeps() {
        let mut scene = Scene::build(&AppConfig::default(), MassModel::Recomputed, POLICY)
            .expect("scene builds");
        scene.advance(1, vector![1.0, 0.0], |_, _| Noop).expect("advance");

        // Three sub-steps of 100 * dt each
        assert!((scene.platform.state.width - (400.0 + 300.0 / 180.0)).abs() < 1e-3);
        assert_eq!(scene.world.timestep(), scene.dt);
    }

    #[test]
    fn test_release_empties_world() {
        let mut scene = Scene::build(&AppConfig::default(), MassModel::Recomputed, POLICY)
            .expect("scene builds");
        assert_eq!(scene.release(), 8);
        assert_eq!(scene.world.body_count(), 0);
        assert_eq!(scene.world.collider_count(), 0);
        assert!(scene.crates.is_empty());
    }

    #[test]
    fn test_degenerate_crates_rejected() {
        let mut config = AppConfig::default();
        config.crates.size = 0.0;
        let result = Scene::build(&config, MassModel::Recomputed, POLICY);
        assert!(matches!(result, Err(SceneError::DegenerateShape { .. })));
    }
}
