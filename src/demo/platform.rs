// Resizable platform: size bookkeeping and geometry/mass updates

use crate::config::PlatformConfig;
use crate::core::math::{box_vertices, grow_clamped, moment_for_box};
use crate::engine::physics::body::{BodyBuilder, ColliderBuilder2D};
use crate::engine::physics::{
    ColliderHandle, CollisionType, PhysicsWorld, Point, Real, RigidBodyHandle, Vector,
};
use rapier2d::prelude::{vector, MassProperties, SharedShape};

use super::SceneError;

/// Which platform dimensions follow the keyboard vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAxes {
    /// x drives the width, y drives the height
    Both,
    /// x drives the width; the height never changes
    WidthOnly,
}

/// How the platform's rotational inertia is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MassModel {
    /// Box inertia recomputed from the current size after every resize
    Recomputed,
    /// Rotation locked (infinite inertia)
    RotationLocked,
}

/// Rules for turning keyboard input into size changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePolicy {
    pub axes: ResizeAxes,
    /// Size change per second at full deflection
    pub rate: Real,
    /// Floor applied to every resized dimension
    pub min_size: Option<Real>,
}

impl ResizePolicy {
    /// Policy with a positive size floor
    pub fn new(axes: ResizeAxes, rate: Real, min_size: Real) -> Result<Self, SceneError> {
        if !min_size.is_finite() || min_size <= 0.0 {
            return Err(SceneError::InvalidMinSize(min_size));
        }
        Ok(Self {
            axes,
            rate,
            min_size: Some(min_size),
        })
    }
}

/// Current platform size and how it changed during the last sub-step
///
/// Written by the updater, read by the pre-solve handler of the same step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformState {
    pub width: Real,
    pub height: Real,
    /// Per-axis ratio of new size to old size for the last sub-step
    pub scale_dt: Vector<Real>,
    /// Per-axis rate of size change over the last sub-step
    pub expand_speed: Vector<Real>,
}

impl PlatformState {
    pub fn new(width: Real, height: Real) -> Self {
        Self {
            width,
            height,
            scale_dt: vector![1.0, 1.0],
            expand_speed: Vector::zeros(),
        }
    }

    /// Apply one sub-step of keyboard input
    pub fn resize(&mut self, keyboard: Vector<Real>, dt: Real, policy: &ResizePolicy) {
        let target = match policy.axes {
            ResizeAxes::Both => keyboard * policy.rate,
            ResizeAxes::WidthOnly => vector![keyboard.x * policy.rate, 0.0],
        };

        let width = grow_clamped(self.width, target.x * dt, policy.min_size);
        let height = match policy.axes {
            ResizeAxes::Both => grow_clamped(self.height, target.y * dt, policy.min_size),
            ResizeAxes::WidthOnly => self.height,
        };

        self.scale_dt = vector![width / self.width, height / self.height];
        self.expand_speed = if dt > 0.0 {
            vector![(width - self.width) / dt, (height - self.height) / dt]
        } else {
            Vector::zeros()
        };
        self.width = width;
        self.height = height;
    }

    /// Corners of the platform polygon in body space
    pub fn vertices(&self) -> [Point<Real>; 4] {
        box_vertices(self.width, self.height)
    }

    pub fn half_width(&self) -> Real {
        self.width / 2.0
    }
}

/// The platform body, its polygon collider and its size
#[derive(Debug)]
pub struct Platform {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub state: PlatformState,
    mass: Real,
    mass_model: MassModel,
}

impl Platform {
    /// Create the platform body and collider in `world`
    pub fn spawn(
        world: &mut PhysicsWorld,
        config: &PlatformConfig,
        mass_model: MassModel,
    ) -> Result<Self, SceneError> {
        let state = PlatformState::new(config.width, config.height);
        let degenerate = SceneError::DegenerateShape {
            width: config.width,
            height: config.height,
        };
        if config.width <= 0.0 || config.height <= 0.0 {
            return Err(degenerate);
        }
        let collider = ColliderBuilder2D::box_shape(config.width, config.height)
            .ok_or(degenerate)?
            .friction(config.friction)
            .restitution(0.0)
            .collision_type(CollisionType::PLATFORM)
            .modify_contacts()
            .build();

        let mut body = BodyBuilder::new_dynamic()
            .position(config.position[0], config.position[1])
            .mass_moment(config.mass, moment_for_box(config.mass, config.width, config.height))
            .can_sleep(false);
        if mass_model == MassModel::RotationLocked {
            body = body.lock_rotation();
        }
        let body = world.add_rigid_body(body.build());
        let collider = world.add_collider(collider, body);

        Ok(Self {
            body,
            collider,
            state,
            mass: config.mass,
            mass_model,
        })
    }

    /// Adopt `next` as the platform size, pushing it into the collider (and
    /// body inertia)
    ///
    /// The stored size only changes once the new shape has been built, so a
    /// rejected size leaves state and collider on the last valid rectangle.
    pub fn apply(
        &mut self,
        world: &mut PhysicsWorld,
        next: PlatformState,
    ) -> Result<(), SceneError> {
        let degenerate = SceneError::DegenerateShape {
            width: next.width,
            height: next.height,
        };
        // A negative side would flip the winding
        if next.width <= 0.0 || next.height <= 0.0 {
            return Err(degenerate);
        }
        let shape =
            SharedShape::convex_polyline(next.vertices().to_vec()).ok_or(degenerate)?;

        world
            .get_collider_mut(self.collider)
            .ok_or(SceneError::MissingPlatform)?
            .set_shape(shape);

        if self.mass_model == MassModel::Recomputed {
            let moment = moment_for_box(self.mass, next.width, next.height);
            world
                .get_rigid_body_mut(self.body)
                .ok_or(SceneError::MissingPlatform)?
                .set_additional_mass_properties(
                    MassProperties::new(Point::origin(), self.mass, moment),
                    true,
                );
        }

        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY_A: ResizePolicy = ResizePolicy {
        axes: ResizeAxes::Both,
        rate: 100.0,
        min_size: Some(50.0),
    };

    const POLICY_B: ResizePolicy = ResizePolicy {
        axes: ResizeAxes::WidthOnly,
        rate: 100.0,
        min_size: Some(50.0),
    };

    const DT: Real = 1.0 / 180.0;

    #[test]
    fn test_zero_input_keeps_size() {
        let mut state = PlatformState::new(400.0, 50.0);
        for _ in 0..100 {
            state.resize(Vector::zeros(), DT, &POLICY_A);
        }
        assert_eq!(state.width, 400.0);
        assert_eq!(state.height, 50.0);
        assert_eq!(state.scale_dt, vector![1.0, 1.0]);
        assert_eq!(state.expand_speed, Vector::zeros());
    }

    #[test]
    fn test_positive_input_grows_width_every_step() {
        let mut state = PlatformState::new(400.0, 50.0);
        let mut last = state.width;
        for _ in 0..50 {
            state.resize(vector![1.0, 0.0], DT, &POLICY_A);
            assert!(state.width > last);
            assert!(state.scale_dt.x > 1.0);
            last = state.width;
        }
        assert_eq!(state.height, 50.0);
    }

    #[test]
    fn test_shrinking_stops_at_minimum() {
        let mut state = PlatformState::new(400.0, 50.0);
        for _ in 0..10_000 {
            state.resize(vector![-1.0, -1.0], DT, &POLICY_A);
            assert!(state.width >= 50.0);
            assert!(state.height >= 50.0);
        }
        assert_eq!(state.width, 50.0);
        assert_eq!(state.scale_dt, vector![1.0, 1.0]);
    }

    #[test]
    fn test_width_only_ignores_vertical_input() {
        let mut state = PlatformState::new(400.0, 50.0);
        state.resize(vector![1.0, 1.0], DT, &POLICY_B);
        assert_eq!(state.height, 50.0);
        assert_eq!(state.scale_dt.y, 1.0);
        assert!((state.expand_speed.x - 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_vertices_match_size() {
        let mut state = PlatformState::new(400.0, 50.0);
        state.resize(vector![1.0, -1.0], DT, &POLICY_A);
        let v = state.vertices();
        assert!((v[2].x - v[0].x - state.width).abs() < 1e-4);
        assert!((v[2].y - v[0].y - state.height).abs() < 1e-4);
        assert_eq!(v[0].x, -v[2].x);
        assert_eq!(v[0].y, -v[2].y);
    }

    fn assert_collider_matches(world: &PhysicsWorld, platform: &Platform) {
        let collider = world.get_collider(platform.collider).expect("collider");
        let polygon = collider.shape().as_convex_polygon().expect("polygon");
        assert_eq!(polygon.points().len(), 4);
        for corner in platform.state.vertices() {
            assert!(polygon
                .points()
                .iter()
                .any(|p| (*p - corner).norm() < 1e-4));
        }
    }

    #[test]
    fn test_apply_rewrites_collider_polygon() {
        let mut world = PhysicsWorld::with_gravity(vector![0.0, 0.0]);
        let config = PlatformConfig::default();
        let mut platform =
            Platform::spawn(&mut world, &config, MassModel::Recomputed).expect("spawn");

        let mut next = platform.state;
        next.resize(vector![1.0, 1.0], DT, &POLICY_A);
        platform.apply(&mut world, next).expect("apply");

        assert_eq!(platform.state, next);
        assert_collider_matches(&world, &platform);
    }

    #[test]
    fn test_rejected_size_keeps_last_valid_shape() {
        let mut world = PhysicsWorld::with_gravity(vector![0.0, 0.0]);
        let config = PlatformConfig::default();
        let mut platform =
            Platform::spawn(&mut world, &config, MassModel::Recomputed).expect("spawn");
        let floorless = ResizePolicy {
            min_size: Some(0.0),
            ..POLICY_A
        };

        let mut failures = 0;
        for _ in 0..600 {
            let mut next = platform.state;
            next.resize(vector![-1.0, -1.0], DT, &floorless);
            if platform.apply(&mut world, next).is_err() {
                failures += 1;
            }
            assert!(platform.state.width > 0.0);
            assert!(platform.state.height > 0.0);
            assert_collider_matches(&world, &platform);
        }
        assert!(failures > 0);
    }

    #[test]
    fn test_spawn_rejects_negative_size() {
        let mut world = PhysicsWorld::with_gravity(vector![0.0, 0.0]);
        let config = PlatformConfig {
            width: -400.0,
            ..PlatformConfig::default()
        };
        let result = Platform::spawn(&mut world, &config, MassModel::Recomputed);
        assert!(matches!(result, Err(SceneError::DegenerateShape { .. })));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_policy_requires_positive_floor() {
        assert!(ResizePolicy::new(ResizeAxes::Both, 100.0, 50.0).is_ok());
        assert!(matches!(
            ResizePolicy::new(ResizeAxes::Both, 100.0, 0.0),
            Err(SceneError::InvalidMinSize(_))
        ));
        assert!(ResizePolicy::new(ResizeAxes::WidthOnly, 100.0, -1.0).is_err());
        assert!(ResizePolicy::new(ResizeAxes::WidthOnly, 100.0, Real::NAN).is_err());
    }

    #[test]
    fn test_spawn_rotation_lock() {
        let mut world = PhysicsWorld::with_gravity(vector![0.0, 0.0]);
        let platform = Platform::spawn(
            &mut world,
            &PlatformConfig::default(),
            MassModel::RotationLocked,
        )
        .expect("spawn");
        let body = world.get_rigid_body(platform.body).expect("body");
        assert!(body.is_rotation_locked());
        assert_eq!(platform.mass_model, MassModel::RotationLocked);
    }
}
