use super::collision::{CollisionGroups, CollisionType};
use crate::core::math::{box_vertices, moment_for_box};
use rapier2d::prelude::*;

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    mass_properties: Option<MassProperties>,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Isometry::identity(),
            mass_properties: None,
            can_sleep: true,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Isometry::identity(),
            mass_properties: None,
            can_sleep: false,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Give the body an explicit mass and moment of inertia
    ///
    /// Colliders attached to such a body should carry zero density so the
    /// body's mass properties come from here alone.
    pub fn mass_moment(mut self, mass: Real, moment: Real) -> Self {
        self.mass_properties = Some(MassProperties::new(Point::origin(), mass, moment));
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation (infinite moment of inertia)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        let mut builder = RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes);

        if let Some(mprops) = self.mass_properties {
            builder = builder.additional_mass_properties(mprops);
        }

        builder.build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    collision_type: CollisionType,
    friction: Real,
    restitution: Real,
    density: Real,
    active_hooks: ActiveHooks,
}

impl ColliderBuilder2D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: CollisionGroups::Grabbable,
            collision_type: CollisionType::DEFAULT,
            friction: 0.5,
            restitution: 0.0,
            density: 0.0,
            active_hooks: ActiveHooks::empty(),
        }
    }

    /// Create an origin-centred box from its full width and height
    ///
    /// The box is a convex polygon rather than a cuboid so its vertices can be
    /// rewritten later. Returns `None` for degenerate sizes.
    pub fn box_shape(width: Real, height: Real) -> Option<Self> {
        SharedShape::convex_polyline(box_vertices(width, height).to_vec()).map(Self::with_shape)
    }

    /// Create a line segment
    pub fn segment(a: Point<Real>, b: Point<Real>) -> Self {
        Self::with_shape(SharedShape::segment(a, b))
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Tag the collider for pre-solve handler dispatch
    pub fn collision_type(mut self, collision_type: CollisionType) -> Self {
        self.collision_type = collision_type;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Run the contact-modification hook for pairs involving this collider
    pub fn modify_contacts(mut self) -> Self {
        self.active_hooks |= ActiveHooks::MODIFY_SOLVER_CONTACTS;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .user_data(self.collision_type.to_user_data())
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
            .active_hooks(self.active_hooks)
            .build()
    }
}

/// Body and collider configurations used by the demo scenes
pub mod presets {
    use super::*;

    /// Fixed body holding the boundary walls
    pub fn static_body() -> RigidBody {
        BodyBuilder::new_fixed().build()
    }

    /// Elastic, frictional wall the pointer cannot grab
    pub fn boundary_segment(a: Point<Real>, b: Point<Real>) -> Collider {
        ColliderBuilder2D::segment(a, b)
            .collision_groups(CollisionGroups::Boundary)
            .friction(1.0)
            .restitution(1.0)
            .build()
    }

    /// Dynamic box body with mass and box inertia
    pub fn box_body(x: Real, y: Real, mass: Real, width: Real, height: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .mass_moment(mass, moment_for_box(mass, width, height))
            .build()
    }

    /// Box collider carrying a collision-type tag
    pub fn box_collider(
        width: Real,
        height: Real,
        friction: Real,
        collision_type: CollisionType,
    ) -> Option<Collider> {
        ColliderBuilder2D::box_shape(width, height).map(|builder| {
            builder
                .friction(friction)
                .restitution(0.0)
                .collision_type(collision_type)
                .build()
        })
    }
}
