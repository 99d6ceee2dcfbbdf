use rapier2d::prelude::*;

/// Collision groups for filtering pointer queries
///
/// Every collider collides with every other one; the groups only decide what
/// the mouse grab is allowed to pick up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Static scenery such as the boundary walls
    Boundary = 0b0000_0001,

    /// Bodies the pointer may grab and drag
    Grabbable = 0b0000_0010,
}

impl CollisionGroups {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);
        InteractionGroups::new(memberships, Group::ALL)
    }

    /// Groups for a point query that only sees grabbable colliders
    pub fn grab_query() -> InteractionGroups {
        InteractionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(CollisionGroups::Grabbable as u32),
        )
    }
}

/// Integer tag selecting which pre-solve handler applies to a contact pair
///
/// Stored in the collider's `user_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionType(pub u32);

impl CollisionType {
    pub const DEFAULT: Self = Self(0);
    pub const PLATFORM: Self = Self(1);

    /// Read the tag stored on a collider
    pub fn of(collider: &Collider) -> Self {
        Self(collider.user_data as u32)
    }

    pub fn to_user_data(self) -> u128 {
        self.0 as u128
    }
}

/// View over one colliding pair during a pre-solve call
///
/// "First" always refers to the collider carrying the first tag of the
/// handler's pair, whatever order the narrow phase reported them in.
pub struct Arbiter<'a, 'b> {
    context: &'a mut ContactModificationContext<'b>,
    swapped: bool,
}

impl<'a, 'b> Arbiter<'a, 'b> {
    /// Rigid body owning the first collider
    pub fn first_body(&self) -> Option<&'b RigidBody> {
        let handle = if self.swapped {
            self.context.rigid_body2
        } else {
            self.context.rigid_body1
        };
        handle.and_then(|h| self.context.bodies.get(h))
    }

    /// Number of contact points the solver will process
    pub fn count(&self) -> usize {
        self.context.solver_contacts.len()
    }

    /// World-space position of contact `index`
    pub fn point(&self, index: usize) -> Option<Point<Real>> {
        self.context.solver_contacts.get(index).map(|c| c.point)
    }

    /// Set the velocity of the first collider's surface at contact `index`
    pub fn set_surface_velocity(&mut self, index: usize, velocity: Vector<Real>) {
        let velocity = if self.swapped { -velocity } else { velocity };
        if let Some(contact) = self.context.solver_contacts.get_mut(index) {
            contact.tangent_velocity = velocity;
        }
    }
}

/// Hook run before the constraint solver for a tagged pair of colliders
pub trait PreSolve: Send + Sync {
    fn pre_solve(&self, arbiter: &mut Arbiter<'_, '_>);
}

/// Two collision-type tags a handler is registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub first: CollisionType,
    pub second: CollisionType,
}

impl CollisionPair {
    pub fn new(first: CollisionType, second: CollisionType) -> Self {
        Self { first, second }
    }

    /// Whether the tags match this pair, and if so whether they arrive reversed
    pub fn matches(&self, a: CollisionType, b: CollisionType) -> Option<bool> {
        if a == self.first && b == self.second {
            Some(false)
        } else if a == self.second && b == self.first {
            Some(true)
        } else {
            None
        }
    }
}

/// Dispatches rapier's contact-modification hook to a `PreSolve` handler
pub struct PairHandler<H> {
    pair: CollisionPair,
    handler: H,
}

impl<H: PreSolve> PairHandler<H> {
    pub fn new(pair: CollisionPair, handler: H) -> Self {
        Self { pair, handler }
    }
}

impl<H: PreSolve> PhysicsHooks for PairHandler<H> {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let (Some(c1), Some(c2)) = (
            context.colliders.get(context.collider1),
            context.colliders.get(context.collider2),
        ) else {
            return;
        };

        let Some(swapped) = self
            .pair
            .matches(CollisionType::of(c1), CollisionType::of(c2))
        else {
            return;
        };

        let mut arbiter = Arbiter { context, swapped };
        self.handler.pre_solve(&mut arbiter);
    }
}
