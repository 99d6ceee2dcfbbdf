// Physics system using rapier2d

pub mod body;
mod collision;
mod debug;
mod world;

pub use collision::{Arbiter, CollisionGroups, CollisionPair, CollisionType, PairHandler, PreSolve};
pub use debug::DebugRenderer;
pub use world::{ColliderHandle, PhysicsWorld, RigidBodyHandle};

// Re-export commonly used rapier types for convenience
#[allow(unused_imports)]
pub use rapier2d::prelude::{point, vector, Point, Real, Vector};
