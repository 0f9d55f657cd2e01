//! Built-in component variants
//!
//! Colliders ([`BoxCollider`], [`CapsuleCollider`], [`MeshCollider`]) share
//! the [`Collider`] capability; the rest are gameplay behaviours.

pub mod box_collider;
pub mod camera_follow;
pub mod capsule_collider;
pub mod collider;
pub mod collision_reaction;
pub mod mesh_collider;
pub mod movement;

pub use box_collider::BoxCollider;
pub use camera_follow::CameraFollow;
pub use capsule_collider::{CapsuleAxis, CapsuleCollider};
pub use collider::{Collider, ColliderKind};
pub use collision_reaction::CollisionReaction;
pub use mesh_collider::MeshCollider;
pub use movement::MovementController;
