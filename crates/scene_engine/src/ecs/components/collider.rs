//! Collider capability shared by the collider components

use crate::foundation::math::{Transform, Vec3};
use crate::physics::collision::Aabb;

/// Collider type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    /// [`BoxCollider`](super::BoxCollider)
    Box,
    /// Reserved; no sphere collider component exists yet
    Sphere,
    /// [`MeshCollider`](super::MeshCollider)
    Mesh,
    /// [`CapsuleCollider`](super::CapsuleCollider)
    Capsule,
}

/// World-space bounds for a collider component
///
/// Shapes are stored relative to the owning entity; the owner's transform is
/// passed in for every query.
pub trait Collider {
    /// Type discriminant
    fn kind(&self) -> ColliderKind;

    /// Triggers report overlaps but never block movement
    fn is_trigger(&self) -> bool;

    /// Bounds if the owner stood at `position`, keeping its rotation and scale
    fn bounds_at(&self, transform: &Transform, position: Vec3) -> Aabb;

    /// Bounds at the owner's current position
    fn world_bounds(&self, transform: &Transform) -> Aabb {
        self.bounds_at(transform, transform.position)
    }
}
