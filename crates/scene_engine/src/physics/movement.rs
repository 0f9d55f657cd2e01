//! Movement resolution against the collider registry
//!
//! A requested displacement is resolved one horizontal axis at a time, X
//! then Z. Each axis is either committed in full or rejected; there is no
//! sliding or penetration correction, and the vertical component is never
//! applied here.

use std::ops::Deref;

use slotmap::SlotMap;

use super::collision::Aabb;
use super::registry::{ColliderHandle, SharedRegistry};
use crate::config::CollisionConfig;
use crate::ecs::component::{Component, Contact};
use crate::ecs::components::{BoxCollider, Collider, ColliderKind, MeshCollider};
use crate::ecs::entity::{Entity, EntityId, SceneId};
use crate::foundation::math::{Transform, Vec3};

/// Result of resolving one displacement
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveOutcome {
    /// Displacement actually applied (y is always zero)
    pub committed: Vec3,
    /// The X step was rejected
    pub blocked_x: bool,
    /// The Z step was rejected
    pub blocked_z: bool,
}

impl MoveOutcome {
    /// Whether either axis was rejected
    pub fn blocked(&self) -> bool {
        self.blocked_x || self.blocked_z
    }
}

/// Moves a transform to a trial position for as long as the guard lives
///
/// The original position is written back when the guard drops, on every
/// exit path.
pub struct PositionOverride<'a> {
    transform: &'a mut Transform,
    saved: Vec3,
}

impl<'a> PositionOverride<'a> {
    /// Place `transform` at `position` until the guard is dropped
    pub fn new(transform: &'a mut Transform, position: Vec3) -> Self {
        let saved = transform.position;
        transform.position = position;
        Self { transform, saved }
    }
}

impl Deref for PositionOverride<'_> {
    type Target = Transform;

    fn deref(&self) -> &Transform {
        self.transform
    }
}

impl Drop for PositionOverride<'_> {
    fn drop(&mut self) {
        self.transform.position = self.saved;
    }
}

/// What the resolver needs to know about the mover for one axis
struct Attempt {
    candidate: Aabb,
    next: Vec3,
    handle: Option<ColliderHandle>,
    kind: ColliderKind,
    name: String,
}

/// Per-axis movement resolver for one scene
pub struct MovementResolver<'a> {
    scene: SceneId,
    entities: &'a mut SlotMap<EntityId, Entity>,
    registry: &'a SharedRegistry,
    config: &'a CollisionConfig,
}

impl<'a> MovementResolver<'a> {
    /// Create a resolver over a scene's entities
    pub fn new(
        scene: SceneId,
        entities: &'a mut SlotMap<EntityId, Entity>,
        registry: &'a SharedRegistry,
        config: &'a CollisionConfig,
    ) -> Self {
        Self {
            scene,
            entities,
            registry,
            config,
        }
    }

    /// Move `mover` by the horizontal part of `delta`
    ///
    /// Without an enabled collider the move is unconditional. Otherwise each
    /// axis is tested against every registered collider in the scene;
    /// confirmed overlaps notify both entities, and a non-trigger overlap
    /// rejects that axis.
    pub fn resolve(&mut self, mover: EntityId, delta: Vec3) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();

        let Some(entity) = self.entities.get(mover) else {
            log::warn!("MovementResolver: unknown mover {:?}", mover);
            return outcome;
        };
        let acting = entity.acting_collider();

        for axis in [0, 2] {
            let step = delta[axis];
            if step == 0.0 {
                continue;
            }

            let blocked = match acting {
                Some(index) => self.axis_blocked(mover, index, axis, step),
                None => false,
            };

            if blocked {
                if axis == 0 {
                    outcome.blocked_x = true;
                } else {
                    outcome.blocked_z = true;
                }
            } else if let Some(entity) = self.entities.get_mut(mover) {
                entity.transform.position[axis] += step;
                outcome.committed[axis] = step;
            }
        }

        outcome
    }

    fn attempt(&self, mover: EntityId, acting: usize, axis: usize, step: f32) -> Option<Attempt> {
        let entity = self.entities.get(mover)?;
        let component = entity.component(acting)?;
        let collider = component.active_collider()?;

        let mut next = entity.transform.position;
        next[axis] += step;

        let mut candidate = collider.bounds_at(&entity.transform, next);
        candidate.min.y = candidate.min.y.max(next.y + self.config.floor_clearance);

        Some(Attempt {
            candidate,
            next,
            handle: component.collider_handle(),
            kind: collider.kind(),
            name: entity.name.clone(),
        })
    }

    fn axis_blocked(&mut self, mover: EntityId, acting: usize, axis: usize, step: f32) -> bool {
        let Some(attempt) = self.attempt(mover, acting, axis, step) else {
            return false;
        };

        let handles = self.registry.borrow().handles();
        for handle in handles {
            let record = self.registry.borrow().get(handle).copied();
            let Some(record) = record else {
                continue;
            };
            if record.scene != self.scene || record.entity == mover || attempt.handle == Some(handle) {
                continue;
            }

            let Some(other) = self.entities.get(record.entity) else {
                log::warn!(
                    "MovementResolver: collider {:?} refers to missing entity {:?}",
                    handle,
                    record.entity
                );
                continue;
            };
            if other.name == self.config.ignored_entity_name {
                continue;
            }

            let Some(collider) = other.component_by_handle(handle).and_then(Component::active_collider) else {
                continue;
            };
            if !attempt.candidate.overlaps(&collider.world_bounds(&other.transform)) {
                continue;
            }

            let is_trigger = collider.is_trigger();
            let precise = collider.kind() == ColliderKind::Mesh
                && attempt.kind == ColliderKind::Box
                && self.config.precise_mesh_tests;
            let other_name = other.name.clone();

            if precise && !self.precise_hit(mover, acting, attempt.next, record.entity, handle) {
                continue;
            }

            self.notify(mover, &attempt.name, record.entity, &other_name);

            if !is_trigger {
                log::debug!(
                    "Movement: '{}' blocked on {} by '{}'",
                    attempt.name,
                    if axis == 0 { "X" } else { "Z" },
                    other_name
                );
                return true;
            }
        }

        false
    }

    /// Box-versus-triangles test with the mover placed at `next`
    fn precise_hit(
        &mut self,
        mover: EntityId,
        acting: usize,
        next: Vec3,
        other: EntityId,
        handle: ColliderHandle,
    ) -> bool {
        let box_bounds = {
            let Some(entity) = self.entities.get_mut(mover) else {
                return false;
            };
            let Some(collider) = entity.component(acting).and_then(|c| c.get::<BoxCollider>()).cloned() else {
                return false;
            };
            let moved = PositionOverride::new(&mut entity.transform, next);
            collider.world_bounds(&moved)
        };

        let Some(other) = self.entities.get(other) else {
            return false;
        };
        other
            .component_by_handle(handle)
            .and_then(|c| c.get::<MeshCollider>())
            .map_or(false, |mesh| mesh.intersects_box(&other.transform, &box_bounds))
    }

    fn notify(&mut self, mover: EntityId, mover_name: &str, other: EntityId, other_name: &str) {
        if let Some(entity) = self.entities.get_mut(mover) {
            entity.notify_collision(&Contact {
                entity: other,
                name: other_name.to_string(),
            });
        }
        if let Some(entity) = self.entities.get_mut(other) {
            entity.notify_collision(&Contact {
                entity: mover,
                name: mover_name.to_string(),
            });
        }
    }
}
