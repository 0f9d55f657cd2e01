//! Scene-level tests
//!
//! These drive whole scenes through their public operations: component
//! lifecycle, movement resolution, persistence and picking.

mod lifecycle;
mod persistence;

use crate::ecs::component::{Behaviour, Contact, Owner, UpdateContext};
use crate::ecs::components::BoxCollider;
use crate::ecs::entity::Entity;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::registry::ColliderRegistry;
use crate::scene::Scene;

/// Scene with its own registry so tests never see each other's colliders
pub(super) fn test_scene() -> Scene {
    Scene::with_registry(ColliderRegistry::shared())
}

/// Entity with a unit box collider at `position`
pub(super) fn box_entity(name: &str, position: Vec3) -> Entity {
    Entity::new(name)
        .with_transform(Transform::from_position(position))
        .with_component(BoxCollider::default())
}

/// Script recording the hooks it receives
#[derive(Debug, Clone, Default)]
pub(super) struct Recorder {
    pub starts: u32,
    pub updates: u32,
    pub contacts: Vec<String>,
}

impl Behaviour for Recorder {
    fn type_name(&self) -> &'static str {
        "Recorder"
    }

    fn start(&mut self, _owner: &mut Owner<'_>) {
        self.starts += 1;
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.updates += 1;
    }

    fn on_collision(&mut self, _owner: &mut Owner<'_>, other: &Contact) {
        self.contacts.push(other.name.clone());
    }
}
