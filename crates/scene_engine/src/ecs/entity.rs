//! Entity implementation
//!
//! An entity is a named object in a scene: a transform, a material, a
//! reference to shared geometry and an ordered list of components it owns
//! exclusively.

use std::sync::atomic::{AtomicU32, Ordering};

use slotmap::new_key_type;

use super::component::{Component, ComponentVariant, Contact, Owner};
use crate::assets::{GeometryHandle, GeometrySource};
use crate::foundation::math::{Transform, Vec3};
use crate::physics::registry::ColliderHandle;

new_key_type! {
    /// Entity identifier, unique within its scene and never reused
    pub struct EntityId;
}

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene identifier, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u32);

impl SceneId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw value
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Surface parameters handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base colour (RGB, 0..1)
    pub color: Vec3,
    /// Surface roughness
    pub roughness: f32,
    /// Metalness
    pub metallic: f32,
    /// Optional texture path
    pub texture: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::repeat(1.0),
            roughness: 0.5,
            metallic: 0.0,
            texture: None,
        }
    }
}

impl Material {
    /// Untextured material with a colour
    pub fn with_color(color: Vec3) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

/// A named object in a scene
#[derive(Debug)]
pub struct Entity {
    /// Display name; also used for the movement exclusion list
    pub name: String,
    /// Position, rotation (degrees) and scale
    pub transform: Transform,
    /// Render material
    pub material: Material,
    id: EntityId,
    scene: Option<SceneId>,
    geometry: Option<GeometryHandle>,
    geometry_source: Option<GeometrySource>,
    components: Vec<Component>,
}

impl Entity {
    /// Create a detached entity with an identity transform and no geometry
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            material: Material::default(),
            id: EntityId::default(),
            scene: None,
            geometry: None,
            geometry_source: None,
            components: Vec::new(),
        }
    }

    /// Builder pattern: set the transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder pattern: set the material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Builder pattern: set geometry and where it came from
    pub fn with_geometry(mut self, source: GeometrySource, geometry: GeometryHandle) -> Self {
        self.set_geometry(Some((source, geometry)));
        self
    }

    /// Builder pattern: queue a component, attached when the entity joins a scene
    pub fn with_component(mut self, component: impl Into<Component>) -> Self {
        self.components.push(component.into());
        self
    }

    /// Identifier; the null key until the entity is added to a scene
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Owning scene, if any
    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    /// Shared geometry
    pub fn geometry(&self) -> Option<&GeometryHandle> {
        self.geometry.as_ref()
    }

    /// Where the geometry came from; `None` for an entity without geometry
    pub fn geometry_source(&self) -> Option<&GeometrySource> {
        self.geometry_source.as_ref()
    }

    /// Replace the geometry, or drop it with `None`
    pub fn set_geometry(&mut self, geometry: Option<(GeometrySource, GeometryHandle)>) {
        let (source, handle) = geometry.unzip();
        self.geometry_source = source;
        self.geometry = handle;
    }

    /// Components in attachment order
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Component at `index`
    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    /// Component at `index`, mutably
    pub fn component_mut(&mut self, index: usize) -> Option<&mut Component> {
        self.components.get_mut(index)
    }

    /// First component of a built-in variant
    pub fn get<T: ComponentVariant>(&self) -> Option<&T> {
        self.components.iter().find_map(Component::get::<T>)
    }

    /// First component of a built-in variant, mutably
    pub fn get_mut<T: ComponentVariant>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(Component::get_mut::<T>)
    }

    /// First script of a concrete type
    pub fn get_script<T: 'static>(&self) -> Option<&T> {
        self.components.iter().find_map(Component::get_script::<T>)
    }

    /// First script of a concrete type, mutably
    pub fn get_script_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(Component::get_script_mut::<T>)
    }

    /// Index of the first component of a built-in variant
    pub fn index_of<T: ComponentVariant>(&self) -> Option<usize> {
        self.components.iter().position(|c| c.get::<T>().is_some())
    }

    /// Index of the first component with a serialization tag
    pub fn index_of_type(&self, type_name: &str) -> Option<usize> {
        self.components.iter().position(|c| c.type_name() == type_name)
    }

    /// The enabled collider that drives movement resolution: a capsule if
    /// there is one, else a box, else any other collider
    pub fn acting_collider(&self) -> Option<usize> {
        use super::components::ColliderKind;

        let find = |kind: Option<ColliderKind>| {
            self.components.iter().position(|c| match c.active_collider() {
                Some(collider) => kind.map_or(true, |k| collider.kind() == k),
                None => false,
            })
        };

        find(Some(ColliderKind::Capsule))
            .or_else(|| find(Some(ColliderKind::Box)))
            .or_else(|| find(None))
    }

    /// Enabled component registered under `handle`
    pub fn component_by_handle(&self, handle: ColliderHandle) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.enabled() && c.collider_handle() == Some(handle))
    }

    /// Deliver a collision to every enabled component
    pub fn notify_collision(&mut self, contact: &Contact) {
        let (mut owner, components) = self.split();
        for component in components.iter_mut() {
            component.notify(&mut owner, contact);
        }
    }

    /// Split into the owner view and the component list
    pub(crate) fn split(&mut self) -> (Owner<'_>, &mut Vec<Component>) {
        let Self {
            id,
            name,
            transform,
            material,
            geometry,
            components,
            ..
        } = self;

        (
            Owner {
                id: *id,
                name: name.as_str(),
                transform,
                material,
                geometry: geometry.as_ref(),
            },
            components,
        )
    }

    pub(crate) fn bind(&mut self, id: EntityId, scene: SceneId) {
        self.id = id;
        self.scene = Some(scene);
    }

    pub(crate) fn unbind(&mut self) {
        self.id = EntityId::default();
        self.scene = None;
    }

    pub(crate) fn push_component(&mut self, component: Component) -> usize {
        self.components.push(component);
        self.components.len() - 1
    }

    pub(crate) fn take_components(&mut self) -> Vec<Component> {
        std::mem::take(&mut self.components)
    }

    pub(crate) fn remove_component_at(&mut self, index: usize) -> Option<Component> {
        (index < self.components.len()).then(|| self.components.remove(index))
    }

    /// Field-for-field copy with duplicated, unattached components
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            name: format!("{} (Copy)", self.name),
            transform: self.transform,
            material: self.material.clone(),
            id: EntityId::default(),
            scene: None,
            geometry: self.geometry.clone(),
            geometry_source: self.geometry_source.clone(),
            components: self.components.iter().map(Component::duplicate).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{BoxCollider, CapsuleCollider, MeshCollider, MovementController};

    #[test]
    fn test_acting_collider_priority() {
        let entity = Entity::new("Player")
            .with_component(MovementController::default())
            .with_component(MeshCollider::new())
            .with_component(BoxCollider::default())
            .with_component(CapsuleCollider::default());
        assert_eq!(entity.acting_collider(), Some(3));

        let entity = Entity::new("Crate")
            .with_component(MeshCollider::new())
            .with_component(BoxCollider::default());
        assert_eq!(entity.acting_collider(), Some(1));

        let entity = Entity::new("Rock").with_component(MeshCollider::new());
        assert_eq!(entity.acting_collider(), Some(0));

        let entity = Entity::new("Ghost").with_component(MovementController::default());
        assert_eq!(entity.acting_collider(), None);
    }

    #[test]
    fn test_disabled_collider_is_not_acting() {
        let mut entity = Entity::new("Player")
            .with_component(CapsuleCollider::default())
            .with_component(BoxCollider::default());
        entity.component_mut(0).unwrap().set_enabled(false);
        assert_eq!(entity.acting_collider(), Some(1));
    }

    #[test]
    fn test_typed_lookup_returns_first_match() {
        let mut entity = Entity::new("Pair")
            .with_component(BoxCollider::new(Vec3::zeros(), Vec3::repeat(1.0)))
            .with_component(BoxCollider::new(Vec3::zeros(), Vec3::repeat(2.0)));

        assert_eq!(entity.get::<BoxCollider>().unwrap().size, Vec3::repeat(1.0));
        entity.get_mut::<BoxCollider>().unwrap().is_trigger = true;
        assert!(entity.component(0).unwrap().get::<BoxCollider>().unwrap().is_trigger);
        assert_eq!(entity.index_of::<BoxCollider>(), Some(0));
        assert_eq!(entity.index_of_type("BoxColliderComponent"), Some(0));
        assert!(entity.get::<CapsuleCollider>().is_none());
    }

    #[test]
    fn test_duplicate_names_copy() {
        let entity = Entity::new("Red Cube").with_component(BoxCollider::default());
        let copy = entity.duplicate();
        assert_eq!(copy.name, "Red Cube (Copy)");
        assert_eq!(copy.components().len(), 1);
        assert!(copy.components()[0].owner().is_none());
    }

    #[test]
    fn test_scene_ids_are_unique() {
        assert_ne!(SceneId::next(), SceneId::next());
        assert_eq!(SceneId::from_raw(7).raw(), 7);
    }
}
