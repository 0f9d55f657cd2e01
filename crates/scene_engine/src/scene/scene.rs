//! Scene: the entity container and per-frame driver
//!
//! A scene owns its entities (in insertion order), the active camera and
//! the editor selection. It is the only place components are attached or
//! detached, so it is also where collider registry records are created and
//! removed.

use std::path::Path;

use slotmap::SlotMap;
use thiserror::Error;

use super::camera::Camera;
use super::persistence::{parse_scene, write_scene, SceneFormatError};
use crate::assets::GeometryProvider;
use crate::config::{CollisionConfig, DebugConfig, EngineConfig};
use crate::debug::DebugDraw;
use crate::ecs::component::{Component, ComponentVariant, UpdateContext};
use crate::ecs::entity::{Entity, EntityId, SceneId};
use crate::ecs::factory::ComponentFactory;
use crate::ecs::inspector::Inspector;
use crate::foundation::math::{transform_point, Vec3, Vec4};
use crate::input::InputState;
use crate::physics::collision::{Aabb, Ray};
use crate::physics::movement::{MoveOutcome, MovementResolver};
use crate::physics::registry::{ColliderRecord, ColliderRegistry, SharedRegistry};

/// Errors from scene operations
#[derive(Error, Debug)]
pub enum SceneError {
    /// Reading or writing a scene file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scene text is malformed
    #[error("Scene format error: {0}")]
    Format(#[from] SceneFormatError),

    /// No entity with this id in the scene
    #[error("Unknown entity: {0:?}")]
    UnknownEntity(EntityId),

    /// The entity has no component at this index
    #[error("Entity {entity:?} has no component at index {index}")]
    ComponentIndex {
        /// Entity that was addressed
        entity: EntityId,
        /// Out-of-range index
        index: usize,
    },
}

/// A set of entities with a camera and a selection cursor
#[derive(Debug)]
pub struct Scene {
    id: SceneId,
    entities: SlotMap<EntityId, Entity>,
    order: Vec<EntityId>,
    selected: Option<EntityId>,
    camera: Camera,
    registry: SharedRegistry,
    collision: CollisionConfig,
    debug: DebugConfig,
}

impl Scene {
    /// Create an empty scene using the process-wide collider registry
    pub fn new() -> Self {
        Self::with_registry(ColliderRegistry::global())
    }

    /// Create an empty scene recording its colliders in `registry`
    pub fn with_registry(registry: SharedRegistry) -> Self {
        let id = SceneId::next();
        log::debug!("Scene {:?} created", id);
        Self {
            id,
            entities: SlotMap::with_key(),
            order: Vec::new(),
            selected: None,
            camera: Camera::default(),
            registry,
            collision: CollisionConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Builder pattern: apply collision and debug settings
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.collision = config.collision.clone();
        self.debug = config.debug.clone();
        self
    }

    /// Scene identifier
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Collider registry this scene records into
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Active camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Active camera, mutably
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Collision settings in use
    pub fn collision_config(&self) -> &CollisionConfig {
        &self.collision
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the scene has no entities
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entity ids in insertion order
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().filter_map(move |&id| self.entities.get(id))
    }

    /// Look up an entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Look up an entity mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// First entity with this name
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities().find(|e| e.name == name).map(Entity::id)
    }

    // ---- Entities ----

    /// Take ownership of an entity and attach its queued components
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let components = entity.take_components();
        let scene = self.id;
        let id = self.entities.insert_with_key(|id| {
            entity.bind(id, scene);
            entity
        });
        self.order.push(id);

        for component in components {
            self.attach(id, component);
        }

        log::debug!("Scene {:?}: added entity {:?}", self.id, id);
        id
    }

    /// Remove an entity, releasing its collider records
    ///
    /// Clears the selection if it pointed at the entity. The returned entity
    /// is detached from the scene.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.remove(id)?;
        self.order.retain(|&e| e != id);
        if self.selected == Some(id) {
            self.selected = None;
        }

        for index in 0..entity.components().len() {
            if let Some(handle) = entity.component_mut(index).and_then(Component::detach) {
                self.registry.borrow_mut().unregister(handle);
            }
        }
        entity.unbind();

        log::debug!("Scene {:?}: removed '{}'", self.id, entity.name);
        Some(entity)
    }

    /// Add a copy of an entity, its name suffixed with " (Copy)"
    ///
    /// Every component is duplicated by variant; collider copies get their
    /// own registry records.
    pub fn duplicate_entity(&mut self, id: EntityId) -> Option<EntityId> {
        let copy = self.entities.get(id)?.duplicate();
        Some(self.add_entity(copy))
    }

    /// Remove every entity
    pub fn clear(&mut self) {
        for id in self.order.clone() {
            self.remove_entity(id);
        }
    }

    // ---- Components ----

    /// Attach a component, returning its index on the entity
    ///
    /// Sets the owner, registers collider variants and runs the start hook.
    pub fn add_component(&mut self, id: EntityId, component: impl Into<Component>) -> Result<usize, SceneError> {
        self.attach(id, component.into()).ok_or(SceneError::UnknownEntity(id))
    }

    /// Attach a component constructed by name
    ///
    /// Returns `Ok(None)` when the factory does not know the name.
    pub fn add_component_by_name(
        &mut self,
        id: EntityId,
        name: &str,
        factory: &ComponentFactory,
    ) -> Result<Option<usize>, SceneError> {
        if !self.entities.contains_key(id) {
            return Err(SceneError::UnknownEntity(id));
        }
        let Some(component) = factory.create(name) else {
            log::warn!("Scene: no component named '{}'", name);
            return Ok(None);
        };
        self.add_component(id, component).map(Some)
    }

    fn attach(&mut self, id: EntityId, mut component: Component) -> Option<usize> {
        let entity = self.entities.get_mut(id)?;

        let handle = component.as_collider().map(|collider| {
            self.registry.borrow_mut().register(ColliderRecord {
                scene: self.id,
                entity: id,
                kind: collider.kind(),
            })
        });
        component.attach(id, handle);

        let index = entity.push_component(component);
        let (mut owner, components) = entity.split();
        if let Some(component) = components.get_mut(index) {
            component.start(&mut owner);
        }
        Some(index)
    }

    /// First component of a built-in variant on an entity
    pub fn get<T: ComponentVariant>(&self, id: EntityId) -> Option<&T> {
        self.entities.get(id)?.get::<T>()
    }

    /// First component of a built-in variant on an entity, mutably
    pub fn get_mut<T: ComponentVariant>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.get_mut(id)?.get_mut::<T>()
    }

    /// Detach the component at `index`, releasing its collider record
    pub fn remove_component(&mut self, id: EntityId, index: usize) -> Result<Component, SceneError> {
        let entity = self.entities.get_mut(id).ok_or(SceneError::UnknownEntity(id))?;
        let mut component = entity
            .remove_component_at(index)
            .ok_or(SceneError::ComponentIndex { entity: id, index })?;

        if let Some(handle) = component.detach() {
            self.registry.borrow_mut().unregister(handle);
        }
        Ok(component)
    }

    /// Detach the first component of a built-in variant
    pub fn remove_component_of<T: ComponentVariant>(&mut self, id: EntityId) -> Option<Component> {
        let index = self.entities.get(id)?.index_of::<T>()?;
        self.remove_component(id, index).ok()
    }

    /// Enable or disable the component at `index`
    pub fn set_component_enabled(&mut self, id: EntityId, index: usize, enabled: bool) -> Result<(), SceneError> {
        let entity = self.entities.get_mut(id).ok_or(SceneError::UnknownEntity(id))?;
        let component = entity
            .component_mut(index)
            .ok_or(SceneError::ComponentIndex { entity: id, index })?;
        component.set_enabled(enabled);
        Ok(())
    }

    // ---- Selection ----

    /// Select an entity, or clear the selection with `None`
    ///
    /// Selecting an id that is not in the scene clears the selection.
    pub fn select(&mut self, id: Option<EntityId>) {
        self.selected = id.filter(|id| self.entities.contains_key(*id));
    }

    /// Currently selected entity
    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// Remove the selected entity
    pub fn delete_selected(&mut self) -> Option<Entity> {
        let id = self.selected?;
        self.remove_entity(id)
    }

    // ---- Frame ----

    /// Run one frame
    ///
    /// Entities update in insertion order and components in attachment
    /// order. A movement request raised by a component is resolved before
    /// the next component runs.
    pub fn tick(&mut self, delta_time: f32, input: &InputState) {
        for id in self.order.clone() {
            let count = match self.entities.get(id) {
                Some(entity) => entity.components().len(),
                None => continue,
            };

            for index in 0..count {
                let request = {
                    let Some(entity) = self.entities.get_mut(id) else {
                        break;
                    };
                    let (owner, components) = entity.split();
                    let Some(component) = components.get_mut(index) else {
                        break;
                    };
                    let mut ctx = UpdateContext::new(delta_time, input, owner, &mut self.camera);
                    component.update(&mut ctx);
                    ctx.take_move_request()
                };

                if let Some(delta) = request {
                    self.move_entity(id, delta);
                }
            }
        }
    }

    /// Move an entity horizontally, resolving collisions per axis
    pub fn move_entity(&mut self, id: EntityId, delta: Vec3) -> MoveOutcome {
        MovementResolver::new(self.id, &mut self.entities, &self.registry, &self.collision).resolve(id, delta)
    }

    /// Nearest entity hit by a world-space ray
    ///
    /// Each entity is treated as the unit box in its local space; hits are
    /// compared by world distance from the ray origin.
    pub fn pick(&self, ray: &Ray) -> Option<EntityId> {
        let mut nearest: Option<(EntityId, f32)> = None;

        for entity in self.entities() {
            let model = entity.transform.to_matrix();
            let Some(inverse) = model.try_inverse() else {
                log::trace!("Scene: skipping '{}' in pick, singular transform", entity.name);
                continue;
            };

            let direction = inverse * Vec4::new(ray.direction.x, ray.direction.y, ray.direction.z, 0.0);
            let local = Ray {
                origin: transform_point(&inverse, ray.origin),
                direction: direction.xyz(),
            };
            let Some(t) = Aabb::unit().intersect_ray(&local) else {
                continue;
            };

            let distance = (transform_point(&model, local.point_at(t)) - ray.origin).norm();
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((entity.id(), distance));
            }
        }

        nearest.map(|(id, _)| id)
    }

    /// Collect gizmos from every enabled component
    pub fn draw_gizmos(&self, draw: &mut DebugDraw) {
        if !self.debug.draw_colliders {
            return;
        }
        for entity in self.entities() {
            for component in entity.components() {
                component.draw_gizmos(&entity.transform, draw);
            }
        }
    }

    // ---- Editor ----

    /// Show one component in an inspector: its enabled flag, then its own
    /// properties
    pub fn inspect(&mut self, id: EntityId, index: usize, ui: &mut dyn Inspector) -> Result<(), SceneError> {
        let entity = self.entities.get_mut(id).ok_or(SceneError::UnknownEntity(id))?;
        let component = entity
            .component_mut(index)
            .ok_or(SceneError::ComponentIndex { entity: id, index })?;

        ui.label(component.display_name());
        let mut enabled = component.enabled();
        if ui.checkbox("Enabled", &mut enabled) {
            component.set_enabled(enabled);
        }
        component.kind_mut().behaviour_mut().inspect(ui);
        Ok(())
    }

    /// Show an entity's transform and material, then every component
    pub fn inspect_entity(&mut self, id: EntityId, ui: &mut dyn Inspector) -> Result<(), SceneError> {
        let entity = self.entities.get_mut(id).ok_or(SceneError::UnknownEntity(id))?;

        ui.label(&entity.name);
        ui.drag_vec3("Position", &mut entity.transform.position, 0.1);
        ui.drag_vec3("Rotation", &mut entity.transform.rotation, 1.0);
        ui.drag_vec3("Scale", &mut entity.transform.scale, 0.1);
        ui.color_edit("Color", &mut entity.material.color);
        ui.drag_float("Roughness", &mut entity.material.roughness, 0.01, 0.0, 1.0);
        ui.drag_float("Metallic", &mut entity.material.metallic, 0.01, 0.0, 1.0);

        let count = entity.components().len();
        for index in 0..count {
            self.inspect(id, index, ui)?;
        }
        Ok(())
    }

    // ---- Persistence ----

    /// Serialize every entity in order
    pub fn save_to_string(&self) -> String {
        let entities: Vec<&Entity> = self.entities().collect();
        write_scene(entities.iter().copied())
    }

    /// Write the scene to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        std::fs::write(path, self.save_to_string())?;
        log::info!("Scene saved to {} ({} entities)", path.display(), self.len());
        Ok(())
    }

    /// Replace the scene's contents with parsed scene text
    ///
    /// The text is parsed in full before anything is removed, so a format
    /// error leaves the scene untouched. Returns the number of entities
    /// loaded.
    pub fn load_from_str(
        &mut self,
        text: &str,
        geometry: &mut dyn GeometryProvider,
        factory: &ComponentFactory,
    ) -> Result<usize, SceneError> {
        let records = parse_scene(text, factory)?;
        self.clear();

        let count = records.len();
        for record in records {
            let mut entity = Entity::new(record.name)
                .with_transform(record.transform)
                .with_material(record.material);
            entity.set_geometry(record.source.map(|source| {
                let handle = geometry.resolve(&source);
                (source, handle)
            }));
            for component in record.components {
                entity = entity.with_component(component);
            }
            self.add_entity(entity);
        }

        log::info!("Scene {:?}: loaded {} entities", self.id, count);
        Ok(count)
    }

    /// Replace the scene's contents with a scene file
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        geometry: &mut dyn GeometryProvider,
        factory: &ComponentFactory,
    ) -> Result<usize, SceneError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        self.load_from_str(&text, geometry, factory)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.registry.try_borrow_mut() {
            let removed = registry.unregister_scene(self.id);
            log::debug!("Scene {:?} dropped, released {} colliders", self.id, removed);
        } else {
            log::warn!("Scene {:?} dropped while the collider registry was borrowed", self.id);
        }
    }
}
