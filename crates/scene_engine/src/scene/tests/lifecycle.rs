//! Component attachment, registry bookkeeping and selection

use std::rc::Rc;

use super::{box_entity, test_scene, Recorder};
use crate::assets::{GeometryLibrary, GeometryProvider, GeometrySource, PrimitiveKind};
use crate::config::EngineConfig;
use crate::debug::DebugDraw;
use crate::ecs::component::Component;
use crate::ecs::components::{
    BoxCollider, CameraFollow, CapsuleCollider, CollisionReaction, MeshCollider, MovementController,
};
use crate::ecs::entity::{Entity, Material};
use crate::ecs::factory::ComponentFactory;
use crate::ecs::inspector::{PropertySheet, PropertyValue};
use crate::foundation::math::{Transform, Vec3};
use crate::input::{InputState, KeyCode};
use crate::physics::registry::ColliderRegistry;
use crate::scene::{Scene, SceneError};
use approx::assert_relative_eq;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_component_sets_owner_and_starts_once() {
        let mut scene = test_scene();
        let id = scene.add_entity(Entity::new("Actor"));

        let index = scene.add_component(id, Component::script(Recorder::default())).unwrap();
        let component = scene.entity(id).unwrap().component(index).unwrap();
        assert_eq!(component.owner(), Some(id));
        assert!(component.is_started());

        let input = InputState::new();
        for _ in 0..3 {
            scene.tick(0.016, &input);
        }

        let recorder = scene.entity(id).unwrap().get_script::<Recorder>().unwrap();
        assert_eq!(recorder.starts, 1);
        assert_eq!(recorder.updates, 3);
    }

    #[test]
    fn test_queued_components_attach_with_entity() {
        let mut scene = test_scene();
        let id = scene.add_entity(
            Entity::new("Queued")
                .with_component(Component::script(Recorder::default()))
                .with_component(BoxCollider::default()),
        );

        let entity = scene.entity(id).unwrap();
        assert_eq!(entity.id(), id);
        assert_eq!(entity.scene(), Some(scene.id()));
        for component in entity.components() {
            assert_eq!(component.owner(), Some(id));
            assert!(component.is_started());
        }
        assert!(entity.components()[1].collider_handle().is_some());
        assert_eq!(entity.get_script::<Recorder>().unwrap().starts, 1);
    }

    #[test]
    fn test_registry_construction_destruction_symmetry() {
        let mut scene = test_scene();
        scene.add_entity(box_entity("Anchor", Vec3::zeros()));
        let before = scene.registry().borrow().len();

        let ids: Vec<_> = (0..5)
            .map(|i| scene.add_entity(box_entity("Crate", Vec3::new(i as f32 * 3.0, 0.0, 0.0))))
            .collect();
        let capsule_holder = ids[0];
        scene.add_component(capsule_holder, CapsuleCollider::default()).unwrap();
        assert_eq!(scene.registry().borrow().len(), before + 6);

        scene.remove_component_of::<CapsuleCollider>(capsule_holder).unwrap();
        assert_eq!(scene.registry().borrow().len(), before + 5);

        for id in ids {
            assert!(scene.remove_entity(id).is_some());
        }
        assert_eq!(scene.registry().borrow().len(), before);
    }

    #[test]
    fn test_non_collider_components_are_not_registered() {
        let mut scene = test_scene();
        let id = scene.add_entity(Entity::new("Player"));
        scene.add_component(id, MovementController::default()).unwrap();
        scene.add_component(id, CameraFollow::default()).unwrap();
        assert!(scene.registry().borrow().is_empty());
    }

    #[test]
    fn test_duplicate_registers_independent_collider() {
        let mut scene = test_scene();
        let id = scene.add_entity(box_entity("Red Cube", Vec3::new(-2.0, 0.5, 0.0)));
        scene.set_component_enabled(id, 0, false).unwrap();

        let copy = scene.duplicate_entity(id).unwrap();
        assert_ne!(copy, id);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.registry().borrow().len(), 2);

        let original = scene.entity(id).unwrap();
        let duplicate = scene.entity(copy).unwrap();
        assert_eq!(duplicate.name, "Red Cube (Copy)");
        assert_relative_eq!(duplicate.transform.position, original.transform.position);
        assert_ne!(
            duplicate.components()[0].collider_handle(),
            original.components()[0].collider_handle()
        );
        assert_eq!(duplicate.components()[0].owner(), Some(copy));
        assert!(!duplicate.components()[0].enabled());

        scene.remove_entity(id);
        assert_eq!(scene.registry().borrow().len(), 1);
    }

    #[test]
    fn test_remove_component_by_index() {
        let mut scene = test_scene();
        let id = scene.add_entity(box_entity("Crate", Vec3::zeros()));

        let removed = scene.remove_component(id, 0).unwrap();
        assert!(removed.owner().is_none());
        assert!(removed.collider_handle().is_none());
        assert!(scene.registry().borrow().is_empty());

        assert!(matches!(
            scene.remove_component(id, 0),
            Err(SceneError::ComponentIndex { index: 0, .. })
        ));
    }

    #[test]
    fn test_operations_on_unknown_entity() {
        let mut scene = test_scene();
        let id = scene.add_entity(Entity::new("Gone"));
        scene.remove_entity(id);

        assert!(matches!(
            scene.add_component(id, BoxCollider::default()),
            Err(SceneError::UnknownEntity(_))
        ));
        assert!(matches!(
            scene.set_component_enabled(id, 0, true),
            Err(SceneError::UnknownEntity(_))
        ));
        assert!(scene.get::<BoxCollider>(id).is_none());
        assert!(scene.duplicate_entity(id).is_none());
        assert!(scene.remove_entity(id).is_none());
    }

    #[test]
    fn test_add_component_by_name() {
        let mut scene = test_scene();
        let factory = ComponentFactory::with_builtins();
        let id = scene.add_entity(Entity::new("Player"));

        let index = scene.add_component_by_name(id, "PlayerController", &factory).unwrap();
        assert_eq!(index, Some(0));
        assert_eq!(scene.get::<MovementController>(id).unwrap().move_speed, 5.0);

        assert_eq!(scene.add_component_by_name(id, "Jetpack", &factory).unwrap(), None);
        assert_eq!(scene.entity(id).unwrap().components().len(), 1);
    }

    #[test]
    fn test_typed_get_mut() {
        let mut scene = test_scene();
        let id = scene.add_entity(box_entity("Crate", Vec3::zeros()));
        scene.get_mut::<BoxCollider>(id).unwrap().size = Vec3::repeat(3.0);
        assert_eq!(scene.get::<BoxCollider>(id).unwrap().size, Vec3::repeat(3.0));
    }

    #[test]
    fn test_disabled_component_is_not_updated() {
        let mut scene = test_scene();
        let id = scene.add_entity(Entity::new("Actor").with_component(Component::script(Recorder::default())));
        scene.set_component_enabled(id, 0, false).unwrap();

        scene.tick(0.016, &InputState::new());
        assert_eq!(scene.entity(id).unwrap().get_script::<Recorder>().unwrap().updates, 0);

        scene.set_component_enabled(id, 0, true).unwrap();
        scene.tick(0.016, &InputState::new());
        assert_eq!(scene.entity(id).unwrap().get_script::<Recorder>().unwrap().updates, 1);
    }

    #[test]
    fn test_mesh_collider_adopts_owner_geometry() {
        let mut library = GeometryLibrary::new();
        let source = GeometrySource::Builtin(PrimitiveKind::Pyramid);
        let geometry = library.resolve(&source);

        let mut scene = test_scene();
        let id = scene.add_entity(Entity::new("Pyramid").with_geometry(source, Rc::clone(&geometry)));
        scene.add_component(id, MeshCollider::new()).unwrap();

        let mesh = scene.get::<MeshCollider>(id).unwrap();
        assert!(Rc::ptr_eq(mesh.geometry().unwrap(), &geometry));
    }

    #[test]
    fn test_remove_entity_clears_selection() {
        let mut scene = test_scene();
        let a = scene.add_entity(Entity::new("A"));
        let b = scene.add_entity(Entity::new("B"));

        scene.select(Some(a));
        scene.remove_entity(b);
        assert_eq!(scene.selected(), Some(a));

        scene.remove_entity(a);
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn test_delete_selected() {
        let mut scene = test_scene();
        let id = scene.add_entity(box_entity("Crate", Vec3::zeros()));
        assert!(scene.delete_selected().is_none());

        scene.select(Some(id));
        let removed = scene.delete_selected().unwrap();
        assert_eq!(removed.name, "Crate");
        assert!(removed.scene().is_none());
        assert!(scene.is_empty());
        assert!(scene.registry().borrow().is_empty());
    }

    #[test]
    fn test_select_missing_entity_clears_selection() {
        let mut scene = test_scene();
        let id = scene.add_entity(Entity::new("A"));
        scene.select(Some(id));
        scene.remove_entity(id);
        scene.select(Some(id));
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn test_dropping_scene_releases_its_records() {
        let registry = ColliderRegistry::shared();
        let mut kept = Scene::with_registry(Rc::clone(&registry));
        kept.add_entity(box_entity("Kept", Vec3::zeros()));

        {
            let mut dropped = Scene::with_registry(Rc::clone(&registry));
            dropped.add_entity(box_entity("A", Vec3::zeros()));
            dropped.add_entity(box_entity("B", Vec3::zeros()));
            assert_eq!(registry.borrow().len(), 3);
        }

        assert_eq!(registry.borrow().len(), 1);
    }

    #[test]
    fn test_entities_iterate_in_insertion_order() {
        let mut scene = test_scene();
        for name in ["C", "A", "B"] {
            scene.add_entity(Entity::new(name));
        }
        let names: Vec<_> = scene.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(scene.find_by_name("A"), Some(scene.entity_ids()[1]));
    }

    #[test]
    fn test_movement_controller_moves_with_input() {
        let mut scene = test_scene();
        let id = scene.add_entity(
            Entity::new("Player")
                .with_transform(Transform::from_position(Vec3::new(0.0, 0.5, 0.0)))
                .with_component(MovementController::default()),
        );

        scene.tick(0.1, &InputState::with_keys(&[KeyCode::D]));
        assert_relative_eq!(scene.entity(id).unwrap().transform.position, Vec3::new(0.5, 0.5, 0.0), epsilon = 1e-5);

        scene.tick(0.1, &InputState::new());
        assert_relative_eq!(scene.entity(id).unwrap().transform.position.x, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_camera_follow_tracks_owner() {
        let mut scene = test_scene();
        let mut follow = CameraFollow::default();
        follow.smooth_factor = 1.0;
        let id = scene.add_entity(
            Entity::new("Player")
                .with_transform(Transform::from_position(Vec3::new(3.0, 0.0, -2.0)))
                .with_component(follow),
        );

        scene.tick(0.016, &InputState::new());
        let position = scene.entity(id).unwrap().transform.position;
        assert_relative_eq!(scene.camera().position, position + Vec3::new(0.0, 5.0, 10.0), epsilon = 1e-5);
        assert_relative_eq!(scene.camera().target, position);
    }

    #[test]
    fn test_collision_reaction_flashes_and_restores() {
        let mut scene = test_scene();
        let player = scene.add_entity(
            Entity::new("Player")
                .with_material(Material::with_color(Vec3::new(0.2, 0.4, 0.8)))
                .with_transform(Transform::from_position(Vec3::new(0.0, 0.5, 0.0)))
                .with_component(MovementController::default())
                .with_component(BoxCollider::default())
                .with_component(CollisionReaction::default()),
        );
        scene.add_entity(box_entity("Wall", Vec3::new(1.05, 0.5, 0.0)));

        scene.tick(0.016, &InputState::with_keys(&[KeyCode::D]));
        let entity = scene.entity(player).unwrap();
        assert_relative_eq!(entity.transform.position.x, 0.0);
        assert_relative_eq!(entity.material.color, Vec3::new(1.0, 0.0, 0.0));
        assert!(entity.get::<CollisionReaction>().unwrap().is_flashing());

        scene.tick(0.2, &InputState::new());
        let entity = scene.entity(player).unwrap();
        assert_relative_eq!(entity.material.color, Vec3::new(0.2, 0.4, 0.8));
        assert!(!entity.get::<CollisionReaction>().unwrap().is_flashing());
    }

    #[test]
    fn test_draw_gizmos_respects_config() {
        let mut scene = test_scene();
        scene.add_entity(box_entity("A", Vec3::zeros()));
        let disabled = scene.add_entity(box_entity("B", Vec3::new(3.0, 0.0, 0.0)));

        let mut draw = DebugDraw::new();
        scene.draw_gizmos(&mut draw);
        let both = draw.shape_count();
        assert!(both > 0);

        draw.clear();
        scene.set_component_enabled(disabled, 0, false).unwrap();
        scene.draw_gizmos(&mut draw);
        assert_eq!(draw.shape_count() * 2, both);

        let mut config = EngineConfig::default();
        config.debug.draw_colliders = false;
        let mut quiet = Scene::with_registry(ColliderRegistry::shared()).with_config(&config);
        quiet.add_entity(box_entity("C", Vec3::zeros()));
        draw.clear();
        quiet.draw_gizmos(&mut draw);
        assert_eq!(draw.shape_count(), 0);
    }

    #[test]
    fn test_inspect_applies_edits() {
        let mut scene = test_scene();
        let id = scene.add_entity(box_entity("Crate", Vec3::zeros()));

        let mut sheet = PropertySheet::new();
        sheet.queue_edit("Enabled", PropertyValue::Bool(false));
        sheet.queue_edit("Size", PropertyValue::Vec3(Vec3::new(2.0, 1.0, 2.0)));
        scene.inspect(id, 0, &mut sheet).unwrap();

        let component = scene.entity(id).unwrap().component(0).unwrap();
        assert!(!component.enabled());
        assert_eq!(component.get::<BoxCollider>().unwrap().size, Vec3::new(2.0, 1.0, 2.0));
        assert_eq!(sheet.get("Box Collider"), Some(&PropertyValue::Text("Box Collider".to_string())));
        assert!(matches!(scene.inspect(id, 4, &mut sheet), Err(SceneError::ComponentIndex { .. })));
    }

    #[test]
    fn test_inspect_entity_edits_transform() {
        let mut scene = test_scene();
        let id = scene.add_entity(box_entity("Crate", Vec3::zeros()));

        let mut sheet = PropertySheet::new();
        sheet.queue_edit("Position", PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0)));
        sheet.queue_edit("Roughness", PropertyValue::Float(4.0));
        scene.inspect_entity(id, &mut sheet).unwrap();

        let entity = scene.entity(id).unwrap();
        assert_eq!(entity.transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(entity.material.roughness, 1.0);
        assert_eq!(sheet.get("Enabled"), Some(&PropertyValue::Bool(true)));
    }
}
