//! Saving and loading whole scenes

use std::rc::Rc;

use super::{box_entity, test_scene, Recorder};
use crate::assets::{GeometryLibrary, GeometryProvider, GeometrySource, PrimitiveKind};
use crate::ecs::component::Component;
use crate::ecs::components::{
    BoxCollider, CameraFollow, CapsuleAxis, CapsuleCollider, CollisionReaction, MeshCollider, MovementController,
};
use crate::ecs::entity::{Entity, Material};
use crate::ecs::factory::ComponentFactory;
use crate::foundation::math::{Transform, Vec3};
use crate::scene::{Scene, SceneError};
use approx::assert_relative_eq;

/// The sandbox layout: a floor, two props and a player
fn populated(library: &mut GeometryLibrary) -> Scene {
    let mut scene = test_scene();

    let plane = GeometrySource::Builtin(PrimitiveKind::Plane);
    scene.add_entity(
        Entity::new("Ground Plane")
            .with_transform(
                Transform::from_position(Vec3::new(0.0, -0.01, 0.0)).with_scale(Vec3::new(20.0, 0.01, 20.0)),
            )
            .with_material(Material::with_color(Vec3::repeat(0.25)))
            .with_geometry(plane.clone(), library.resolve(&plane))
            .with_component(BoxCollider::default()),
    );

    let pyramid = GeometrySource::Builtin(PrimitiveKind::Pyramid);
    let mut rock = Entity::new("Rock \"big\"")
        .with_transform(
            Transform::from_position(Vec3::new(2.0, 0.5, 0.0)).with_rotation(Vec3::new(0.0, 30.0, 0.0)),
        )
        .with_geometry(pyramid.clone(), library.resolve(&pyramid))
        .with_component(MeshCollider::new());
    rock.material.texture = Some("textures/rock.png".to_string());
    rock.material.roughness = 0.8;
    scene.add_entity(rock);

    scene.add_entity(box_entity("Red Cube", Vec3::new(-2.0, 0.5, 0.0)));

    let player = scene.add_entity(
        Entity::new("Player")
            .with_transform(Transform::from_position(Vec3::new(0.0, 0.5, 3.0)))
            .with_component(MovementController::new(7.5))
            .with_component(CapsuleCollider {
                radius: 0.4,
                direction: CapsuleAxis::Z,
                ..CapsuleCollider::default()
            })
            .with_component(CameraFollow::default())
            .with_component(CollisionReaction::new(Vec3::new(1.0, 0.5, 0.0))),
    );
    scene.set_component_enabled(player, 2, false).unwrap();
    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_roundtrip() {
        let mut library = GeometryLibrary::new();
        let original = populated(&mut library);
        let text = original.save_to_string();

        let mut loaded = test_scene();
        let count = loaded
            .load_from_str(&text, &mut library, &ComponentFactory::with_builtins())
            .unwrap();

        assert_eq!(count, original.len());
        assert_eq!(loaded.len(), original.len());

        for (a, b) in original.entities().zip(loaded.entities()) {
            assert_eq!(a.name, b.name);
            assert_relative_eq!(a.transform.position, b.transform.position, epsilon = 1e-5);
            assert_relative_eq!(a.transform.rotation, b.transform.rotation, epsilon = 1e-5);
            assert_relative_eq!(a.transform.scale, b.transform.scale, epsilon = 1e-5);
            assert_eq!(a.material, b.material);
            assert_eq!(a.geometry_source(), b.geometry_source());

            let types = |e: &Entity| e.components().iter().map(Component::type_name).collect::<Vec<_>>();
            assert_eq!(types(a), types(b));
            let enabled = |e: &Entity| e.components().iter().map(Component::enabled).collect::<Vec<_>>();
            assert_eq!(enabled(a), enabled(b));
        }

        let player = loaded.find_by_name("Player").unwrap();
        assert_eq!(loaded.get::<MovementController>(player).unwrap().move_speed, 7.5);
        let capsule = loaded.get::<CapsuleCollider>(player).unwrap();
        assert_relative_eq!(capsule.radius, 0.4);
        assert_eq!(capsule.direction, CapsuleAxis::Z);
        assert_eq!(
            loaded.get::<CollisionReaction>(player).unwrap().collision_color,
            Vec3::new(1.0, 0.5, 0.0)
        );

        // Loaded colliders are live: one record per collider component
        assert_eq!(loaded.registry().borrow().len(), 4);
    }

    #[test]
    fn test_loaded_entities_share_geometry() {
        let mut library = GeometryLibrary::new();
        let original = populated(&mut library);
        let text = original.save_to_string();

        let mut loaded = test_scene();
        loaded
            .load_from_str(&text, &mut library, &ComponentFactory::with_builtins())
            .unwrap();

        let rock = loaded.entity(loaded.find_by_name("Rock \"big\"").unwrap()).unwrap();
        let pyramid = library.primitive(PrimitiveKind::Pyramid);
        assert!(Rc::ptr_eq(rock.geometry().unwrap(), &pyramid));
        assert!(Rc::ptr_eq(rock.get::<MeshCollider>().unwrap().geometry().unwrap(), &pyramid));
    }

    #[test]
    fn test_load_replaces_existing_entities() {
        let mut library = GeometryLibrary::new();
        let text = populated(&mut library).save_to_string();

        let mut scene = test_scene();
        let stale = scene.add_entity(box_entity("Stale", Vec3::zeros()));
        scene.select(Some(stale));
        scene
            .load_from_str(&text, &mut library, &ComponentFactory::with_builtins())
            .unwrap();

        assert!(scene.find_by_name("Stale").is_none());
        assert_eq!(scene.selected(), None);
        assert_eq!(scene.registry().borrow().len(), 4);
    }

    #[test]
    fn test_format_error_leaves_scene_untouched() {
        let mut library = GeometryLibrary::new();
        let mut scene = test_scene();
        scene.add_entity(box_entity("Keep", Vec3::zeros()));

        let result = scene.load_from_str("SCENE_V1\n2\n\"Half\"\n", &mut library, &ComponentFactory::with_builtins());
        assert!(matches!(result, Err(SceneError::Format(_))));
        assert_eq!(scene.len(), 1);
        assert!(scene.find_by_name("Keep").is_some());
    }

    #[test]
    fn test_unregistered_script_is_dropped_on_load() {
        let mut library = GeometryLibrary::new();
        let mut scene = test_scene();
        scene.add_entity(
            box_entity("Scripted", Vec3::zeros()).with_component(Component::script(Recorder::default())),
        );
        let text = scene.save_to_string();
        assert!(text.contains("Recorder 1"));

        let mut plain = test_scene();
        plain
            .load_from_str(&text, &mut library, &ComponentFactory::with_builtins())
            .unwrap();
        let id = plain.find_by_name("Scripted").unwrap();
        assert_eq!(plain.entity(id).unwrap().components().len(), 1);

        let mut factory = ComponentFactory::with_builtins();
        factory.register_script::<Recorder>();
        let mut scripted = test_scene();
        scripted.load_from_str(&text, &mut library, &factory).unwrap();
        let id = scripted.find_by_name("Scripted").unwrap();
        let recorder = scripted.entity(id).unwrap().get_script::<Recorder>().unwrap();
        assert_eq!(recorder.starts, 1);
    }

    #[test]
    fn test_unloadable_geometry_falls_back_to_cube() {
        let mut library = GeometryLibrary::new();
        let text = "SCENE_V1\n1\n\"Statue\"\n\"models/missing.obj\"\n0 0 0\n0 0 0\n1 1 1\n1 1 1\n0.5\n0\n\"NONE\"\n0\n";

        let mut scene = test_scene();
        scene
            .load_from_str(text, &mut library, &ComponentFactory::with_builtins())
            .unwrap();

        let statue = scene.entity(scene.find_by_name("Statue").unwrap()).unwrap();
        let cube = library.primitive(PrimitiveKind::Cube);
        assert!(Rc::ptr_eq(statue.geometry().unwrap(), &cube));
        assert_eq!(
            statue.geometry_source(),
            Some(&GeometrySource::File("models/missing.obj".to_string()))
        );
    }

    #[test]
    fn test_entity_without_geometry_stays_without_geometry() {
        let mut library = GeometryLibrary::new();
        let mut scene = test_scene();
        let player = scene.add_entity(box_entity("Player", Vec3::new(0.0, 0.5, 0.0)));
        scene.add_entity(
            Entity::new("Rock")
                .with_transform(Transform::from_position(Vec3::new(1.05, 0.5, 0.0)))
                .with_component(MeshCollider::new()),
        );
        assert!(!scene.move_entity(player, Vec3::new(0.1, 0.0, 0.0)).blocked());

        let text = scene.save_to_string();
        assert!(text.contains("\"Rock\"\n\"NONE\"\n"));

        let mut loaded = test_scene();
        loaded
            .load_from_str(&text, &mut library, &ComponentFactory::with_builtins())
            .unwrap();

        let rock = loaded.entity(loaded.find_by_name("Rock").unwrap()).unwrap();
        assert!(rock.geometry().is_none());
        assert_eq!(rock.geometry_source(), None);
        assert!(rock.get::<MeshCollider>().unwrap().geometry().is_none());

        let player = loaded.find_by_name("Player").unwrap();
        assert!(!loaded.move_entity(player, Vec3::new(0.1, 0.0, 0.0)).blocked());
    }

    #[test]
    fn test_save_and_load_file() {
        let mut library = GeometryLibrary::new();
        let original = populated(&mut library);
        let path = std::env::temp_dir().join(format!("scene_engine_scene_{}.txt", std::process::id()));

        original.save(&path).unwrap();
        let mut loaded = test_scene();
        let count = loaded
            .load(&path, &mut library, &ComponentFactory::with_builtins())
            .unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(count, 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut library = GeometryLibrary::new();
        let mut scene = test_scene();
        let result = scene.load("no/such/scene.txt", &mut library, &ComponentFactory::with_builtins());
        assert!(matches!(result, Err(SceneError::Io(_))));
    }
}
