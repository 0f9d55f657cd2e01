//! Sandbox application
//!
//! Builds the default scene, drives it for a few scripted seconds of input,
//! picks through the camera, then saves the scene and loads it back.

use std::error::Error;

use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use scene_engine::scene::persistence::{FieldReader, FieldWriter, SceneFormatError};

/// Turns its owner around the vertical axis
#[derive(Debug, Clone)]
struct Spinner {
    degrees_per_second: f32,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            degrees_per_second: 45.0,
        }
    }
}

impl Behaviour for Spinner {
    fn type_name(&self) -> &'static str {
        "Spinner"
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let yaw = &mut ctx.owner.transform.rotation.y;
        *yaw = (*yaw + self.degrees_per_second * ctx.delta_time) % 360.0;
    }

    fn inspect(&mut self, ui: &mut dyn Inspector) {
        ui.drag_float("Degrees Per Second", &mut self.degrees_per_second, 1.0, -720.0, 720.0);
    }

    fn save(&self, out: &mut FieldWriter) {
        out.write_f32(self.degrees_per_second);
    }

    fn load(&mut self, input: &mut FieldReader<'_>) -> Result<(), SceneFormatError> {
        self.degrees_per_second = input.read_f32()?;
        Ok(())
    }
}

fn build_default_scene(
    scene: &mut Scene,
    library: &mut GeometryLibrary,
    factory: &ComponentFactory,
) -> Result<EntityId, SceneError> {
    let cube = GeometrySource::Builtin(PrimitiveKind::Cube);
    let plane = GeometrySource::Builtin(PrimitiveKind::Plane);
    let sphere = GeometrySource::Builtin(PrimitiveKind::Sphere);

    scene.add_entity(
        Entity::new("Ground Plane")
            .with_transform(
                Transform::from_position(Vec3::new(0.0, -0.01, 0.0)).with_scale(Vec3::new(20.0, 0.01, 20.0)),
            )
            .with_material(Material::with_color(Vec3::repeat(0.25)))
            .with_geometry(plane.clone(), library.resolve(&plane))
            .with_component(BoxCollider::default()),
    );

    scene.add_entity(
        Entity::new("Red Cube")
            .with_transform(Transform::from_position(Vec3::new(-2.0, 0.5, 0.0)))
            .with_material(Material::with_color(Vec3::new(0.8, 0.2, 0.2)))
            .with_geometry(cube.clone(), library.resolve(&cube))
            .with_component(BoxCollider::default())
            .with_component(Component::script(Spinner::default())),
    );

    scene.add_entity(
        Entity::new("Blue Sphere")
            .with_transform(Transform::from_position(Vec3::new(2.0, 0.5, 0.0)))
            .with_material(Material::with_color(Vec3::new(0.2, 0.4, 0.8)))
            .with_geometry(sphere.clone(), library.resolve(&sphere))
            .with_component(MeshCollider::new()),
    );

    let player = scene.add_entity(
        Entity::new("Player")
            .with_transform(Transform::from_position(Vec3::new(2.0, 0.5, 3.0)))
            .with_geometry(cube.clone(), library.resolve(&cube)),
    );
    scene.add_component_by_name(player, "PlayerController", factory)?;
    scene.add_component(player, BoxCollider::default())?;
    scene.add_component(player, CameraFollow::default())?;
    scene.add_component(player, CollisionReaction::default())?;

    Ok(player)
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = EngineConfig::load_or_default("sandbox.toml");
    logging::init_with_level(&config.log_level);

    let mut library = GeometryLibrary::new();
    let mut factory = ComponentFactory::with_config(&config.movement);
    factory.register_script::<Spinner>();
    log::info!("Registered components: {:?}", factory);

    let mut scene = Scene::new().with_config(&config);
    let player = build_default_scene(&mut scene, &mut library, &factory)?;
    log::info!("Default scene built with {} entities", scene.len());

    // One second towards the blue sphere, one second to the left
    let frame = 1.0 / 60.0;
    let forward = InputState::with_keys(&[KeyCode::W]);
    let left = InputState::with_keys(&[KeyCode::A]);
    for step in 0..120 {
        let input = if step < 60 { &forward } else { &left };
        scene.tick(frame, input);
    }
    if let Some(entity) = scene.entity(player) {
        log::info!("Player ended at {:?}", entity.transform.position);
    }

    let viewport = Vec2::new(1280.0, 720.0);
    if let Some(ray) = scene.camera().screen_ray(viewport / 2.0, viewport) {
        let picked = scene.pick(&ray);
        scene.select(picked);
        let name = picked.and_then(|id| scene.entity(id)).map(|e| e.name.clone());
        log::info!("Picked {:?}", name);
    }

    let mut gizmos = DebugDraw::new();
    scene.draw_gizmos(&mut gizmos);
    log::info!("Collected {} debug shapes", gizmos.shape_count());

    let path = std::env::temp_dir().join("sandbox_scene.txt");
    scene.save(&path)?;

    let mut reloaded = Scene::new().with_config(&config);
    let count = reloaded.load(&path, &mut library, &factory)?;
    log::info!("Reloaded {} entities from {}", count, path.display());

    Ok(())
}
