//! # Scene Engine
//!
//! A small scene model for 3D editors and games: entities carrying
//! components, collider-based movement resolution and a text scene format.
//!
//! ## Features
//!
//! - **Entity-Component model**: entities own an ordered list of components
//!   from a closed set of variants plus user scripts
//! - **Colliders**: box, capsule and triangle-mesh colliders in a shared,
//!   generation-checked registry
//! - **Movement resolution**: per-axis blocking with trigger notifications
//! - **Persistence**: line-oriented `SCENE_V1` text files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! let mut scene = Scene::new();
//! let player = scene.add_entity(
//!     Entity::new("Player")
//!         .with_transform(Transform::from_position(Vec3::new(0.0, 0.5, 0.0)))
//!         .with_component(MovementController::default())
//!         .with_component(BoxCollider::default()),
//! );
//!
//! scene.tick(1.0 / 60.0, &InputState::with_keys(&[KeyCode::D]));
//! println!("{:?}", scene.entity(player).map(|e| e.transform.position));
//! ```

pub mod assets;
pub mod config;
pub mod debug;
pub mod ecs;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{GeometryLibrary, GeometryProvider, GeometrySource, PrimitiveKind},
        config::{Config, EngineConfig},
        debug::DebugDraw,
        ecs::{
            components::{
                BoxCollider, CameraFollow, CapsuleAxis, CapsuleCollider, Collider, CollisionReaction,
                MeshCollider, MovementController,
            },
            Behaviour, Component, ComponentFactory, Contact, Entity, EntityId, Inspector, Material, Owner,
            UpdateContext,
        },
        foundation::math::{Transform, Vec2, Vec3},
        input::{InputState, KeyCode, MouseButton},
        physics::{MoveOutcome, Ray},
        scene::{Camera, Scene, SceneError},
    };
}
