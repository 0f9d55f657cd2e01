//! # Engine Configuration
//!
//! Serializable settings for the scene runtime. Every field has a default
//! matching the engine's built-in behaviour, so a partial TOML or RON file
//! only needs to name what it changes.

use serde::{Deserialize, Serialize};

use super::Config;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Movement resolution settings
    pub collision: CollisionConfig,
    /// Movement controller defaults
    pub movement: MovementConfig,
    /// Debug visualisation settings
    pub debug: DebugConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            collision: CollisionConfig::default(),
            movement: MovementConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Config for EngineConfig {}

/// Settings consumed by the movement resolver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    /// Height above the mover's position below which nothing can block
    /// horizontal movement
    pub floor_clearance: f32,
    /// Entities with this name never block movement
    pub ignored_entity_name: String,
    /// Refine broad-phase hits against mesh colliders triangle by triangle
    pub precise_mesh_tests: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            floor_clearance: 0.1,
            ignored_entity_name: "Ground Plane".to_string(),
            precise_mesh_tests: true,
        }
    }
}

/// Defaults for newly created movement controllers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Units per second
    pub default_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self { default_speed: 5.0 }
    }
}

/// Debug drawing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Emit collider gizmos from `Scene::draw_gizmos`
    pub draw_colliders: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self { draw_colliders: true }
    }
}
