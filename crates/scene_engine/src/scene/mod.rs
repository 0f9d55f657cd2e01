//! Scene management
//!
//! A [`Scene`] owns entities, the active [`Camera`] and the editor
//! selection, and drives the per-frame update:
//!
//! ```text
//! Scene::tick
//!      ↓
//! Component::update  (per entity, per component, in order)
//!      ↓
//! MovementResolver   (when a component requests a move)
//!      ↓
//! Collider registry  (broad phase, then mesh triangles)
//! ```
//!
//! Scenes round-trip through the line-oriented text format in
//! [`persistence`].

pub mod camera;
pub mod persistence;
#[allow(clippy::module_inception)]
mod scene;

#[cfg(test)]
mod tests;

pub use camera::Camera;
pub use persistence::{SceneFormatError, SCENE_HEADER};
pub use scene::{Scene, SceneError};
