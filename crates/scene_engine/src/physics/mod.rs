//! Physics module for collision detection and movement resolution
//!
//! Geometric tests live in [`collision`], the process-wide collider list in
//! [`registry`], and the per-axis movement resolver in [`movement`].

pub mod collision;
pub mod movement;
pub mod registry;

pub use collision::{Aabb, Ray, Triangle};
pub use movement::{MoveOutcome, MovementResolver, PositionOverride};
pub use registry::{ColliderHandle, ColliderRecord, ColliderRegistry, SharedRegistry};
