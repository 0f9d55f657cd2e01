//! Debug visualization
//!
//! Components describe their gizmos as [`DebugShape`]s in a [`DebugDraw`]
//! command list; turning that list into pixels is the renderer's job.

pub mod draw;

pub use draw::{DebugDraw, DebugShape, COLLIDER_COLOR, TRIGGER_COLOR};
