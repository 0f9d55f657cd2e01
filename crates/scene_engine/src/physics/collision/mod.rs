//! Collision primitives
//!
//! Everything in here is a stateless geometric test. Shapes are stored in
//! model space by the collider components and only transformed to world
//! space while a query runs.
//!
//! - [`Ray`] - picking rays, slab-tested against [`Aabb`]
//! - [`Aabb`] - broad-phase bounds with closed-interval overlap
//! - [`Triangle`] - narrow-phase separating axis test against an [`Aabb`]

pub mod primitives;

pub use primitives::{Aabb, Ray, Triangle};
