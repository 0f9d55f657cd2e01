//! Entity-Component implementation
//!
//! Entities own an ordered list of components. Each component wraps one
//! variant of the closed [`ComponentKind`] set, or a user [`Script`];
//! behaviour is dispatched through the [`Behaviour`] trait.

pub mod component;
pub mod components;
pub mod entity;
pub mod factory;
pub mod inspector;

pub use component::{
    Behaviour, Component, ComponentKind, ComponentVariant, Contact, Owner, Script, UpdateContext,
};
pub use entity::{Entity, EntityId, Material, SceneId};
pub use factory::ComponentFactory;
pub use inspector::{Inspector, PropertySheet, PropertyValue};
