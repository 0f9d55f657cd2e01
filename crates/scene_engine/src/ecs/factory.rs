//! Component construction by serialization tag
//!
//! Scene loading and "add component by name" both go through a
//! [`ComponentFactory`]. It comes pre-populated with every built-in variant;
//! applications register their scripts on top.

use std::collections::BTreeMap;
use std::fmt;

use super::component::{Behaviour, Component, ComponentKind, ComponentVariant, Script};
use super::components::{
    BoxCollider, CameraFollow, CapsuleCollider, CollisionReaction, MeshCollider, MovementController,
};
use crate::config::MovementConfig;

type Constructor = Box<dyn Fn() -> ComponentKind>;

/// Name to constructor map, ordered by name
pub struct ComponentFactory {
    constructors: BTreeMap<String, Constructor>,
}

impl ComponentFactory {
    /// Create a factory that knows no components
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Factory with every built-in variant and default settings
    pub fn with_builtins() -> Self {
        Self::with_config(&MovementConfig::default())
    }

    /// Factory with every built-in variant, new movement controllers using
    /// the configured speed
    pub fn with_config(movement: &MovementConfig) -> Self {
        let mut factory = Self::empty();
        factory.register_builtin::<BoxCollider>();
        factory.register_builtin::<CapsuleCollider>();
        factory.register_builtin::<MeshCollider>();
        factory.register_builtin::<CameraFollow>();
        factory.register_builtin::<CollisionReaction>();

        let speed = movement.default_speed;
        factory.register(
            MovementController::default().type_name(),
            move || ComponentKind::MovementController(MovementController::new(speed)),
        );
        factory
    }

    fn register_builtin<T>(&mut self)
    where
        T: ComponentVariant + Default,
    {
        let name = T::default().into_kind().behaviour().type_name();
        self.register(name, || T::default().into_kind());
    }

    /// Register a constructor under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> ComponentKind + 'static,
    {
        let name = name.into();
        if self.constructors.insert(name.clone(), Box::new(constructor)).is_some() {
            log::warn!("ComponentFactory: replaced constructor for '{}'", name);
        }
    }

    /// Register a script type under its own type name
    pub fn register_script<S>(&mut self)
    where
        S: Script + Default + 'static,
    {
        let name = S::default().type_name();
        self.register(name, || ComponentKind::Script(Box::new(S::default())));
    }

    /// Construct a fresh component, `None` for an unknown name
    pub fn create(&self, name: &str) -> Option<Component> {
        self.constructors
            .get(name)
            .map(|constructor| Component::new(constructor()))
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
