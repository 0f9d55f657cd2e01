//! Collider registry
//!
//! Every live collider in the process has exactly one record here. Movement
//! resolution discovers other colliders only through this registry, so the
//! scene registers a record when a collider component is attached and
//! removes it when the component or its entity goes away.
//!
//! Records live in a generation-checked arena: a handle whose record has
//! been removed resolves to nothing instead of to a recycled slot.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::ecs::components::ColliderKind;
use crate::ecs::entity::{EntityId, SceneId};

new_key_type! {
    /// Handle to a registered collider
    pub struct ColliderHandle;
}

/// Registry entry for one collider component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderRecord {
    /// Scene the owning entity lives in
    pub scene: SceneId,
    /// Owning entity
    pub entity: EntityId,
    /// Collider variant
    pub kind: ColliderKind,
}

/// Registry shared between scenes
pub type SharedRegistry = Rc<RefCell<ColliderRegistry>>;

thread_local! {
    static GLOBAL: SharedRegistry = Rc::new(RefCell::new(ColliderRegistry::new()));
}

/// Ordered set of every live collider
#[derive(Debug, Default)]
pub struct ColliderRegistry {
    records: SlotMap<ColliderHandle, ColliderRecord>,
    order: Vec<ColliderHandle>,
}

impl ColliderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry ready to share
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    /// The process-wide registry used by scenes that are not given one
    pub fn global() -> SharedRegistry {
        GLOBAL.with(Rc::clone)
    }

    /// Add a record, returning its handle
    pub fn register(&mut self, record: ColliderRecord) -> ColliderHandle {
        let handle = self.records.insert(record);
        self.order.push(handle);
        log::trace!(
            "ColliderRegistry: registered {:?} for {:?} ({} live)",
            record.kind,
            record.entity,
            self.records.len()
        );
        handle
    }

    /// Remove a record. Returns `None` for a handle that is already gone.
    pub fn unregister(&mut self, handle: ColliderHandle) -> Option<ColliderRecord> {
        let record = self.records.remove(handle)?;
        self.order.retain(|&h| h != handle);
        Some(record)
    }

    /// Remove every record belonging to a scene, returning how many were removed
    pub fn unregister_scene(&mut self, scene: SceneId) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| record.scene != scene);
        let records = &self.records;
        self.order.retain(|&h| records.contains_key(h));
        before - self.records.len()
    }

    /// Look up a record
    pub fn get(&self, handle: ColliderHandle) -> Option<&ColliderRecord> {
        self.records.get(handle)
    }

    /// Whether a handle still refers to a live record
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.records.contains_key(handle)
    }

    /// Number of live colliders
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no collider is registered
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Handles in registration order
    ///
    /// Returned as an owned snapshot so callers can release the registry
    /// borrow before acting on the records.
    pub fn handles(&self) -> Vec<ColliderHandle> {
        self.order.clone()
    }

    /// Records in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &ColliderRecord)> {
        self.order
            .iter()
            .filter_map(move |&h| self.records.get(h).map(|record| (h, record)))
    }
}
