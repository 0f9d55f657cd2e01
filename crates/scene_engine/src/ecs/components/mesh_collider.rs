//! Triangle mesh collider component

use std::cell::Cell;
use std::rc::Rc;

use super::collider::{Collider, ColliderKind};
use crate::assets::GeometryHandle;
use crate::debug::{DebugDraw, COLLIDER_COLOR, TRIGGER_COLOR};
use crate::ecs::component::{Behaviour, Owner};
use crate::ecs::inspector::Inspector;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::collision::Aabb;
use crate::scene::persistence::{FieldReader, FieldWriter, SceneFormatError};

/// Collider built from triangle geometry
///
/// Uses explicitly assigned geometry, or adopts the owner's geometry when
/// it starts. Broad-phase bounds come from a lazily cached model-space box;
/// [`MeshCollider::intersects_box`] refines against individual triangles.
#[derive(Debug, Clone, Default)]
pub struct MeshCollider {
    geometry: Option<GeometryHandle>,
    /// Stored and persisted; no hull is computed from it
    pub convex: bool,
    /// Report overlaps without blocking
    pub is_trigger: bool,
    cached_bounds: Cell<Option<Aabb>>,
}

impl MeshCollider {
    /// Create a collider that will adopt its owner's geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collider with explicit geometry
    pub fn with_geometry(geometry: GeometryHandle) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::default()
        }
    }

    /// The geometry used for collision, if any
    pub fn geometry(&self) -> Option<&GeometryHandle> {
        self.geometry.as_ref()
    }

    /// Replace the geometry and invalidate cached bounds
    pub fn set_geometry(&mut self, geometry: Option<GeometryHandle>) {
        self.geometry = geometry;
        self.mark_dirty();
    }

    /// Force the model-space bounds to be recomputed on next use
    pub fn mark_dirty(&self) {
        self.cached_bounds.set(None);
    }

    /// Model-space bounds of the geometry; the unit box when there is no
    /// geometry or it has no vertices
    pub fn local_bounds(&self) -> Aabb {
        if let Some(bounds) = self.cached_bounds.get() {
            return bounds;
        }

        let bounds = self
            .geometry
            .as_ref()
            .and_then(|geometry| geometry.bounds())
            .unwrap_or_else(Aabb::unit);
        self.cached_bounds.set(Some(bounds));
        bounds
    }

    /// Precise test against a box collider's world bounds
    ///
    /// Rejects on the broad-phase bounds first, then tests every world-space
    /// triangle against the box, returning on the first hit. Without
    /// geometry nothing is hit.
    pub fn intersects_box(&self, transform: &Transform, box_bounds: &Aabb) -> bool {
        let Some(geometry) = &self.geometry else {
            return false;
        };

        if !self.world_bounds(transform).overlaps(box_bounds) {
            return false;
        }

        let matrix = transform.to_matrix();
        geometry
            .triangles()
            .any(|triangle| triangle.transformed(&matrix).intersects_aabb(box_bounds))
    }
}

impl Collider for MeshCollider {
    fn kind(&self) -> ColliderKind {
        ColliderKind::Mesh
    }

    fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    fn bounds_at(&self, transform: &Transform, position: Vec3) -> Aabb {
        self.local_bounds().transformed(&transform.to_matrix_at(position))
    }
}

impl Behaviour for MeshCollider {
    fn type_name(&self) -> &'static str {
        "MeshColliderComponent"
    }

    fn display_name(&self) -> &'static str {
        "Mesh Collider"
    }

    fn start(&mut self, owner: &mut Owner<'_>) {
        if self.geometry.is_none() {
            if let Some(geometry) = owner.geometry {
                self.set_geometry(Some(Rc::clone(geometry)));
            }
        }
    }

    fn draw_gizmos(&self, transform: &Transform, draw: &mut DebugDraw) {
        let color = if self.is_trigger { TRIGGER_COLOR } else { COLLIDER_COLOR };
        draw.aabb(&self.world_bounds(transform), color);
    }

    fn inspect(&mut self, ui: &mut dyn Inspector) {
        ui.label("Mesh Collider");
        ui.checkbox("Convex", &mut self.convex);
        ui.checkbox("Is Trigger", &mut self.is_trigger);
    }

    fn save(&self, out: &mut FieldWriter) {
        out.write_bool(self.convex);
        out.write_bool(self.is_trigger);
    }

    fn load(&mut self, input: &mut FieldReader<'_>) -> Result<(), SceneFormatError> {
        self.convex = input.read_bool()?;
        self.is_trigger = input.read_bool()?;
        Ok(())
    }
}
