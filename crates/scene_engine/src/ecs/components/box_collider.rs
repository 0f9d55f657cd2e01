//! Box collider component

use super::collider::{Collider, ColliderKind};
use crate::debug::{DebugDraw, COLLIDER_COLOR, TRIGGER_COLOR};
use crate::ecs::component::Behaviour;
use crate::ecs::inspector::Inspector;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::collision::Aabb;
use crate::scene::persistence::{FieldReader, FieldWriter, SceneFormatError};

/// Box-shaped collider, offset and sized relative to its owner
///
/// The box rotates and scales with the owner; its world bounds are the
/// axis-aligned box around the eight transformed corners.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxCollider {
    /// Offset from the owner's origin in model space
    pub center: Vec3,
    /// Full size in model space
    pub size: Vec3,
    /// Report overlaps without blocking
    pub is_trigger: bool,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            size: Vec3::repeat(1.0),
            is_trigger: false,
        }
    }
}

impl BoxCollider {
    /// Create a solid box collider
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            size,
            is_trigger: false,
        }
    }

    /// Builder pattern: mark as trigger
    pub fn trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// The box in the owner's model space
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_center_half(self.center, self.size.abs() * 0.5)
    }
}

impl Collider for BoxCollider {
    fn kind(&self) -> ColliderKind {
        ColliderKind::Box
    }

    fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    fn bounds_at(&self, transform: &Transform, position: Vec3) -> Aabb {
        self.local_bounds().transformed(&transform.to_matrix_at(position))
    }
}

impl Behaviour for BoxCollider {
    fn type_name(&self) -> &'static str {
        "BoxColliderComponent"
    }

    fn display_name(&self) -> &'static str {
        "Box Collider"
    }

    fn draw_gizmos(&self, transform: &Transform, draw: &mut DebugDraw) {
        let color = if self.is_trigger { TRIGGER_COLOR } else { COLLIDER_COLOR };
        draw.oriented_box(&transform.to_matrix(), &self.local_bounds(), color);
    }

    fn inspect(&mut self, ui: &mut dyn Inspector) {
        ui.drag_vec3("Center", &mut self.center, 0.1);
        ui.drag_vec3("Size", &mut self.size, 0.1);
        ui.checkbox("Is Trigger", &mut self.is_trigger);
    }

    fn save(&self, out: &mut FieldWriter) {
        out.write_vec3(self.center);
        out.write_vec3(self.size);
        out.write_bool(self.is_trigger);
    }

    fn load(&mut self, input: &mut FieldReader<'_>) -> Result<(), SceneFormatError> {
        self.center = input.read_vec3()?;
        self.size = input.read_vec3()?;
        self.is_trigger = input.read_bool()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_unit_box_at_origin() {
        let bounds = BoxCollider::default().world_bounds(&Transform::identity());
        assert_relative_eq!(bounds.min, Vec3::repeat(-0.5), epsilon = EPSILON);
        assert_relative_eq!(bounds.max, Vec3::repeat(0.5), epsilon = EPSILON);
    }

    #[test]
    fn test_rotated_box_grows_bounds() {
        let transform = Transform::identity().with_rotation(Vec3::new(0.0, 45.0, 0.0));
        let bounds = BoxCollider::default().world_bounds(&transform);
        let half_diagonal = 0.5 * std::f32::consts::SQRT_2;
        assert_relative_eq!(bounds.max.x, half_diagonal, epsilon = EPSILON);
        assert_relative_eq!(bounds.max.z, half_diagonal, epsilon = EPSILON);
        assert_relative_eq!(bounds.max.y, 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_bounds_at_substitutes_translation_only() {
        let collider = BoxCollider::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let transform = Transform::from_position(Vec3::new(5.0, 0.0, 5.0))
            .with_scale(Vec3::new(2.0, 2.0, 2.0));

        let bounds = collider.bounds_at(&transform, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(bounds.min, Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(bounds.max, Vec3::new(2.0, 2.0, 1.0), epsilon = EPSILON);
    }
}
