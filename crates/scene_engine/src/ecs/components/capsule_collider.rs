//! Capsule collider component

use super::collider::{Collider, ColliderKind};
use crate::debug::{DebugDraw, COLLIDER_COLOR, TRIGGER_COLOR};
use crate::ecs::component::Behaviour;
use crate::ecs::inspector::Inspector;
use crate::foundation::math::{transform_point, Transform, Vec3};
use crate::physics::collision::Aabb;
use crate::scene::persistence::{FieldReader, FieldWriter, SceneFormatError};

/// Principal axis of a capsule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapsuleAxis {
    /// Along X
    X,
    /// Along Y
    #[default]
    Y,
    /// Along Z
    Z,
}

impl CapsuleAxis {
    const LABELS: [&'static str; 3] = ["X-Axis", "Y-Axis", "Z-Axis"];

    /// 0, 1 or 2
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Axis for an index, `None` outside 0..=2
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    /// Unit vector along the axis
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::x(),
            Self::Y => Vec3::y(),
            Self::Z => Vec3::z(),
        }
    }
}

/// Capsule collider: a segment swept by a sphere
///
/// World bounds are the union of the two end spheres, with the radius
/// scaled by the owner's largest scale component. This over-approximates a
/// non-uniformly scaled capsule.
#[derive(Debug, Clone, PartialEq)]
pub struct CapsuleCollider {
    /// Offset from the owner's origin in model space
    pub center: Vec3,
    /// Radius in model space
    pub radius: f32,
    /// Total height including the caps; never less than twice the radius
    pub height: f32,
    /// Principal axis
    pub direction: CapsuleAxis,
    /// Report overlaps without blocking
    pub is_trigger: bool,
}

impl Default for CapsuleCollider {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            radius: 0.5,
            height: 2.0,
            direction: CapsuleAxis::Y,
            is_trigger: false,
        }
    }
}

impl CapsuleCollider {
    /// Create a capsule along the Y axis
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius,
            height,
            ..Self::default()
        }
    }

    /// Height after clamping to at least twice the radius
    pub fn effective_height(&self) -> f32 {
        self.height.max(2.0 * self.radius)
    }

    /// World-space segment endpoints and radius with the owner at `position`
    pub fn world_segment(&self, transform: &Transform, position: Vec3) -> (Vec3, Vec3, f32) {
        let half_segment = (self.effective_height() * 0.5 - self.radius).max(0.0);
        let offset = self.direction.unit() * half_segment;
        let matrix = transform.to_matrix_at(position);

        let start = transform_point(&matrix, self.center - offset);
        let end = transform_point(&matrix, self.center + offset);
        (start, end, self.radius * transform.max_scale())
    }
}

impl Collider for CapsuleCollider {
    fn kind(&self) -> ColliderKind {
        ColliderKind::Capsule
    }

    fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    fn bounds_at(&self, transform: &Transform, position: Vec3) -> Aabb {
        let (start, end, radius) = self.world_segment(transform, position);
        let reach = Vec3::repeat(radius);
        Aabb::from_center_half(start, reach).union(&Aabb::from_center_half(end, reach))
    }
}

impl Behaviour for CapsuleCollider {
    fn type_name(&self) -> &'static str {
        "CapsuleColliderComponent"
    }

    fn display_name(&self) -> &'static str {
        "Capsule Collider"
    }

    fn draw_gizmos(&self, transform: &Transform, draw: &mut DebugDraw) {
        let (start, end, radius) = self.world_segment(transform, transform.position);
        let color = if self.is_trigger { TRIGGER_COLOR } else { COLLIDER_COLOR };
        draw.capsule(start, end, radius, color);
    }

    fn inspect(&mut self, ui: &mut dyn Inspector) {
        ui.drag_vec3("Center", &mut self.center, 0.1);
        ui.drag_float("Radius", &mut self.radius, 0.1, 0.0, 100.0);
        ui.drag_float("Height", &mut self.height, 0.1, 0.0, 100.0);

        let mut axis = self.direction.index();
        if ui.combo("Direction", &mut axis, &CapsuleAxis::LABELS) {
            self.direction = CapsuleAxis::from_index(axis).unwrap_or_default();
        }
        ui.checkbox("Is Trigger", &mut self.is_trigger);
    }

    fn save(&self, out: &mut FieldWriter) {
        out.write_vec3(self.center);
        out.write_f32(self.radius);
        out.write_f32(self.height);
        out.write_usize(self.direction.index());
        out.write_bool(self.is_trigger);
    }

    fn load(&mut self, input: &mut FieldReader<'_>) -> Result<(), SceneFormatError> {
        self.center = input.read_vec3()?;
        self.radius = input.read_f32()?;
        self.height = input.read_f32()?;
        let axis = input.read_usize()?;
        self.direction = CapsuleAxis::from_index(axis)
            .ok_or_else(|| input.error(format!("capsule direction {} out of range", axis)))?;
        self.is_trigger = input.read_bool()?;
        Ok(())
    }
}
