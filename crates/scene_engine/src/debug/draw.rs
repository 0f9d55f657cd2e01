//! Debug drawing primitives and command list
//!
//! Components push shapes into a [`DebugDraw`] from their gizmo hooks; the
//! renderer consumes the list once per frame and clears it.

use crate::foundation::math::{transform_point, Mat4, Vec3, Vec4};
use crate::physics::collision::Aabb;

/// Colour used for solid collider gizmos
pub const COLLIDER_COLOR: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);

/// Colour used for trigger collider gizmos
pub const TRIGGER_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        /// Start point
        start: Vec3,
        /// End point
        end: Vec3,
        /// RGBA colour
        color: Vec4,
    },

    /// Wireframe sphere
    Sphere {
        /// Centre
        center: Vec3,
        /// Radius
        radius: f32,
        /// RGBA colour
        color: Vec4,
    },

    /// Axis-aligned wireframe box
    Box {
        /// Centre
        center: Vec3,
        /// Half size on each axis
        extents: Vec3,
        /// RGBA colour
        color: Vec4,
    },

    /// Capsule from start to end with radius
    Capsule {
        /// First segment endpoint
        start: Vec3,
        /// Second segment endpoint
        end: Vec3,
        /// Radius around the segment
        radius: f32,
        /// RGBA colour
        color: Vec4,
    },

    /// Point marker
    Point {
        /// Position
        position: Vec3,
        /// RGBA colour
        color: Vec4,
        /// Marker size in pixels
        size: f32,
    },
}

impl DebugShape {
    /// Colour of the shape
    pub fn color(&self) -> Vec4 {
        match self {
            DebugShape::Line { color, .. }
            | DebugShape::Sphere { color, .. }
            | DebugShape::Box { color, .. }
            | DebugShape::Capsule { color, .. }
            | DebugShape::Point { color, .. } => *color,
        }
    }
}

/// Per-frame list of debug shapes
#[derive(Debug, Clone)]
pub struct DebugDraw {
    shapes: Vec<DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDraw {
    /// Create an empty, enabled command list
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            enabled: true,
        }
    }

    fn push(&mut self, shape: DebugShape) {
        if self.enabled {
            self.shapes.push(shape);
        }
    }

    /// Draw a line segment
    pub fn line(&mut self, start: Vec3, end: Vec3, color: Vec4) {
        self.push(DebugShape::Line { start, end, color });
    }

    /// Draw a sphere
    pub fn sphere(&mut self, center: Vec3, radius: f32, color: Vec4) {
        self.push(DebugShape::Sphere { center, radius, color });
    }

    /// Draw an axis-aligned box
    pub fn aabb(&mut self, bounds: &Aabb, color: Vec4) {
        self.push(DebugShape::Box {
            center: bounds.center(),
            extents: bounds.half_extents(),
            color,
        });
    }

    /// Draw a capsule
    pub fn capsule(&mut self, start: Vec3, end: Vec3, radius: f32, color: Vec4) {
        self.push(DebugShape::Capsule { start, end, radius, color });
    }

    /// Draw a point
    pub fn point(&mut self, position: Vec3, color: Vec4, size: f32) {
        self.push(DebugShape::Point { position, color, size });
    }

    /// Draw a model-space box under a transform as its twelve edges
    pub fn oriented_box(&mut self, matrix: &Mat4, local: &Aabb, color: Vec4) {
        const EDGES: [(usize, usize); 12] = [
            (0, 1), (2, 3), (4, 5), (6, 7), // along X
            (0, 2), (1, 3), (4, 6), (5, 7), // along Y
            (0, 4), (1, 5), (2, 6), (3, 7), // along Z
        ];

        let corners = local.corners().map(|c| transform_point(matrix, c));
        for (a, b) in EDGES {
            self.line(corners[a], corners[b], color);
        }
    }

    /// All shapes recorded so far
    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }

    /// Get the number of recorded shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Drop every recorded shape
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl Default for DebugDraw {
    fn default() -> Self {
        Self::new()
    }
}
