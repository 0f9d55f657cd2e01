//! Primitive collision shapes and intersection algorithms
//!
//! Rays, axis-aligned boxes and triangles together with the stateless tests
//! the rest of the engine is built on: slab ray casting, closed-interval box
//! overlap and the separating-axis triangle/box test.

use crate::foundation::math::{transform_point, Mat4, Vec3};

/// Direction components smaller than this are treated as parallel to a slab
const PARALLEL_EPSILON: f32 = 1e-8;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized, or zero for a degenerate ray)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// A zero-length direction yields a ray with zero direction, which misses
    /// everything it does not start inside of.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box from a center and half extents
    pub fn from_center_half(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Tightest box around a set of points, `None` when there are no points
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |bounds, p| Self {
            min: bounds.min.inf(&p),
            max: bounds.max.sup(&p),
        }))
    }

    /// Unit box `[-0.5, 0.5]` on every axis
    pub fn unit() -> Self {
        Self::from_center_half(Vec3::zeros(), Vec3::repeat(0.5))
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half the size on each axis
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size on each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// The eight corners
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// World-aligned box around this box's corners after a transform
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self.corners();
        let first = transform_point(matrix, corners[0]);
        corners[1..].iter().fold(Self::new(first, first), |bounds, corner| {
            let p = transform_point(matrix, *corner);
            Self {
                min: bounds.min.inf(&p),
                max: bounds.max.sup(&p),
            }
        })
    }

    /// Closed-interval overlap test; touching faces count as overlapping
    pub fn overlaps(&self, other: &Self) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && self.max[i] >= other.min[i])
    }

    /// Slab-method ray test
    ///
    /// Returns the entry distance along the ray (0 when the origin is inside
    /// the box), or `None` on a miss. Axes the ray runs parallel to only
    /// accept the ray when its origin is within that slab.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for i in 0..3 {
            let origin = ray.origin[i];
            let direction = ray.direction[i];

            if direction.abs() < PARALLEL_EPSILON {
                if origin < self.min[i] || origin > self.max[i] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t1 = (self.min[i] - origin) * inv;
            let mut t2 = (self.max[i] - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_near = t_near.max(t1);
            t_far = t_far.min(t2);

            if t_near > t_far || t_far < 0.0 {
                return None;
            }
        }

        Some(t_near.max(0.0))
    }
}

/// A triangle in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle from three vertices
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unnormalized face normal (zero for a degenerate triangle)
    pub fn face_normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Triangle with every vertex transformed by `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            v0: transform_point(matrix, self.v0),
            v1: transform_point(matrix, self.v1),
            v2: transform_point(matrix, self.v2),
        }
    }

    /// Separating axis test against an axis-aligned box
    ///
    /// Tests the three box face normals first (as a bounds comparison), then
    /// the triangle normal, then the nine edge cross products. Axes shorter
    /// than `DEGENERATE_AXIS` are skipped.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        const DEGENERATE_AXIS: f32 = 0.001;

        let center = aabb.center();
        let half = aabb.half_extents();
        let verts = [self.v0, self.v1, self.v2];

        // Separated when the projections of triangle and box do not overlap
        fn separated_on(axis: Vec3, verts: &[Vec3; 3], center: Vec3, half: Vec3) -> bool {
            let radius = half.x * axis.x.abs() + half.y * axis.y.abs() + half.z * axis.z.abs();
            let box_center = center.dot(&axis);
            let (tri_min, tri_max) = verts.iter().map(|v| v.dot(&axis)).fold(
                (f32::INFINITY, f32::NEG_INFINITY),
                |(lo, hi), p| (lo.min(p), hi.max(p)),
            );
            tri_max < box_center - radius || tri_min > box_center + radius
        }

        // Box face normals
        let tri_bounds = Aabb::from_points(verts).unwrap_or(Aabb::new(self.v0, self.v0));
        if !tri_bounds.overlaps(aabb) {
            return false;
        }

        let normal = self.face_normal();
        if normal.norm() >= DEGENERATE_AXIS && separated_on(normal, &verts, center, half) {
            return false;
        }

        let edges = [self.v1 - self.v0, self.v2 - self.v1, self.v0 - self.v2];
        let box_axes = [Vec3::x(), Vec3::y(), Vec3::z()];
        for edge in &edges {
            for box_axis in &box_axes {
                let axis = edge.cross(box_axis);
                if axis.norm() < DEGENERATE_AXIS {
                    continue;
                }
                if separated_on(axis, &verts, center, half) {
                    return false;
                }
            }
        }

        true
    }
}
