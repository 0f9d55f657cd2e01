//! Shared triangle geometry and the built-in primitives
//!
//! Geometry is an opaque producer of vertex positions and triangle indices
//! as far as the scene is concerned. Entities hold it through a
//! [`GeometryHandle`] so several entities can share one mesh.

use std::fmt;
use std::rc::Rc;

use crate::foundation::math::Vec3;
use crate::physics::collision::{Aabb, Triangle};

/// Reference-counted handle to shared geometry
pub type GeometryHandle = Rc<Geometry>;

/// Vertex positions plus a triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Vertex positions in model space
    pub positions: Vec<Vec3>,
    /// Three indices per triangle
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Create geometry from positions and triangle indices
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Number of complete triangles in the index list
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangle `index`, or `None` if it references a vertex that does not exist
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let base = index.checked_mul(3)?;
        let ids = self.indices.get(base..base + 3)?;
        let vertex = |i: u32| self.positions.get(i as usize).copied();
        Some(Triangle::new(vertex(ids[0])?, vertex(ids[1])?, vertex(ids[2])?))
    }

    /// Iterate over every triangle whose indices are in range
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).filter_map(move |i| self.triangle(i))
    }

    /// Model-space bounds of all vertices
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().copied())
    }
}

/// Built-in primitive shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Unit cube centred on the origin
    Cube,
    /// Square pyramid with its apex on +Y
    Pyramid,
    /// Unit quad in the XZ plane
    Plane,
    /// Latitude/longitude sphere of diameter one
    Sphere,
}

impl PrimitiveKind {
    /// Every primitive kind
    pub const ALL: [PrimitiveKind; 4] = [Self::Cube, Self::Pyramid, Self::Plane, Self::Sphere];

    /// Name used in scene files
    pub fn name(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Pyramid => "pyramid",
            Self::Plane => "plane",
            Self::Sphere => "sphere",
        }
    }

    /// Parse a primitive name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Build the primitive's geometry
    pub fn build(self) -> Geometry {
        match self {
            Self::Cube => cube(),
            Self::Pyramid => pyramid(),
            Self::Plane => plane(),
            Self::Sphere => sphere(16, 12),
        }
    }
}

/// Where an entity's geometry came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GeometrySource {
    /// One of the built-in primitives
    Builtin(PrimitiveKind),
    /// A model file on disk
    File(String),
}

impl GeometrySource {
    /// Prefix marking a built-in primitive in scene files
    pub const BUILTIN_PREFIX: &'static str = "BUILTIN:";

    /// Token written to scene files
    pub fn to_token(&self) -> String {
        match self {
            Self::Builtin(kind) => format!("{}{}", Self::BUILTIN_PREFIX, kind.name()),
            Self::File(path) => path.clone(),
        }
    }

    /// Parse a scene file token. Unknown built-in kinds fall back to the cube.
    pub fn from_token(token: &str) -> Self {
        match token.strip_prefix(Self::BUILTIN_PREFIX) {
            Some(name) => Self::Builtin(PrimitiveKind::from_name(name).unwrap_or_else(|| {
                log::warn!("Geometry: unknown built-in primitive '{}', using cube", name);
                PrimitiveKind::Cube
            })),
            None => Self::File(token.to_string()),
        }
    }
}

impl fmt::Display for GeometrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

fn cube() -> Geometry {
    // Four vertices per face so each face can carry its own normal downstream
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::z(), Vec3::x(), Vec3::y()),
        (-Vec3::z(), -Vec3::x(), Vec3::y()),
        (Vec3::x(), -Vec3::z(), Vec3::y()),
        (-Vec3::x(), Vec3::z(), Vec3::y()),
        (Vec3::y(), Vec3::x(), -Vec3::z()),
        (-Vec3::y(), Vec3::x(), Vec3::z()),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, right, up) in faces {
        let base = positions.len() as u32;
        let center = normal * 0.5;
        let (right, up) = (right * 0.5, up * 0.5);
        positions.extend([
            center - right - up,
            center + right - up,
            center + right + up,
            center - right + up,
        ]);
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Geometry::new(positions, indices)
}

fn pyramid() -> Geometry {
    let positions = vec![
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(0.0, 0.5, 0.0),
    ];
    let indices = vec![
        0, 1, 2, 0, 2, 3, // base
        3, 2, 4, 2, 1, 4, 1, 0, 4, 0, 3, 4,
    ];
    Geometry::new(positions, indices)
}

fn plane() -> Geometry {
    let positions = vec![
        Vec3::new(-0.5, 0.0, -0.5),
        Vec3::new(0.5, 0.0, -0.5),
        Vec3::new(0.5, 0.0, 0.5),
        Vec3::new(-0.5, 0.0, 0.5),
    ];
    Geometry::new(positions, vec![0, 2, 1, 0, 3, 2])
}

fn sphere(segments: u32, rings: u32) -> Geometry {
    use std::f32::consts::{PI, TAU};

    let mut positions = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    for ring in 0..=rings {
        let theta = PI * ring as f32 / rings as f32;
        for segment in 0..=segments {
            let phi = TAU * segment as f32 / segments as f32;
            positions.push(Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()) * 0.5);
        }
    }

    // Seam vertices are duplicated so each row wraps without index arithmetic
    let stride = segments + 1;
    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + stride;
            indices.extend([a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    Geometry::new(positions, indices)
}
