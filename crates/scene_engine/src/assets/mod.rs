//! Asset management
//!
//! Geometry is produced outside the scene and handed over as shared,
//! read-only [`GeometryHandle`]s. [`GeometryProvider`] is the seam between
//! the two; [`GeometryLibrary`] is the default implementation, serving the
//! built-in primitives and OBJ files with a per-source cache.

pub mod geometry;
pub mod obj_loader;

pub use geometry::{Geometry, GeometryHandle, GeometrySource, PrimitiveKind};
pub use obj_loader::{ObjError, ObjLoader};

use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Source of geometry for entities
pub trait GeometryProvider {
    /// Geometry for a built-in primitive
    fn primitive(&mut self, kind: PrimitiveKind) -> GeometryHandle;

    /// Load geometry from a file, `None` when it cannot be loaded
    fn load_file(&mut self, path: &str) -> Option<GeometryHandle>;

    /// Resolve any source, substituting the cube when a file fails to load
    fn resolve(&mut self, source: &GeometrySource) -> GeometryHandle {
        match source {
            GeometrySource::Builtin(kind) => self.primitive(*kind),
            GeometrySource::File(path) => self.load_file(path).unwrap_or_else(|| {
                log::warn!("Geometry: could not load '{}', substituting cube", path);
                self.primitive(PrimitiveKind::Cube)
            }),
        }
    }
}

/// Caching geometry provider
///
/// Every source is built or read once; later requests share the same handle.
#[derive(Debug, Default)]
pub struct GeometryLibrary {
    base_dir: Option<PathBuf>,
    cache: HashMap<GeometrySource, GeometryHandle>,
}

impl GeometryLibrary {
    /// Create an empty library resolving paths relative to the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative file paths against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            cache: HashMap::new(),
        }
    }

    /// Number of cached geometries
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn full_path(&self, path: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        }
    }
}

impl GeometryProvider for GeometryLibrary {
    fn primitive(&mut self, kind: PrimitiveKind) -> GeometryHandle {
        Rc::clone(
            self.cache
                .entry(GeometrySource::Builtin(kind))
                .or_insert_with(|| Rc::new(kind.build())),
        )
    }

    fn load_file(&mut self, path: &str) -> Option<GeometryHandle> {
        let key = GeometrySource::File(path.to_string());
        if let Some(handle) = self.cache.get(&key) {
            return Some(Rc::clone(handle));
        }

        match ObjLoader::load_obj(self.full_path(path)) {
            Ok(geometry) => {
                let handle = Rc::new(geometry);
                self.cache.insert(key, Rc::clone(&handle));
                Some(handle)
            }
            Err(e) => {
                log::warn!("Geometry: failed to load '{}': {}", path, e);
                None
            }
        }
    }
}
