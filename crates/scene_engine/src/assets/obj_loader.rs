//! OBJ file loader for collision and picking geometry
//!
//! Only vertex positions and faces are read. Texture coordinates, normals
//! and material statements are skipped; polygons are fan-triangulated.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use super::geometry::Geometry;
use crate::foundation::math::Vec3;

/// Errors produced while reading an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A statement could not be parsed
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
    /// The file parsed but contains nothing usable
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Reader for Wavefront OBJ files
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file from disk
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Geometry, ObjError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parse OBJ text held in memory
    pub fn load_obj_from_str(source: &str) -> Result<Geometry, ObjError> {
        Self::parse(source.as_bytes())
    }

    fn parse<R: BufRead>(reader: R) -> Result<Geometry, ObjError> {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut indices = Vec::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = number + 1;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => {
                    if parts.len() < 4 {
                        return Err(parse_error(line_no, "vertex needs three coordinates"));
                    }
                    let mut coords = [0.0_f32; 3];
                    for (slot, part) in coords.iter_mut().zip(&parts[1..4]) {
                        *slot = part
                            .parse()
                            .map_err(|_| parse_error(line_no, &format!("invalid coordinate '{}'", part)))?;
                    }
                    positions.push(Vec3::new(coords[0], coords[1], coords[2]));
                }
                "f" => {
                    if parts.len() < 4 {
                        return Err(parse_error(line_no, "face needs at least three vertices"));
                    }

                    let mut face = Vec::with_capacity(parts.len() - 1);
                    for vertex in &parts[1..] {
                        face.push(resolve_index(vertex, positions.len(), line_no)?);
                    }

                    // Fan triangulation
                    for i in 1..face.len() - 1 {
                        indices.extend([face[0], face[i], face[i + 1]]);
                    }
                }
                _ => {
                    // Normals, texture coordinates, groups and materials are not needed
                }
            }
        }

        if positions.is_empty() {
            return Err(ObjError::InvalidFormat("No vertices found in OBJ file".to_string()));
        }

        log::debug!(
            "ObjLoader: parsed {} vertices, {} triangles",
            positions.len(),
            indices.len() / 3
        );
        Ok(Geometry::new(positions, indices))
    }
}

fn parse_error(line: usize, message: &str) -> ObjError {
    ObjError::ParseError {
        line,
        message: message.to_string(),
    }
}

/// Resolve the position part of a face vertex (`p`, `p/t`, `p//n`, `p/t/n`).
/// Negative indices count back from the most recent vertex.
fn resolve_index(vertex: &str, vertex_count: usize, line: usize) -> Result<u32, ObjError> {
    let position = vertex.split('/').next().unwrap_or_default();
    let raw: i64 = position
        .parse()
        .map_err(|_| parse_error(line, &format!("invalid face index '{}'", vertex)))?;

    let count = vertex_count as i64;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(count + r),
    };

    match resolved {
        Some(index) if (0..count).contains(&index) => u32::try_from(index)
            .map_err(|_| parse_error(line, "face index too large")),
        _ => Err(parse_error(line, &format!("face index '{}' out of range", vertex))),
    }
}
