//! Triangle mesh files.
//!
//! A mesh file is a flat token stream:
//!
//! ```text
//! <nvertices>
//! x y z        (nvertices times)
//! <ntriangles>
//! i j k        (ntriangles times, zero-based)
//! ```
//!
//! Line breaks carry no meaning. After loading, a mesh is usually rescaled
//! with [`MeshData::fit_to`] so that it fills the box it was placed in.

use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use whitted_math::{Aabb, Vec3};

/// Errors that can occur while reading a mesh file.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str },

    #[error("Invalid {expected}: {token:?}")]
    InvalidNumber {
        expected: &'static str,
        token: String,
    },

    #[error("Triangle {triangle} references vertex {index}, but the mesh has {count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        count: usize,
    },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// Vertex positions and triangle indices of a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[usize; 3]>,
}

impl MeshData {
    /// Parse mesh data from its text form.
    pub fn parse(source: &str) -> MeshResult<Self> {
        let mut tokens = source.split_whitespace();

        let vertex_count: usize = next_number(&mut tokens, "vertex count")?;
        let mut positions = Vec::new();
        for _ in 0..vertex_count {
            let x = next_number(&mut tokens, "vertex coordinate")?;
            let y = next_number(&mut tokens, "vertex coordinate")?;
            let z = next_number(&mut tokens, "vertex coordinate")?;
            positions.push(Vec3::new(x, y, z));
        }

        let triangle_count: usize = next_number(&mut tokens, "triangle count")?;
        let mut triangles = Vec::new();
        for triangle in 0..triangle_count {
            let mut indices = [0usize; 3];
            for slot in &mut indices {
                let index = next_number(&mut tokens, "vertex index")?;
                if index >= vertex_count {
                    return Err(MeshError::IndexOutOfRange {
                        triangle,
                        index,
                        count: vertex_count,
                    });
                }
                *slot = index;
            }
            triangles.push(indices);
        }

        Ok(Self {
            positions,
            triangles,
        })
    }

    /// Read and parse a mesh file.
    pub fn load(path: &Path) -> MeshResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mesh = Self::parse(&source)?;

        log::debug!(
            "Loaded mesh: {} ({} vertices, {} triangles)",
            path.display(),
            mesh.positions.len(),
            mesh.triangles.len()
        );

        Ok(mesh)
    }

    /// Tight bounds of the vertex positions, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::enclosing(&self.positions)
    }

    /// Rescale each axis independently so the vertices span `target`.
    ///
    /// An axis along which all vertices share one coordinate collapses onto
    /// the target's minimum on that axis.
    pub fn fit_to(&mut self, target: &Aabb) {
        let Some(bounds) = self.bounds() else {
            return;
        };

        let (src_min, src_max) = (bounds.min(), bounds.max());
        let (dst_min, dst_max) = (target.min(), target.max());

        for p in &mut self.positions {
            for axis in 0..3 {
                let extent = src_max[axis] - src_min[axis];
                p[axis] = if extent > 0.0 {
                    dst_min[axis] + (dst_max[axis] - dst_min[axis]) * (p[axis] - src_min[axis]) / extent
                } else {
                    dst_min[axis]
                };
            }
        }
    }
}

fn next_number<'a, T: FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    expected: &'static str,
) -> MeshResult<T> {
    let token = tokens.next().ok_or(MeshError::UnexpectedEnd { expected })?;
    token.parse().map_err(|_| MeshError::InvalidNumber {
        expected,
        token: token.to_string(),
    })
}
