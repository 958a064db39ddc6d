//! CPU-side mesh representation produced by the OBJ loader.

use corelib::{Vec2, Vec3};

/// One corner of a face: indices into the raw position/uv/normal
/// arrays, already normalized to 0-based. `None` means the source had
/// no entry (or a non-positive index) for that slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CornerRef {
    pub vertex: Option<usize>,
    pub uv: Option<usize>,
    pub normal: Option<usize>,
}

impl CornerRef {
    pub fn new(vertex: Option<usize>, uv: Option<usize>, normal: Option<usize>) -> Self {
        Self { vertex, uv, normal }
    }
}

/// A triangle after fan triangulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Face {
    pub corners: [CornerRef; 3],
}

/// A named `o`/`g` section and the triangles parsed under it.
#[derive(Clone, Debug)]
pub struct ObjectGroup {
    pub name: String,
    pub faces: Vec<Face>,
}

impl ObjectGroup {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
        }
    }
}

/// Welded mesh buffer: parallel unique vertex columns plus a flat
/// triangle index list. Every index is `< positions.len()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if the columns are parallel and every triangle
    /// index points inside them.
    pub fn is_valid(&self) -> bool {
        let n = self.positions.len();
        self.normals.len() == n
            && self.uvs.len() == n
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }
}

/// One welded buffer per source group, keeping the group's name.
#[derive(Clone, Debug)]
pub struct MeshGroup {
    pub name: String,
    pub mesh: MeshBuffer,
}

/// Everything parsed out of one OBJ source, groups in source order.
/// `groups` is never empty: a file without any `o`/`g`/face directives
/// still yields a single (possibly empty) group named after the model.
#[derive(Clone, Debug)]
pub struct ParsedModel {
    pub name: String,
    pub groups: Vec<MeshGroup>,
}

impl ParsedModel {
    /// Total unique vertices across all groups.
    pub fn vertex_count(&self) -> usize {
        self.groups.iter().map(|g| g.mesh.positions.len()).sum()
    }

    /// Total triangles across all groups.
    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.mesh.triangle_count()).sum()
    }
}
