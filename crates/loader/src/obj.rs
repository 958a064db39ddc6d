//! Line-oriented OBJ parser producing welded per-group mesh buffers.
//!
//! The grammar is handled permissively: malformed numeric tokens scan
//! to zero, degenerate faces are dropped, and unknown directives are
//! ignored. Only I/O failures abort a parse. Material directives
//! (`mtllib`/`usemtl`) are recognized but not parsed. Relative
//! (negative) face indices are not supported; a leading `-` makes the
//! index resolve to absent.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use corelib::{LoadError, Vec2, Vec3, vec2, vec3};

use crate::mesh::{CornerRef, Face, MeshBuffer, MeshGroup, ObjectGroup, ParsedModel};
use crate::scan::{scan_float, scan_uint};
use crate::weld::{DEFAULT_MERGE_THRESHOLD, VertexWelder};

/// Parser configuration.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Welding quantization granularity; `0.0` selects the default.
    pub merge_threshold: f32,
    /// Expected vertex count, used to pre-reserve the raw geometry
    /// arrays. `0` disables pre-reservation.
    pub expected_vertices: usize,
    /// Name for the model and its unnamed groups. Path loads default
    /// to the file stem when this is `None`.
    pub base_name: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
            expected_vertices: 0,
            base_name: None,
        }
    }
}

/// Load an OBJ model from a file path.
pub fn load_obj_from_path(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<ParsedModel, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("loading OBJ from {}", path.display());

    let base_name = options.base_name.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string())
    });
    parse_obj(BufReader::new(file), &base_name, options)
}

/// Load an OBJ model from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(
    reader: R,
    options: &LoadOptions,
) -> Result<ParsedModel, LoadError> {
    let base_name = options.base_name.clone().unwrap_or_else(|| "model".to_string());
    parse_obj(reader, &base_name, options)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str, options: &LoadOptions) -> Result<ParsedModel, LoadError> {
    load_obj_from_reader(io::Cursor::new(contents), options)
}

/// Append-only raw geometry shared by every group in the file.
struct RawGeometry {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
}

impl RawGeometry {
    fn with_capacity(reserve: usize) -> Self {
        Self {
            positions: Vec::with_capacity(reserve),
            normals: Vec::with_capacity(reserve),
            uvs: Vec::with_capacity(reserve),
        }
    }

    fn push_position(&mut self, line: &[u8]) {
        let (x, c) = scan_float(line, 2);
        let (y, c) = scan_float(line, c);
        let (z, _) = scan_float(line, c);
        self.positions.push(vec3(x, y, z));
    }

    fn push_normal(&mut self, line: &[u8]) {
        let (x, c) = scan_float(line, 3);
        let (y, c) = scan_float(line, c);
        let (z, _) = scan_float(line, c);
        self.normals.push(vec3(x, y, z));
    }

    fn push_uv(&mut self, line: &[u8]) {
        let (u, c) = scan_float(line, 3);
        let (v, _) = scan_float(line, c);
        self.uvs.push(vec2(u, v));
    }
}

fn parse_obj<R: BufRead>(
    reader: R,
    base_name: &str,
    options: &LoadOptions,
) -> Result<ParsedModel, LoadError> {
    let mut raw = RawGeometry::with_capacity(options.expected_vertices);
    let mut groups: Vec<ObjectGroup> = Vec::new();
    let mut current = ObjectGroup::named(base_name);

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| LoadError::Read {
            line: line_no + 1,
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        current = classify_line(trimmed.as_bytes(), &mut raw, &mut groups, current);
    }

    // Close the trailing group; keep it even when empty if it is the
    // only one, so the result always has at least one group.
    if !current.faces.is_empty() || groups.is_empty() {
        groups.push(current);
    }

    let mut mesh_groups = Vec::with_capacity(groups.len());
    for group in groups {
        let mesh = weld_group(&group.faces, &raw, options.merge_threshold)?;
        mesh_groups.push(MeshGroup {
            name: group.name,
            mesh,
        });
    }

    let model = ParsedModel {
        name: base_name.to_string(),
        groups: mesh_groups,
    };
    log::info!(
        "parsed '{}': {} group(s), {} unique vertices, {} triangles",
        model.name,
        model.groups.len(),
        model.vertex_count(),
        model.triangle_count()
    );
    Ok(model)
}

/// Dispatch one trimmed, non-empty, non-comment line. The current
/// group is threaded through as a value; `o`/`g` directives close it
/// into `groups` (when face-bearing) and start a fresh one.
fn classify_line(
    line: &[u8],
    raw: &mut RawGeometry,
    groups: &mut Vec<ObjectGroup>,
    mut current: ObjectGroup,
) -> ObjectGroup {
    match line[0] {
        b'v' if line.len() > 1 => match line[1] {
            b' ' => raw.push_position(line),
            b'n' => raw.push_normal(line),
            b't' => raw.push_uv(line),
            _ => {}
        },
        b'f' if line.len() > 1 && line[1] == b' ' => {
            let polygon = parse_face(&line[2..]);
            triangulate_into(&polygon, &mut current.faces);
        }
        b'o' | b'g' if line.len() > 2 => {
            if !current.faces.is_empty() {
                groups.push(current);
            }
            current = ObjectGroup::named(extract_name(&line[2..]));
        }
        b'm' | b'u' => {
            // mtllib/usemtl: materials are out of scope.
            log::trace!("ignoring material directive: {}", String::from_utf8_lossy(line));
        }
        _ => {}
    }
    current
}

fn extract_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

/// Parse the corner list after `f `. Each corner is `v`, `v/t`,
/// `v/t/n` or `v//n`; indices are 1-based in source and normalized to
/// 0-based here, with non-positive or missing values mapping to absent.
fn parse_face(line: &[u8]) -> Vec<CornerRef> {
    let mut corners: Vec<CornerRef> = Vec::with_capacity(8);
    let mut cursor = 0;

    while cursor < line.len() {
        while cursor < line.len() && line[cursor] == b' ' {
            cursor += 1;
        }
        if cursor >= line.len() {
            break;
        }
        let start = cursor;

        // Relative (negative) indices are unsupported: consume the
        // sign so the scan can advance, then treat the index as absent.
        let negative = line[cursor] == b'-';
        if negative {
            cursor += 1;
        }
        let (num, next) = scan_uint(line, cursor);
        cursor = next;
        let vertex = if negative { None } else { positive_index(num) };

        let mut uv = None;
        let mut normal = None;
        if cursor < line.len() && line[cursor] == b'/' {
            cursor += 1;
            if cursor < line.len() && line[cursor] != b'/' {
                let (num, next) = scan_uint(line, cursor);
                cursor = next;
                uv = positive_index(num);
            }
            if cursor < line.len() && line[cursor] == b'/' {
                cursor += 1;
                if cursor < line.len() && line[cursor].is_ascii_digit() {
                    let (num, next) = scan_uint(line, cursor);
                    cursor = next;
                    normal = positive_index(num);
                }
            }
        }

        if cursor == start {
            // Token the scanner cannot advance past; drop the rest of
            // the line rather than loop on it.
            break;
        }
        corners.push(CornerRef::new(vertex, uv, normal));
    }

    corners
}

fn positive_index(num: u64) -> Option<usize> {
    if num > 0 { Some((num - 1) as usize) } else { None }
}

/// Fan-triangulate a polygon: `n` corners become `n - 2` triangles all
/// sharing the first corner. Fewer than 3 corners produce nothing.
fn triangulate_into(polygon: &[CornerRef], faces: &mut Vec<Face>) {
    if polygon.len() < 3 {
        return;
    }
    for i in 1..polygon.len() - 1 {
        faces.push(Face {
            corners: [polygon[0], polygon[i], polygon[i + 1]],
        });
    }
}

/// Weld every corner of a group's faces into one deduplicated buffer.
/// Each group gets its own welder, so identical geometry in different
/// groups never merges.
fn weld_group(
    faces: &[Face],
    raw: &RawGeometry,
    merge_threshold: f32,
) -> Result<MeshBuffer, LoadError> {
    let mut welder = VertexWelder::new(merge_threshold, faces.len());
    let mut indices = Vec::with_capacity(faces.len() * 3);
    for face in faces {
        for corner in face.corners {
            indices.push(welder.weld(corner, &raw.positions, &raw.normals, &raw.uvs)?);
        }
    }
    Ok(welder.finish(indices))
}
