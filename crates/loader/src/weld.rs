//! Spatial vertex welder: merges face corners whose resolved
//! position/normal/uv agree within a tolerance into one shared vertex.
//!
//! Corners hash into buckets keyed on lattice coordinates quantized by
//! the merge threshold; a bucket hit still has to pass a per-component
//! absolute-distance check, so hash collisions across quantization
//! boundaries never merge incorrectly. One welder serves one object
//! group: geometry is never shared across group boundaries.

use std::collections::HashMap;

use corelib::{LoadError, Vec2, Vec3};

use crate::mesh::{CornerRef, MeshBuffer};

/// Quantization granularity used when the caller passes `0.0`.
pub const DEFAULT_MERGE_THRESHOLD: f32 = 1e-4;

/// Absolute per-component tolerance for the equality check on a
/// bucket hit. Intentionally looser than the default lattice step.
const WELD_EPSILON: f32 = 1e-3;

/// Index of the next unique vertex, refusing to truncate past `u32`.
fn next_index(unique_count: usize) -> Result<u32, LoadError> {
    u32::try_from(unique_count).map_err(|_| LoadError::VertexOverflow)
}

fn component_hash(q0: i64, q1: i64, q2: i64) -> i64 {
    (q0.wrapping_mul(73_856_093)) ^ (q1.wrapping_mul(19_349_663)) ^ (q2.wrapping_mul(83_492_791))
}

/// Deduplication index plus the unique vertex columns it guards.
pub struct VertexWelder {
    threshold: f32,
    buckets: HashMap<u64, Vec<u32>>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
}

impl VertexWelder {
    /// `reserve` hints the expected unique-vertex count; `0` skips
    /// pre-reservation.
    pub fn new(threshold: f32, reserve: usize) -> Self {
        let threshold = if threshold == 0.0 {
            DEFAULT_MERGE_THRESHOLD
        } else {
            threshold
        };
        Self {
            threshold,
            buckets: HashMap::with_capacity(reserve),
            positions: Vec::with_capacity(reserve),
            normals: Vec::with_capacity(reserve),
            uvs: Vec::with_capacity(reserve),
        }
    }

    /// Number of unique vertices registered so far.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Resolve a corner against the raw arrays and return its stable
    /// unique index, registering a new vertex on the first sighting.
    /// Absent or out-of-range references fall back to defaults:
    /// position zero, normal `+Y`, uv zero.
    pub fn weld(
        &mut self,
        corner: CornerRef,
        positions: &[Vec3],
        normals: &[Vec3],
        uvs: &[Vec2],
    ) -> Result<u32, LoadError> {
        let pos = corner
            .vertex
            .and_then(|i| positions.get(i))
            .copied()
            .unwrap_or(Vec3::ZERO);
        let normal = corner
            .normal
            .and_then(|i| normals.get(i))
            .copied()
            .unwrap_or(Vec3::Y);
        let uv = corner
            .uv
            .and_then(|i| uvs.get(i))
            .copied()
            .unwrap_or(Vec2::ZERO);

        self.weld_resolved(pos, normal, uv)
    }

    /// Weld an already-resolved vertex record. Amortized O(1).
    /// Fails only when the unique count no longer fits a `u32` index.
    pub fn weld_resolved(&mut self, pos: Vec3, normal: Vec3, uv: Vec2) -> Result<u32, LoadError> {
        let key = self.lattice_key(pos, normal, uv);

        let bucket = self.buckets.entry(key).or_default();
        for &candidate in bucket.iter() {
            let i = candidate as usize;
            if Self::matches(self.positions[i], self.normals[i], self.uvs[i], pos, normal, uv) {
                return Ok(candidate);
            }
        }

        let index = next_index(self.positions.len())?;
        self.positions.push(pos);
        self.normals.push(normal);
        self.uvs.push(uv);
        bucket.push(index);
        Ok(index)
    }

    /// Consume the welder, pairing its unique columns with the
    /// triangle index list assembled alongside it.
    pub fn finish(self, indices: Vec<u32>) -> MeshBuffer {
        MeshBuffer {
            positions: self.positions,
            normals: self.normals,
            uvs: self.uvs,
            indices,
        }
    }

    fn lattice_key(&self, pos: Vec3, normal: Vec3, uv: Vec2) -> u64 {
        let q = |v: f32| (v / self.threshold) as i64;
        let pos_hash = component_hash(q(pos.x), q(pos.y), q(pos.z));
        let norm_hash = component_hash(q(normal.x), q(normal.y), q(normal.z));
        let uv_hash = component_hash(q(uv.x), q(uv.y), 0);
        (pos_hash ^ (norm_hash << 1) ^ (uv_hash << 2)) as u64
    }

    fn matches(pa: Vec3, na: Vec3, ta: Vec2, pb: Vec3, nb: Vec3, tb: Vec2) -> bool {
        (pa.x - pb.x).abs() < WELD_EPSILON
            && (pa.y - pb.y).abs() < WELD_EPSILON
            && (pa.z - pb.z).abs() < WELD_EPSILON
            && (na.x - nb.x).abs() < WELD_EPSILON
            && (na.y - nb.y).abs() < WELD_EPSILON
            && (na.z - nb.z).abs() < WELD_EPSILON
            && (ta.x - tb.x).abs() < WELD_EPSILON
            && (ta.y - tb.y).abs() < WELD_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::vec3;

    fn corner(v: usize) -> CornerRef {
        CornerRef::new(Some(v), None, None)
    }

    #[test]
    fn identical_corners_share_an_index() {
        let positions = vec![vec3(1.0, 2.0, 3.0)];
        let mut welder = VertexWelder::new(0.0, 0);
        let a = welder.weld(corner(0), &positions, &[], &[]).unwrap();
        let b = welder.weld(corner(0), &positions, &[], &[]).unwrap();
        assert_eq!(a, b);
        assert_eq!(welder.len(), 1);
    }

    #[test]
    fn near_coincident_positions_merge() {
        let positions = vec![vec3(0.5, 0.5, 0.5), vec3(0.5000001, 0.5, 0.5)];
        let mut welder = VertexWelder::new(0.0, 0);
        let a = welder.weld(corner(0), &positions, &[], &[]).unwrap();
        let b = welder.weld(corner(1), &positions, &[], &[]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distant_positions_never_merge() {
        let positions = vec![vec3(0.0, 0.0, 0.0), vec3(0.01, 0.0, 0.0)];
        let mut welder = VertexWelder::new(0.0, 0);
        let a = welder.weld(corner(0), &positions, &[], &[]).unwrap();
        let b = welder.weld(corner(1), &positions, &[], &[]).unwrap();
        assert_ne!(a, b);
        assert_eq!(welder.len(), 2);
    }

    #[test]
    fn differing_normal_prevents_merge() {
        let positions = vec![vec3(1.0, 1.0, 1.0)];
        let normals = vec![vec3(0.0, 1.0, 0.0), vec3(1.0, 0.0, 0.0)];
        let mut welder = VertexWelder::new(0.0, 0);
        let a = welder
            .weld(CornerRef::new(Some(0), None, Some(0)), &positions, &normals, &[])
            .unwrap();
        let b = welder
            .weld(CornerRef::new(Some(0), None, Some(1)), &positions, &normals, &[])
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn absent_references_resolve_to_defaults() {
        let mut welder = VertexWelder::new(0.0, 0);
        welder.weld(CornerRef::default(), &[], &[], &[]).unwrap();
        let buffer = welder.finish(vec![]);
        assert_eq!(buffer.positions[0], Vec3::ZERO);
        assert_eq!(buffer.normals[0], Vec3::Y);
        assert_eq!(buffer.uvs[0], Vec2::ZERO);
    }

    #[test]
    fn out_of_range_reference_resolves_to_defaults() {
        let positions = vec![vec3(9.0, 9.0, 9.0)];
        let mut welder = VertexWelder::new(0.0, 0);
        welder.weld(CornerRef::new(Some(7), None, None), &positions, &[], &[]).unwrap();
        let buffer = welder.finish(vec![]);
        assert_eq!(buffer.positions[0], Vec3::ZERO);
    }

    #[test]
    fn welding_is_order_independent() {
        let positions = vec![vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0)];
        let mut forward = VertexWelder::new(0.0, 0);
        let f = [
            forward.weld(corner(0), &positions, &[], &[]).unwrap(),
            forward.weld(corner(1), &positions, &[], &[]).unwrap(),
            forward.weld(corner(0), &positions, &[], &[]).unwrap(),
        ];
        assert_eq!(f, [0, 1, 0]);

        let mut reverse = VertexWelder::new(0.0, 0);
        let r = [
            reverse.weld(corner(1), &positions, &[], &[]).unwrap(),
            reverse.weld(corner(0), &positions, &[], &[]).unwrap(),
            reverse.weld(corner(1), &positions, &[], &[]).unwrap(),
        ];
        assert_eq!(r, [0, 1, 0]);
        assert_eq!(forward.len(), reverse.len());
    }

    #[test]
    fn rewelding_a_welded_buffer_is_a_fixed_point() {
        let positions = vec![
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 2.0, 0.0),
        ];
        let mut first = VertexWelder::new(0.0, 0);
        for i in 0..positions.len() {
            first.weld(corner(i), &positions, &[], &[]).unwrap();
        }
        let buffer = first.finish(vec![]);
        assert_eq!(buffer.positions.len(), 3);

        let mut second = VertexWelder::new(0.0, 0);
        for i in 0..buffer.positions.len() {
            let idx = second
                .weld_resolved(buffer.positions[i], buffer.normals[i], buffer.uvs[i])
                .unwrap();
            assert_eq!(idx as usize, i);
        }
        let rewelded = second.finish(vec![]);
        assert_eq!(rewelded.positions, buffer.positions);
        assert_eq!(rewelded.normals, buffer.normals);
        assert_eq!(rewelded.uvs, buffer.uvs);
    }

    #[test]
    fn unique_index_conversion_is_guarded() {
        assert_eq!(next_index(0).unwrap(), 0);
        assert_eq!(next_index(u32::MAX as usize).unwrap(), u32::MAX);
        let err = next_index(u32::MAX as usize + 1).expect_err("must overflow");
        assert!(matches!(err, LoadError::VertexOverflow));
    }

    #[test]
    fn custom_threshold_widens_buckets() {
        let positions = vec![vec3(0.0, 0.0, 0.0), vec3(0.0004, 0.0, 0.0)];

        let mut strict = VertexWelder::new(1e-4, 0);
        let a = strict.weld(corner(0), &positions, &[], &[]).unwrap();
        let b = strict.weld(corner(1), &positions, &[], &[]).unwrap();
        // Different lattice cells under the default step.
        assert_ne!(a, b);

        let mut loose = VertexWelder::new(1.0, 0);
        let a = loose.weld(corner(0), &positions, &[], &[]).unwrap();
        let b = loose.weld(corner(1), &positions, &[], &[]).unwrap();
        assert_eq!(a, b);
    }
}
