//! Grid ray caster
//!
//! A [`RayQuery`] that walks the voxel grid of the resident chunks
//! (Amanatides & Woo traversal) and treats every voxel with a collider as a
//! unit cube. Hosts without a physics engine can hand this to the raycast
//! resolver directly.

use crate::world::core::{ChunkPos, HitSurface, RayHit, RayQuery, VoxelIndex, VoxelTypeRegistry};
use crate::world::storage::ChunkLookup;
use crate::world::world_index::WorldIndex;
use cgmath::{InnerSpace, Point3, Vector3};

/// Bound for unbounded casts through empty space
const MAX_CELL_STEPS: usize = 1 << 16;

/// Cell coordinate range representable as `i32`
const CELL_MIN: f32 = i32::MIN as f32;
const CELL_MAX: f32 = i32::MAX as f32;

pub struct GridRayCaster<'w> {
    index: &'w WorldIndex,
    chunks: &'w ChunkLookup,
    registry: &'w VoxelTypeRegistry,
}

impl<'w> GridRayCaster<'w> {
    pub fn new(
        index: &'w WorldIndex,
        chunks: &'w ChunkLookup,
        registry: &'w VoxelTypeRegistry,
    ) -> Self {
        Self {
            index,
            chunks,
            registry,
        }
    }

    /// Owning chunk of a global cell if that cell holds a collider
    fn collider_at(&self, cell: [i32; 3]) -> Option<ChunkPos> {
        let size = self.index.chunk_size();
        let chunk = ChunkPos::new(
            cell[0].div_euclid(size.x),
            cell[1].div_euclid(size.y),
            cell[2].div_euclid(size.z),
        );
        let local = VoxelIndex::new(
            cell[0].rem_euclid(size.x),
            cell[1].rem_euclid(size.y),
            cell[2].rem_euclid(size.z),
        );
        let voxel = self.chunks.get_chunk(chunk)?.get_voxel(local)?;
        self.registry.has_collider(voxel).then_some(chunk)
    }
}

impl RayQuery for GridRayCaster<'_> {
    fn cast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit> {
        let length2 = direction.magnitude2();
        if !length2.is_finite() || length2 == 0.0 || !(max_distance >= 0.0) {
            return None;
        }
        let direction = direction.normalize();
        let scale = self.index.cell_scale();

        // Cell space shifted by half a cell so cell k covers [k, k + 1)
        let start = [
            origin.x / scale.x + 0.5,
            origin.y / scale.y + 0.5,
            origin.z / scale.z + 0.5,
        ];
        let dir = [
            direction.x / scale.x,
            direction.y / scale.y,
            direction.z / scale.z,
        ];

        let mut cell = [0i32; 3];
        let mut step = [0i32; 3];
        let mut t_max = [f32::INFINITY; 3];
        let mut t_delta = [f32::INFINITY; 3];

        for axis in 0..3 {
            let u = start[axis];
            let d = dir[axis];
            // Cells are i32; anything outside that range cannot hold a voxel
            if !(u >= CELL_MIN && u < CELL_MAX) {
                log::debug!(
                    "[GridRayCaster::cast] Origin {:?} is outside the addressable grid",
                    origin
                );
                return None;
            }

            let floor = u.floor() as i32;
            // On a boundary, the origin belongs to the cell the ray is leaving
            cell[axis] = if u == u.floor() && d > 0.0 {
                floor.checked_sub(1)?
            } else {
                floor
            };

            if d > 0.0 {
                step[axis] = 1;
                t_max[axis] = (cell[axis] as f32 + 1.0 - u) / d;
                t_delta[axis] = 1.0 / d;
            } else if d < 0.0 {
                step[axis] = -1;
                t_max[axis] = (cell[axis] as f32 - u) / d;
                t_delta[axis] = -1.0 / d;
            }
        }

        for _ in 0..MAX_CELL_STEPS {
            let axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
                0
            } else if t_max[1] <= t_max[2] {
                1
            } else {
                2
            };

            let t = t_max[axis];
            if !t.is_finite() || t < 0.0 || t > max_distance {
                return None;
            }

            cell[axis] = cell[axis].checked_add(step[axis])?;
            t_max[axis] += t_delta[axis];

            if let Some(chunk) = self.collider_at(cell) {
                let mut normal = Vector3::new(0.0, 0.0, 0.0);
                normal[axis] = -step[axis] as f32;
                return Some(RayHit {
                    point: origin + direction * t,
                    normal,
                    distance: t,
                    surface: HitSurface::Chunk(chunk),
                });
            }
        }

        log::debug!(
            "[GridRayCaster::cast] Gave up after {} cells from {:?}",
            MAX_CELL_STEPS,
            origin
        );
        None
    }
}
