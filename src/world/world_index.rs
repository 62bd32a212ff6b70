//! World Index - conversions between world space and the voxel grid
//!
//! Voxel `i` of chunk `c` is centred at `(c * size + i) * cell_scale` on each
//! axis and spans half a cell either side of that centre. Chunk coordinates
//! are derived by snapping a position to its cell first and then dividing
//! the cell by the chunk size.

use super::core::{ChunkPos, ChunkSize, Facing, VoxelIndex};
use super::error::{ConfigError, ConfigResult};
use super::settings::{CellRounding, WorldSettings};
use cgmath::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldIndex {
    chunk_size: ChunkSize,
    cell_scale: Vector3<f32>,
    rounding: CellRounding,
}

impl WorldIndex {
    /// Fails on a non-positive chunk side or a non-finite/non-positive scale
    pub fn new(
        chunk_size: ChunkSize,
        cell_scale: Vector3<f32>,
        rounding: CellRounding,
    ) -> ConfigResult<Self> {
        if !chunk_size.is_valid() {
            return Err(ConfigError::InvalidChunkSize(chunk_size));
        }
        let scale = [cell_scale.x, cell_scale.y, cell_scale.z];
        if scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ConfigError::InvalidCellScale(scale));
        }

        Ok(Self {
            chunk_size,
            cell_scale,
            rounding,
        })
    }

    pub fn from_settings(settings: &WorldSettings) -> ConfigResult<Self> {
        let [sx, sy, sz] = settings.cell_scale;
        Self::new(settings.chunk_size, Vector3::new(sx, sy, sz), settings.rounding)
    }

    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    pub fn cell_scale(&self) -> Vector3<f32> {
        self.cell_scale
    }

    /// Global cell containing `position`
    fn cell(&self, position: Point3<f32>) -> [i32; 3] {
        [
            self.rounding.round(position.x / self.cell_scale.x),
            self.rounding.round(position.y / self.cell_scale.y),
            self.rounding.round(position.z / self.cell_scale.z),
        ]
    }

    /// Chunk that owns the cell containing `position`.
    ///
    /// Cells are divided with floor division, so cell -3 belongs to chunk -1
    /// for a chunk size of 16. Engines that truncate toward zero put it in
    /// chunk 0; chunk coordinates imported from such engines differ for
    /// every negative cell that is not a multiple of the chunk size.
    pub fn position_to_chunk_pos(&self, position: Point3<f32>) -> ChunkPos {
        let [cx, cy, cz] = self.cell(position);
        ChunkPos {
            x: cx.div_euclid(self.chunk_size.x),
            y: cy.div_euclid(self.chunk_size.y),
            z: cz.div_euclid(self.chunk_size.z),
        }
    }

    /// Index of the cell containing `position`, relative to `chunk`.
    ///
    /// The result is only inside `[0, size)` when `chunk` actually owns the
    /// cell.
    pub fn position_to_voxel_index(&self, chunk: ChunkPos, position: Point3<f32>) -> VoxelIndex {
        let [cx, cy, cz] = self.cell(position);
        VoxelIndex {
            x: cx - chunk.x * self.chunk_size.x,
            y: cy - chunk.y * self.chunk_size.y,
            z: cz - chunk.z * self.chunk_size.z,
        }
    }

    /// Index of the voxel behind (or, with `adjacent`, in front of) a surface
    /// point with the given normal.
    ///
    /// The normal is snapped to its dominant axis and the point is pushed
    /// half a cell along it before snapping to a cell. A degenerate normal
    /// leaves the point where it is.
    pub fn surface_to_voxel_index(
        &self,
        chunk: ChunkPos,
        point: Point3<f32>,
        normal: Vector3<f32>,
        adjacent: bool,
    ) -> VoxelIndex {
        let Some(facing) = Facing::from_normal(normal) else {
            return self.position_to_voxel_index(chunk, point);
        };

        let axis = facing.normal();
        let half_cell = Vector3::new(
            axis.x * self.cell_scale.x,
            axis.y * self.cell_scale.y,
            axis.z * self.cell_scale.z,
        ) * 0.5;

        let probe = if adjacent {
            point + half_cell
        } else {
            point - half_cell
        };
        self.position_to_voxel_index(chunk, probe)
    }

    /// World-space centre of a voxel
    pub fn voxel_index_to_position(&self, chunk: ChunkPos, index: VoxelIndex) -> Point3<f32> {
        Point3::new(
            (chunk.x * self.chunk_size.x + index.x) as f32 * self.cell_scale.x,
            (chunk.y * self.chunk_size.y + index.y) as f32 * self.cell_scale.y,
            (chunk.z * self.chunk_size.z + index.z) as f32 * self.cell_scale.z,
        )
    }

    /// World-space centre of the chunk's voxel (0, 0, 0)
    pub fn chunk_origin(&self, chunk: ChunkPos) -> Point3<f32> {
        self.voxel_index_to_position(chunk, VoxelIndex::default())
    }

    /// Re-express `index` relative to the chunk that owns it
    pub fn normalize(&self, chunk: ChunkPos, index: VoxelIndex) -> (ChunkPos, VoxelIndex) {
        let size = self.chunk_size;
        let owner = chunk.offset(
            index.x.div_euclid(size.x),
            index.y.div_euclid(size.y),
            index.z.div_euclid(size.z),
        );
        let local = VoxelIndex {
            x: index.x.rem_euclid(size.x),
            y: index.y.rem_euclid(size.y),
            z: index.z.rem_euclid(size.z),
        };
        (owner, local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> WorldIndex {
        WorldIndex::new(
            ChunkSize::cubic(16),
            Vector3::new(1.0, 1.0, 1.0),
            CellRounding::TiesToEven,
        )
        .unwrap()
    }

    #[test]
    fn test_position_to_chunk_examples() {
        let index = index();
        assert_eq!(
            index.position_to_chunk_pos(Point3::new(16.4, 0.0, 0.0)),
            ChunkPos::new(1, 0, 0)
        );
        assert_eq!(
            index.position_to_chunk_pos(Point3::new(15.4, 0.0, 0.0)),
            ChunkPos::new(0, 0, 0)
        );
    }

    #[test]
    fn test_chunk_boundary_uses_rounding_not_floor() {
        let index = index();
        // Floor would put 15.6 in chunk 0
        assert_eq!(
            index.position_to_chunk_pos(Point3::new(15.6, 0.0, 0.0)),
            ChunkPos::new(1, 0, 0)
        );
        // Ties go to the even cell: 15.5 -> 16, 14.5 -> 14
        assert_eq!(
            index.position_to_chunk_pos(Point3::new(15.5, 0.0, 0.0)),
            ChunkPos::new(1, 0, 0)
        );
        assert_eq!(
            index.position_to_chunk_pos(Point3::new(14.5, 0.0, 0.0)),
            ChunkPos::new(0, 0, 0)
        );
    }

    #[test]
    fn test_away_from_zero_rounding() {
        let index = WorldIndex::new(
            ChunkSize::cubic(16),
            Vector3::new(1.0, 1.0, 1.0),
            CellRounding::AwayFromZero,
        )
        .unwrap();
        assert_eq!(
            index.position_to_chunk_pos(Point3::new(15.5, 0.0, 0.0)),
            ChunkPos::new(1, 0, 0)
        );
        assert_eq!(
            index.position_to_chunk_pos(Point3::new(-0.5, 0.0, 0.0)),
            ChunkPos::new(-1, 0, 0)
        );
    }

    #[test]
    fn test_negative_positions() {
        let index = index();
        assert_eq!(
            index.position_to_chunk_pos(Point3::new(-0.6, 0.0, -16.0)),
            ChunkPos::new(-1, 0, -1)
        );
        let chunk = ChunkPos::new(-1, 0, -1);
        assert_eq!(
            index.position_to_voxel_index(chunk, Point3::new(-0.6, 0.0, -16.0)),
            VoxelIndex::new(15, 0, 0)
        );
    }

    #[test]
    fn test_scaled_cells() {
        let index = WorldIndex::new(
            ChunkSize::new(8, 4, 8),
            Vector3::new(0.5, 2.0, 0.5),
            CellRounding::TiesToEven,
        )
        .unwrap();
        // x: 4.1 / 0.5 = 8.2 -> cell 8 -> chunk 1; y: 9.0 / 2.0 = 4.5 -> 4 -> chunk 1
        let pos = Point3::new(4.1, 9.0, 1.0);
        let chunk = index.position_to_chunk_pos(pos);
        assert_eq!(chunk, ChunkPos::new(1, 1, 0));
        assert_eq!(index.position_to_voxel_index(chunk, pos), VoxelIndex::new(0, 0, 2));
    }

    #[test]
    fn test_voxel_center_round_trip() {
        let index = WorldIndex::new(
            ChunkSize::new(16, 8, 4),
            Vector3::new(0.25, 1.5, 3.0),
            CellRounding::TiesToEven,
        )
        .unwrap();
        for chunk in [ChunkPos::new(0, 0, 0), ChunkPos::new(-3, 2, 7)] {
            for voxel in [
                VoxelIndex::new(0, 0, 0),
                VoxelIndex::new(15, 7, 3),
                VoxelIndex::new(5, 3, 1),
            ] {
                let center = index.voxel_index_to_position(chunk, voxel);
                assert_eq!(index.position_to_chunk_pos(center), chunk);
                assert_eq!(index.position_to_voxel_index(chunk, center), voxel);
            }
        }
    }

    #[test]
    fn test_surface_index_and_adjacent() {
        let index = index();
        let chunk = ChunkPos::new(0, 0, 0);
        // Top face of voxel (3, 2, 5)
        let point = Point3::new(3.2, 2.5, 4.9);
        let up = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(
            index.surface_to_voxel_index(chunk, point, up, false),
            VoxelIndex::new(3, 2, 5)
        );
        assert_eq!(
            index.surface_to_voxel_index(chunk, point, up, true),
            VoxelIndex::new(3, 3, 5)
        );
    }

    #[test]
    fn test_surface_index_snaps_tilted_normal() {
        let index = index();
        let chunk = ChunkPos::new(0, 0, 0);
        // Side face x = 6.5 of voxel (6, 1, 1), normal mostly +X
        let point = Point3::new(6.5, 1.3, 0.8);
        let normal = Vector3::new(0.9, 0.3, 0.1);
        assert_eq!(
            index.surface_to_voxel_index(chunk, point, normal, false),
            VoxelIndex::new(6, 1, 1)
        );
        assert_eq!(
            index.surface_to_voxel_index(chunk, point, normal, true),
            VoxelIndex::new(7, 1, 1)
        );
    }

    #[test]
    fn test_adjacent_across_chunk_border() {
        let index = index();
        let chunk = ChunkPos::new(1, 0, 0);
        // West face of chunk 1's voxel 0, seen from chunk 0
        let point = Point3::new(15.5, 4.0, 4.0);
        let west = Vector3::new(-1.0, 0.0, 0.0);
        assert_eq!(
            index.surface_to_voxel_index(chunk, point, west, false),
            VoxelIndex::new(0, 4, 4)
        );
        let adjacent = index.surface_to_voxel_index(chunk, point, west, true);
        assert_eq!(adjacent, VoxelIndex::new(-1, 4, 4));
        assert_eq!(
            index.normalize(chunk, adjacent),
            (ChunkPos::new(0, 0, 0), VoxelIndex::new(15, 4, 4))
        );
    }

    #[test]
    fn test_normalize_in_bounds_is_identity() {
        let index = index();
        let chunk = ChunkPos::new(2, -1, 0);
        let voxel = VoxelIndex::new(3, 15, 0);
        assert_eq!(index.normalize(chunk, voxel), (chunk, voxel));
        assert_eq!(
            index.normalize(chunk, VoxelIndex::new(16, -1, 33)),
            (ChunkPos::new(3, -2, 2), VoxelIndex::new(0, 15, 1))
        );
    }

    #[test]
    fn test_chunk_origin() {
        let index = index();
        assert_eq!(
            index.chunk_origin(ChunkPos::new(1, -1, 2)),
            Point3::new(16.0, -16.0, 32.0)
        );
    }

    #[test]
    fn test_new_rejects_invalid_grid() {
        let unit = Vector3::new(1.0, 1.0, 1.0);
        assert!(matches!(
            WorldIndex::new(ChunkSize::new(16, 0, 16), unit, CellRounding::TiesToEven),
            Err(ConfigError::InvalidChunkSize(_))
        ));
        assert!(matches!(
            WorldIndex::new(
                ChunkSize::cubic(16),
                Vector3::new(1.0, f32::NAN, 1.0),
                CellRounding::TiesToEven
            ),
            Err(ConfigError::InvalidCellScale(_))
        ));
        assert!(WorldIndex::new(ChunkSize::cubic(16), -unit, CellRounding::TiesToEven).is_err());
    }

    #[test]
    fn test_negative_cells_use_floor_division() {
        let index = index();
        // Cell -3 is chunk -1, local 13; truncation would give chunk 0
        let pos = Point3::new(-3.2, 0.0, 0.0);
        let chunk = index.position_to_chunk_pos(pos);
        assert_eq!(chunk, ChunkPos::new(-1, 0, 0));
        assert_eq!(index.position_to_voxel_index(chunk, pos), VoxelIndex::new(13, 0, 0));
    }
}
