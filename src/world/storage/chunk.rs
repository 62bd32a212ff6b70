//! Chunk voxel storage
//!
//! A flat array of voxel ids laid out x fastest, then y, then z.

use crate::world::core::{ChunkPos, ChunkSize, VoxelId, VoxelIndex};
use crate::world::error::{WorldError, WorldResult};

#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    position: ChunkPos,
    size: ChunkSize,
    voxels: Vec<VoxelId>,
}

impl Chunk {
    /// Create new chunk filled with empty voxels
    pub fn new(position: ChunkPos, size: ChunkSize) -> Self {
        Self::filled(position, size, VoxelId::EMPTY)
    }

    /// Create chunk filled with a specific voxel
    pub fn filled(position: ChunkPos, size: ChunkSize, voxel: VoxelId) -> Self {
        Self {
            position,
            size,
            voxels: vec![voxel; size.volume()],
        }
    }

    /// Wrap voxel data produced elsewhere (generator, loader)
    pub fn from_voxels(
        position: ChunkPos,
        size: ChunkSize,
        voxels: Vec<VoxelId>,
    ) -> WorldResult<Self> {
        if voxels.len() != size.volume() {
            return Err(WorldError::VoxelCountMismatch {
                expected: size.volume(),
                found: voxels.len(),
            });
        }
        Ok(Self {
            position,
            size,
            voxels,
        })
    }

    /// Decode raw voxel data: native-endian `u16` ids in storage order.
    ///
    /// The unset marker is kept as-is and reads back as empty.
    pub fn from_bytes(position: ChunkPos, size: ChunkSize, bytes: &[u8]) -> WorldResult<Self> {
        let id_size = std::mem::size_of::<VoxelId>();
        if bytes.len() % id_size != 0 {
            return Err(WorldError::VoxelCountMismatch {
                expected: size.volume() * id_size,
                found: bytes.len(),
            });
        }
        let voxels: Vec<VoxelId> = bytemuck::pod_collect_to_vec(bytes);
        Self::from_voxels(position, size, voxels)
    }

    /// Raw bytes in the same layout `from_bytes` accepts
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.voxels)
    }

    pub fn position(&self) -> ChunkPos {
        self.position
    }

    pub fn size(&self) -> ChunkSize {
        self.size
    }

    pub fn voxels(&self) -> &[VoxelId] {
        &self.voxels
    }

    /// Voxel at a local index, `None` outside the chunk.
    /// The unset marker reads as empty.
    pub fn get_voxel(&self, index: VoxelIndex) -> Option<VoxelId> {
        self.size
            .linear_index(index)
            .map(|i| self.voxels[i].canonical())
    }

    /// Set a voxel, returning the id it replaced
    pub fn set_voxel(&mut self, index: VoxelIndex, voxel: VoxelId) -> WorldResult<VoxelId> {
        let i = self
            .size
            .linear_index(index)
            .ok_or(WorldError::VoxelOutOfBounds {
                index,
                size: self.size,
            })?;
        Ok(std::mem::replace(&mut self.voxels[i], voxel).canonical())
    }

    pub fn fill(&mut self, voxel: VoxelId) {
        self.voxels.fill(voxel);
    }

    /// True when every voxel is empty
    pub fn is_empty(&self) -> bool {
        self.voxels.iter().all(|v| v.is_empty())
    }
}
