//! Chunk Lookup - the set of currently resident chunks
//!
//! Spawning and despawning are decided by the host's chunk manager; it
//! drives `insert`/`remove`. Everything else here is read access. A missing
//! chunk is a normal answer, not an error.

use super::chunk::Chunk;
use crate::world::core::{ChunkPos, ChunkSize, VoxelId, VoxelIndex};
use crate::world::error::{WorldError, WorldResult};
use crate::world::world_index::WorldIndex;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct ChunkLookup {
    chunk_size: ChunkSize,
    chunks: FxHashMap<ChunkPos, Chunk>,
}

impl ChunkLookup {
    /// Every resident chunk must have `chunk_size`
    pub fn new(chunk_size: ChunkSize) -> Self {
        Self {
            chunk_size,
            chunks: FxHashMap::default(),
        }
    }

    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    pub fn get_chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn get_chunk_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    /// Make a chunk resident, returning any chunk it replaced.
    ///
    /// A chunk whose size differs from the world's is refused.
    pub fn insert(&mut self, chunk: Chunk) -> WorldResult<Option<Chunk>> {
        let pos = chunk.position();
        if chunk.size() != self.chunk_size {
            let err = WorldError::ChunkSizeMismatch {
                pos,
                expected: self.chunk_size,
                found: chunk.size(),
            };
            log::warn!("[ChunkLookup::insert] {}", err);
            return Err(err);
        }

        log::trace!("[ChunkLookup::insert] Chunk {} resident", pos);
        Ok(self.chunks.insert(pos, chunk))
    }

    /// Drop a chunk from the resident set
    pub fn remove(&mut self, pos: ChunkPos) -> Option<Chunk> {
        log::trace!("[ChunkLookup::remove] Chunk {} despawned", pos);
        self.chunks.remove(&pos)
    }

    pub fn is_resident(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn resident_positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    /// Voxel addressed relative to `chunk`; the index may reach into a
    /// neighbouring chunk. `None` when the owning chunk is not resident.
    pub fn voxel_at(
        &self,
        index: &WorldIndex,
        chunk: ChunkPos,
        voxel: VoxelIndex,
    ) -> Option<VoxelId> {
        let (owner, local) = index.normalize(chunk, voxel);
        self.get_chunk(owner)?.get_voxel(local)
    }

    /// Set a voxel addressed relative to `chunk`, returning the replaced id
    pub fn set_voxel_at(
        &mut self,
        index: &WorldIndex,
        chunk: ChunkPos,
        voxel: VoxelIndex,
        id: VoxelId,
    ) -> WorldResult<VoxelId> {
        let (owner, local) = index.normalize(chunk, voxel);
        self.get_chunk_mut(owner)
            .ok_or(WorldError::ChunkNotResident { pos: owner })?
            .set_voxel(local, id)
    }
}
