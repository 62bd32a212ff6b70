//! World Context
//!
//! Everything a voxel query needs, built once at world initialization and
//! passed around by reference. Queries borrow the context immutably, so the
//! chunk set cannot change while one is running.

use super::core::{
    ChunkPos, Facing, Ray, RayQuery, TextureOffset, VoxelId, VoxelType, VoxelTypeRegistry,
};
use super::error::ConfigResult;
use super::raycast::{GridRayCaster, RaycastOutcome, VoxelInfo, VoxelRaycastResolver};
use super::settings::{WorldDefinition, WorldSettings};
use super::storage::{Chunk, ChunkLookup};
use super::world_index::WorldIndex;
use cgmath::{Point3, Vector3};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct WorldContext {
    settings: WorldSettings,
    index: WorldIndex,
    registry: VoxelTypeRegistry,
    chunks: ChunkLookup,
}

impl WorldContext {
    /// Validate settings and the voxel table. Failures are fatal.
    pub fn new(mut settings: WorldSettings, voxels: Vec<VoxelType>) -> ConfigResult<Self> {
        log::debug!("[WorldContext::new] Starting world initialization");

        settings.validate()?;
        let registry = VoxelTypeRegistry::new(voxels, settings.material_count)?;
        let index = WorldIndex::from_settings(&settings)?;
        let chunks = ChunkLookup::new(settings.chunk_size);

        log::info!(
            "[WorldContext::new] World ready: chunk_size={}, cell_scale={:?}, {} voxel types",
            settings.chunk_size,
            settings.cell_scale,
            registry.len()
        );

        Ok(Self {
            settings,
            index,
            registry,
            chunks,
        })
    }

    pub fn from_definition(definition: WorldDefinition) -> ConfigResult<Self> {
        Self::new(definition.settings, definition.voxels)
    }

    /// Load a TOML or JSON world definition and build the context
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_definition(WorldDefinition::load(path)?)
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn index(&self) -> &WorldIndex {
        &self.index
    }

    pub fn registry(&self) -> &VoxelTypeRegistry {
        &self.registry
    }

    pub fn chunks(&self) -> &ChunkLookup {
        &self.chunks
    }

    /// Mutable access for the host's chunk manager (spawn/despawn)
    pub fn chunks_mut(&mut self) -> &mut ChunkLookup {
        &mut self.chunks
    }

    /// Empty chunk sized for this world
    pub fn new_chunk(&self, pos: ChunkPos) -> Chunk {
        Chunk::new(pos, self.settings.chunk_size)
    }

    pub fn resolver(&self) -> VoxelRaycastResolver<'_> {
        VoxelRaycastResolver::new(
            &self.index,
            &self.chunks,
            &self.registry,
            self.settings.max_punch_through,
        )
    }

    /// Ray query over the resident voxel grid
    pub fn grid_caster(&self) -> GridRayCaster<'_> {
        GridRayCaster::new(&self.index, &self.chunks, &self.registry)
    }

    pub fn raycast<Q: RayQuery + ?Sized>(
        &self,
        query: &Q,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        range: f32,
        ignore_transparent: bool,
    ) -> Option<VoxelInfo> {
        self.resolver()
            .raycast(query, origin, direction, range, ignore_transparent)
    }

    pub fn raycast_ray<Q: RayQuery + ?Sized>(
        &self,
        query: &Q,
        ray: &Ray,
        range: f32,
        ignore_transparent: bool,
    ) -> Option<VoxelInfo> {
        self.resolver()
            .raycast_ray(query, ray, range, ignore_transparent)
    }

    pub fn raycast_traced<Q: RayQuery + ?Sized>(
        &self,
        query: &Q,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        range: f32,
        ignore_transparent: bool,
    ) -> RaycastOutcome {
        self.resolver()
            .raycast_traced(query, origin, direction, range, ignore_transparent)
    }

    /// Raycast using the built-in grid caster as the collision query
    pub fn raycast_grid(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        range: f32,
        ignore_transparent: bool,
    ) -> Option<VoxelInfo> {
        self.raycast(&self.grid_caster(), origin, direction, range, ignore_transparent)
    }

    pub fn position_to_chunk_pos(&self, position: Point3<f32>) -> ChunkPos {
        self.index.position_to_chunk_pos(position)
    }

    /// Resident chunk owning `position`
    pub fn position_to_chunk(&self, position: Point3<f32>) -> Option<&Chunk> {
        self.chunks.get_chunk(self.position_to_chunk_pos(position))
    }

    /// Voxel containing a point, without a ray. `None` when its chunk is
    /// not resident. Both indices are the same voxel.
    pub fn position_to_voxel_info(&self, position: Point3<f32>) -> Option<VoxelInfo> {
        let chunk = self.position_to_chunk(position)?.position();
        let index = self.index.position_to_voxel_index(chunk, position);
        Some(VoxelInfo {
            index,
            adjacent: index,
            chunk,
        })
    }

    /// World-space centre of the voxel a `VoxelInfo` points at
    pub fn voxel_info_to_position(&self, info: &VoxelInfo) -> Point3<f32> {
        self.index.voxel_index_to_position(info.chunk, info.index)
    }

    /// Id of the voxel a `VoxelInfo` points at, `None` if its chunk is gone
    pub fn voxel_id(&self, info: &VoxelInfo) -> Option<VoxelId> {
        self.chunks.voxel_at(&self.index, info.chunk, info.index)
    }

    /// Id of the voxel in front of the struck face
    pub fn adjacent_voxel_id(&self, info: &VoxelInfo) -> Option<VoxelId> {
        self.chunks.voxel_at(&self.index, info.chunk, info.adjacent)
    }

    pub fn voxel_type(&self, id: VoxelId) -> &VoxelType {
        self.registry.get_type(id)
    }

    pub fn texture_offset(&self, id: VoxelId, facing: Facing) -> TextureOffset {
        self.registry.texture_offset(id, facing)
    }
}
