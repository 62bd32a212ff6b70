// Hearth Voxel - voxel world queries
//
// Chunk/voxel indexing, resident chunk lookup, voxel type registry and
// voxel raycasting with transparent punch-through. Collision queries,
// chunk streaming and rendering belong to the host; they plug in through
// `RayQuery` and `ChunkLookup`.
//
// Typical setup:
// - load a `WorldDefinition` (TOML/JSON) and build a `WorldContext`
// - let the host's chunk manager insert/remove chunks
// - call `WorldContext::raycast` with the host's ray query, or
//   `raycast_grid` to use the built-in grid walker

pub mod error;
pub mod world;

pub use error::{EngineError, EngineResult};

// === Core World Types ===
pub use world::{
    CellRounding, Chunk, ChunkLookup, ChunkPos, ChunkSize, ColliderType, Facing, GridRayCaster,
    HitSurface, Ray, RayHit, RayQuery, RaycastOutcome, RaycastState, TextureOffset, Transparency,
    VoxelId, VoxelIndex, VoxelInfo, VoxelRaycastResolver, VoxelType, VoxelTypeRegistry,
    WorldContext, WorldDefinition, WorldIndex, WorldSettings,
};

// Re-export cgmath so hosts use the same vector types
pub use cgmath;
