//! Voxel World Module
//!
//! # Architecture Overview
//!
//! - **Core**: voxel ids and types, discrete coordinates, the ray query seam
//! - **WorldIndex**: world space <-> chunk/voxel coordinates
//! - **Storage**: resident chunks, keyed by chunk coordinate
//! - **Raycast**: voxel raycasts with transparent punch-through
//! - **Context**: the above, owned together and built from a world definition

pub mod context;
pub mod core;
pub mod error;
pub mod raycast;
pub mod settings;
pub mod storage;
pub mod world_index;

// Re-export core types for convenience
pub use core::{
    ChunkPos, ChunkSize, ColliderType, Facing, HitSurface, Ray, RayHit, RayQuery,
    TextureOffset, Transparency, VoxelId, VoxelIndex, VoxelType, VoxelTypeRegistry,
};

pub use context::WorldContext;
pub use error::{ConfigError, ConfigResult, WorldError, WorldResult};
pub use raycast::{
    GridRayCaster, RaycastOutcome, RaycastState, RejectReason, VoxelInfo, VoxelRaycastResolver,
    PUNCH_THROUGH_DROP,
};
pub use settings::{CellRounding, WorldDefinition, WorldSettings, DEFAULT_MAX_PUNCH_THROUGH};
pub use storage::{Chunk, ChunkLookup};
pub use world_index::WorldIndex;
