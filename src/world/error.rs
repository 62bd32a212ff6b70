//! World Error Handling
//!
//! Per-query conditions (`WorldError`) are absorbed by the world API and
//! turned into `None` or fallback values. Configuration problems
//! (`ConfigError`) are fatal and returned to whoever builds the world.
use super::core::{ChunkPos, ChunkSize, VoxelIndex};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("Invalid voxel id: {id} ({registered} types registered)")]
    InvalidVoxelId { id: u16, registered: usize },

    #[error("Voxel {id} has no defined textures")]
    MissingTextureDefinition { id: u16 },

    #[error("Ray hit a surface that is not chunk geometry")]
    NonChunkSurfaceHit,

    #[error("Chunk {pos} is not resident")]
    ChunkNotResident { pos: ChunkPos },

    #[error("Voxel index {index} out of bounds for chunk size {size}")]
    VoxelOutOfBounds { index: VoxelIndex, size: ChunkSize },

    #[error("Chunk {pos} has size {found}, the world uses {expected}")]
    ChunkSizeMismatch {
        pos: ChunkPos,
        expected: ChunkSize,
        found: ChunkSize,
    },

    #[error("Chunk data holds {found} voxels, expected {expected}")]
    VoxelCountMismatch { expected: usize, found: usize },
}

pub type WorldResult<T> = Result<T, WorldError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The voxel type table is empty")]
    EmptyVoxelTable,

    #[error(
        "Voxel {id} uses material index {index}, but the chunk only has {material_count} material(s)"
    )]
    SubmeshIndexOutOfRange {
        id: u16,
        index: u32,
        material_count: u32,
    },

    #[error("Chunk side length must be greater than 0, got {0}")]
    InvalidChunkSize(ChunkSize),

    #[error("Cell scale must be finite and positive, got {0:?}")]
    InvalidCellScale([f32; 3]),

    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: String, reason: String },

    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported world definition format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
