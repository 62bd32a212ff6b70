//! Core world data types and fundamental structures
//!
//! Voxel types, discrete coordinates and the ray query seam that every
//! other world component builds on.

mod position;
mod ray;
mod registry;
mod voxel;

pub use position::{ChunkPos, ChunkSize, VoxelIndex};
pub use ray::{Facing, HitSurface, Ray, RayHit, RayQuery};
pub use registry::VoxelTypeRegistry;
pub use voxel::{ColliderType, TextureOffset, Transparency, VoxelId, VoxelType};
