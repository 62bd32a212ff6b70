//! Voxel raycasting
//!
//! - `resolver`: maps ray hits to voxels, with transparent punch-through
//! - `grid_caster`: a ray query over the resident voxel grid

mod grid_caster;
mod resolver;

pub use grid_caster::GridRayCaster;
pub use resolver::{
    RaycastOutcome, RaycastState, RejectReason, VoxelInfo, VoxelRaycastResolver,
    PUNCH_THROUGH_DROP,
};
