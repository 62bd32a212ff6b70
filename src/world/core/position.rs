//! Discrete coordinates used by the world index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chunk coordinate in chunk-grid space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Neighbouring chunk offset by the given number of chunks per axis
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Voxel index local to a chunk.
///
/// Indices owned by a chunk lie in `[0, size)` on every axis. An adjacent
/// index produced by a surface query may sit one step outside; use
/// [`crate::world::WorldIndex::normalize`] to find the chunk that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VoxelIndex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelIndex {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Check whether this index addresses a voxel inside a chunk of `size`
    pub fn is_within(&self, size: ChunkSize) -> bool {
        (0..size.x).contains(&self.x)
            && (0..size.y).contains(&self.y)
            && (0..size.z).contains(&self.z)
    }
}

impl fmt::Display for VoxelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// Number of voxels along each chunk axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct ChunkSize {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkSize {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn cubic(side: i32) -> Self {
        Self::new(side, side, side)
    }

    /// True when every axis holds at least one voxel
    pub fn is_valid(&self) -> bool {
        self.x > 0 && self.y > 0 && self.z > 0
    }

    /// Total voxel count, zero for invalid sizes
    pub fn volume(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Flat array offset of an in-bounds index (x fastest, then y, then z)
    pub fn linear_index(&self, index: VoxelIndex) -> Option<usize> {
        if !index.is_within(*self) {
            return None;
        }
        let (sx, sy) = (self.x as usize, self.y as usize);
        Some(index.x as usize + index.y as usize * sx + index.z as usize * sx * sy)
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self::cubic(16)
    }
}

impl From<[i32; 3]> for ChunkSize {
    fn from(v: [i32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<ChunkSize> for [i32; 3] {
    fn from(size: ChunkSize) -> Self {
        [size.x, size.y, size.z]
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}
