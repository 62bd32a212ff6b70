use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a voxel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct VoxelId(pub u16);

// Safe because VoxelId is just a u16
unsafe impl bytemuck::Pod for VoxelId {}
unsafe impl bytemuck::Zeroable for VoxelId {}

static_assertions::assert_eq_size!(VoxelId, u16);

impl VoxelId {
    /// Air. Always registered.
    pub const EMPTY: VoxelId = VoxelId(0);
    /// "No voxel" marker used by the voxel storage format, aliases [`VoxelId::EMPTY`]
    pub const UNSET: VoxelId = VoxelId(u16::MAX);

    pub const fn new(id: u16) -> Self {
        VoxelId(id)
    }

    /// Collapse the storage sentinel onto the empty voxel
    pub const fn canonical(self) -> Self {
        if self.0 == u16::MAX {
            VoxelId::EMPTY
        } else {
            self
        }
    }

    pub fn is_empty(self) -> bool {
        self.canonical() == VoxelId::EMPTY
    }
}

impl Default for VoxelId {
    fn default() -> Self {
        VoxelId::EMPTY
    }
}

impl fmt::Display for VoxelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            VoxelId::EMPTY => write!(f, "Empty"),
            VoxelId::UNSET => write!(f, "Unset"),
            _ => write!(f, "Voxel({})", self.0),
        }
    }
}

/// How raycasts and meshing treat a voxel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transparency {
    #[default]
    Solid,
    SemiTransparent,
    Transparent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderType {
    #[default]
    Cube,
    Mesh,
    None,
}

/// Offset of a tile inside the texture sheet, in tile units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct TextureOffset {
    pub x: f32,
    pub y: f32,
}

impl TextureOffset {
    pub const ZERO: TextureOffset = TextureOffset { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for TextureOffset {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<TextureOffset> for [f32; 2] {
    fn from(t: TextureOffset) -> Self {
        [t.x, t.y]
    }
}

/// Static properties of a voxel type.
///
/// Loaded once with the world definition and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelType {
    pub name: String,
    #[serde(default)]
    pub transparency: Transparency,
    /// Per-facing offsets, indexed by [`crate::world::Facing`] ordinal
    #[serde(default)]
    pub textures: Vec<TextureOffset>,
    /// When false every facing uses `textures[0]`
    #[serde(default)]
    pub custom_sides: bool,
    #[serde(default)]
    pub collider: ColliderType,
    #[serde(default)]
    pub submesh_index: u32,
}

impl VoxelType {
    /// Air: transparent, no collider, no textures
    pub fn empty() -> Self {
        Self {
            name: "empty".to_string(),
            transparency: Transparency::Transparent,
            textures: Vec::new(),
            custom_sides: false,
            collider: ColliderType::None,
            submesh_index: 0,
        }
    }

    /// Opaque cube with one texture on all sides
    pub fn solid(name: &str, texture: TextureOffset) -> Self {
        Self {
            name: name.to_string(),
            transparency: Transparency::Solid,
            textures: vec![texture],
            custom_sides: false,
            collider: ColliderType::Cube,
            submesh_index: 0,
        }
    }

    pub fn with_transparency(mut self, transparency: Transparency) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn with_side_textures(mut self, textures: Vec<TextureOffset>) -> Self {
        self.textures = textures;
        self.custom_sides = true;
        self
    }

    pub fn with_collider(mut self, collider: ColliderType) -> Self {
        self.collider = collider;
        self
    }

    pub fn with_submesh(mut self, submesh_index: u32) -> Self {
        self.submesh_index = submesh_index;
        self
    }

    pub fn is_solid(&self) -> bool {
        self.transparency == Transparency::Solid
    }

    pub fn has_collider(&self) -> bool {
        self.collider != ColliderType::None
    }
}
