use super::{Facing, TextureOffset, VoxelId, VoxelType};
use crate::world::error::{ConfigError, ConfigResult, WorldError, WorldResult};
use rustc_hash::FxHashMap;

/// Registry that stores all voxel types as data.
///
/// The table is indexed by voxel id and is immutable once built; id 0 is
/// the empty voxel and is guaranteed to exist.
#[derive(Debug, Clone)]
pub struct VoxelTypeRegistry {
    types: Vec<VoxelType>,
    name_to_id: FxHashMap<String, VoxelId>,
}

impl VoxelTypeRegistry {
    /// Build and validate the type table.
    ///
    /// `material_count` is the number of materials attached to chunk meshes;
    /// every type's submesh index must address one of them.
    pub fn new(types: Vec<VoxelType>, material_count: u32) -> ConfigResult<Self> {
        if types.is_empty() {
            log::error!("[VoxelTypeRegistry::new] The voxel type table is empty");
            return Err(ConfigError::EmptyVoxelTable);
        }
        if types.len() > u16::MAX as usize {
            // u16::MAX is reserved for the unset marker
            return Err(ConfigError::InvalidSetting {
                field: "voxels".to_string(),
                reason: format!("{} types registered, at most {} allowed", types.len(), u16::MAX),
            });
        }

        for (id, voxel) in types.iter().enumerate() {
            if voxel.submesh_index >= material_count {
                log::error!(
                    "[VoxelTypeRegistry::new] Voxel {} ('{}') uses material index {} but only {} material(s) exist",
                    id,
                    voxel.name,
                    voxel.submesh_index,
                    material_count
                );
                return Err(ConfigError::SubmeshIndexOutOfRange {
                    id: id as u16,
                    index: voxel.submesh_index,
                    material_count,
                });
            }
        }

        let mut name_to_id = FxHashMap::default();
        for (id, voxel) in types.iter().enumerate() {
            if name_to_id.insert(voxel.name.clone(), VoxelId(id as u16)).is_some() {
                log::warn!(
                    "[VoxelTypeRegistry::new] Duplicate voxel name '{}', lookups by name resolve to id {}",
                    voxel.name,
                    id
                );
            }
        }

        log::info!("[VoxelTypeRegistry::new] Registered {} voxel types", types.len());
        Ok(Self { types, name_to_id })
    }

    /// Look up a type, failing on ids outside the registered range
    pub fn try_get_type(&self, id: VoxelId) -> WorldResult<&VoxelType> {
        let id = id.canonical();
        self.types
            .get(id.0 as usize)
            .ok_or(WorldError::InvalidVoxelId {
                id: id.0,
                registered: self.types.len(),
            })
    }

    /// Look up a type, degrading to the empty voxel on invalid ids
    pub fn get_type(&self, id: VoxelId) -> &VoxelType {
        match self.try_get_type(id) {
            Ok(voxel) => voxel,
            Err(e) => {
                log::error!("[VoxelTypeRegistry::get_type] {}", e);
                self.empty()
            }
        }
    }

    /// The id-0 type
    pub fn empty(&self) -> &VoxelType {
        // Non-empty by construction
        &self.types[0]
    }

    /// Texture offset for one side of a voxel. Never fails:
    /// no textures gives (0, 0), shared-side types give their first entry
    /// and facings past the end of the list clamp to the last entry.
    pub fn texture_offset(&self, id: VoxelId, facing: Facing) -> TextureOffset {
        let voxel = self.get_type(id);
        let textures = &voxel.textures;

        let Some(last) = textures.last() else {
            let e = WorldError::MissingTextureDefinition { id: id.canonical().0 };
            log::warn!("[VoxelTypeRegistry::texture_offset] {}, using default texture", e);
            return TextureOffset::ZERO;
        };

        if !voxel.custom_sides {
            return textures[0];
        }

        textures.get(facing.ordinal()).copied().unwrap_or(*last)
    }

    pub fn is_solid(&self, id: VoxelId) -> bool {
        self.get_type(id).is_solid()
    }

    pub fn has_collider(&self, id: VoxelId) -> bool {
        self.get_type(id).has_collider()
    }

    /// Get a voxel id by name
    pub fn id_of(&self, name: &str) -> Option<VoxelId> {
        self.name_to_id.get(name).copied()
    }

    /// Check if a voxel id is registered
    pub fn is_registered(&self, id: VoxelId) -> bool {
        (id.canonical().0 as usize) < self.types.len()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VoxelId, &VoxelType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(id, voxel)| (VoxelId(id as u16), voxel))
    }
}
