//! World configuration
//!
//! `WorldSettings` carries the numeric layout of the world; a
//! `WorldDefinition` bundles settings with the voxel type table and is
//! what hosts load from disk at startup.

use super::core::{ChunkSize, VoxelType};
use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default upper bound on punch-through continuations per raycast
pub const DEFAULT_MAX_PUNCH_THROUGH: u32 = 256;

/// How a scaled world position is snapped to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellRounding {
    /// Halves go to the even neighbour (2.5 -> 2, 3.5 -> 4)
    #[default]
    TiesToEven,
    /// Halves go away from zero (2.5 -> 3, -2.5 -> -3)
    AwayFromZero,
}

impl CellRounding {
    pub fn round(self, value: f32) -> i32 {
        let rounded = match self {
            CellRounding::TiesToEven => value.round_ties_even(),
            CellRounding::AwayFromZero => value.round(),
        };
        rounded as i32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub chunk_size: ChunkSize,
    /// World units per voxel along each axis
    pub cell_scale: [f32; 3],
    /// Materials attached to chunk meshes; bounds voxel submesh indices
    pub material_count: u32,
    pub rounding: CellRounding,
    pub max_punch_through: u32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            chunk_size: ChunkSize::default(),
            cell_scale: [1.0, 1.0, 1.0],
            material_count: 1,
            rounding: CellRounding::default(),
            max_punch_through: DEFAULT_MAX_PUNCH_THROUGH,
        }
    }
}

impl WorldSettings {
    /// Validate configuration parameters.
    ///
    /// Broken layouts are fatal. Recoverable values are clamped in place
    /// with a warning.
    pub fn validate(&mut self) -> ConfigResult<()> {
        if !self.chunk_size.is_valid() {
            log::error!(
                "[WorldSettings::validate] Chunk side length must be greater than 0, got {}",
                self.chunk_size
            );
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }

        if self.cell_scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            log::error!(
                "[WorldSettings::validate] Cell scale must be finite and positive, got {:?}",
                self.cell_scale
            );
            return Err(ConfigError::InvalidCellScale(self.cell_scale));
        }

        if self.material_count == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "material_count".to_string(),
                reason: "chunks need at least one material".to_string(),
            });
        }

        if self.max_punch_through == 0 {
            log::warn!(
                "[WorldSettings::validate] max_punch_through is 0, transparent voxels could never be skipped. Setting it to 1."
            );
            self.max_punch_through = 1;
        }

        log::debug!(
            "[WorldSettings::validate] chunk_size={}, cell_scale={:?}, materials={}, rounding={:?}",
            self.chunk_size,
            self.cell_scale,
            self.material_count,
            self.rounding
        );
        Ok(())
    }
}

/// Settings plus the voxel type table, as stored in a world definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDefinition {
    #[serde(default)]
    pub settings: WorldSettings,
    #[serde(default)]
    pub voxels: Vec<VoxelType>,
}

impl WorldDefinition {
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a definition, picking the format from the file extension
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        log::info!("[WorldDefinition::load] Loading world definition from {}", path.display());
        match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&source),
            Some("json") => Self::from_json_str(&source),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
