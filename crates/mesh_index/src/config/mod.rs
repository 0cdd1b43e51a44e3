//! Construction-time configuration
//!
//! Grid resolution and octree subdivision limits are fixed when a
//! structure is created, never tuned per call. Defaults match the
//! structures' built-in constants; TOML or RON files can override them.

use serde::{Deserialize, Serialize};

pub use crate::spatial::{GridConfig, OctreeConfig};

/// Tuning parameters for both acceleration structures
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Uniform grid parameters
    pub grid: GridConfig,

    /// Octree parameters
    pub octree: OctreeConfig,
}

impl SpatialConfig {
    /// Load configuration from a `.toml` or `.ron` file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_structure_constants() {
        let config = SpatialConfig::default();
        assert_eq!(config.grid.dims, [16, 16, 16]);
        assert_eq!(config.octree.max_depth, 8);
        assert_eq!(config.octree.max_per_node, 16);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: SpatialConfig = toml::from_str(
            r#"
            [octree]
            max_depth = 5
            max_per_node = 4
            "#,
        )
        .expect("valid toml");

        assert_eq!(parsed.octree.max_depth, 5);
        assert_eq!(parsed.octree.max_per_node, 4);
        assert_eq!(parsed.grid.dims, [16, 16, 16]);
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let config = SpatialConfig {
            grid: GridConfig { dims: [32, 32, 32] },
            ..SpatialConfig::default()
        };

        let path = std::env::temp_dir().join("mesh_index_config_test.toml");
        let path = path.to_str().expect("utf-8 temp path");

        config.save_to_file(path).expect("save");
        let loaded = SpatialConfig::load_from_file(path).expect("load");

        assert_eq!(loaded.grid.dims, [32, 32, 32]);
        assert_eq!(loaded.octree.max_depth, 8);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(matches!(
            SpatialConfig::default().save_to_file("spatial.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
