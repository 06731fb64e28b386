//! Read-only metadata about the settings the engine writes: categories,
//! types, units, ranges, and impact levels.
//!
//! Loaded once from `config/settings_metadata.toml` (embedded at compile
//! time) and only consulted, never mutated, during a derivation.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use super::types::SettingValue;

/// The value type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Float,
    Int,
    Bool,
    Enum,
    Text,
}

/// Metadata for one slicer setting.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingMetadata {
    pub display_name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    pub data_type: DataType,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub default_value: Option<SettingValue>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    /// Allowed values for enum settings, in the fixed cyclic order used
    /// when proposing alternatives.
    #[serde(default)]
    pub options: Vec<String>,
    /// How strongly this setting affects the result, 1 (cosmetic) to
    /// 5 (critical).
    pub impact_level: u8,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    settings: HashMap<String, SettingMetadata>,
}

/// The full settings catalog, keyed by setting name.
#[derive(Debug, Clone)]
pub struct SettingsCatalog {
    settings: HashMap<String, SettingMetadata>,
}

const DEFAULT_METADATA: &str = include_str!("../../config/settings_metadata.toml");

impl SettingsCatalog {
    /// Catalog embedded in the binary.
    ///
    /// # Panics
    /// Panics if the embedded TOML is invalid (a compile-time bug).
    pub fn default_catalog() -> Self {
        let file: CatalogFile = toml::from_str(DEFAULT_METADATA)
            .expect("embedded settings_metadata.toml must be valid TOML");
        Self {
            settings: file.settings,
        }
    }

    /// Load a catalog from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: CatalogFile = toml::from_str(&content)?;
        Ok(Self {
            settings: file.settings,
        })
    }

    pub fn get(&self, name: &str) -> Option<&SettingMetadata> {
        self.settings.get(name)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Declared minimum for a numeric setting, if any.
    pub fn min_of(&self, name: &str) -> Option<f64> {
        self.settings.get(name)?.min_value
    }

    /// Declared maximum for a numeric setting, if any.
    pub fn max_of(&self, name: &str) -> Option<f64> {
        self.settings.get(name)?.max_value
    }

    /// Enum options for a setting; empty slice for non-enum settings.
    pub fn options_of(&self, name: &str) -> &[String] {
        self.settings
            .get(name)
            .map(|m| m.options.as_slice())
            .unwrap_or(&[])
    }

    /// Merge additional settings into the catalog (firmware-specific
    /// settings are appended this way). Existing entries win.
    pub fn extend(&mut self, extra: impl IntoIterator<Item = (String, SettingMetadata)>) {
        for (name, meta) in extra {
            self.settings.entry(name).or_insert(meta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_loads() {
        let catalog = SettingsCatalog::default_catalog();
        assert!(!catalog.is_empty(), "Should have setting definitions");
    }

    #[test]
    fn test_core_settings_present() {
        let catalog = SettingsCatalog::default_catalog();
        for name in [
            "layer_height",
            "print_speed",
            "infill_density",
            "wall_line_count",
            "material_print_temperature",
            "retraction_distance",
        ] {
            assert!(catalog.get(name).is_some(), "Catalog should define {}", name);
        }
    }

    #[test]
    fn test_layer_height_bounds() {
        let catalog = SettingsCatalog::default_catalog();
        let meta = catalog.get("layer_height").unwrap();
        assert_eq!(meta.data_type, DataType::Float);
        assert_eq!(meta.impact_level, 5);
        assert!(meta.min_value.unwrap() > 0.0);
        assert!(meta.max_value.unwrap() <= 1.0);
    }

    #[test]
    fn test_enum_options_ordered() {
        let catalog = SettingsCatalog::default_catalog();
        let options = catalog.options_of("infill_pattern");
        assert_eq!(
            options,
            &["grid", "triangles", "cubic", "gyroid", "honeycomb"],
            "Infill pattern options must keep their cyclic order"
        );
    }

    #[test]
    fn test_extend_does_not_overwrite() {
        let mut catalog = SettingsCatalog::default_catalog();
        let before = catalog.get("layer_height").unwrap().display_name.clone();
        catalog.extend([(
            "layer_height".to_string(),
            SettingMetadata {
                display_name: "Bogus".to_string(),
                description: String::new(),
                category: "quality".to_string(),
                subcategory: String::new(),
                data_type: DataType::Float,
                unit: None,
                default_value: None,
                min_value: None,
                max_value: None,
                options: vec![],
                impact_level: 1,
            },
        )]);
        assert_eq!(catalog.get("layer_height").unwrap().display_name, before);
    }
}
