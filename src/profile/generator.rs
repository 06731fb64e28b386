//! The profile generator: owns the loaded reference data and exposes the
//! three derivation entry points consumed by collaborators (storage, web
//! layer, import/export translators).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::descriptors::{MaterialDescriptor, PrinterDescriptor, RequirementVector};
use crate::diff::{compare_profiles, ProfileComparison};
use crate::klipper::{default_klipper_data, load_klipper_data, KlipperData, KlipperOverlay};
use crate::recommend::{Recommendation, RecommendationEngine};
use crate::rules::{default_tables, load_tables, DependencyResolver, RuleTables};

use super::metadata::SettingsCatalog;
use super::types::SettingsProfile;

/// Overlay-touched settings whose dependents the narrow resolver pass
/// re-derives.
const OVERLAY_DRIVERS: &[&str] = &["print_speed", "travel_speed", "retraction_enable"];

/// A fully derived profile: the settings, per-setting explanations, and
/// the firmware configuration snippet when the overlay ran.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedProfile {
    pub settings: SettingsProfile,
    pub explanations: BTreeMap<String, String>,
    pub firmware_config: Option<String>,
}

/// The derivation engine facade.
///
/// All reference data (rule tables, setting catalog, Klipper data) is
/// loaded once at construction and read-only afterwards, so a shared
/// reference can serve concurrent derivation calls.
pub struct ProfileGenerator {
    tables: RuleTables,
    resolver: DependencyResolver,
    catalog: SettingsCatalog,
    klipper: KlipperData,
}

impl ProfileGenerator {
    /// Build a generator from the embedded default data.
    ///
    /// # Panics
    /// Panics if the embedded configuration is invalid (a compile-time
    /// bug); loading user-supplied files goes through [`Self::from_files`].
    pub fn new() -> Self {
        let tables = default_tables();
        let resolver = DependencyResolver::new(&tables.dependencies)
            .expect("embedded dependency graph must be acyclic");
        let klipper = default_klipper_data();
        let mut catalog = SettingsCatalog::default_catalog();
        catalog.extend(klipper.additional_settings.clone());

        Self {
            tables,
            resolver,
            catalog,
            klipper,
        }
    }

    /// Build a generator from custom rule/metadata/Klipper files.
    pub fn from_files(rules: &Path, metadata: &Path, klipper: &Path) -> Result<Self> {
        let tables = load_tables(rules)
            .with_context(|| format!("loading rule tables from {}", rules.display()))?;
        let resolver = DependencyResolver::new(&tables.dependencies)
            .map_err(|e| anyhow::anyhow!(e).context("building dependency graph"))?;
        let klipper = load_klipper_data(klipper)
            .with_context(|| format!("loading Klipper data from {}", klipper.display()))?;
        let mut catalog = SettingsCatalog::load(metadata)
            .with_context(|| format!("loading settings metadata from {}", metadata.display()))?;
        catalog.extend(klipper.additional_settings.clone());

        Ok(Self {
            tables,
            resolver,
            catalog,
            klipper,
        })
    }

    pub fn catalog(&self) -> &SettingsCatalog {
        &self.catalog
    }

    /// Derive a complete, internally consistent profile.
    pub fn derive_profile(
        &self,
        printer: &PrinterDescriptor,
        material: &MaterialDescriptor,
        nozzle_size: f64,
        requirements: &RequirementVector,
        base_profile: Option<&SettingsProfile>,
        use_firmware_overlay: bool,
    ) -> DerivedProfile {
        let engine = RecommendationEngine::new(&self.tables, &self.catalog, &self.resolver);
        let (mut settings, mut explanations) =
            engine.generate(printer, material, nozzle_size, requirements, base_profile);

        // The overlay stage is a no-op unless both the caller asked for it
        // and the printer supports it.
        let mut firmware_config = None;
        if use_firmware_overlay && printer.klipper {
            let overlay = KlipperOverlay::new(&self.klipper);
            overlay.apply(&mut settings, printer, material);
            self.resolver.resolve_from(&mut settings, OVERLAY_DRIVERS);

            // Explanations describe the final values, so regenerate them
            // for anything the overlay moved.
            let ctx = crate::recommend::ExplainContext {
                printer,
                material,
                requirements,
            };
            explanations = crate::recommend::profile_explanations(&settings, &ctx);
            explanations.extend(overlay.explanations(&settings));
            firmware_config = Some(overlay.firmware_config(&settings));
        }

        debug!(
            "Derived profile for {} with {} settings (overlay: {})",
            printer.model,
            settings.field_count(),
            firmware_config.is_some()
        );

        DerivedProfile {
            settings,
            explanations,
            firmware_config,
        }
    }

    /// Recommend a value for one setting. Internally derives a full
    /// profile from the current settings so every dependency is honored.
    pub fn recommend_setting(
        &self,
        setting_name: &str,
        printer: &PrinterDescriptor,
        material: &MaterialDescriptor,
        nozzle_size: f64,
        current_settings: Option<&SettingsProfile>,
        requirements: &RequirementVector,
        use_firmware_overlay: bool,
    ) -> Recommendation {
        let engine = RecommendationEngine::new(&self.tables, &self.catalog, &self.resolver);

        if use_firmware_overlay && printer.klipper {
            // Run the full pipeline including the overlay, then extract.
            let derived = self.derive_profile(
                printer,
                material,
                nozzle_size,
                requirements,
                current_settings,
                true,
            );
            let Some(value) = derived.settings.get(setting_name).cloned() else {
                return Recommendation {
                    value: None,
                    confidence: 0.0,
                    explanation: format!("Setting '{}' not found or not applicable.", setting_name),
                    alternatives: Vec::new(),
                };
            };
            let explanation = derived
                .explanations
                .get(setting_name)
                .cloned()
                .unwrap_or_else(|| {
                    let ctx = crate::recommend::ExplainContext {
                        printer,
                        material,
                        requirements,
                    };
                    crate::recommend::explain(setting_name, &value, &ctx)
                });
            let alternatives = engine.alternatives(setting_name, &value);
            return Recommendation {
                value: Some(value),
                confidence: 0.85,
                explanation,
                alternatives,
            };
        }

        engine.recommend(
            setting_name,
            printer,
            material,
            nozzle_size,
            current_settings,
            requirements,
        )
    }

    /// Compare two completed profiles.
    pub fn compare_profiles(
        &self,
        profile_a: &SettingsProfile,
        profile_b: &SettingsProfile,
    ) -> ProfileComparison {
        compare_profiles(profile_a, profile_b)
    }
}

impl Default for ProfileGenerator {
    fn default() -> Self {
        Self::new()
    }
}
