//! The recommendation engine: seeds a profile, applies requirement-driven
//! heuristic adjustments, then delegates to the rule engine and dependency
//! resolver to finish the profile.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::descriptors::{
    Kinematics, MaterialDescriptor, MaterialKind, PrinterDescriptor, Purpose, RequirementVector,
};
use crate::profile::{DataType, SettingValue, SettingsCatalog, SettingsProfile};
use crate::rules::{DependencyResolver, RuleEngine, RuleTables};

use super::explain::{self, ExplainContext};

/// A single-setting recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    /// Recommended value, or None when the setting is not produced by a
    /// derivation for these inputs.
    pub value: Option<SettingValue>,
    /// Heuristic confidence score, fixed rather than computed from rule
    /// coverage.
    pub confidence: f64,
    pub explanation: String,
    pub alternatives: Vec<Alternative>,
}

/// A bounded alternative value for a setting.
#[derive(Debug, Clone, Serialize)]
pub struct Alternative {
    pub value: SettingValue,
    pub explanation: String,
}

/// Confidence reported for any setting a derivation produced.
const RECOMMEND_CONFIDENCE: f64 = 0.85;

pub struct RecommendationEngine<'a> {
    tables: &'a RuleTables,
    catalog: &'a SettingsCatalog,
    resolver: &'a DependencyResolver,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(
        tables: &'a RuleTables,
        catalog: &'a SettingsCatalog,
        resolver: &'a DependencyResolver,
    ) -> Self {
        Self {
            tables,
            catalog,
            resolver,
        }
    }

    /// Generate a complete profile plus per-setting explanations.
    pub fn generate(
        &self,
        printer: &PrinterDescriptor,
        material: &MaterialDescriptor,
        nozzle_size: f64,
        requirements: &RequirementVector,
        base_profile: Option<&SettingsProfile>,
    ) -> (SettingsProfile, BTreeMap<String, String>) {
        debug!(
            "Generating profile for {} / {} @ {} mm",
            printer.model,
            material.name,
            nozzle_size
        );

        let mut profile = seed_defaults(printer, material, nozzle_size);
        if let Some(base) = base_profile {
            profile.merge(base);
        }

        self.heuristic_adjustments(&mut profile, material, nozzle_size, requirements);

        RuleEngine::new(self.tables).apply(&mut profile, printer, material, nozzle_size, requirements);

        compatibility_adjustments(&mut profile, printer, material, requirements);

        self.resolver.resolve(&mut profile);

        let ctx = ExplainContext {
            printer,
            material,
            requirements,
        };
        let explanations = explain::profile_explanations(&profile, &ctx);

        debug!("Generated profile with {} settings", profile.field_count());
        (profile, explanations)
    }

    /// Recommend a value for one setting by deriving a full profile and
    /// extracting the field, so every dependency is taken into account.
    pub fn recommend(
        &self,
        setting_name: &str,
        printer: &PrinterDescriptor,
        material: &MaterialDescriptor,
        nozzle_size: f64,
        current_settings: Option<&SettingsProfile>,
        requirements: &RequirementVector,
    ) -> Recommendation {
        let (profile, explanations) =
            self.generate(printer, material, nozzle_size, requirements, current_settings);

        let Some(value) = profile.get(setting_name).cloned() else {
            return Recommendation {
                value: None,
                confidence: 0.0,
                explanation: format!(
                    "Setting '{}' not found or not applicable.",
                    setting_name
                ),
                alternatives: Vec::new(),
            };
        };

        let ctx = ExplainContext {
            printer,
            material,
            requirements,
        };
        let explanation = explanations
            .get(setting_name)
            .cloned()
            .unwrap_or_else(|| explain::explain(setting_name, &value, &ctx));

        let alternatives = self.alternatives(setting_name, &value);

        Recommendation {
            value: Some(value),
            confidence: RECOMMEND_CONFIDENCE,
            explanation,
            alternatives,
        }
    }

    /// Bounded alternative values for a setting: a finer/coarser step for
    /// numerics, the next options in cyclic order for enums.
    pub fn alternatives(&self, setting_name: &str, current: &SettingValue) -> Vec<Alternative> {
        let mut alternatives = Vec::new();

        match setting_name {
            "layer_height" => {
                if let Some(v) = current.as_f64() {
                    let finer = round2(v * 0.75);
                    if finer >= self.catalog.min_of(setting_name).unwrap_or(0.05) {
                        alternatives.push(Alternative {
                            value: SettingValue::Float(finer),
                            explanation: "Finer layers for higher quality, but slower printing."
                                .to_string(),
                        });
                    }
                    let coarser = round2(v * 1.25);
                    if coarser <= self.catalog.max_of(setting_name).unwrap_or(0.8) {
                        alternatives.push(Alternative {
                            value: SettingValue::Float(coarser),
                            explanation:
                                "Thicker layers for faster printing, but reduced quality."
                                    .to_string(),
                        });
                    }
                }
            }
            "infill_density" => {
                if let Some(v) = current.as_f64() {
                    if v > 15.0 {
                        alternatives.push(Alternative {
                            value: SettingValue::Int((v - 10.0).max(5.0) as i64),
                            explanation:
                                "Lower infill density to save material and print time."
                                    .to_string(),
                        });
                    }
                    if v < 50.0 {
                        alternatives.push(Alternative {
                            value: SettingValue::Int((v + 20.0).min(80.0) as i64),
                            explanation: "Higher infill density for maximum strength.".to_string(),
                        });
                    }
                }
            }
            "material_print_temperature" => {
                if let Some(v) = current.as_f64() {
                    alternatives.push(Alternative {
                        value: SettingValue::Int((v - 5.0) as i64),
                        explanation:
                            "Lower temperature for better detail, but reduced layer adhesion."
                                .to_string(),
                    });
                    alternatives.push(Alternative {
                        value: SettingValue::Int((v + 5.0) as i64),
                        explanation:
                            "Higher temperature for better layer adhesion, but potential stringing."
                                .to_string(),
                    });
                }
            }
            "print_speed" => {
                if let Some(v) = current.as_f64() {
                    if v > 30.0 {
                        alternatives.push(Alternative {
                            value: SettingValue::Int((v - 10.0) as i64),
                            explanation: "Slower speed for better quality.".to_string(),
                        });
                    }
                    if v < 80.0 {
                        alternatives.push(Alternative {
                            value: SettingValue::Int((v + 20.0) as i64),
                            explanation: "Faster speed to reduce print time.".to_string(),
                        });
                    }
                }
            }
            _ => {
                let meta = self.catalog.get(setting_name);
                match meta.map(|m| m.data_type) {
                    Some(DataType::Enum) => {
                        alternatives.extend(self.enum_alternatives(setting_name, current));
                    }
                    Some(DataType::Float) | Some(DataType::Int) => {
                        alternatives.extend(self.numeric_alternatives(setting_name, current));
                    }
                    _ => {}
                }
            }
        }

        alternatives
    }

    /// Next two distinct options in the catalog's fixed cyclic ordering.
    fn enum_alternatives(&self, setting_name: &str, current: &SettingValue) -> Vec<Alternative> {
        let options = self.catalog.options_of(setting_name);
        if options.is_empty() {
            return Vec::new();
        }
        let current_index = current
            .as_str()
            .and_then(|v| options.iter().position(|o| o == v))
            .unwrap_or(0);

        (1..=2usize)
            .filter_map(|step| {
                let option = &options[(current_index + step) % options.len()];
                if Some(option.as_str()) == current.as_str() {
                    return None;
                }
                Some(Alternative {
                    value: SettingValue::Text(option.clone()),
                    explanation: option_rationale(setting_name, option),
                })
            })
            .collect()
    }

    /// Generic finer/coarser step of roughly 20%, bounded by the declared
    /// range.
    fn numeric_alternatives(&self, setting_name: &str, current: &SettingValue) -> Vec<Alternative> {
        let Some(v) = current.as_f64() else {
            return Vec::new();
        };
        let is_int = matches!(
            self.catalog.get(setting_name).map(|m| m.data_type),
            Some(DataType::Int)
        );
        let to_value = |raw: f64| {
            if is_int {
                SettingValue::Int(raw.round() as i64)
            } else {
                SettingValue::Float(round2(raw))
            }
        };

        let mut alternatives = Vec::new();
        let lower = v * 0.8;
        if self.catalog.min_of(setting_name).map_or(true, |min| lower >= min) {
            alternatives.push(Alternative {
                value: to_value(lower),
                explanation: "Lower value, trading effect strength for speed or material."
                    .to_string(),
            });
        }
        let higher = v * 1.2;
        if self.catalog.max_of(setting_name).map_or(true, |max| higher <= max) {
            alternatives.push(Alternative {
                value: to_value(higher),
                explanation: "Higher value for a stronger effect at some cost.".to_string(),
            });
        }
        alternatives
    }

    /// Requirement-driven nudges, independent of the static rule tables.
    fn heuristic_adjustments(
        &self,
        profile: &mut SettingsProfile,
        material: &MaterialDescriptor,
        nozzle_size: f64,
        requirements: &RequirementVector,
    ) {
        let strength = requirements.strength.clamp(1, 5);
        let quality = requirements.surface_quality.clamp(1, 5);
        let speed = requirements.speed.clamp(1, 5);
        let usage = requirements.material_usage.clamp(1, 5);
        let accuracy = requirements.dimensional_accuracy.clamp(1, 5);
        let purpose = requirements.purpose;

        // Layer height shifts toward a quarter of the nozzle diameter when
        // quality wins, three quarters when speed wins.
        if quality > speed {
            profile.set("layer_height", round2((nozzle_size * 0.25).max(0.08)));
        } else if speed > quality {
            profile.set("layer_height", round2((nozzle_size * 0.75).min(0.3)));
        }

        if let Some(layer_height) = profile.get_f64("layer_height") {
            profile.set("initial_layer_height", round2(layer_height * 1.5));
            profile.set("top_thickness", round2(layer_height * 6.0));
            profile.set("top_layers", 6i64);
            profile.set("bottom_thickness", round2(layer_height * 5.0));
            profile.set("bottom_layers", 5i64);
        }

        if strength > usage {
            profile.set("wall_line_count", 4i64);
        } else if usage > strength {
            profile.set("wall_line_count", 2i64);
        }
        if let (Some(line_width), Some(walls)) =
            (profile.get_f64("line_width"), profile.get_f64("wall_line_count"))
        {
            profile.set("wall_thickness", round2(line_width * walls));
        }

        if strength > 4 {
            profile.set("infill_density", 40i64);
            profile.set("infill_pattern", "cubic");
        } else if strength > 3 {
            profile.set("infill_density", 30i64);
            profile.set("infill_pattern", "gyroid");
        } else if usage > 4 {
            profile.set("infill_density", 10i64);
            profile.set("infill_pattern", "gyroid");
        }

        if speed > 4 {
            profile.set("print_speed", 70i64);
            profile.set("infill_speed", 100i64);
            profile.set("outer_wall_speed", 35i64);
            profile.set("inner_wall_speed", 70i64);
        } else if quality > 4 {
            profile.set("print_speed", 40i64);
            profile.set("infill_speed", 60i64);
            profile.set("outer_wall_speed", 20i64);
            profile.set("inner_wall_speed", 40i64);
        }

        // Temperature shifts within the material's range by purpose.
        if let Some(temp) = profile.get_f64("material_print_temperature") {
            match purpose {
                Purpose::Functional => {
                    let raised = (temp + 10.0).min((material.temp_max - 5) as f64);
                    profile.set("material_print_temperature", raised as i64);
                }
                Purpose::Visual => {
                    let lowered = (temp - 5.0).max((material.temp_min + 5) as f64);
                    profile.set("material_print_temperature", lowered as i64);
                }
                _ => {}
            }
        }

        if material.kind == MaterialKind::Pla {
            if purpose == Purpose::Miniature {
                profile.set("fan_speed", 100i64);
                profile.set("initial_fan_speed", 100i64);
            } else if purpose == Purpose::Functional {
                profile.set("fan_speed", 80i64);
            }
        }

        match purpose {
            Purpose::Miniature => {
                profile.set("support_enable", true);
                profile.set("support_angle", 60i64);
                profile.set("adhesion_type", "brim");
                profile.set("brim_width", 4i64);
            }
            Purpose::Functional => {
                profile.set("support_enable", true);
                profile.set("support_angle", 45i64);
            }
            Purpose::Large => {
                profile.set("adhesion_type", "brim");
                profile.set("brim_width", 10i64);
            }
            Purpose::Visual => {}
        }

        if quality > 4 && purpose == Purpose::Visual {
            profile.set("ironing_enabled", true);
        }
        if accuracy > 4 {
            profile.set("adaptive_layers", true);
        }
    }
}

/// Sensible material/nozzle defaults, used when no base profile is given.
pub fn seed_defaults(
    printer: &PrinterDescriptor,
    material: &MaterialDescriptor,
    nozzle_size: f64,
) -> SettingsProfile {
    let layer_height = round2(nozzle_size * 0.4);
    let line_width = round2(nozzle_size * 1.1);

    let mut profile = SettingsProfile::new();

    profile.set("layer_height", layer_height);
    profile.set("initial_layer_height", round2(layer_height * 1.5));
    profile.set("line_width", line_width);

    profile.set("wall_thickness", round2(line_width * 3.0));
    profile.set("wall_line_count", 3i64);
    profile.set("top_thickness", round2(layer_height * 6.0));
    profile.set("top_layers", 6i64);
    profile.set("bottom_thickness", round2(layer_height * 5.0));
    profile.set("bottom_layers", 5i64);

    profile.set("infill_density", 20i64);
    profile.set("infill_pattern", "gyroid");

    profile.set(
        "material_print_temperature",
        (material.temp_min + material.temp_max) / 2,
    );
    profile.set(
        "material_bed_temperature",
        (material.bed_temp_min + material.bed_temp_max) / 2,
    );
    profile.set("material_flow", 100i64);

    profile.set("print_speed", 50i64);
    profile.set("infill_speed", 80i64);
    profile.set("outer_wall_speed", 25i64);
    profile.set("inner_wall_speed", 50i64);
    profile.set("travel_speed", 150i64);

    profile.set("retraction_enable", true);
    profile.set(
        "retraction_distance",
        if printer.direct_drive { 0.8 } else { 5.0 },
    );
    profile.set("retraction_speed", 35i64);
    profile.set("z_hop_enable", false);

    profile.set("cooling_enable", true);
    profile.set("fan_speed", material.cooling_max);
    profile.set("initial_fan_speed", material.cooling_min);

    profile.set("support_enable", false);
    profile.set("support_type", "everywhere");
    profile.set("support_angle", 50i64);

    profile.set("adhesion_type", "skirt");
    profile.set("skirt_line_count", 3i64);
    profile.set("brim_width", 8i64);

    profile.set("ironing_enabled", false);
    profile.set("adaptive_layers", false);

    profile
}

/// Material and printer compatibility clamps, applied after the rule
/// tables so they bound the table outputs rather than being overwritten
/// by them.
fn compatibility_adjustments(
    profile: &mut SettingsProfile,
    printer: &PrinterDescriptor,
    material: &MaterialDescriptor,
    requirements: &RequirementVector,
) {
    match material.kind {
        MaterialKind::Petg => {
            if let Some(distance) = profile.get_f64("retraction_distance") {
                profile.set("retraction_distance", round2((distance * 1.2).min(8.0)));
            }
            clamp_max(profile, "fan_speed", 60.0);
            clamp_max(profile, "print_speed", 60.0);
        }
        MaterialKind::Abs => {
            clamp_max(profile, "fan_speed", 30.0);
            profile.set("initial_fan_speed", 0i64);
            profile.set("adhesion_type", "brim");
            if let Some(width) = profile.get_f64("brim_width") {
                profile.set("brim_width", width.max(8.0) as i64);
            }
        }
        MaterialKind::Tpu => {
            profile.set("retraction_enable", false);
            clamp_max(profile, "print_speed", 30.0);
            clamp_max(profile, "outer_wall_speed", 15.0);
        }
        _ => {}
    }

    if !printer.direct_drive {
        if let Some(distance) = profile.get_f64("retraction_distance") {
            profile.set("retraction_distance", distance.max(5.0));
        }
        clamp_max(profile, "retraction_speed", 45.0);
    }

    if printer.kinematics == Kinematics::Delta {
        if let Some(travel) = profile.get_f64("travel_speed") {
            profile.set("travel_speed", travel.max(200.0) as i64);
        }
        if let Some(initial) = profile.get_f64("initial_layer_height") {
            profile.set("initial_layer_height", round2(initial.min(0.3)));
        }
    }

    match requirements.purpose {
        Purpose::Miniature => {
            profile.set("minimum_wall_flow", 90i64);
            profile.set("z_hop_enable", true);
            profile.set("z_hop_height", 0.2);
        }
        Purpose::Large => {
            let dense = profile.get_f64("infill_density").unwrap_or(0.0) > 15.0;
            profile.set("infill_pattern", if dense { "cubic" } else { "grid" });
            profile.set("z_seam_type", "sharpest_corner");
        }
        _ => {}
    }
}

/// Canned rationale for a known enum option; a generic sentence otherwise.
fn option_rationale(setting_name: &str, option: &str) -> String {
    if setting_name == "infill_pattern" {
        let text = match option {
            "grid" => "Simple pattern, fast printing, moderate strength.",
            "triangles" => "Good strength in all directions, moderate print time.",
            "cubic" => "Excellent strength in all directions, higher print time.",
            "gyroid" => "Excellent strength-to-weight ratio, visually appealing.",
            "honeycomb" => "Maximum strength with higher material usage.",
            _ => "Alternative infill pattern.",
        };
        return text.to_string();
    }
    format!("Alternative option '{}' for {}.", option, setting_name)
}

fn clamp_max(profile: &mut SettingsProfile, key: &str, max: f64) {
    if let Some(value) = profile.get_f64(key) {
        if value > max {
            profile.set(key, max as i64);
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SettingsCatalog;
    use crate::rules::default_tables;

    struct Fixture {
        tables: RuleTables,
        catalog: SettingsCatalog,
        resolver: DependencyResolver,
    }

    impl Fixture {
        fn new() -> Self {
            let tables = default_tables();
            let resolver = DependencyResolver::new(&tables.dependencies).unwrap();
            Self {
                tables,
                catalog: SettingsCatalog::default_catalog(),
                resolver,
            }
        }

        fn engine(&self) -> RecommendationEngine<'_> {
            RecommendationEngine::new(&self.tables, &self.catalog, &self.resolver)
        }
    }

    fn cartesian_printer() -> PrinterDescriptor {
        PrinterDescriptor {
            model: "Test Cartesian".to_string(),
            kinematics: Kinematics::Cartesian,
            direct_drive: true,
            build_volume: [220, 220, 250],
            klipper: false,
            resonance: None,
        }
    }

    #[test]
    fn test_generate_balanced_visual_pla() {
        let fixture = Fixture::new();
        let (profile, explanations) = fixture.engine().generate(
            &cartesian_printer(),
            &MaterialDescriptor::generic_pla(),
            0.4,
            &RequirementVector::default(),
            None,
        );

        let layer_height = profile.get_f64("layer_height").unwrap();
        assert!(
            (0.16..=0.24).contains(&layer_height),
            "Balanced profile should land on a standard layer height, got {}",
            layer_height
        );
        assert_eq!(profile.get_f64("retraction_distance"), Some(0.8));
        let infill = profile.get_f64("infill_density").unwrap();
        assert!((15.0..=25.0).contains(&infill), "got {}", infill);
        assert!(explanations.contains_key("layer_height"));
    }

    #[test]
    fn test_quality_beats_speed_gives_finer_layers() {
        let fixture = Fixture::new();
        let engine = fixture.engine();
        let printer = cartesian_printer();
        let material = MaterialDescriptor::generic_pla();

        let fine = RequirementVector {
            surface_quality: 5,
            speed: 2,
            ..RequirementVector::default()
        };
        let coarse = RequirementVector {
            surface_quality: 2,
            speed: 5,
            ..RequirementVector::default()
        };

        let (fine_profile, _) = engine.generate(&printer, &material, 0.4, &fine, None);
        let (coarse_profile, _) = engine.generate(&printer, &material, 0.4, &coarse, None);

        assert!(
            fine_profile.get_f64("layer_height").unwrap()
                < coarse_profile.get_f64("layer_height").unwrap()
        );
    }

    #[test]
    fn test_strength_monotonicity() {
        let fixture = Fixture::new();
        let engine = fixture.engine();
        let printer = cartesian_printer();
        let material = MaterialDescriptor::generic_pla();

        let mut last_walls = 0;
        let mut last_infill = 0.0;
        for strength in 1..=5 {
            let requirements = RequirementVector {
                strength,
                ..RequirementVector::default()
            };
            let (profile, _) = engine.generate(&printer, &material, 0.4, &requirements, None);
            let walls = profile.get_i64("wall_line_count").unwrap();
            let infill = profile.get_f64("infill_density").unwrap();
            assert!(
                walls >= last_walls,
                "wall count decreased at strength {}",
                strength
            );
            assert!(
                infill >= last_infill,
                "infill decreased at strength {}",
                strength
            );
            last_walls = walls;
            last_infill = infill;
        }
    }

    #[test]
    fn test_tpu_disables_retraction_and_z_hop() {
        let fixture = Fixture::new();
        let mut material = MaterialDescriptor::generic_pla();
        material.kind = MaterialKind::Tpu;
        material.name = "Generic TPU".to_string();

        let (profile, _) = fixture.engine().generate(
            &cartesian_printer(),
            &material,
            0.4,
            &RequirementVector::default(),
            None,
        );

        assert_eq!(profile.get_bool("retraction_enable"), Some(false));
        assert_eq!(
            profile.get_bool("z_hop_enable"),
            Some(false),
            "Disabled retraction must force z-hop off"
        );
        assert!(profile.get_f64("print_speed").unwrap() <= 30.0);
    }

    #[test]
    fn test_base_profile_entries_survive_where_unowned() {
        let fixture = Fixture::new();
        let mut base = SettingsProfile::new();
        base.set("custom_setting", 42i64);

        let (profile, _) = fixture.engine().generate(
            &cartesian_printer(),
            &MaterialDescriptor::generic_pla(),
            0.4,
            &RequirementVector::default(),
            Some(&base),
        );

        assert_eq!(profile.get_i64("custom_setting"), Some(42));
    }

    #[test]
    fn test_recommend_known_setting() {
        let fixture = Fixture::new();
        let rec = fixture.engine().recommend(
            "layer_height",
            &cartesian_printer(),
            &MaterialDescriptor::generic_pla(),
            0.4,
            None,
            &RequirementVector::default(),
        );

        assert!(rec.value.is_some());
        assert_eq!(rec.confidence, 0.85);
        assert!(!rec.explanation.is_empty());
        assert!(!rec.alternatives.is_empty());
    }

    #[test]
    fn test_recommend_unknown_setting() {
        let fixture = Fixture::new();
        let rec = fixture.engine().recommend(
            "tree_support_tip_diameter",
            &cartesian_printer(),
            &MaterialDescriptor::generic_pla(),
            0.4,
            None,
            &RequirementVector::default(),
        );

        assert!(rec.value.is_none());
        assert_eq!(rec.confidence, 0.0);
        assert!(rec.alternatives.is_empty());
    }

    #[test]
    fn test_layer_height_alternatives_bounded() {
        let fixture = Fixture::new();
        let engine = fixture.engine();

        let alternatives = engine.alternatives("layer_height", &SettingValue::Float(0.2));
        assert_eq!(alternatives.len(), 2);
        assert_eq!(alternatives[0].value.as_f64(), Some(0.15));
        assert_eq!(alternatives[1].value.as_f64(), Some(0.25));

        // At the bottom of the declared range only the coarser step remains.
        let at_min = engine.alternatives("layer_height", &SettingValue::Float(0.05));
        assert_eq!(at_min.len(), 1);
        assert!(at_min[0].value.as_f64().unwrap() > 0.05);
    }

    #[test]
    fn test_enum_alternatives_cycle() {
        let fixture = Fixture::new();
        let engine = fixture.engine();

        let alternatives =
            engine.alternatives("infill_pattern", &SettingValue::Text("gyroid".to_string()));
        let values: Vec<&str> = alternatives
            .iter()
            .filter_map(|a| a.value.as_str())
            .collect();
        assert_eq!(values, vec!["honeycomb", "grid"]);
        assert!(alternatives[0].explanation.contains("strength"));
    }

    #[test]
    fn test_temperature_alternatives() {
        let fixture = Fixture::new();
        let alternatives = fixture
            .engine()
            .alternatives("material_print_temperature", &SettingValue::Int(205));
        assert_eq!(alternatives[0].value.as_i64(), Some(200));
        assert_eq!(alternatives[1].value.as_i64(), Some(210));
    }
}
