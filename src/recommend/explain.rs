//! Explanation generation: maps a (setting, value, context) triple to
//! descriptive text. Shared by the recommendation engine and the diff
//! estimator.

use std::collections::BTreeMap;

use crate::descriptors::{MaterialDescriptor, MaterialKind, PrinterDescriptor, Purpose, RequirementVector};
use crate::profile::{SettingValue, SettingsProfile};

/// Context an explanation can reference: the inputs of the derivation.
pub struct ExplainContext<'a> {
    pub printer: &'a PrinterDescriptor,
    pub material: &'a MaterialDescriptor,
    pub requirements: &'a RequirementVector,
}

/// Explanation for a single setting value. Unknown settings get a generic
/// sentence rather than an error.
pub fn explain(setting_name: &str, value: &SettingValue, ctx: &ExplainContext) -> String {
    match setting_name {
        "layer_height" => value
            .as_f64()
            .map(|v| explain_layer_height(v, ctx.requirements))
            .unwrap_or_else(|| generic(setting_name, value)),
        "material_print_temperature" => value
            .as_f64()
            .map(|v| explain_temperature(v, ctx.material, ctx.requirements))
            .unwrap_or_else(|| generic(setting_name, value)),
        "print_speed" => value
            .as_f64()
            .map(|v| explain_print_speed(v, ctx.requirements))
            .unwrap_or_else(|| generic(setting_name, value)),
        "infill_density" => value
            .as_f64()
            .map(|v| explain_infill_density(v, ctx.requirements))
            .unwrap_or_else(|| generic(setting_name, value)),
        "wall_line_count" => value
            .as_i64()
            .map(|v| explain_wall_count(v, ctx.requirements))
            .unwrap_or_else(|| generic(setting_name, value)),
        "retraction_distance" => value
            .as_f64()
            .map(|v| explain_retraction_distance(v, ctx.printer, ctx.material))
            .unwrap_or_else(|| generic(setting_name, value)),
        _ => generic(setting_name, value),
    }
}

/// Explanations for the settings of a derived profile that carry the most
/// decision weight.
pub fn profile_explanations(
    profile: &SettingsProfile,
    ctx: &ExplainContext,
) -> BTreeMap<String, String> {
    let mut explanations = BTreeMap::new();

    for name in [
        "layer_height",
        "material_print_temperature",
        "print_speed",
        "infill_density",
        "wall_line_count",
        "retraction_distance",
    ] {
        if let Some(value) = profile.get(name) {
            explanations.insert(name.to_string(), explain(name, value, ctx));
        }
    }

    if let Some(enabled) = profile.get_bool("support_enable") {
        explanations.insert(
            "support_enable".to_string(),
            explain_support(enabled, profile.get_f64("support_angle")),
        );
    }

    if let Some(adhesion) = profile.get_str("adhesion_type") {
        explanations.insert("adhesion_type".to_string(), explain_adhesion(adhesion));
    }

    explanations
}

fn generic(setting_name: &str, value: &SettingValue) -> String {
    format!(
        "Setting {} has value {} based on printer, material, and print requirements.",
        setting_name,
        value.display()
    )
}

fn explain_layer_height(value: f64, requirements: &RequirementVector) -> String {
    let quality = requirements.surface_quality.clamp(1, 5);
    let speed = requirements.speed.clamp(1, 5);

    let (quality_text, detail_text, speed_text) = if value <= 0.1 {
        ("very fine", "maximum detail", "significantly longer")
    } else if value <= 0.16 {
        ("fine", "high detail", "longer")
    } else if value <= 0.24 {
        ("standard", "good detail", "standard")
    } else if value <= 0.32 {
        ("coarse", "reduced detail", "faster")
    } else {
        ("very coarse", "minimal detail", "much faster")
    };

    let reason = if quality > speed {
        format!(
            "prioritizing quality over speed (quality importance: {}, speed importance: {})",
            quality, speed
        )
    } else if speed > quality {
        format!(
            "prioritizing speed over quality (speed importance: {}, quality importance: {})",
            speed, quality
        )
    } else {
        "balancing quality and speed equally".to_string()
    };

    format!(
        "Layer height of {}mm uses {} layers for {}, resulting in {} print times. \
         This value was selected {}.",
        value, quality_text, detail_text, speed_text, reason
    )
}

fn explain_temperature(
    value: f64,
    material: &MaterialDescriptor,
    requirements: &RequirementVector,
) -> String {
    let mid = (material.temp_min + material.temp_max) as f64 / 2.0;

    let (temp_text, effect_text) = if value < mid {
        (
            "lower end",
            "better detail and reduced stringing, but potentially weaker layer adhesion",
        )
    } else if value > mid {
        (
            "higher end",
            "better layer adhesion and strength, but potentially more stringing",
        )
    } else {
        ("middle", "balanced detail and strength")
    };

    let reason = if requirements.purpose == Purpose::Functional || requirements.strength >= 4 {
        "prioritizing strength and layer adhesion"
    } else if requirements.purpose == Purpose::Visual {
        "prioritizing visual quality and detail"
    } else {
        "balancing quality and strength"
    };

    format!(
        "Print temperature of {}°C is in the {} of the recommended range for {} \
         ({}°C-{}°C), providing {}. This temperature was selected {}.",
        value,
        temp_text,
        material.kind.rule_key(),
        material.temp_min,
        material.temp_max,
        effect_text,
        reason
    )
}

fn explain_print_speed(value: f64, requirements: &RequirementVector) -> String {
    let quality = requirements.surface_quality.clamp(1, 5);
    let speed = requirements.speed.clamp(1, 5);

    let (speed_text, quality_text, time_text) = if value <= 30.0 {
        ("very slow", "maximum quality", "significantly longer")
    } else if value <= 45.0 {
        ("slow", "high quality", "longer")
    } else if value <= 60.0 {
        ("standard", "good quality", "standard")
    } else if value <= 80.0 {
        ("fast", "reduced quality", "shorter")
    } else {
        ("very fast", "minimal quality", "much shorter")
    };

    let reason = if speed > quality {
        format!(
            "prioritizing speed over quality (speed importance: {}, quality importance: {})",
            speed, quality
        )
    } else if quality > speed {
        format!(
            "prioritizing quality over speed (quality importance: {}, speed importance: {})",
            quality, speed
        )
    } else {
        "balancing speed and quality equally".to_string()
    };

    format!(
        "Print speed of {}mm/s is {}, resulting in {} and {} print times. \
         This value was selected {}.",
        value, speed_text, quality_text, time_text, reason
    )
}

fn explain_infill_density(value: f64, requirements: &RequirementVector) -> String {
    let strength = requirements.strength.clamp(1, 5);
    let usage = requirements.material_usage.clamp(1, 5);

    let (density_text, strength_text, usage_text) = if value <= 10.0 {
        ("very low", "minimal strength", "minimal material")
    } else if value <= 20.0 {
        ("low", "moderate strength", "reduced material")
    } else if value <= 30.0 {
        ("medium", "good strength", "moderate material")
    } else if value <= 50.0 {
        ("high", "high strength", "increased material")
    } else {
        ("very high", "maximum strength", "maximum material")
    };

    let reason = priority_reason(strength, usage);

    format!(
        "Infill density of {}% provides {} internal fill, resulting in {} while using {}. \
         This value was selected {}.",
        value, density_text, strength_text, usage_text, reason
    )
}

fn explain_wall_count(value: i64, requirements: &RequirementVector) -> String {
    let strength = requirements.strength.clamp(1, 5);
    let usage = requirements.material_usage.clamp(1, 5);

    let (count_text, strength_text, usage_text) = if value <= 1 {
        ("minimum", "minimal strength", "minimal material")
    } else if value == 2 {
        ("low", "moderate strength", "reduced material")
    } else if value == 3 {
        ("standard", "good strength", "moderate material")
    } else if value == 4 {
        ("high", "high strength", "increased material")
    } else {
        ("very high", "maximum strength", "maximum material")
    };

    let reason = priority_reason(strength, usage);

    format!(
        "{} perimeter walls provides {} shell thickness, resulting in {} while using {} \
         for the outer shell. This value was selected {}.",
        value, count_text, strength_text, usage_text, reason
    )
}

fn priority_reason(strength: i32, usage: i32) -> String {
    if strength > usage {
        format!(
            "prioritizing strength over material usage (strength importance: {}, \
             material usage importance: {})",
            strength, usage
        )
    } else if usage > strength {
        format!(
            "prioritizing material savings over strength (material usage importance: {}, \
             strength importance: {})",
            usage, strength
        )
    } else {
        "balancing strength and material usage equally".to_string()
    }
}

fn explain_retraction_distance(
    value: f64,
    printer: &PrinterDescriptor,
    material: &MaterialDescriptor,
) -> String {
    let extruder_type = if printer.direct_drive {
        "direct drive"
    } else {
        "Bowden"
    };

    let (distance_text, effect_text) = if printer.direct_drive {
        if value <= 0.5 {
            ("very short", "minimal filament pulling, which may not prevent all stringing")
        } else if value <= 1.0 {
            ("short", "moderate filament pulling, balancing retraction and extrusion reliability")
        } else if value <= 1.5 {
            ("medium", "significant filament pulling, good for reducing stringing")
        } else {
            ("long", "maximum filament pulling, which may cause extrusion issues")
        }
    } else if value <= 3.0 {
        ("very short", "minimal filament pulling, which may not prevent all stringing")
    } else if value <= 5.0 {
        ("short", "moderate filament pulling, may not be enough for Bowden setups")
    } else if value <= 7.0 {
        ("medium", "significant filament pulling, good for reducing stringing")
    } else {
        ("long", "maximum filament pulling, which may cause extrusion issues")
    };

    let material_note = match material.kind {
        MaterialKind::Petg => {
            " PETG typically requires slightly higher retraction distances to prevent stringing."
        }
        MaterialKind::Tpu => {
            " TPU is flexible and often works better with reduced or disabled retraction."
        }
        _ => "",
    };

    format!(
        "Retraction distance of {}mm is {} for a {} extruder, providing {}.{}",
        value, distance_text, extruder_type, effect_text, material_note
    )
}

/// Explanation for a setting that differs between two profiles. Used by
/// the diff estimator's difference records.
pub fn explain_difference(
    setting: &str,
    value_a: &SettingValue,
    value_b: &SettingValue,
) -> String {
    let a = value_a.display();
    let b = value_b.display();
    let decreased = match (value_a.as_f64(), value_b.as_f64()) {
        (Some(va), Some(vb)) => vb < va,
        _ => false,
    };

    match setting {
        "layer_height" => format!(
            "Layer height changed from {}mm to {}mm. {}",
            a,
            b,
            if decreased {
                "Thinner layers provide better detail but slower printing."
            } else {
                "Thicker layers print faster but with less detail."
            }
        ),
        "print_speed" => format!(
            "Print speed changed from {}mm/s to {}mm/s. {}",
            a,
            b,
            if decreased {
                "Slower speeds generally improve quality."
            } else {
                "Faster speeds reduce print time but may affect quality."
            }
        ),
        "infill_density" => format!(
            "Infill density changed from {}% to {}%. {}",
            a,
            b,
            if decreased {
                "Lower density uses less material and prints faster."
            } else {
                "Higher density creates stronger parts but uses more material."
            }
        ),
        "wall_line_count" => format!(
            "Wall count changed from {} to {}. {}",
            a,
            b,
            if decreased {
                "Fewer walls use less material but reduce strength."
            } else {
                "More walls increase strength and water-tightness."
            }
        ),
        _ => format!("Changed from {} to {}.", a, b),
    }
}

/// Rough impact statement for a changed setting, using fixed per-setting
/// multipliers on the percentage change.
pub fn assess_impact(setting: &str, value_a: &SettingValue, value_b: &SettingValue) -> String {
    let pct_change = match (value_a.as_f64(), value_b.as_f64()) {
        (Some(va), Some(vb)) if va.abs() > f64::EPSILON => (vb - va) / va * 100.0,
        _ => return "Impact depends on specific print requirements.".to_string(),
    };

    match setting {
        "layer_height" => {
            if pct_change > 0.0 {
                format!(
                    "Print time reduced by approximately {:.1}%, quality reduced.",
                    0.8 * pct_change
                )
            } else {
                format!(
                    "Print time increased by approximately {:.1}%, quality improved.",
                    -0.8 * pct_change
                )
            }
        }
        "print_speed" => {
            if pct_change > 0.0 {
                format!(
                    "Print time reduced by approximately {:.1}%, may affect quality.",
                    0.7 * pct_change
                )
            } else {
                format!(
                    "Print time increased by approximately {:.1}%, quality may improve.",
                    -0.7 * pct_change
                )
            }
        }
        "infill_density" => {
            if pct_change > 0.0 {
                format!(
                    "Strength increased by approximately {:.1}%, material usage increased.",
                    0.5 * pct_change
                )
            } else {
                format!(
                    "Strength reduced by approximately {:.1}%, material usage decreased.",
                    -0.5 * pct_change
                )
            }
        }
        _ => "Impact depends on specific print requirements.".to_string(),
    }
}

fn explain_support(enabled: bool, angle: Option<f64>) -> String {
    if enabled {
        format!(
            "Supports are enabled with a {}° threshold to ensure proper printing of overhangs.",
            angle.unwrap_or(50.0)
        )
    } else {
        "Supports are disabled as they are likely not needed for this model based on the \
         print purpose."
            .to_string()
    }
}

fn explain_adhesion(adhesion_type: &str) -> String {
    let effect = match adhesion_type {
        "skirt" => "for better bed adhesion with minimal material usage",
        "brim" => "to prevent warping while maintaining dimensional accuracy",
        "raft" => "to maximize bed adhesion and prevent warping",
        _ => "based on the print purpose and model size",
    };
    let mut label: Vec<char> = adhesion_type.chars().collect();
    if let Some(first) = label.first_mut() {
        *first = first.to_ascii_uppercase();
    }
    format!(
        "{} adhesion is recommended {}.",
        label.into_iter().collect::<String>(),
        effect
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::Kinematics;

    fn ctx_parts() -> (PrinterDescriptor, MaterialDescriptor, RequirementVector) {
        (
            PrinterDescriptor {
                model: "Test".to_string(),
                kinematics: Kinematics::Cartesian,
                direct_drive: true,
                build_volume: [220, 220, 250],
                klipper: false,
                resonance: None,
            },
            MaterialDescriptor::generic_pla(),
            RequirementVector::default(),
        )
    }

    #[test]
    fn test_layer_height_references_importance() {
        let (printer, material, mut requirements) = ctx_parts();
        requirements.surface_quality = 5;
        requirements.speed = 2;
        let ctx = ExplainContext {
            printer: &printer,
            material: &material,
            requirements: &requirements,
        };

        let text = explain("layer_height", &SettingValue::Float(0.12), &ctx);
        assert!(text.contains("fine layers"));
        assert!(text.contains("quality importance: 5"));
        assert!(text.contains("speed importance: 2"));
    }

    #[test]
    fn test_temperature_names_material_range() {
        let (printer, material, requirements) = ctx_parts();
        let ctx = ExplainContext {
            printer: &printer,
            material: &material,
            requirements: &requirements,
        };

        let text = explain("material_print_temperature", &SettingValue::Int(210), &ctx);
        assert!(text.contains("PLA"));
        assert!(text.contains("190°C-220°C"));
        assert!(text.contains("higher end"));
    }

    #[test]
    fn test_retraction_mentions_bowden() {
        let (mut printer, material, requirements) = ctx_parts();
        printer.direct_drive = false;
        let ctx = ExplainContext {
            printer: &printer,
            material: &material,
            requirements: &requirements,
        };

        let text = explain("retraction_distance", &SettingValue::Float(5.0), &ctx);
        assert!(text.contains("Bowden"));
    }

    #[test]
    fn test_unknown_setting_gets_generic_text() {
        let (printer, material, requirements) = ctx_parts();
        let ctx = ExplainContext {
            printer: &printer,
            material: &material,
            requirements: &requirements,
        };

        let text = explain("minimum_wall_flow", &SettingValue::Float(90.0), &ctx);
        assert!(text.contains("minimum_wall_flow"));
        assert!(text.contains("90"));
    }

    #[test]
    fn test_profile_explanations_cover_key_settings() {
        let (printer, material, requirements) = ctx_parts();
        let ctx = ExplainContext {
            printer: &printer,
            material: &material,
            requirements: &requirements,
        };

        let mut profile = SettingsProfile::new();
        profile.set("layer_height", 0.2);
        profile.set("support_enable", false);
        profile.set("adhesion_type", "skirt");

        let explanations = profile_explanations(&profile, &ctx);
        assert!(explanations.contains_key("layer_height"));
        assert!(explanations["support_enable"].contains("disabled"));
        assert!(explanations["adhesion_type"].starts_with("Skirt"));
    }
}
