//! Profile comparison: structured per-setting differences plus weighted
//! heuristic estimates of print-time, quality and strength deltas.

use serde::Serialize;

use crate::profile::{SettingValue, SettingsProfile};
use crate::recommend::{assess_impact, explain_difference};

/// Settings worth reporting when two profiles are compared, in report
/// order.
const IMPORTANT_SETTINGS: &[&str] = &[
    "layer_height",
    "initial_layer_height",
    "line_width",
    "wall_line_count",
    "wall_thickness",
    "top_layers",
    "bottom_layers",
    "infill_density",
    "infill_pattern",
    "material_print_temperature",
    "material_bed_temperature",
    "print_speed",
    "outer_wall_speed",
    "inner_wall_speed",
    "infill_speed",
    "travel_speed",
    "retraction_enable",
    "retraction_distance",
    "fan_speed",
    "support_enable",
    "adhesion_type",
    "ironing_enabled",
];

/// One reported difference between two profiles.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileDifference {
    pub setting: String,
    pub value_a: SettingValue,
    pub value_b: SettingValue,
    pub explanation: String,
    pub impact: String,
}

/// Complete result of a profile comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileComparison {
    pub differences: Vec<ProfileDifference>,
    pub summary: String,
    /// Negative means profile B prints faster than profile A.
    pub print_time_delta_pct: f64,
    /// Positive means profile B has better estimated quality.
    pub quality_delta_pct: f64,
    /// Positive means profile B is estimated stronger.
    pub strength_delta_pct: f64,
}

/// Compare two completed profiles.
pub fn compare_profiles(a: &SettingsProfile, b: &SettingsProfile) -> ProfileComparison {
    let mut differences = Vec::new();

    for &setting in IMPORTANT_SETTINGS {
        let (Some(value_a), Some(value_b)) = (a.get(setting), b.get(setting)) else {
            continue;
        };
        if value_a == value_b {
            continue;
        }
        differences.push(ProfileDifference {
            setting: setting.to_string(),
            value_a: value_a.clone(),
            value_b: value_b.clone(),
            explanation: explain_difference(setting, value_a, value_b),
            impact: assess_impact(setting, value_a, value_b),
        });
    }

    let print_time_delta_pct = estimate_print_time_delta(a, b);
    let quality_delta_pct = estimate_quality_delta(a, b);
    let strength_delta_pct = estimate_strength_delta(a, b);

    let summary = format!(
        "Profile B is approximately {:.1}% {} than profile A. Quality is estimated to be \
         {:.1}% {}. Strength is approximately {:.1}% {}.",
        print_time_delta_pct.abs(),
        if print_time_delta_pct < 0.0 { "faster" } else { "slower" },
        quality_delta_pct.abs(),
        if quality_delta_pct > 0.0 { "better" } else { "lower" },
        strength_delta_pct.abs(),
        if strength_delta_pct > 0.0 { "higher" } else { "lower" },
    );

    ProfileComparison {
        differences,
        summary,
        print_time_delta_pct,
        quality_delta_pct,
        strength_delta_pct,
    }
}

/// Percentage contribution of one factor: (ratio - 1) * 100 * weight.
/// Returns zero when either value is missing or the reference is zero, so
/// absent factors drop out without renormalizing the remaining weights.
fn weighted_ratio_delta(
    a: &SettingsProfile,
    b: &SettingsProfile,
    setting: &str,
    weight: f64,
    inverse: bool,
) -> f64 {
    let (Some(va), Some(vb)) = (a.get_f64(setting), b.get_f64(setting)) else {
        return 0.0;
    };
    let (numerator, denominator) = if inverse { (va, vb) } else { (vb, va) };
    if denominator.abs() < f64::EPSILON {
        return 0.0;
    }
    (numerator / denominator - 1.0) * 100.0 * weight
}

/// Print-time estimate: thinner layers and slower speeds lengthen the
/// print, more infill and more walls lengthen it too.
fn estimate_print_time_delta(a: &SettingsProfile, b: &SettingsProfile) -> f64 {
    -weighted_ratio_delta(a, b, "layer_height", 0.4, false)
        - weighted_ratio_delta(a, b, "print_speed", 0.3, false)
        + weighted_ratio_delta(a, b, "infill_density", 0.15, false)
        + weighted_ratio_delta(a, b, "wall_line_count", 0.1, false)
}

fn estimate_quality_delta(a: &SettingsProfile, b: &SettingsProfile) -> f64 {
    weighted_ratio_delta(a, b, "layer_height", 0.5, true)
        + weighted_ratio_delta(a, b, "print_speed", 0.2, true)
        + weighted_ratio_delta(a, b, "outer_wall_speed", 0.15, true)
        + weighted_ratio_delta(a, b, "wall_line_count", 0.1, false)
}

fn estimate_strength_delta(a: &SettingsProfile, b: &SettingsProfile) -> f64 {
    weighted_ratio_delta(a, b, "infill_density", 0.4, false)
        + weighted_ratio_delta(a, b, "wall_line_count", 0.3, false)
        + weighted_ratio_delta(a, b, "layer_height", 0.1, false)
        + weighted_ratio_delta(a, b, "material_print_temperature", 0.1, false)
}
