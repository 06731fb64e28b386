//! Rule application engine: applies the static tables to a profile in a
//! fixed order.
//!
//! Order is material -> nozzle -> printer -> purpose -> quality -> speed ->
//! strength. Each rule set writes only the keys it claims in the table's
//! ownership declaration; where two sets claim the same key the later one
//! wins, which the loader reports at load time.

use tracing::warn;

use crate::descriptors::{Kinematics, MaterialDescriptor, PrinterDescriptor, RequirementVector};
use crate::profile::SettingsProfile;

use super::types::{NozzleRules, RuleTables};

/// One of the five named tiers an importance score maps to.
///
/// The mapping is a single step function shared by the quality, speed and
/// strength rule sets: 5 -> Highest, 4 -> High, 3 -> Normal, 2 -> Low,
/// 1 -> Lowest. Out-of-range scores clamp into [1, 5] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportanceBucket {
    Lowest,
    Low,
    Normal,
    High,
    Highest,
}

impl ImportanceBucket {
    pub fn from_importance(importance: i32) -> Self {
        match importance.clamp(1, 5) {
            5 => ImportanceBucket::Highest,
            4 => ImportanceBucket::High,
            3 => ImportanceBucket::Normal,
            2 => ImportanceBucket::Low,
            _ => ImportanceBucket::Lowest,
        }
    }

    /// Key into the bucket-keyed rule tables.
    pub fn key(self) -> &'static str {
        match self {
            ImportanceBucket::Lowest => "lowest",
            ImportanceBucket::Low => "low",
            ImportanceBucket::Normal => "normal",
            ImportanceBucket::High => "high",
            ImportanceBucket::Highest => "highest",
        }
    }
}

/// The rule application engine. Borrows the loaded tables; cheap to
/// construct per derivation.
pub struct RuleEngine<'a> {
    tables: &'a RuleTables,
}

impl<'a> RuleEngine<'a> {
    pub fn new(tables: &'a RuleTables) -> Self {
        Self { tables }
    }

    /// Apply all rule sets to the profile in the fixed order. A lookup
    /// miss in any category skips that category and keeps whatever the
    /// profile already holds.
    pub fn apply(
        &self,
        profile: &mut SettingsProfile,
        printer: &PrinterDescriptor,
        material: &MaterialDescriptor,
        nozzle_size: f64,
        requirements: &RequirementVector,
    ) {
        self.apply_material_rules(profile, material, printer);
        self.apply_nozzle_rules(profile, nozzle_size);
        self.apply_printer_rules(profile, printer);
        self.apply_purpose_rules(profile, requirements);
        self.apply_quality_rules(profile, requirements, nozzle_size);
        self.apply_speed_rules(profile, requirements);
        self.apply_strength_rules(profile, requirements);
    }

    /// Nozzle bucket lookup: exact match on the diameter string, else the
    /// nearest bucket by numeric distance (ties resolve to the smaller
    /// diameter).
    pub fn nozzle_bucket(&self, nozzle_size: f64) -> Option<&NozzleRules> {
        let exact = format!("{}", nozzle_size);
        if let Some(rules) = self.tables.nozzle_rules.get(&exact) {
            return Some(rules);
        }
        // Integral diameters format without the decimal ("1" vs "1.0").
        let one_decimal = format!("{:.1}", nozzle_size);
        if let Some(rules) = self.tables.nozzle_rules.get(&one_decimal) {
            return Some(rules);
        }

        let mut candidates: Vec<(f64, &String, &NozzleRules)> = self
            .tables
            .nozzle_rules
            .iter()
            .filter_map(|(key, rules)| key.parse::<f64>().ok().map(|d| (d, key, rules)))
            .collect();
        candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        // Ties resolve to the smaller diameter, so take the first minimum.
        let mut nearest: Option<(f64, &String, &NozzleRules)> = None;
        for candidate in candidates {
            let distance = (candidate.0 - nozzle_size).abs();
            if nearest.map_or(true, |(best, _, _)| distance < (best - nozzle_size).abs()) {
                nearest = Some(candidate);
            }
        }
        let nearest = nearest.map(|(_, key, rules)| (key, rules));

        if let Some((key, rules)) = nearest {
            warn!(
                "No nozzle rules for {} mm, using nearest bucket {}",
                nozzle_size, key
            );
            return Some(rules);
        }
        None
    }

    fn apply_material_rules(
        &self,
        profile: &mut SettingsProfile,
        material: &MaterialDescriptor,
        printer: &PrinterDescriptor,
    ) {
        let key = material.kind.rule_key();
        let Some(rules) = self.tables.material_rules.get(key) else {
            warn!("No material rules for '{}', keeping seeded defaults", key);
            return;
        };

        profile.set("material_print_temperature", rules.temperature.optimal);
        profile.set("material_bed_temperature", rules.bed_temperature.optimal);

        profile.set("cooling_enable", true);
        profile.set("fan_speed", rules.cooling.optimal);
        profile.set("initial_fan_speed", rules.cooling.min);

        let retraction = if printer.direct_drive {
            &rules.retraction.direct_drive
        } else {
            &rules.retraction.bowden
        };
        profile.set("retraction_enable", true);
        profile.set("retraction_distance", retraction.distance);
        profile.set("retraction_speed", retraction.speed);
    }

    fn apply_nozzle_rules(&self, profile: &mut SettingsProfile, nozzle_size: f64) {
        let Some(rules) = self.nozzle_bucket(nozzle_size) else {
            return;
        };
        profile.set("layer_height", rules.optimal_layer_height);
        profile.set("line_width", rules.line_width);
    }

    fn apply_printer_rules(&self, profile: &mut SettingsProfile, printer: &PrinterDescriptor) {
        let key = printer.kinematics.rule_key();
        let Some(rules) = self.tables.printer_rules.get(key) else {
            warn!("No printer rules for kinematics '{}'", key);
            return;
        };

        profile.set("travel_speed", rules.max_speed);

        // Delta arms handle z-hop well and gain ooze control from it.
        if printer.kinematics == Kinematics::Delta {
            profile.set("z_hop_enable", true);
            profile.set("z_hop_height", 0.2);
        }
    }

    fn apply_purpose_rules(&self, profile: &mut SettingsProfile, requirements: &RequirementVector) {
        let key = requirements.purpose.rule_key();
        let Some(fragment) = self.tables.purpose_rules.get(key) else {
            warn!("No purpose rules for '{}', keeping seeded defaults", key);
            return;
        };
        for (setting, value) in fragment {
            profile.set(setting, value.clone());
        }
    }

    fn apply_quality_rules(
        &self,
        profile: &mut SettingsProfile,
        requirements: &RequirementVector,
        nozzle_size: f64,
    ) {
        let bucket = ImportanceBucket::from_importance(requirements.surface_quality);
        let Some(rules) = self.tables.quality_rules.get(bucket.key()) else {
            return;
        };

        // Layer height: bucket factor of the nozzle diameter, kept inside
        // the nozzle bucket's printable range.
        if profile.contains("layer_height") {
            if let Some(nozzle) = self.nozzle_bucket(nozzle_size) {
                let height = (rules.layer_height_factor * nozzle_size)
                    .clamp(nozzle.min_layer_height, nozzle.max_layer_height);
                profile.set("layer_height", round2(height));
            }
        }

        if let Some(speed) = profile.get_f64("print_speed") {
            profile.set("print_speed", (speed * rules.speed_factor).round() as i64);
        }
        if let Some(speed) = profile.get_f64("print_speed") {
            profile.set(
                "outer_wall_speed",
                (speed * rules.outer_wall_speed_factor).round() as i64,
            );
        }

        profile.set("ironing_enabled", rules.ironing_enabled);
    }

    fn apply_speed_rules(&self, profile: &mut SettingsProfile, requirements: &RequirementVector) {
        let bucket = ImportanceBucket::from_importance(requirements.speed);
        let Some(rules) = self.tables.speed_rules.get(bucket.key()) else {
            return;
        };

        let speed = rules.print_speed;
        profile.set("print_speed", speed.round() as i64);
        profile.set(
            "outer_wall_speed",
            (speed * rules.outer_wall_speed_factor).round() as i64,
        );
        profile.set(
            "inner_wall_speed",
            (speed * rules.inner_wall_speed_factor).round() as i64,
        );
        profile.set(
            "infill_speed",
            (speed * rules.infill_speed_factor).round() as i64,
        );
        profile.set(
            "travel_speed",
            (speed * rules.travel_speed_factor).round() as i64,
        );
    }

    fn apply_strength_rules(
        &self,
        profile: &mut SettingsProfile,
        requirements: &RequirementVector,
    ) {
        let bucket = ImportanceBucket::from_importance(requirements.strength);
        let Some(rules) = self.tables.strength_rules.get(bucket.key()) else {
            return;
        };

        profile.set("wall_line_count", rules.wall_line_count);
        profile.set("infill_density", rules.infill_density);
        profile.set("infill_pattern", rules.infill_pattern.as_str());

        if let Some(layer_height) = profile.get_f64("layer_height") {
            const BASE_TOP_LAYERS: f64 = 4.0;
            const BASE_BOTTOM_LAYERS: f64 = 3.0;

            let top_layers = (BASE_TOP_LAYERS * rules.top_layers_factor).round();
            let bottom_layers = (BASE_BOTTOM_LAYERS * rules.bottom_layers_factor).round();

            profile.set("top_layers", top_layers as i64);
            profile.set("bottom_layers", bottom_layers as i64);
            profile.set("top_thickness", round2(top_layers * layer_height));
            profile.set("bottom_thickness", round2(bottom_layers * layer_height));
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
