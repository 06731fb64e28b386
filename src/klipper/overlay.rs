//! The Klipper firmware overlay: a post-pass that overrides acceleration,
//! pressure-advance and speed-adjacent settings using firmware-specific
//! resonance data.
//!
//! Applied only for printers flagged as running Klipper; for everything
//! else the overlay stage is a no-op at the call site.

use std::fmt::Write as _;

use tracing::{debug, warn};

use crate::descriptors::{MaterialDescriptor, PrinterDescriptor};
use crate::profile::SettingsProfile;

use super::types::{KlipperData, ModelLookupTier, PrinterModelConfig};

/// Named fallback model used when no model matches.
const FALLBACK_MODEL: &str = "sonic_pad_default";

/// Pressure advance defaults when the material table has no entry.
const DEFAULT_PA_DIRECT: f64 = 0.03;
const DEFAULT_PA_BOWDEN: f64 = 0.05;

pub struct KlipperOverlay<'a> {
    data: &'a KlipperData,
}

impl<'a> KlipperOverlay<'a> {
    pub fn new(data: &'a KlipperData) -> Self {
        Self { data }
    }

    /// Per-model configuration lookup, ranked: exact match, substring
    /// containment (either direction, case-insensitive), the designated
    /// fallback model, first available model, nothing.
    pub fn printer_model(
        &self,
        model: &str,
    ) -> (Option<&PrinterModelConfig>, ModelLookupTier) {
        let wanted = model.trim().to_lowercase();

        if let Some(config) = self.data.printer_models.get(&wanted) {
            return (Some(config), ModelLookupTier::Exact);
        }

        for (key, config) in &self.data.printer_models {
            let key_lower = key.to_lowercase();
            if !wanted.is_empty() && (key_lower.contains(&wanted) || wanted.contains(&key_lower)) {
                return (Some(config), ModelLookupTier::Substring);
            }
        }

        if let Some(config) = self.data.printer_models.get(FALLBACK_MODEL) {
            return (Some(config), ModelLookupTier::NamedFallback);
        }

        if let Some(config) = self.data.printer_models.values().next() {
            return (Some(config), ModelLookupTier::FirstAvailable);
        }

        (None, ModelLookupTier::Missing)
    }

    /// Recommended pressure advance for a material and extruder type.
    pub fn material_pressure_advance(&self, material: &MaterialDescriptor, direct_drive: bool) -> f64 {
        let fallback = if direct_drive {
            DEFAULT_PA_DIRECT
        } else {
            DEFAULT_PA_BOWDEN
        };
        match self
            .data
            .material_pressure_advance
            .get(material.kind.rule_key())
        {
            Some(rule) if direct_drive => rule.direct_drive,
            Some(rule) => rule.bowden,
            None => fallback,
        }
    }

    /// Apply the firmware overrides to the profile.
    pub fn apply(
        &self,
        profile: &mut SettingsProfile,
        printer: &PrinterDescriptor,
        material: &MaterialDescriptor,
    ) {
        let (config, tier) = self.printer_model(&printer.model);
        if tier != ModelLookupTier::Exact {
            warn!(
                "Klipper model lookup for '{}' resolved via {:?}",
                printer.model, tier
            );
        }
        debug!(
            "Applying Klipper overlay for '{}' ({:?})",
            printer.model, tier
        );

        // Pressure advance: printer tuning wins over the material table.
        let pressure_advance = config
            .and_then(|c| c.pressure_advance)
            .unwrap_or_else(|| self.material_pressure_advance(material, printer.direct_drive));
        profile.set("pressure_advance", pressure_advance);
        profile.set(
            "pressure_advance_smooth_time",
            config.map(|c| c.pressure_advance_smooth_time).unwrap_or(0.04),
        );

        // Resonance compensation: measured data on the descriptor wins
        // over the canned model tuning.
        let mut has_shaper = false;
        if let Some(resonance) = &printer.resonance {
            profile.set("input_shaper_x_freq", resonance.x_frequency);
            profile.set("input_shaper_y_freq", resonance.y_frequency);
            profile.set("input_shaper_type_x", resonance.shaper_type_x.as_str());
            profile.set("input_shaper_type_y", resonance.shaper_type_y.as_str());
            profile.set("damping_ratio_x", resonance.damping_ratio_x);
            profile.set("damping_ratio_y", resonance.damping_ratio_y);
            has_shaper = true;
        } else if let Some(shaper) = config.and_then(|c| c.input_shaper.as_ref()) {
            profile.set("input_shaper_x_freq", shaper.x_frequency);
            profile.set("input_shaper_y_freq", shaper.y_frequency);
            profile.set("input_shaper_type_x", shaper.shaper_type_x.as_str());
            profile.set("input_shaper_type_y", shaper.shaper_type_y.as_str());
            profile.set("damping_ratio_x", shaper.damping_ratio_x);
            profile.set("damping_ratio_y", shaper.damping_ratio_y);
            has_shaper = true;
        }

        let mut max_accel = config.map(|c| c.max_accel).unwrap_or(4000.0);
        let mut max_accel_to_decel = config.map(|c| c.max_accel_to_decel).unwrap_or(2000.0);
        profile.set(
            "square_corner_velocity",
            config.map(|c| c.square_corner_velocity).unwrap_or(5.0),
        );

        // Acceleration cap banded on the weaker axis. The band boundary is
        // exclusive on the upper side: exactly 50 Hz stays in the 6000 band.
        if let (Some(x_freq), Some(y_freq)) = (
            profile.get_f64("input_shaper_x_freq"),
            profile.get_f64("input_shaper_y_freq"),
        ) {
            let min_freq = x_freq.min(y_freq);
            let cap = if min_freq > 50.0 {
                10_000.0
            } else if min_freq > 40.0 {
                6_000.0
            } else if min_freq > 30.0 {
                4_000.0
            } else {
                2_000.0
            };
            max_accel = max_accel.min(cap);
            max_accel_to_decel = (max_accel / 2.0).floor();
        }
        profile.set("max_accel", max_accel as i64);
        profile.set("max_accel_to_decel", max_accel_to_decel as i64);

        // High acceleration raises the speed floors; existing faster
        // values are kept (`max`, never overwrite downward).
        if max_accel >= 8000.0 {
            if let Some(speed) = profile.get_f64("print_speed") {
                profile.set("print_speed", speed.max(80.0).round() as i64);
            }
            let travel = profile.get_f64("travel_speed").unwrap_or(150.0);
            profile.set("travel_speed", travel.max(200.0).round() as i64);
        } else if max_accel >= 5000.0 {
            if let Some(speed) = profile.get_f64("print_speed") {
                profile.set("print_speed", speed.max(60.0).round() as i64);
            }
            let travel = profile.get_f64("travel_speed").unwrap_or(150.0);
            profile.set("travel_speed", travel.max(180.0).round() as i64);
        }

        // Off by default; slicer retraction stays in charge until the user
        // opts in.
        profile.set("use_firmware_retraction", false);

        profile.set(
            "start_gcode",
            self.start_gcode(true, has_shaper).join("\n"),
        );
        profile.set("end_gcode", self.end_gcode().join("\n"));
    }

    /// Movement sequence for the start of a print, selected by which
    /// firmware features are in play.
    pub fn start_gcode(&self, use_pressure_advance: bool, use_input_shaper: bool) -> &[String] {
        if use_pressure_advance && use_input_shaper {
            &self.data.start_gcode.with_input_shaper
        } else if use_pressure_advance {
            &self.data.start_gcode.with_pressure_advance
        } else {
            &self.data.start_gcode.default
        }
    }

    pub fn end_gcode(&self) -> &[String] {
        &self.data.end_gcode.default
    }

    /// Render the firmware configuration snippet: one group per logical
    /// subsystem, `key: value` lines. The grouping and key names are a
    /// stable contract consumed by the firmware collaborator.
    pub fn firmware_config(&self, profile: &SettingsProfile) -> String {
        let mut out = String::from("# Klipper settings generated by slicemate\n\n");

        if profile.contains("pressure_advance") {
            out.push_str("[extruder]\n");
            for key in ["pressure_advance", "pressure_advance_smooth_time"] {
                if let Some(value) = profile.get(key) {
                    let _ = writeln!(out, "{}: {}", key, value.display());
                }
            }
            out.push('\n');
        }

        if profile.contains("input_shaper_x_freq") && profile.contains("input_shaper_y_freq") {
            out.push_str("[input_shaper]\n");
            let pairs = [
                ("shaper_freq_x", "input_shaper_x_freq"),
                ("shaper_freq_y", "input_shaper_y_freq"),
                ("shaper_type_x", "input_shaper_type_x"),
                ("shaper_type_y", "input_shaper_type_y"),
            ];
            for (out_key, profile_key) in pairs {
                if let Some(value) = profile.get(profile_key) {
                    let _ = writeln!(out, "{}: {}", out_key, value.display());
                }
            }
            out.push('\n');
        }

        if profile.contains("max_accel") {
            out.push_str("[printer]\n");
            for key in ["max_accel", "max_accel_to_decel", "square_corner_velocity"] {
                if let Some(value) = profile.get(key) {
                    let _ = writeln!(out, "{}: {}", key, value.display());
                }
            }
            out.push('\n');
        }

        out
    }

    /// Explanations for the firmware-specific settings the overlay wrote.
    pub fn explanations(
        &self,
        profile: &SettingsProfile,
    ) -> std::collections::BTreeMap<String, String> {
        let mut explanations = std::collections::BTreeMap::new();

        if let Some(pa) = profile.get_f64("pressure_advance") {
            let (band, effect) = if pa < 0.03 {
                ("very low", "minimal pressure compensation, may not fully prevent oozing")
            } else if pa < 0.06 {
                ("low to moderate", "good pressure compensation for most PLA filaments")
            } else if pa < 0.1 {
                ("moderate to high", "strong pressure compensation for PETG and similar filaments")
            } else {
                ("high", "very strong pressure compensation for flexible filaments")
            };
            explanations.insert(
                "pressure_advance".to_string(),
                format!(
                    "Pressure Advance value of {} provides {} compensation for pressure in the \
                     extruder, resulting in {}. This helps reduce corner bulging and improves \
                     dimensional accuracy.",
                    pa, band, effect
                ),
            );
        }

        if let (Some(x_freq), Some(y_freq)) = (
            profile.get_f64("input_shaper_x_freq"),
            profile.get_f64("input_shaper_y_freq"),
        ) {
            let x_type = profile.get_str("input_shaper_type_x").unwrap_or("mzv");
            let y_type = profile.get_str("input_shaper_type_y").unwrap_or("mzv");
            let min_freq = x_freq.min(y_freq);
            let (band, speed_effect) = if min_freq > 50.0 {
                ("high", "allows for high print speeds and accelerations")
            } else if min_freq > 40.0 {
                ("above average", "allows for good print speeds and accelerations")
            } else if min_freq > 30.0 {
                ("average", "allows for moderate print speeds and accelerations")
            } else {
                ("low", "requires lower print speeds and accelerations to prevent ringing")
            };
            explanations.insert(
                "input_shaper".to_string(),
                format!(
                    "Input Shaper is configured with {} resonance frequencies (X: {}Hz, Y: {}Hz) \
                     and uses {} for X-axis ({}) and {} for Y-axis ({}) to reduce ringing \
                     artifacts in prints. This configuration {}.",
                    band,
                    x_freq,
                    y_freq,
                    x_type,
                    shaper_type_gloss(x_type),
                    y_type,
                    shaper_type_gloss(y_type),
                    speed_effect
                ),
            );
        }

        if let Some(accel) = profile.get_f64("max_accel") {
            let (band, effect) = if accel >= 10_000.0 {
                ("very high", "extremely fast printing but may reduce quality on some printers")
            } else if accel >= 6_000.0 {
                ("high", "fast printing with good quality on well-tuned printers")
            } else if accel >= 3_000.0 {
                ("moderate", "good balance of speed and quality for most printers")
            } else {
                ("conservative", "prioritizes print quality over speed")
            };
            explanations.insert(
                "max_accel".to_string(),
                format!(
                    "Maximum acceleration of {} mm/s² is {}, which {}. This works with Input \
                     Shaper to determine the maximum speed changes during printing.",
                    accel, band, effect
                ),
            );
        }

        explanations
    }
}

fn shaper_type_gloss(shaper_type: &str) -> &'static str {
    match shaper_type {
        "zv" => "Zero Vibration, basic with minimal smoothing",
        "mzv" => "Modified Zero Vibration, balancing smoothing and responsiveness",
        "zvd" => "Zero Vibration Derivative, more smoothing than ZV",
        "ei" => "Exponential Input, significant smoothing",
        "2hump_ei" => "2-Hump Exponential Input, very strong smoothing",
        "3hump_ei" => "3-Hump Exponential Input, maximum smoothing",
        _ => "custom shaper",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{Kinematics, ResonanceData};
    use crate::klipper::default_klipper_data;

    fn klipper_printer(model: &str, resonance: Option<ResonanceData>) -> PrinterDescriptor {
        PrinterDescriptor {
            model: model.to_string(),
            kinematics: Kinematics::Cartesian,
            direct_drive: true,
            build_volume: [220, 220, 250],
            klipper: true,
            resonance,
        }
    }

    fn resonance(x: f64, y: f64) -> ResonanceData {
        ResonanceData {
            x_frequency: x,
            y_frequency: y,
            damping_ratio_x: 0.1,
            damping_ratio_y: 0.1,
            shaper_type_x: "mzv".to_string(),
            shaper_type_y: "mzv".to_string(),
        }
    }

    #[test]
    fn test_model_lookup_tiers() {
        let data = default_klipper_data();
        let overlay = KlipperOverlay::new(&data);

        let (_, tier) = overlay.printer_model("ender3");
        assert_eq!(tier, ModelLookupTier::Exact);

        let (config, tier) = overlay.printer_model("voron");
        assert_eq!(tier, ModelLookupTier::Substring);
        assert_eq!(config.unwrap().display_name, "Voron 2.4");

        let (config, tier) = overlay.printer_model("mystery printer");
        assert_eq!(tier, ModelLookupTier::NamedFallback);
        assert_eq!(config.unwrap().display_name, "Sonic Pad Default");
    }

    #[test]
    fn test_first_available_tier() {
        let mut data = default_klipper_data();
        data.printer_models.remove(FALLBACK_MODEL);
        let overlay = KlipperOverlay::new(&data);

        let (config, tier) = overlay.printer_model("mystery printer");
        assert_eq!(tier, ModelLookupTier::FirstAvailable);
        assert!(config.is_some());
    }

    #[test]
    fn test_material_pressure_advance_lookup() {
        let data = default_klipper_data();
        let overlay = KlipperOverlay::new(&data);

        let mut tpu = MaterialDescriptor::generic_pla();
        tpu.kind = crate::descriptors::MaterialKind::Tpu;
        assert_eq!(overlay.material_pressure_advance(&tpu, false), 0.35);

        let mut unknown = MaterialDescriptor::generic_pla();
        unknown.kind = crate::descriptors::MaterialKind::Other("PEEK".to_string());
        assert_eq!(overlay.material_pressure_advance(&unknown, true), 0.03);
    }

    #[test]
    fn test_accel_band_boundary_exclusive() {
        let data = default_klipper_data();
        let overlay = KlipperOverlay::new(&data);
        let material = MaterialDescriptor::generic_pla();

        // 50.1 Hz min frequency lands in the 10000 band...
        let mut fast = SettingsProfile::new();
        let printer = klipper_printer("voron_2.4", Some(resonance(50.1, 58.0)));
        overlay.apply(&mut fast, &printer, &material);
        assert_eq!(fast.get_i64("max_accel"), Some(10_000));
        assert_eq!(fast.get_i64("max_accel_to_decel"), Some(5_000));

        // ...while exactly 50.0 Hz stays in the 6000 band.
        let mut slower = SettingsProfile::new();
        let printer = klipper_printer("voron_2.4", Some(resonance(50.0, 58.0)));
        overlay.apply(&mut slower, &printer, &material);
        assert_eq!(slower.get_i64("max_accel"), Some(6_000));
        assert_eq!(slower.get_i64("max_accel_to_decel"), Some(3_000));
    }

    #[test]
    fn test_speed_floors_never_lower() {
        let data = default_klipper_data();
        let overlay = KlipperOverlay::new(&data);
        let material = MaterialDescriptor::generic_pla();
        let printer = klipper_printer("voron_2.4", Some(resonance(55.0, 58.0)));

        let mut slow = SettingsProfile::new();
        slow.set("print_speed", 50i64);
        overlay.apply(&mut slow, &printer, &material);
        assert_eq!(slow.get_i64("print_speed"), Some(80), "Floor raises slow profiles");

        let mut fast = SettingsProfile::new();
        fast.set("print_speed", 100i64);
        fast.set("travel_speed", 250i64);
        overlay.apply(&mut fast, &printer, &material);
        assert_eq!(fast.get_i64("print_speed"), Some(100), "Floor never lowers");
        assert_eq!(fast.get_i64("travel_speed"), Some(250));
    }

    #[test]
    fn test_printer_tuning_wins_over_material_table() {
        let data = default_klipper_data();
        let overlay = KlipperOverlay::new(&data);
        let material = MaterialDescriptor::generic_pla();
        let printer = klipper_printer("ender3", None);

        let mut profile = SettingsProfile::new();
        overlay.apply(&mut profile, &printer, &material);
        assert_eq!(profile.get_f64("pressure_advance"), Some(0.05));
        assert_eq!(profile.get_f64("pressure_advance_smooth_time"), Some(0.04));
    }

    #[test]
    fn test_firmware_config_grouping() {
        let data = default_klipper_data();
        let overlay = KlipperOverlay::new(&data);
        let material = MaterialDescriptor::generic_pla();
        let printer = klipper_printer("ender3", None);

        let mut profile = SettingsProfile::new();
        overlay.apply(&mut profile, &printer, &material);
        let config = overlay.firmware_config(&profile);

        assert!(config.contains("[extruder]"));
        assert!(config.contains("[input_shaper]"));
        assert!(config.contains("[printer]"));
        assert!(config.contains("pressure_advance: 0.05"));
        assert!(config.contains("shaper_freq_x: 37.8"));

        let extruder = config.find("[extruder]").unwrap();
        let shaper = config.find("[input_shaper]").unwrap();
        let printer_group = config.find("[printer]").unwrap();
        assert!(extruder < shaper && shaper < printer_group, "Group order is stable");
    }

    #[test]
    fn test_gcode_selection() {
        let data = default_klipper_data();
        let overlay = KlipperOverlay::new(&data);

        let both = overlay.start_gcode(true, true).join("\n");
        assert!(both.contains("SET_INPUT_SHAPER"));
        assert!(both.contains("SET_PRESSURE_ADVANCE"));

        let pa_only = overlay.start_gcode(true, false).join("\n");
        assert!(pa_only.contains("SET_PRESSURE_ADVANCE"));
        assert!(!pa_only.contains("SET_INPUT_SHAPER"));

        let neither = overlay.start_gcode(false, false).join("\n");
        assert!(!neither.contains("SET_PRESSURE_ADVANCE"));
    }

    #[test]
    fn test_explanations_name_the_bands() {
        let data = default_klipper_data();
        let overlay = KlipperOverlay::new(&data);
        let material = MaterialDescriptor::generic_pla();
        let printer = klipper_printer("voron_2.4", None);

        let mut profile = SettingsProfile::new();
        overlay.apply(&mut profile, &printer, &material);
        let explanations = overlay.explanations(&profile);

        assert!(explanations["input_shaper"].contains("high resonance frequencies"));
        assert!(explanations["max_accel"].contains("very high"));
        assert!(explanations.contains_key("pressure_advance"));
    }
}
