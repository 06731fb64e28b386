//! Type definitions for the Klipper firmware data.
//!
//! Deserialization targets for `config/klipper.toml`: per-model tuning
//! values, the material pressure-advance table, movement sequence
//! templates, and the firmware-specific setting metadata merged into the
//! catalog.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::profile::SettingMetadata;

/// Root configuration loaded from klipper.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct KlipperData {
    /// Per-model tuning, keyed by model id (e.g. "ender3_v2"). BTreeMap
    /// so the first-available fallback tier is deterministic.
    pub printer_models: BTreeMap<String, PrinterModelConfig>,
    /// Pressure advance per material, split by extruder type.
    pub material_pressure_advance: HashMap<String, PressureAdvanceRule>,
    pub start_gcode: StartGcodeTemplates,
    pub end_gcode: EndGcodeTemplates,
    /// Firmware-specific settings appended to the settings catalog.
    pub additional_settings: HashMap<String, SettingMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrinterModelConfig {
    pub display_name: String,
    #[serde(default)]
    pub pressure_advance: Option<f64>,
    pub pressure_advance_smooth_time: f64,
    #[serde(default)]
    pub input_shaper: Option<InputShaperConfig>,
    pub max_accel: f64,
    pub max_accel_to_decel: f64,
    pub square_corner_velocity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputShaperConfig {
    pub x_frequency: f64,
    pub y_frequency: f64,
    pub shaper_type_x: String,
    pub shaper_type_y: String,
    pub damping_ratio_x: f64,
    pub damping_ratio_y: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PressureAdvanceRule {
    pub direct_drive: f64,
    pub bowden: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartGcodeTemplates {
    pub default: Vec<String>,
    pub with_pressure_advance: Vec<String>,
    pub with_input_shaper: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndGcodeTemplates {
    pub default: Vec<String>,
}

/// Which tier of the model lookup produced a result. The tiers are tried
/// in declaration order; tests enumerate them deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelLookupTier {
    Exact,
    Substring,
    NamedFallback,
    FirstAvailable,
    Missing,
}
