//! Input descriptors for a derivation call: what the printer can do, what
//! the material needs, and what the user cares about.

use serde::{Deserialize, Serialize};

/// Motion system class of a printer. Drives the kinematics rule lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kinematics {
    Cartesian,
    Delta,
    CoreXy,
}

impl Kinematics {
    pub fn rule_key(&self) -> &'static str {
        match self {
            Kinematics::Cartesian => "cartesian",
            Kinematics::Delta => "delta",
            Kinematics::CoreXy => "corexy",
        }
    }
}

/// Measured resonance characteristics of a printer, per axis.
/// Present when the printer has been input-shaper calibrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonanceData {
    pub x_frequency: f64,
    pub y_frequency: f64,
    pub damping_ratio_x: f64,
    pub damping_ratio_y: f64,
    pub shaper_type_x: String,
    pub shaper_type_y: String,
}

/// Capability descriptor for one printer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterDescriptor {
    /// Model name, e.g. "Ender 3 V2". Used for the firmware-overlay
    /// per-model lookup.
    pub model: String,
    pub kinematics: Kinematics,
    pub direct_drive: bool,
    /// Build volume in mm: [x, y, z].
    pub build_volume: [u32; 3],
    /// True when the printer runs Klipper and the firmware overlay may be
    /// applied.
    pub klipper: bool,
    pub resonance: Option<ResonanceData>,
}

/// Recognized material classes. Used for rule-table and pressure-advance
/// lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialKind {
    Pla,
    Petg,
    Abs,
    Tpu,
    Nylon,
    Other(String),
}

impl MaterialKind {
    /// Parse a material string using case-insensitive matching. Longer
    /// names are checked first so "PLA+" does not classify as Nylon.
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_uppercase();
        if upper.contains("PETG") || upper.contains("PET-G") {
            MaterialKind::Petg
        } else if upper.contains("PLA") {
            MaterialKind::Pla
        } else if upper.contains("ABS") {
            MaterialKind::Abs
        } else if upper.contains("TPU") || upper.contains("FLEX") {
            MaterialKind::Tpu
        } else if upper.contains("NYLON") || upper.contains("PA") {
            MaterialKind::Nylon
        } else {
            MaterialKind::Other(s.trim().to_string())
        }
    }

    /// Key into the material rule tables.
    pub fn rule_key(&self) -> &str {
        match self {
            MaterialKind::Pla => "PLA",
            MaterialKind::Petg => "PETG",
            MaterialKind::Abs => "ABS",
            MaterialKind::Tpu => "TPU",
            MaterialKind::Nylon => "NYLON",
            MaterialKind::Other(name) => name.as_str(),
        }
    }
}

/// Property descriptor for one material. Temperature fields in Celsius,
/// cooling fields in percent fan speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    pub name: String,
    pub kind: MaterialKind,
    pub temp_min: i64,
    pub temp_max: i64,
    pub bed_temp_min: i64,
    pub bed_temp_max: i64,
    pub cooling_min: i64,
    pub cooling_max: i64,
}

impl MaterialDescriptor {
    /// Generic PLA with the ranges every slicer ships as defaults. Handy
    /// for callers that have no material database.
    pub fn generic_pla() -> Self {
        Self {
            name: "Generic PLA".to_string(),
            kind: MaterialKind::Pla,
            temp_min: 190,
            temp_max: 220,
            bed_temp_min: 50,
            bed_temp_max: 60,
            cooling_min: 80,
            cooling_max: 100,
        }
    }
}

/// What the print is for. Drives the purpose rule fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Functional,
    Visual,
    Miniature,
    Large,
}

impl Purpose {
    /// Parse a purpose string; unknown values fall back to `Visual`, the
    /// neutral default, rather than failing the derivation.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "functional" => Purpose::Functional,
            "visual" => Purpose::Visual,
            "miniature" => Purpose::Miniature,
            "large" => Purpose::Large,
            _ => Purpose::Visual,
        }
    }

    pub fn rule_key(&self) -> &'static str {
        match self {
            Purpose::Functional => "functional",
            Purpose::Visual => "visual",
            Purpose::Miniature => "miniature",
            Purpose::Large => "large",
        }
    }
}

/// Weighted print requirements: five importance scores in [1, 5] plus a
/// purpose. Scores outside the range are clamped at the point of use, not
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequirementVector {
    pub strength: i32,
    pub surface_quality: i32,
    pub speed: i32,
    pub material_usage: i32,
    pub dimensional_accuracy: i32,
    pub purpose: Purpose,
}

impl Default for RequirementVector {
    fn default() -> Self {
        Self {
            strength: 3,
            surface_quality: 3,
            speed: 3,
            material_usage: 3,
            dimensional_accuracy: 3,
            purpose: Purpose::Visual,
        }
    }
}
