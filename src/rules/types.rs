//! Type definitions for the static derivation rule tables.
//!
//! These types are the TOML deserialization targets for
//! `config/derivation_rules.toml`. Loaded once, immutable for the lifetime
//! of a derivation.

use std::collections::HashMap;

use serde::Deserialize;

use crate::profile::SettingValue;

/// Root configuration loaded from derivation_rules.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleTables {
    /// Material rules keyed by material rule key (e.g. "PLA", "PETG")
    pub material_rules: HashMap<String, MaterialRules>,
    /// Kinematics rules keyed by class ("cartesian", "delta", "corexy")
    pub printer_rules: HashMap<String, PrinterRules>,
    /// Nozzle rules keyed by diameter string (e.g. "0.4")
    pub nozzle_rules: HashMap<String, NozzleRules>,
    /// Purpose rules: a partial profile fragment per purpose
    pub purpose_rules: HashMap<String, HashMap<String, SettingValue>>,
    /// Quality rules keyed by importance bucket name
    pub quality_rules: HashMap<String, QualityRules>,
    /// Speed rules keyed by importance bucket name
    pub speed_rules: HashMap<String, SpeedRules>,
    /// Strength rules keyed by importance bucket name
    pub strength_rules: HashMap<String, StrengthRules>,
    /// Output keys each rule set claims, checked for overlap at load time
    pub ownership: Ownership,
    /// Directed dependency edges between settings
    pub dependencies: Vec<DependencyEdge>,
}

/// Temperature band for a material, with the value the engine picks.
#[derive(Debug, Clone, Deserialize)]
pub struct TemperatureRule {
    pub min: f64,
    pub max: f64,
    pub optimal: f64,
}

/// Retraction values for one extruder type.
#[derive(Debug, Clone, Deserialize)]
pub struct RetractionValues {
    pub distance: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetractionRule {
    pub direct_drive: RetractionValues,
    pub bowden: RetractionValues,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialRules {
    pub temperature: TemperatureRule,
    pub bed_temperature: TemperatureRule,
    pub cooling: TemperatureRule,
    pub retraction: RetractionRule,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrinterRules {
    pub max_speed: f64,
    pub max_acceleration: f64,
    pub jerk: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NozzleRules {
    pub min_layer_height: f64,
    pub max_layer_height: f64,
    pub optimal_layer_height: f64,
    pub line_width: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QualityRules {
    /// Layer height as a fraction of nozzle diameter, clamped to the
    /// nozzle bucket's layer height range.
    pub layer_height_factor: f64,
    pub speed_factor: f64,
    pub outer_wall_speed_factor: f64,
    pub ironing_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeedRules {
    pub print_speed: f64,
    pub outer_wall_speed_factor: f64,
    pub inner_wall_speed_factor: f64,
    pub infill_speed_factor: f64,
    pub travel_speed_factor: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrengthRules {
    pub wall_line_count: i64,
    pub infill_density: i64,
    pub infill_pattern: String,
    pub top_layers_factor: f64,
    pub bottom_layers_factor: f64,
}

/// Output keys claimed per rule set. Two rule sets claiming the same key
/// is a load-time diagnostic, not an error: application order makes the
/// later set win, and that override is documented by the warning.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ownership {
    #[serde(default)]
    pub material: Vec<String>,
    #[serde(default)]
    pub nozzle: Vec<String>,
    #[serde(default)]
    pub printer: Vec<String>,
    #[serde(default)]
    pub purpose: Vec<String>,
    #[serde(default)]
    pub quality: Vec<String>,
    #[serde(default)]
    pub speed: Vec<String>,
    #[serde(default)]
    pub strength: Vec<String>,
}

impl Ownership {
    /// (rule set name, owned keys) pairs in application order.
    pub fn sets(&self) -> [(&'static str, &[String]); 7] {
        [
            ("material", self.material.as_slice()),
            ("nozzle", self.nozzle.as_slice()),
            ("printer", self.printer.as_slice()),
            ("purpose", self.purpose.as_slice()),
            ("quality", self.quality.as_slice()),
            ("speed", self.speed.as_slice()),
            ("strength", self.strength.as_slice()),
        ]
    }
}

/// One case of a conditional dependency: when the driver equals `equals`,
/// force the listed settings to the given values.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionalCase {
    pub equals: String,
    pub set: HashMap<String, SettingValue>,
}

/// A directed dependency edge: the dependent setting is a function of its
/// driver(s). The graph restricted to these edges must be acyclic, which
/// is verified once when the tables are loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DependencyEdge {
    /// dependent = product(drivers) * factor
    Multiplier {
        drivers: Vec<String>,
        dependent: String,
        #[serde(default = "default_factor")]
        factor: f64,
        /// Decimal places to round to; absent means integer rounding is
        /// not applied.
        #[serde(default)]
        decimals: Option<u8>,
        /// Only write the dependent when it is absent from the profile.
        #[serde(default)]
        fill_only: bool,
    },
    /// dependent = round(numerator / denominator), an integer count
    InverseMultiplier {
        numerator: String,
        denominator: String,
        dependent: String,
    },
    /// When the boolean driver is false, force the dependent to the
    /// neutral/disabled value.
    Requirement {
        driver: String,
        dependent: String,
        disabled_value: SettingValue,
    },
    /// Zero out mutually exclusive fields based on the driver's value.
    Conditional {
        driver: String,
        cases: Vec<ConditionalCase>,
    },
}

fn default_factor() -> f64 {
    1.0
}

impl DependencyEdge {
    /// Settings this edge reads.
    pub fn drivers(&self) -> Vec<&str> {
        match self {
            DependencyEdge::Multiplier { drivers, .. } => {
                drivers.iter().map(String::as_str).collect()
            }
            DependencyEdge::InverseMultiplier {
                numerator,
                denominator,
                ..
            } => vec![numerator.as_str(), denominator.as_str()],
            DependencyEdge::Requirement { driver, .. } => vec![driver.as_str()],
            DependencyEdge::Conditional { driver, .. } => vec![driver.as_str()],
        }
    }

    /// Settings this edge may write.
    pub fn dependents(&self) -> Vec<&str> {
        match self {
            DependencyEdge::Multiplier { dependent, .. }
            | DependencyEdge::InverseMultiplier { dependent, .. }
            | DependencyEdge::Requirement { dependent, .. } => vec![dependent.as_str()],
            DependencyEdge::Conditional { cases, .. } => cases
                .iter()
                .flat_map(|c| c.set.keys().map(String::as_str))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_edge_deserialize() {
        let toml_src = r#"
            kind = "multiplier"
            drivers = ["layer_height"]
            dependent = "initial_layer_height"
            factor = 1.5
            decimals = 2
        "#;
        let edge: DependencyEdge = toml::from_str(toml_src).unwrap();
        assert_eq!(edge.drivers(), vec!["layer_height"]);
        assert_eq!(edge.dependents(), vec!["initial_layer_height"]);
    }

    #[test]
    fn test_conditional_edge_deserialize() {
        let toml_src = r#"
            kind = "conditional"
            driver = "adhesion_type"

            [[cases]]
            equals = "skirt"
            [cases.set]
            brim_width = 0
        "#;
        let edge: DependencyEdge = toml::from_str(toml_src).unwrap();
        assert_eq!(edge.drivers(), vec!["adhesion_type"]);
        assert_eq!(edge.dependents(), vec!["brim_width"]);
    }
}
