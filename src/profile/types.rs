use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A single slicer setting value.
///
/// Profiles are heterogeneous: layer heights are floats, wall counts are
/// integers, retraction toggles are booleans, infill patterns are strings.
/// The untagged representation keeps the serialized profile a flat JSON
/// object of plain values, which is what the storage and import/export
/// collaborators consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SettingValue {
    /// Numeric view of the value. Integers widen to f64; booleans and
    /// strings have no numeric interpretation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Float(v) => Some(*v),
            SettingValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer view. Floats round to the nearest integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Int(v) => Some(*v),
            SettingValue::Float(v) => Some(v.round() as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Display form used in diff records and explanation text.
    pub fn display(&self) -> String {
        match self {
            SettingValue::Bool(v) => v.to_string(),
            SettingValue::Int(v) => v.to_string(),
            SettingValue::Float(v) => {
                if (v.fract()).abs() < f64::EPSILON {
                    format!("{:.0}", v)
                } else {
                    format!("{}", v)
                }
            }
            SettingValue::Text(v) => v.clone(),
        }
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        SettingValue::Float(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Text(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::Text(v)
    }
}

/// A complete settings profile: the mapping from setting name to value for
/// one print configuration.
///
/// Wraps a `BTreeMap<String, SettingValue>` so key order is stable in
/// serialized output and in diffs. Typed accessors are provided for the
/// values the derivation pipeline actively manipulates; `raw`/`raw_mut`
/// expose the full map for collaborators.
///
/// A profile is owned by whichever derivation call produced it and is
/// cloned, never shared, when handed between pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsProfile {
    data: BTreeMap<String, SettingValue>,
}

impl SettingsProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a profile from a JSON object string.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: BTreeMap<String, SettingValue> = serde_json::from_str(json)?;
        Ok(Self { data })
    }

    /// Serialize to JSON with 4-space indentation. Appends a trailing
    /// newline if not already present.
    pub fn to_json(&self) -> Result<String> {
        use serde_json::ser::{PrettyFormatter, Serializer};
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        self.data.serialize(&mut ser)?;
        let mut s = String::from_utf8(buf)?;
        if !s.ends_with('\n') {
            s.push('\n');
        }
        Ok(s)
    }

    // --- Typed accessors ---

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.data.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.data.get(key)?.as_f64()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.data.get(key)?.as_i64()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.data.get(key)?.as_bool()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key)?.as_str()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    // --- Mutators ---

    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) {
        self.data.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.data.remove(key)
    }

    /// Copy every entry of `other` into this profile, overwriting on
    /// collision.
    pub fn merge(&mut self, other: &SettingsProfile) {
        for (key, value) in &other.data {
            self.data.insert(key.clone(), value.clone());
        }
    }

    // --- Raw access ---

    pub fn raw(&self) -> &BTreeMap<String, SettingValue> {
        &self.data
    }

    pub fn raw_mut(&mut self) -> &mut BTreeMap<String, SettingValue> {
        &mut self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.data.iter()
    }

    pub fn field_count(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
