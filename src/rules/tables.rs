//! TOML rule-table loading for the derivation engine.
//!
//! Provides two loading methods:
//! - `default_tables()` - Loads embedded tables compiled into the binary
//! - `load_tables(path)` - Loads custom tables from a file path
//!
//! Loading also runs the table-level diagnostics: every pair of rule sets
//! is checked for overlapping output-key claims (surfaced as a warning,
//! since application order resolves them), and the dependency list is
//! handed to `DependencyResolver::new` by the caller, which rejects cycles.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use tracing::warn;

use super::types::RuleTables;

/// Default tables embedded in the binary at compile time.
const DEFAULT_TABLES: &str = include_str!("../../config/derivation_rules.toml");

/// Load rule tables from a TOML file at the given path.
pub fn load_tables(path: &Path) -> Result<RuleTables> {
    let content = std::fs::read_to_string(path)?;
    let tables: RuleTables = toml::from_str(&content)?;
    report_ownership_overlaps(&tables);
    Ok(tables)
}

/// Get the default tables embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_tables() -> RuleTables {
    let tables: RuleTables =
        toml::from_str(DEFAULT_TABLES).expect("embedded derivation_rules.toml must be valid TOML");
    report_ownership_overlaps(&tables);
    tables
}

/// Find every output key claimed by more than one rule set.
///
/// Returns (earlier set, later set, key) triples in application order. The
/// later set wins at runtime; the triple documents which one.
pub fn ownership_overlaps(tables: &RuleTables) -> Vec<(String, String, String)> {
    let sets = tables.ownership.sets();
    let mut overlaps = Vec::new();

    for i in 0..sets.len() {
        let (earlier_name, earlier_keys) = sets[i];
        let earlier: HashSet<&str> = earlier_keys.iter().map(String::as_str).collect();
        for (later_name, later_keys) in sets.iter().skip(i + 1) {
            for key in later_keys.iter() {
                if earlier.contains(key.as_str()) {
                    overlaps.push((
                        earlier_name.to_string(),
                        later_name.to_string(),
                        key.clone(),
                    ));
                }
            }
        }
    }

    overlaps
}

fn report_ownership_overlaps(tables: &RuleTables) {
    for (earlier, later, key) in ownership_overlaps(tables) {
        warn!(
            "Rule sets '{}' and '{}' both claim output key '{}'; '{}' wins by application order",
            earlier, later, key, later
        );
    }
}
