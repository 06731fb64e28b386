//! Dependency resolution: recomputes settings that are functions of other
//! settings so a partial edit cannot leave a profile inconsistent.
//!
//! The dependency graph is built once from the loaded rule tables and
//! ordered topologically at construction time; a cyclic table is rejected
//! there rather than discovered mid-derivation.

use std::collections::HashSet;

use crate::error::SlicemateError;
use crate::profile::{SettingValue, SettingsProfile};

use super::types::DependencyEdge;

/// Applies the static dependency graph to a profile.
///
/// `resolve` is idempotent: every edge recomputes its dependent from
/// driver values that the edge itself never writes, so a second pass
/// reproduces the first.
pub struct DependencyResolver {
    /// Edges in topological order.
    edges: Vec<DependencyEdge>,
}

impl DependencyResolver {
    /// Build a resolver from dependency edges, ordering them so that any
    /// edge writing a setting runs before edges reading it.
    ///
    /// Returns an error when the edges form a cycle.
    pub fn new(edges: &[DependencyEdge]) -> Result<Self, SlicemateError> {
        let order = topological_order(edges)?;
        Ok(Self {
            edges: order.into_iter().map(|i| edges[i].clone()).collect(),
        })
    }

    /// Recompute every dependent setting from its driver(s). Edges whose
    /// driver is absent are skipped, leaving the dependent at its prior
    /// value.
    pub fn resolve(&self, profile: &mut SettingsProfile) {
        for edge in &self.edges {
            apply_edge(edge, profile);
        }
    }

    /// Narrow pass: apply only edges reachable from the given driver
    /// settings. Used after the firmware overlay, which touches a small,
    /// known set of drivers.
    pub fn resolve_from(&self, profile: &mut SettingsProfile, drivers: &[&str]) {
        let mut reachable: HashSet<String> = drivers.iter().map(|d| d.to_string()).collect();
        for edge in &self.edges {
            if edge.drivers().iter().any(|d| reachable.contains(*d)) {
                apply_edge(edge, profile);
                for dep in edge.dependents() {
                    reachable.insert(dep.to_string());
                }
            }
        }
    }
}

/// Kahn's algorithm over the edge list: edge A precedes edge B when A
/// writes a setting B reads.
fn topological_order(edges: &[DependencyEdge]) -> Result<Vec<usize>, SlicemateError> {
    let n = edges.len();
    let mut succ: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indegree = vec![0usize; n];

    for (a, edge_a) in edges.iter().enumerate() {
        let writes: HashSet<&str> = edge_a.dependents().into_iter().collect();
        for (b, edge_b) in edges.iter().enumerate() {
            if a == b {
                continue;
            }
            if edge_b.drivers().iter().any(|d| writes.contains(*d)) {
                succ[a].push(b);
                indegree[b] += 1;
            }
        }
    }

    let mut queue: Vec<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = queue.pop() {
        order.push(i);
        for &j in &succ[i] {
            indegree[j] -= 1;
            if indegree[j] == 0 {
                queue.push(j);
            }
        }
    }

    if order.len() != n {
        let stuck: Vec<String> = (0..n)
            .filter(|&i| indegree[i] > 0)
            .flat_map(|i| edges[i].dependents())
            .map(String::from)
            .collect();
        return Err(SlicemateError::Rules(format!(
            "dependency graph contains a cycle involving: {}",
            stuck.join(", ")
        )));
    }

    Ok(order)
}

fn apply_edge(edge: &DependencyEdge, profile: &mut SettingsProfile) {
    match edge {
        DependencyEdge::Multiplier {
            drivers,
            dependent,
            factor,
            decimals,
            fill_only,
        } => {
            if *fill_only && profile.contains(dependent) {
                return;
            }
            let mut product = *factor;
            for driver in drivers {
                match profile.get_f64(driver) {
                    Some(v) => product *= v,
                    None => return,
                }
            }
            profile.set(dependent, rounded(product, *decimals));
        }
        DependencyEdge::InverseMultiplier {
            numerator,
            denominator,
            dependent,
        } => {
            let (Some(num), Some(denom)) =
                (profile.get_f64(numerator), profile.get_f64(denominator))
            else {
                return;
            };
            if denom.abs() < f64::EPSILON {
                return;
            }
            profile.set(dependent, (num / denom).round() as i64);
        }
        DependencyEdge::Requirement {
            driver,
            dependent,
            disabled_value,
        } => {
            if profile.get_bool(driver) == Some(false) {
                profile.set(dependent, disabled_value.clone());
            }
        }
        DependencyEdge::Conditional { driver, cases } => {
            let Some(value) = profile.get_str(driver).map(String::from) else {
                return;
            };
            for case in cases {
                if case.equals == value {
                    for (key, forced) in &case.set {
                        profile.set(key, forced.clone());
                    }
                }
            }
        }
    }
}

fn rounded(value: f64, decimals: Option<u8>) -> SettingValue {
    match decimals {
        Some(0) => SettingValue::Int(value.round() as i64),
        Some(d) => {
            let scale = 10f64.powi(d as i32);
            SettingValue::Float((value * scale).round() / scale)
        }
        None => SettingValue::Float(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::tables::default_tables;

    fn make_resolver() -> DependencyResolver {
        DependencyResolver::new(&default_tables().dependencies).unwrap()
    }

    fn seeded_profile() -> SettingsProfile {
        let mut p = SettingsProfile::new();
        p.set("layer_height", 0.2);
        p.set("line_width", 0.44);
        p.set("wall_line_count", 3i64);
        p.set("top_thickness", 0.8);
        p.set("bottom_thickness", 0.6);
        p.set("print_speed", 50i64);
        p.set("retraction_enable", true);
        p.set("support_enable", false);
        p.set("adhesion_type", "skirt");
        p.set("brim_width", 8i64);
        p
    }

    #[test]
    fn test_multiplier_edges() {
        let resolver = make_resolver();
        let mut p = seeded_profile();
        resolver.resolve(&mut p);

        assert_eq!(p.get_f64("initial_layer_height"), Some(0.3));
        assert_eq!(p.get_f64("wall_thickness"), Some(1.32));
    }

    #[test]
    fn test_inverse_edges_round_to_count() {
        let resolver = make_resolver();
        let mut p = seeded_profile();
        resolver.resolve(&mut p);

        assert_eq!(p.get_i64("top_layers"), Some(4));
        assert_eq!(p.get_i64("bottom_layers"), Some(3));
    }

    #[test]
    fn test_fill_only_speeds_do_not_overwrite() {
        let resolver = make_resolver();
        let mut p = seeded_profile();
        p.set("outer_wall_speed", 35i64);
        resolver.resolve(&mut p);

        // Existing value kept; missing ones filled from print_speed.
        assert_eq!(p.get_i64("outer_wall_speed"), Some(35));
        assert_eq!(p.get_i64("inner_wall_speed"), Some(40));
        assert_eq!(p.get_i64("infill_speed"), Some(60));
    }

    #[test]
    fn test_requirement_edges() {
        let resolver = make_resolver();
        let mut p = seeded_profile();
        p.set("retraction_enable", false);
        p.set("z_hop_enable", true);
        resolver.resolve(&mut p);

        assert_eq!(p.get_bool("z_hop_enable"), Some(false));
        assert_eq!(p.get_str("support_type"), Some("none"));
    }

    #[test]
    fn test_conditional_adhesion_exclusivity() {
        let resolver = make_resolver();

        let mut skirt = seeded_profile();
        resolver.resolve(&mut skirt);
        assert_eq!(skirt.get_i64("brim_width"), Some(0));

        let mut raft = seeded_profile();
        raft.set("adhesion_type", "raft");
        raft.set("skirt_line_count", 3i64);
        resolver.resolve(&mut raft);
        assert_eq!(raft.get_i64("brim_width"), Some(0));
        assert_eq!(raft.get_i64("skirt_line_count"), Some(0));
    }

    #[test]
    fn test_missing_driver_skips_edge() {
        let resolver = make_resolver();
        let mut p = SettingsProfile::new();
        p.set("top_thickness", 0.8);
        // No layer_height: top_layers must stay untouched.
        p.set("top_layers", 7i64);
        resolver.resolve(&mut p);

        assert_eq!(p.get_i64("top_layers"), Some(7));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = make_resolver();
        let mut once = seeded_profile();
        resolver.resolve(&mut once);
        let mut twice = once.clone();
        resolver.resolve(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_narrow_pass_only_touches_reachable() {
        let resolver = make_resolver();
        let mut p = seeded_profile();
        resolver.resolve(&mut p);

        // Simulate an overlay raising print_speed; remove a derived speed
        // so the narrow pass can re-fill it.
        p.set("print_speed", 80i64);
        p.remove("inner_wall_speed");
        p.set("layer_height", 0.3); // outside the narrow driver set
        let initial_before = p.get_f64("initial_layer_height").unwrap();

        resolver.resolve_from(&mut p, &["print_speed"]);

        assert_eq!(p.get_i64("inner_wall_speed"), Some(64));
        assert_eq!(
            p.get_f64("initial_layer_height"),
            Some(initial_before),
            "Narrow pass must not re-derive layer height dependents"
        );
    }

    #[test]
    fn test_cyclic_table_is_rejected() {
        let toml_src = r#"
            [[dependencies]]
            kind = "multiplier"
            drivers = ["a"]
            dependent = "b"

            [[dependencies]]
            kind = "multiplier"
            drivers = ["b"]
            dependent = "a"
        "#;
        #[derive(serde::Deserialize)]
        struct Wrapper {
            dependencies: Vec<DependencyEdge>,
        }
        let wrapper: Wrapper = toml::from_str(toml_src).unwrap();
        let err = DependencyResolver::new(&wrapper.dependencies);
        assert!(err.is_err(), "Cyclic dependency table must fail to load");
    }
}
