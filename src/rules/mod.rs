//! Static rule tables, the rule application engine, and the dependency
//! resolver.
//!
//! # Architecture
//!
//! - **Tables**: Loaded from TOML at startup (or embedded defaults), with
//!   per-rule-set output-key ownership checked for overlap at load time
//! - **Engine**: Applies material, nozzle, printer, purpose, quality,
//!   speed and strength rules to a profile in that fixed order
//! - **Resolver**: Recomputes settings that are functions of other
//!   settings, from a dependency graph that is topologically ordered (and
//!   cycle-checked) once at load time

mod engine;
mod resolver;
mod tables;
mod types;

pub use engine::{ImportanceBucket, RuleEngine};
pub use resolver::DependencyResolver;
pub use tables::{default_tables, load_tables, ownership_overlaps};
pub use types::*;
