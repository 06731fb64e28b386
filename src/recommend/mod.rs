//! Recommendation engine and the shared explanation generator.

mod engine;
mod explain;

pub use engine::{seed_defaults, Alternative, Recommendation, RecommendationEngine};
pub use explain::{
    assess_impact, explain, explain_difference, profile_explanations, ExplainContext,
};
