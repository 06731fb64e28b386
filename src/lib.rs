//! slicemate: derives a complete, internally consistent 3D printer
//! settings profile from a printer capability descriptor, a material
//! descriptor, and a weighted set of print requirements.
//!
//! The pipeline is synchronous and single-threaded per call: seed
//! defaults, apply requirement-driven heuristics, apply the static rule
//! tables in a fixed order, resolve setting dependencies, optionally
//! apply the Klipper firmware overlay, and generate explanations.
//! Reference data is loaded once per [`ProfileGenerator`] and read-only
//! afterwards, so calls may run in parallel against a shared generator.

pub mod descriptors;
mod error;
pub mod diff;
pub mod klipper;
pub mod profile;
pub mod recommend;
pub mod rules;

pub use descriptors::{
    Kinematics, MaterialDescriptor, MaterialKind, PrinterDescriptor, Purpose, RequirementVector,
    ResonanceData,
};
pub use diff::{ProfileComparison, ProfileDifference};
pub use error::SlicemateError;
pub use profile::{DerivedProfile, ProfileGenerator, SettingValue, SettingsProfile};
pub use recommend::{Alternative, Recommendation};

/// Initialize tracing output for binaries and tests. Respects `RUST_LOG`,
/// defaulting to `info`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .ok();
}
