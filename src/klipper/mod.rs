//! Klipper firmware overlay: pressure advance, input shaping, acceleration
//! banding, movement sequences and the firmware configuration snippet.

mod overlay;
mod types;

use std::path::Path;

use anyhow::Result;

pub use overlay::KlipperOverlay;
pub use types::*;

/// Default Klipper data embedded in the binary at compile time.
const DEFAULT_KLIPPER: &str = include_str!("../../config/klipper.toml");

/// Load Klipper data from a TOML file at the given path.
pub fn load_klipper_data(path: &Path) -> Result<KlipperData> {
    let content = std::fs::read_to_string(path)?;
    let data: KlipperData = toml::from_str(&content)?;
    Ok(data)
}

/// Get the default Klipper data embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_klipper_data() -> KlipperData {
    toml::from_str(DEFAULT_KLIPPER).expect("embedded klipper.toml must be valid TOML")
}
