//! Settings profiles, setting metadata, and the derivation facade.

mod generator;
mod metadata;
mod types;

pub use generator::{DerivedProfile, ProfileGenerator};
pub use metadata::{DataType, SettingMetadata, SettingsCatalog};
pub use types::{SettingValue, SettingsProfile};
