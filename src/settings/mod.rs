//! Connection defaults from the command line, the environment and an
//! optional YAML file.

pub(crate) mod settings_manager;

pub use settings_manager::{ConnectionSettings, SettingsManager};
