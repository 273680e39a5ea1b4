// Settings service module
// Loads and stores GridSettings as TOML in the user config directory

mod service;

pub use service::{SettingsService, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
