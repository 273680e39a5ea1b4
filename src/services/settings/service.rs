use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::GridSettings;

/// Environment variable overriding the settings file location
pub const CONFIG_ENV_VAR: &str = "CLINIC_AGENDA_CONFIG";
pub const CONFIG_FILE_NAME: &str = "grid.toml";

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings at `$CLINIC_AGENDA_CONFIG`, or the platform config directory
    pub fn from_environment() -> Self {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::new(Self::default_config_path()),
        }
    }

    pub fn default_config_path() -> PathBuf {
        if let Some(dirs) = ProjectDirs::from("com", "ClinicAgenda", "ClinicAgenda") {
            dirs.config_dir().join(CONFIG_FILE_NAME)
        } else {
            log::warn!("Unable to resolve project directory; using current dir for settings");
            PathBuf::from(CONFIG_FILE_NAME)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings; a missing file yields the defaults
    pub fn load(&self) -> Result<GridSettings> {
        if !self.path.exists() {
            log::debug!("No settings at {:?}, using defaults", self.path);
            return Ok(GridSettings::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {:?}", self.path))?;
        let settings = GridSettings::from_toml(&content)
            .with_context(|| format!("Failed to parse settings in {:?}", self.path))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {:?}: {}", self.path, e))?;

        log::info!(
            "Loaded grid settings from {:?}: slot={}m granularity={}m move={}m",
            self.path,
            settings.slot_duration,
            settings.minute_granularity,
            settings.move_granularity
        );
        Ok(settings)
    }

    /// Validate and write the settings, creating the parent directory
    pub fn save(&self, settings: &GridSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
        }

        let toml = settings.to_toml().context("Failed to serialize settings")?;
        std::fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))?;
        Ok(())
    }

    /// Reset settings to defaults
    pub fn reset(&self) -> Result<()> {
        self.save(&GridSettings::default())
    }
}
