use super::AppConfigError;
use std::path::PathBuf;

/// Environment variable that overrides the per-app data directory.
pub const DATA_DIR_ENV: &str = "FENN_DATA_DIR";

/// Where an application keeps its preferences and config.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_path: PathBuf,
}

impl Config {
    /// Resolves the data directory for `app_id`.
    ///
    /// `FENN_DATA_DIR` wins if set; otherwise `<config dir>/fenn/<app_id>`.
    pub fn for_app(app_id: &str) -> Result<Self, AppConfigError> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(Self {
                base_path: PathBuf::from(dir),
            });
        }
        let config_dir = dirs::config_dir().ok_or(AppConfigError::NoConfigDir)?;
        Ok(Self {
            base_path: config_dir.join("fenn").join(app_id),
        })
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.base_path.join("preferences.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_path.join("config.toml")
    }
}
