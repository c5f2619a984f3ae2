use crate::preferences::DEFAULT_DEBOUNCE;
use fenn_theme::{
    DefaultTheme, OverrideTheme, PrimaryColor, ThemeContext, Variant, VariantOverrides,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that picks the variant when the config says `system`.
pub const THEME_ENV: &str = "FENN_THEME";

/// User-facing application configuration, persisted as config.toml.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default, skip_serializing_if = "ThemeOverrides::is_empty")]
    pub theme: ThemeOverrides,
}

impl AppConfig {
    /// Returns the config file path within the given data directory.
    pub fn path(data_dir: &Path) -> std::path::PathBuf {
        data_dir.join("config.toml")
    }

    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), AppConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.preferences.debounce_ms == 0 {
            errors.push("debounce_ms must be at least 1".to_string());
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::default();
        Self {
            general: self.general.clone(),
            preferences: PreferencesConfig {
                debounce_ms: if self.preferences.debounce_ms == 0 {
                    defaults.preferences.debounce_ms
                } else {
                    self.preferences.debounce_ms
                },
            },
            theme: self.theme.clone(),
        }
    }

    /// The variant to render with, after resolving `system`.
    pub fn variant(&self) -> Variant {
        self.general.theme.resolve()
    }

    /// Builds the theme context described by this config.
    pub fn theme_context(&self) -> ThemeContext {
        let base = Arc::new(DefaultTheme::new(self.general.primary_color));
        let variant = self.variant();
        if self.theme.is_empty() {
            return ThemeContext::new(base, variant);
        }
        let theme = OverrideTheme::new(base, self.theme.light.clone(), self.theme.dark.clone());
        ThemeContext::new(Arc::new(theme), variant)
    }
}

/// General application settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default)]
    pub primary_color: PrimaryColor,
}

/// Theme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Dark,
    Light,
    #[default]
    System,
}

impl ThemePreference {
    /// Resolves to a concrete variant.
    ///
    /// `System` honours `FENN_THEME` and otherwise uses the default variant.
    pub fn resolve(self) -> Variant {
        match self {
            ThemePreference::Dark => Variant::Dark,
            ThemePreference::Light => Variant::Light,
            ThemePreference::System => match std::env::var(THEME_ENV) {
                Ok(value) => value.parse().unwrap_or_else(|_| {
                    tracing::warn!("Ignoring unknown {} value '{}'", THEME_ENV, value);
                    Variant::default_variant()
                }),
                Err(_) => Variant::default_variant(),
            },
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemePreference::Dark => write!(f, "dark"),
            ThemePreference::Light => write!(f, "light"),
            ThemePreference::System => write!(f, "system"),
        }
    }
}

/// Preferences store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Minimum gap between two writes of the preferences file.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl PreferencesConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

/// Color overrides per variant, layered over the built-in theme.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeOverrides {
    #[serde(default)]
    pub light: VariantOverrides,
    #[serde(default)]
    pub dark: VariantOverrides,
}

impl ThemeOverrides {
    pub fn is_empty(&self) -> bool {
        self.light.is_empty() && self.dark.is_empty()
    }
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no config directory for this platform")]
    NoConfigDir,
}
