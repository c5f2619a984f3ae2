mod app;
mod data_dir;

pub use app::{
    AppConfig, AppConfigError, GeneralConfig, PreferencesConfig, THEME_ENV, ThemeOverrides,
    ThemePreference,
};
pub use data_dir::{Config, DATA_DIR_ENV};
