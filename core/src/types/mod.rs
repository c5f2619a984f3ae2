pub(crate) mod config;
pub use config::{
    AppConfig, AppConfigError, Config, DATA_DIR_ENV, GeneralConfig, PreferencesConfig,
    THEME_ENV, ThemeOverrides, ThemePreference,
};

pub(crate) mod key;
pub use key::{Key, KeyError, MAX_KEY_LENGTH};
