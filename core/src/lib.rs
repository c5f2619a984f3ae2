//! Application preferences and configuration for fenn apps.
//!
//! - [`preferences::Preferences`]: a key-value store mirrored to a JSON file,
//!   with bursts of writes coalesced into one flush per debounce window.
//! - [`types::AppConfig`]: the user-facing `config.toml`.
//! - [`types::Config`]: where an app keeps its files.

pub mod preferences;
pub mod types;

pub use preferences::Preferences;
pub use preferences::error::PreferencesError;
