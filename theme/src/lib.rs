//! Theme colors and sizes for fenn widgets.
//!
//! # Design
//!
//! - Colors are resolved by semantic name ([`ColorName`]) and [`Variant`].
//! - The built-in tables live in [`DefaultTheme`]; other themes implement [`Theme`]
//!   and may leave names undefined by returning `None`.
//! - There is no process-wide current theme. Callers hold a [`ThemeContext`]
//!   and pass it to whatever needs colors or sizes.
//! - Lookups through a context never fail: an undefined color is logged and
//!   replaced with [`FALLBACK_COLOR`].

mod color;
mod context;
mod name;
mod theme;

pub use color::{Color, ColorParseError};
pub use context::{FALLBACK_COLOR, ThemeContext};
pub use name::{ColorName, NameParseError, PrimaryColor, SizeName, Variant};
pub use theme::{DefaultTheme, OverrideTheme, Theme, VariantOverrides};
