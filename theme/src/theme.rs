use crate::color::Color;
use crate::name::{ColorName, PrimaryColor, SizeName, Variant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A source of named colors and sizes.
///
/// Returning `None` means the theme does not define the name. Callers normally go
/// through [`crate::ThemeContext`], which logs and substitutes a fallback.
pub trait Theme: Send + Sync {
    fn color(&self, name: &ColorName, variant: Variant) -> Option<Color>;

    fn size(&self, name: SizeName) -> Option<f32>;
}

/// The built-in theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultTheme {
    pub primary: PrimaryColor,
}

impl DefaultTheme {
    pub fn new(primary: PrimaryColor) -> Self {
        Self { primary }
    }
}

impl Theme for DefaultTheme {
    fn color(&self, name: &ColorName, variant: Variant) -> Option<Color> {
        let primary = self.primary.color();
        let color = match name {
            ColorName::Primary | ColorName::Hyperlink => primary,
            ColorName::PrimaryForeground => self.primary.foreground(),
            ColorName::Focus => primary.with_alpha(0x7f),
            ColorName::Selection => primary.with_alpha(0x3f),
            ColorName::Custom(_) => return None,
            _ => match variant {
                Variant::Light => light::color(name)?,
                Variant::Dark => dark::color(name)?,
            },
        };
        Some(color)
    }

    fn size(&self, name: SizeName) -> Option<f32> {
        Some(default_size(name))
    }
}

/// Sizes used by the built-in theme.
pub(crate) fn default_size(name: SizeName) -> f32 {
    match name {
        SizeName::Padding => 4.0,
        SizeName::InnerPadding => 8.0,
        SizeName::LineSpacing => 4.0,
        SizeName::Text => 14.0,
        SizeName::SeparatorThickness => 1.0,
        SizeName::InputBorder => 1.0,
        SizeName::InputRadius => 5.0,
        SizeName::SelectionRadius => 3.0,
        SizeName::ScrollBar => 12.0,
    }
}

mod dark {
    use super::*;

    pub(super) fn color(name: &ColorName) -> Option<Color> {
        let color = match name {
            ColorName::Background => Color::opaque(0x17, 0x17, 0x18),
            ColorName::Button => Color::opaque(0x28, 0x29, 0x2e),
            ColorName::Disabled => Color::opaque(0x39, 0x39, 0x3a),
            ColorName::DisabledButton => Color::opaque(0x28, 0x29, 0x2e),
            ColorName::Error => Color::opaque(0xf4, 0x43, 0x36),
            ColorName::ErrorForeground => Color::opaque(0x17, 0x17, 0x18),
            ColorName::Foreground => Color::opaque(0xf3, 0xf3, 0xf3),
            ColorName::HeaderBackground => Color::opaque(0x1b, 0x1b, 0x1b),
            ColorName::Hover => Color::rgba(0xff, 0xff, 0xff, 0x0f),
            ColorName::InputBackground => Color::opaque(0x20, 0x20, 0x23),
            ColorName::InputBorder => Color::opaque(0x39, 0x39, 0x3a),
            ColorName::MenuBackground => Color::opaque(0x28, 0x29, 0x2e),
            ColorName::OverlayBackground => Color::opaque(0x18, 0x1d, 0x25),
            ColorName::PlaceHolder => Color::opaque(0xb2, 0xb2, 0xb2),
            ColorName::Pressed => Color::rgba(0xff, 0xff, 0xff, 0x66),
            ColorName::ScrollBar => Color::rgba(0xff, 0xff, 0xff, 0x99),
            ColorName::Separator => Color::opaque(0x00, 0x00, 0x00),
            ColorName::Shadow => Color::rgba(0x00, 0x00, 0x00, 0x66),
            ColorName::Success => Color::opaque(0x43, 0xf4, 0x36),
            ColorName::SuccessForeground => Color::opaque(0x17, 0x17, 0x18),
            ColorName::Warning => Color::opaque(0xff, 0x98, 0x00),
            ColorName::WarningForeground => Color::opaque(0x17, 0x17, 0x18),
            _ => return None,
        };
        Some(color)
    }
}

mod light {
    use super::*;

    pub(super) fn color(name: &ColorName) -> Option<Color> {
        let color = match name {
            ColorName::Background => Color::opaque(0xff, 0xff, 0xff),
            ColorName::Button => Color::opaque(0xf5, 0xf5, 0xf5),
            ColorName::Disabled => Color::opaque(0xe3, 0xe3, 0xe3),
            ColorName::DisabledButton => Color::opaque(0xf5, 0xf5, 0xf5),
            ColorName::Error => Color::opaque(0xf4, 0x43, 0x36),
            ColorName::ErrorForeground => Color::opaque(0xff, 0xff, 0xff),
            ColorName::Foreground => Color::opaque(0x56, 0x56, 0x56),
            ColorName::HeaderBackground => Color::opaque(0xf9, 0xf9, 0xf9),
            ColorName::Hover => Color::rgba(0x00, 0x00, 0x00, 0x0f),
            ColorName::InputBackground => Color::opaque(0xf3, 0xf3, 0xf3),
            ColorName::InputBorder => Color::opaque(0xe3, 0xe3, 0xe3),
            ColorName::MenuBackground => Color::opaque(0xf5, 0xf5, 0xf5),
            // Overlays reuse the background in light mode.
            ColorName::OverlayBackground => Color::opaque(0xff, 0xff, 0xff),
            ColorName::PlaceHolder => Color::opaque(0x88, 0x88, 0x88),
            ColorName::Pressed => Color::rgba(0x00, 0x00, 0x00, 0x19),
            ColorName::ScrollBar => Color::rgba(0x00, 0x00, 0x00, 0x99),
            ColorName::Separator => Color::opaque(0xe3, 0xe3, 0xe3),
            ColorName::Shadow => Color::rgba(0x00, 0x00, 0x00, 0x33),
            ColorName::Success => Color::opaque(0x43, 0xf4, 0x36),
            ColorName::SuccessForeground => Color::opaque(0xff, 0xff, 0xff),
            ColorName::Warning => Color::opaque(0xff, 0x98, 0x00),
            ColorName::WarningForeground => Color::opaque(0xff, 0xff, 0xff),
            _ => return None,
        };
        Some(color)
    }
}

/// Primary color values.
impl PrimaryColor {
    pub fn color(self) -> Color {
        match self {
            PrimaryColor::Red => Color::opaque(0xf4, 0x43, 0x36),
            PrimaryColor::Orange => Color::opaque(0xff, 0x98, 0x00),
            PrimaryColor::Yellow => Color::opaque(0xff, 0xeb, 0x3b),
            PrimaryColor::Green => Color::opaque(0x8b, 0xc3, 0x4a),
            PrimaryColor::Blue => Color::opaque(0x29, 0x6f, 0xf6),
            PrimaryColor::Purple => Color::opaque(0x9c, 0x27, 0xb0),
            PrimaryColor::Brown => Color::opaque(0x79, 0x55, 0x48),
            PrimaryColor::Gray => Color::opaque(0x9e, 0x9e, 0x9e),
        }
    }

    /// Color for text and icons drawn on top of [`PrimaryColor::color`].
    pub fn foreground(self) -> Color {
        let on_light = Color::opaque(0x17, 0x17, 0x18);
        let on_dark = Color::opaque(0xff, 0xff, 0xff);
        match self {
            PrimaryColor::Orange
            | PrimaryColor::Yellow
            | PrimaryColor::Green
            | PrimaryColor::Gray => on_light,
            PrimaryColor::Red
            | PrimaryColor::Blue
            | PrimaryColor::Purple
            | PrimaryColor::Brown => on_dark,
        }
    }
}

/// Per-variant color overrides, keyed by color name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantOverrides(pub BTreeMap<ColorName, Color>);

impl VariantOverrides {
    pub fn get(&self, name: &ColorName) -> Option<Color> {
        self.0.get(name).copied()
    }

    pub fn insert(&mut self, name: ColorName, color: Color) {
        self.0.insert(name, color);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Layers color overrides on top of another theme.
///
/// Names without an override, and all sizes, come from the base theme.
#[derive(Clone)]
pub struct OverrideTheme {
    base: Arc<dyn Theme>,
    light: VariantOverrides,
    dark: VariantOverrides,
}

impl OverrideTheme {
    pub fn new(base: Arc<dyn Theme>, light: VariantOverrides, dark: VariantOverrides) -> Self {
        Self { base, light, dark }
    }

    fn overrides(&self, variant: Variant) -> &VariantOverrides {
        match variant {
            Variant::Light => &self.light,
            Variant::Dark => &self.dark,
        }
    }
}

impl fmt::Debug for OverrideTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideTheme")
            .field("light", &self.light)
            .field("dark", &self.dark)
            .finish_non_exhaustive()
    }
}

impl Theme for OverrideTheme {
    fn color(&self, name: &ColorName, variant: Variant) -> Option<Color> {
        self.overrides(variant)
            .get(name)
            .or_else(|| self.base.color(name, variant))
    }

    fn size(&self, name: SizeName) -> Option<f32> {
        self.base.size(name)
    }
}
