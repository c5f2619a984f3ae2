use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameParseError {
    #[error("unknown theme variant: {0}")]
    UnknownVariant(String),

    #[error("unknown primary color: {0}")]
    UnknownPrimaryColor(String),

    #[error("unknown size name: {0}")]
    UnknownSize(String),

    #[error("color name must not be empty")]
    EmptyColorName,
}

/// Light or dark theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Light,
    Dark,
}

impl Variant {
    /// The variant used when neither the user nor the platform picks one.
    pub fn default_variant() -> Self {
        Variant::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Light => "light",
            Variant::Dark => "dark",
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::default_variant()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = NameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Variant::Light),
            "dark" => Ok(Variant::Dark),
            _ => Err(NameParseError::UnknownVariant(s.to_string())),
        }
    }
}

/// Semantic color names understood by every theme.
///
/// Themes may define extra names through [`ColorName::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColorName {
    Background,
    Button,
    DisabledButton,
    Disabled,
    Error,
    ErrorForeground,
    Focus,
    Foreground,
    HeaderBackground,
    Hover,
    Hyperlink,
    InputBackground,
    InputBorder,
    MenuBackground,
    OverlayBackground,
    PlaceHolder,
    Pressed,
    Primary,
    PrimaryForeground,
    ScrollBar,
    Selection,
    Separator,
    Shadow,
    Success,
    SuccessForeground,
    Warning,
    WarningForeground,
    Custom(String),
}

impl ColorName {
    /// All standard names, in declaration order.
    pub const STANDARD: [ColorName; 27] = [
        ColorName::Background,
        ColorName::Button,
        ColorName::DisabledButton,
        ColorName::Disabled,
        ColorName::Error,
        ColorName::ErrorForeground,
        ColorName::Focus,
        ColorName::Foreground,
        ColorName::HeaderBackground,
        ColorName::Hover,
        ColorName::Hyperlink,
        ColorName::InputBackground,
        ColorName::InputBorder,
        ColorName::MenuBackground,
        ColorName::OverlayBackground,
        ColorName::PlaceHolder,
        ColorName::Pressed,
        ColorName::Primary,
        ColorName::PrimaryForeground,
        ColorName::ScrollBar,
        ColorName::Selection,
        ColorName::Separator,
        ColorName::Shadow,
        ColorName::Success,
        ColorName::SuccessForeground,
        ColorName::Warning,
        ColorName::WarningForeground,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ColorName::Background => "background",
            ColorName::Button => "button",
            ColorName::DisabledButton => "disabledButton",
            ColorName::Disabled => "disabled",
            ColorName::Error => "error",
            ColorName::ErrorForeground => "errorForeground",
            ColorName::Focus => "focus",
            ColorName::Foreground => "foreground",
            ColorName::HeaderBackground => "headerBackground",
            ColorName::Hover => "hover",
            ColorName::Hyperlink => "hyperlink",
            ColorName::InputBackground => "inputBackground",
            ColorName::InputBorder => "inputBorder",
            ColorName::MenuBackground => "menuBackground",
            ColorName::OverlayBackground => "overlayBackground",
            ColorName::PlaceHolder => "placeholder",
            ColorName::Pressed => "pressed",
            ColorName::Primary => "primary",
            ColorName::PrimaryForeground => "primaryForeground",
            ColorName::ScrollBar => "scrollBar",
            ColorName::Selection => "selection",
            ColorName::Separator => "separator",
            ColorName::Shadow => "shadow",
            ColorName::Success => "success",
            ColorName::SuccessForeground => "successForeground",
            ColorName::Warning => "warning",
            ColorName::WarningForeground => "warningForeground",
            ColorName::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ColorName::Custom(_))
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorName {
    type Err = NameParseError;

    /// Standard names parse to their variant; any other non-empty name is custom.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(NameParseError::EmptyColorName);
        }
        Ok(Self::STANDARD
            .into_iter()
            .find(|standard| standard.as_str() == name)
            .unwrap_or_else(|| ColorName::Custom(name.to_string())))
    }
}

impl TryFrom<String> for ColorName {
    type Error = NameParseError;

    fn try_from(value: String) -> Result<Self, NameParseError> {
        value.parse()
    }
}

impl From<ColorName> for String {
    fn from(name: ColorName) -> Self {
        match name {
            ColorName::Custom(name) => name,
            standard => standard.as_str().to_string(),
        }
    }
}

/// Sizes a theme provides to layouts and widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeName {
    Padding,
    InnerPadding,
    LineSpacing,
    Text,
    SeparatorThickness,
    InputBorder,
    InputRadius,
    SelectionRadius,
    ScrollBar,
}

impl SizeName {
    pub const ALL: [SizeName; 9] = [
        SizeName::Padding,
        SizeName::InnerPadding,
        SizeName::LineSpacing,
        SizeName::Text,
        SizeName::SeparatorThickness,
        SizeName::InputBorder,
        SizeName::InputRadius,
        SizeName::SelectionRadius,
        SizeName::ScrollBar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SizeName::Padding => "padding",
            SizeName::InnerPadding => "innerPadding",
            SizeName::LineSpacing => "lineSpacing",
            SizeName::Text => "text",
            SizeName::SeparatorThickness => "separator",
            SizeName::InputBorder => "inputBorder",
            SizeName::InputRadius => "inputRadius",
            SizeName::SelectionRadius => "selectionRadius",
            SizeName::ScrollBar => "scrollBar",
        }
    }
}

impl fmt::Display for SizeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeName {
    type Err = NameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == s.trim())
            .ok_or_else(|| NameParseError::UnknownSize(s.to_string()))
    }
}

/// The standard primary color options a user can pick from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryColor {
    Red,
    Orange,
    Yellow,
    Green,
    #[default]
    Blue,
    Purple,
    Brown,
    Gray,
}

impl PrimaryColor {
    pub const ALL: [PrimaryColor; 8] = [
        PrimaryColor::Red,
        PrimaryColor::Orange,
        PrimaryColor::Yellow,
        PrimaryColor::Green,
        PrimaryColor::Blue,
        PrimaryColor::Purple,
        PrimaryColor::Brown,
        PrimaryColor::Gray,
    ];

    /// Names of the standard primary colors, in display order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|primary| primary.as_str()).collect()
    }

    /// Looks up a primary color by name, falling back to blue for anything unknown.
    pub fn named(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrimaryColor::Red => "red",
            PrimaryColor::Orange => "orange",
            PrimaryColor::Yellow => "yellow",
            PrimaryColor::Green => "green",
            PrimaryColor::Blue => "blue",
            PrimaryColor::Purple => "purple",
            PrimaryColor::Brown => "brown",
            PrimaryColor::Gray => "gray",
        }
    }
}

impl fmt::Display for PrimaryColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimaryColor {
    type Err = NameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|primary| primary.as_str() == s.trim())
            .ok_or_else(|| NameParseError::UnknownPrimaryColor(s.to_string()))
    }
}
