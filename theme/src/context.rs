use crate::color::Color;
use crate::name::{ColorName, SizeName, Variant};
use crate::theme::{DefaultTheme, Theme, default_size};
use std::fmt;
use std::sync::Arc;

/// Returned when the active theme does not define a requested color.
pub const FALLBACK_COLOR: Color = Color::TRANSPARENT;

/// The theme and variant that colors and sizes are resolved against.
///
/// Cheap to clone; the theme itself is shared.
#[derive(Clone)]
pub struct ThemeContext {
    theme: Arc<dyn Theme>,
    variant: Variant,
}

impl ThemeContext {
    pub fn new(theme: Arc<dyn Theme>, variant: Variant) -> Self {
        Self { theme, variant }
    }

    pub fn theme(&self) -> &Arc<dyn Theme> {
        &self.theme
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns a context for the same theme with a different variant.
    pub fn with_variant(&self, variant: Variant) -> Self {
        Self {
            theme: Arc::clone(&self.theme),
            variant,
        }
    }

    /// Looks up a color for the active variant.
    pub fn color(&self, name: &ColorName) -> Color {
        self.color_for(name, self.variant)
    }

    /// Looks up a color for an explicit variant, falling back to [`FALLBACK_COLOR`].
    pub fn color_for(&self, name: &ColorName, variant: Variant) -> Color {
        match self.theme.color(name, variant) {
            Some(color) => color,
            None => {
                tracing::error!(
                    "Theme returned no color for '{}' ({}), using fallback",
                    name,
                    variant
                );
                FALLBACK_COLOR
            }
        }
    }

    pub fn size(&self, name: SizeName) -> f32 {
        self.theme.size(name).unwrap_or_else(|| {
            tracing::debug!("Theme returned no size for '{}', using default", name);
            default_size(name)
        })
    }

    pub fn padding(&self) -> f32 {
        self.size(SizeName::Padding)
    }

    pub fn inner_padding(&self) -> f32 {
        self.size(SizeName::InnerPadding)
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new(Arc::new(DefaultTheme::default()), Variant::default_variant())
    }
}

impl fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeContext")
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

/// Named color shortcuts for the active variant.
impl ThemeContext {
    pub fn background_color(&self) -> Color {
        self.color(&ColorName::Background)
    }

    pub fn button_color(&self) -> Color {
        self.color(&ColorName::Button)
    }

    pub fn disabled_button_color(&self) -> Color {
        self.color(&ColorName::DisabledButton)
    }

    pub fn disabled_color(&self) -> Color {
        self.color(&ColorName::Disabled)
    }

    pub fn error_color(&self) -> Color {
        self.color(&ColorName::Error)
    }

    pub fn focus_color(&self) -> Color {
        self.color(&ColorName::Focus)
    }

    pub fn foreground_color(&self) -> Color {
        self.color(&ColorName::Foreground)
    }

    pub fn header_background_color(&self) -> Color {
        self.color(&ColorName::HeaderBackground)
    }

    pub fn hover_color(&self) -> Color {
        self.color(&ColorName::Hover)
    }

    pub fn hyperlink_color(&self) -> Color {
        self.color(&ColorName::Hyperlink)
    }

    pub fn input_background_color(&self) -> Color {
        self.color(&ColorName::InputBackground)
    }

    pub fn input_border_color(&self) -> Color {
        self.color(&ColorName::InputBorder)
    }

    pub fn menu_background_color(&self) -> Color {
        self.color(&ColorName::MenuBackground)
    }

    pub fn overlay_background_color(&self) -> Color {
        self.color(&ColorName::OverlayBackground)
    }

    pub fn placeholder_color(&self) -> Color {
        self.color(&ColorName::PlaceHolder)
    }

    pub fn pressed_color(&self) -> Color {
        self.color(&ColorName::Pressed)
    }

    pub fn primary_color(&self) -> Color {
        self.color(&ColorName::Primary)
    }

    pub fn scroll_bar_color(&self) -> Color {
        self.color(&ColorName::ScrollBar)
    }

    pub fn selection_color(&self) -> Color {
        self.color(&ColorName::Selection)
    }

    pub fn separator_color(&self) -> Color {
        self.color(&ColorName::Separator)
    }

    pub fn shadow_color(&self) -> Color {
        self.color(&ColorName::Shadow)
    }

    pub fn success_color(&self) -> Color {
        self.color(&ColorName::Success)
    }

    pub fn warning_color(&self) -> Color {
        self.color(&ColorName::Warning)
    }
}
