use crate::geometry::{Position, Size};
use serde::{Deserialize, Serialize};

/// Anything a layout can place.
pub trait CanvasObject {
    fn min_size(&self) -> Size;

    fn visible(&self) -> bool;

    fn position(&self) -> Position;

    fn size(&self) -> Size;

    fn move_to(&mut self, position: Position);

    fn resize(&mut self, size: Size);

    /// Text objects are inset by the theme's inner padding.
    fn is_text(&self) -> bool {
        false
    }
}

impl<T: CanvasObject + ?Sized> CanvasObject for Box<T> {
    fn min_size(&self) -> Size {
        (**self).min_size()
    }

    fn visible(&self) -> bool {
        (**self).visible()
    }

    fn position(&self) -> Position {
        (**self).position()
    }

    fn size(&self) -> Size {
        (**self).size()
    }

    fn move_to(&mut self, position: Position) {
        (**self).move_to(position)
    }

    fn resize(&mut self, size: Size) {
        (**self).resize(size)
    }

    fn is_text(&self) -> bool {
        (**self).is_text()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    #[default]
    Widget,
}

/// A plain rectangular object with a fixed minimum size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub min_size: Size,
    pub visible: bool,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub size: Size,
}

impl Element {
    pub fn widget(min_size: Size) -> Self {
        Self::new(ElementKind::Widget, min_size)
    }

    pub fn text(min_size: Size) -> Self {
        Self::new(ElementKind::Text, min_size)
    }

    fn new(kind: ElementKind, min_size: Size) -> Self {
        Self {
            kind,
            min_size,
            visible: true,
            position: Position::ORIGIN,
            size: Size::ZERO,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

impl CanvasObject for Element {
    fn min_size(&self) -> Size {
        self.min_size
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn position(&self) -> Position {
        self.position
    }

    fn size(&self) -> Size {
        self.size
    }

    fn move_to(&mut self, position: Position) {
        self.position = position;
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn is_text(&self) -> bool {
        self.kind == ElementKind::Text
    }
}
