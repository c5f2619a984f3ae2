//! Layout algorithms for fenn containers.
//!
//! Layouts only move and resize the objects they are given; they never draw.
//! Spacing comes from the [`fenn_theme::ThemeContext`] the layout was built with.

mod form;
mod geometry;
mod object;

pub use form::FormLayout;
pub use geometry::{Position, Size};
pub use object::{CanvasObject, Element, ElementKind};

/// Arranges a list of canvas objects within a container.
pub trait Layout {
    /// Moves and resizes `objects` to fill a container of `size`.
    fn layout<O: CanvasObject>(&self, objects: &mut [O], size: Size);

    /// The smallest container size that fits all `objects`.
    fn min_size<O: CanvasObject>(&self, objects: &[O]) -> Size;
}
