use crate::Layout;
use crate::geometry::{Position, Size};
use crate::object::CanvasObject;
use fenn_theme::ThemeContext;

const FORM_COLUMNS: usize = 2;

/// Two-column grid where each row pairs a label with a content object.
///
/// Objects are given as a flat list: label, content, label, content, ...
/// Rows whose label and content are both hidden take up no space.
#[derive(Debug, Clone, Default)]
pub struct FormLayout {
    theme: ThemeContext,
}

/// Cell sizes for every visible row, plus the shared column widths.
#[derive(Debug, Default, PartialEq)]
struct CellTable {
    label_width: f32,
    content_width: f32,
    rows: Vec<[Size; FORM_COLUMNS]>,
}

fn row_is_visible<O: CanvasObject>(row: &[O]) -> bool {
    row.iter().any(|object| object.visible())
}

impl FormLayout {
    pub fn new(theme: ThemeContext) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &ThemeContext {
        &self.theme
    }

    /// Measures every visible row.
    ///
    /// Row height is the taller of the two cells. The label column is as wide as
    /// the widest label; the content column is as wide as the widest content, or
    /// whatever the container has left over if that is more.
    fn cell_table<O: CanvasObject>(&self, objects: &[O], container_width: f32) -> CellTable {
        if objects.len() % FORM_COLUMNS != 0 {
            return CellTable::default();
        }

        let padding = self.theme.padding();
        let inner_padding = self.theme.inner_padding();

        let mut table = CellTable::default();
        for row in objects.chunks_exact(FORM_COLUMNS) {
            if !row_is_visible(row) {
                continue;
            }
            let (label, content) = (&row[0], &row[1]);

            let mut label_cell = label.min_size();
            if label.is_text() {
                label_cell.width += inner_padding * 2.0;
            }
            table.label_width = table.label_width.max(label_cell.width);

            let mut content_cell = content.min_size();
            table.content_width = table.content_width.max(content_cell.width);

            let row_height = label_cell.height.max(content_cell.height);
            label_cell.height = row_height;
            content_cell.height = row_height;

            table.rows.push([label_cell, content_cell]);
        }

        table.content_width = table
            .content_width
            .max(container_width - table.label_width - padding);
        table
    }
}

impl Layout for FormLayout {
    fn layout<O: CanvasObject>(&self, objects: &mut [O], size: Size) {
        if objects.len() % FORM_COLUMNS != 0 {
            tracing::warn!(
                "Form layout needs label/content pairs, got {} objects",
                objects.len()
            );
            return;
        }

        let table = self.cell_table(objects, size.width);
        let padding = self.theme.padding();
        let inner_padding = self.theme.inner_padding();
        let label_width = table.label_width;
        let content_width = table.content_width;

        let mut y = 0.0;
        let visible_rows = objects
            .chunks_exact_mut(FORM_COLUMNS)
            .filter(|row| row.iter().any(|object| object.visible()));
        for (index, row) in visible_rows.enumerate() {
            if index > 0 {
                y += table.rows[index - 1][0].height + padding;
            }
            let row_height = table.rows[index][0].height;
            let (label, content) = row.split_at_mut(1);
            let (label, content) = (&mut label[0], &mut content[0]);

            if label.is_text() {
                label.move_to(Position::new(inner_padding, y + inner_padding));
                let height = label.min_size().height;
                label.resize(Size::new(label_width - inner_padding * 2.0, height));
            } else {
                label.move_to(Position::new(0.0, y));
                label.resize(Size::new(label_width, row_height));
            }

            let content_x = padding + label_width;
            if content.is_text() {
                content.move_to(Position::new(content_x + inner_padding, y + inner_padding));
                let height = content.min_size().height;
                content.resize(Size::new(content_width - inner_padding * 2.0, height));
            } else {
                content.move_to(Position::new(content_x, y));
                content.resize(Size::new(content_width, row_height));
            }
        }
    }

    /// Widest label plus widest content plus padding, by the sum of row heights
    /// with padding between rows.
    fn min_size<O: CanvasObject>(&self, objects: &[O]) -> Size {
        let table = self.cell_table(objects, 0.0);
        if table.rows.is_empty() {
            return Size::ZERO;
        }

        let padding = self.theme.padding();
        let rows_height: f32 = table.rows.iter().map(|row| row[0].height).sum();
        let gaps = (table.rows.len() - 1) as f32 * padding;
        Size::new(
            table.label_width + table.content_width + padding,
            rows_height + gaps,
        )
    }
}
