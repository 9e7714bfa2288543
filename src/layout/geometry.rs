use super::margins::{Margins, Padding};
use crate::error::LayoutError;
use crate::rect::Rect;
use crate::units::Pt;

/// One of the four corners of a column's content box, in clockwise order
/// starting at the top left
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// Corners in index order 0..=3
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// The geometry of a page split into equal-width column bands.
///
/// The usable width between the left and right margins is divided evenly among the
/// columns; each column then insets its own padding to form a content box. Every
/// query here is a pure function of the page size, the margins snapshot and the
/// padding table. A single column with no padding is exactly the margin box, so
/// "no columns" needs no special handling.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGrid {
    page_size: (Pt, Pt),
    margins: Margins,
    padding: Vec<Padding>,
}

impl ColumnGrid {
    /// Build a grid, failing if the table is empty or any column's content box
    /// would have no area
    pub fn new(
        page_size: (Pt, Pt),
        margins: Margins,
        padding: Vec<Padding>,
    ) -> Result<ColumnGrid, LayoutError> {
        if padding.is_empty() {
            return Err(LayoutError::NoColumns);
        }

        let grid = ColumnGrid {
            page_size,
            margins,
            padding,
        };
        for column in 0..grid.column_count() {
            let width = grid.content_width(column);
            let height = grid.content_height(column);
            if width.0 <= 0.0 || height.0 <= 0.0 {
                return Err(LayoutError::DegenerateColumn {
                    column,
                    width,
                    height,
                });
            }
        }
        Ok(grid)
    }

    /// A grid with a single column and no padding: the plain margin box
    pub fn single(page_size: (Pt, Pt), margins: Margins) -> ColumnGrid {
        ColumnGrid {
            page_size,
            margins,
            padding: vec![Padding::empty()],
        }
    }

    pub fn page_size(&self) -> (Pt, Pt) {
        self.page_size
    }

    /// The page margins every column band is measured from
    pub fn margins(&self) -> &Margins {
        &self.margins
    }

    pub fn padding(&self) -> &[Padding] {
        &self.padding
    }

    pub fn column_count(&self) -> usize {
        self.padding.len()
    }

    /// True when `column` is the right-most column on the page
    pub fn is_last(&self, column: usize) -> bool {
        column + 1 == self.column_count()
    }

    /// Width of one column band, including its padding
    pub fn column_width(&self) -> Pt {
        (self.page_size.0 - self.margins.horizontal()) / self.column_count() as f32
    }

    fn padding_of(&self, column: usize) -> &Padding {
        &self.padding[column % self.column_count()]
    }

    /// The left edge of a column band, before padding
    fn band_left(&self, column: usize) -> Pt {
        self.margins.left + self.column_width() * column as f32
    }

    /// The right edge of a column band, before padding. Measured from the right margin
    /// so the last column always ends exactly on it.
    fn band_right(&self, column: usize) -> Pt {
        let columns_after = (self.column_count() - 1 - column) as f32;
        self.page_size.0 - self.margins.right - self.column_width() * columns_after
    }

    /// Coordinates of one corner of a column's padding-adjusted content box
    pub fn corner(&self, corner: Corner, column: usize) -> (Pt, Pt) {
        let column = column % self.column_count();
        let padding = self.padding_of(column);

        let x = if corner.is_left() {
            self.band_left(column) + padding.left
        } else {
            self.band_right(column) - padding.right
        };
        let y = if corner.is_top() {
            self.margins.top + padding.top
        } else {
            self.page_size.1 - self.margins.bottom - padding.bottom
        };
        (x, y)
    }

    /// The content box of a column
    pub fn content_box(&self, column: usize) -> Rect {
        let (x1, y1) = self.corner(Corner::TopLeft, column);
        let (x2, y2) = self.corner(Corner::BottomRight, column);
        Rect { x1, y1, x2, y2 }
    }

    /// Width of a column's content box, excluding its padding
    pub fn content_width(&self, column: usize) -> Pt {
        let padding = self.padding_of(column);
        self.column_width() - padding.left - padding.right
    }

    /// Height of a column's content box, excluding its padding
    pub fn content_height(&self, column: usize) -> Pt {
        let padding = self.padding_of(column);
        self.page_size.1 - self.margins.vertical() - padding.top - padding.bottom
    }
}
