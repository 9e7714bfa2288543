//! The layout session: one cursor flowing content through columns and pages.

mod columns;
mod flow;
mod fonts;
mod images;

pub use flow::{CellOptions, ListOptions, ListStyle, ParagraphOptions};

use crate::error::LayoutError;
use crate::layout::{BreakHooks, ColumnGrid, Margins};
use crate::rect::Rect;
use crate::style::TextStyle;
use crate::surface::{Align, FontSpec, Surface};
use crate::units::{Mm, Pt};
use log::debug;

/// Slack allowed when comparing positions against column edges, so content that fits
/// exactly isn't pushed over by rounding
pub(crate) const EPSILON: Pt = Pt(1e-3);

/// A callback run at a page or column boundary. It gets the composer itself, so it
/// can draw with the same APIs as the main flow.
pub type PageCallback<S> = Box<dyn FnMut(&mut Composer<S>) -> Result<(), LayoutError>>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Slot {
    Header,
    Footer,
    PageBreak,
}

/// Composes content onto a [`Surface`], tracking the cursor, the column layout and
/// the current style, and deciding when to move on to the next column or page.
///
/// # Example
///
/// ```
/// use pdf_columns::{Composer, Padding, RecordingSurface, Pt};
/// use pdf_columns::pagesize::A4;
///
/// let mut composer = Composer::new(RecordingSurface::new(A4));
/// composer.add_page().unwrap();
/// composer.set_columns(vec![Padding::all(Pt(5.0)); 2]).unwrap();
/// let residual = composer.paragraph(&lipsum_like(), Default::default()).unwrap();
/// assert!(residual.is_empty());
///
/// # fn lipsum_like() -> String { "Lorem ipsum dolor sit amet. ".repeat(40) }
/// ```
pub struct Composer<S: Surface> {
    surface: S,
    /// The page margins as configured by the user
    page_margins: Margins,
    /// The margins snapshot plus the padding table
    grid: ColumnGrid,
    columns_enabled: bool,
    /// How many columns have been advanced through
    published: usize,
    indent: Pt,
    x: Pt,
    y: Pt,
    /// Content box of the current column, with the indent applied to its left edge.
    /// The bottom edge is the reactive break threshold.
    bounds: Rect,
    font: FontSpec,
    style: TextStyle,
    line_height: f32,
    default_align: Align,
    list_style: ListStyle,
    hooks: BreakHooks<Composer<S>>,
    header: Option<PageCallback<S>>,
    footer: Option<PageCallback<S>>,
    on_page_break: Option<PageCallback<S>>,
    /// Set while a header or footer draws; breaks are suppressed meanwhile
    in_page_callback: bool,
}

impl<S: Surface> Composer<S> {
    /// Start composing on `surface` with 10mm margins and a single column
    pub fn new(surface: S) -> Composer<S> {
        let page_margins = Margins::all(Mm(10.0));
        let grid = ColumnGrid::single(surface.page_size(), page_margins);
        let bounds = grid.content_box(0);
        let font = FontSpec::default();
        let style = TextStyle::default()
            .family(font.family.clone())
            .variant(font.variant)
            .size(font.size);

        Composer {
            surface,
            page_margins,
            grid,
            columns_enabled: false,
            published: 0,
            indent: Pt::ZERO,
            x: bounds.x1,
            y: bounds.y1,
            bounds,
            font,
            style,
            line_height: 1.0,
            default_align: Align::Left,
            list_style: ListStyle::default(),
            hooks: BreakHooks::default(),
            header: None,
            footer: None,
            on_page_break: None,
            in_page_callback: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access to the surface, for drawing the composer doesn't cover
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Close the last page (running the footer) and hand back the surface
    pub fn finish(mut self) -> Result<S, LayoutError> {
        if self.surface.page_count() > 0 {
            self.run_callback(Slot::Footer)?;
        }
        Ok(self.surface)
    }

    /// Start a new page. The footer runs for the page being closed, then the header
    /// for the new one. The column cursor is not touched.
    pub fn add_page(&mut self) -> Result<(), LayoutError> {
        if self.surface.page_count() > 0 {
            self.run_callback(Slot::Footer)?;
        }
        self.surface.add_page()?;
        debug!("started page {}", self.surface.page_count());
        self.x = self.bounds.x1;
        self.y = self.bounds.y1;
        self.run_callback(Slot::Header)?;
        self.settle_after_header();
        Ok(())
    }

    /// Add the first page if nothing has been drawn yet
    pub(crate) fn ensure_page(&mut self) -> Result<(), LayoutError> {
        if self.surface.page_count() == 0 {
            self.add_page()?;
        }
        Ok(())
    }

    /// Called at the top of every new page, after the page is created
    pub fn set_header<F>(&mut self, header: F)
    where
        F: FnMut(&mut Composer<S>) -> Result<(), LayoutError> + 'static,
    {
        self.header = Some(Box::new(header));
    }

    /// Called for every page just before the next one starts, and for the last page
    /// by [`finish`](Composer::finish)
    pub fn set_footer<F>(&mut self, footer: F)
    where
        F: FnMut(&mut Composer<S>) -> Result<(), LayoutError> + 'static,
    {
        self.footer = Some(Box::new(footer));
    }

    /// Called after every completed hook-checked break
    pub fn set_page_break_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Composer<S>) -> Result<(), LayoutError> + 'static,
    {
        self.on_page_break = Some(Box::new(callback));
    }

    fn slot(&mut self, slot: Slot) -> &mut Option<PageCallback<S>> {
        match slot {
            Slot::Header => &mut self.header,
            Slot::Footer => &mut self.footer,
            Slot::PageBreak => &mut self.on_page_break,
        }
    }

    /// Run a callback with the composer lent to it. The callback is taken out of its
    /// slot for the duration, so it can't re-enter itself.
    fn run_callback(&mut self, slot: Slot) -> Result<(), LayoutError> {
        let Some(mut callback) = self.slot(slot).take() else {
            return Ok(());
        };

        let suppress = slot != Slot::PageBreak;
        let was_suppressed = std::mem::replace(&mut self.in_page_callback, suppress);
        let result = callback(self);
        self.in_page_callback = was_suppressed;

        // keep a replacement installed by the callback itself
        let stored = self.slot(slot);
        if stored.is_none() {
            *stored = Some(callback);
        }
        result
    }

    pub fn x(&self) -> Pt {
        self.x
    }

    pub fn y(&self) -> Pt {
        self.y
    }

    pub fn set_x<D: Into<Pt>>(&mut self, x: D) {
        self.x = x.into();
    }

    /// Move to a new line at `y`, back at the left edge of the current column
    pub fn set_y<D: Into<Pt>>(&mut self, y: D) {
        self.x = self.bounds.x1;
        self.y = y.into();
    }

    pub fn set_xy<D: Into<Pt>>(&mut self, x: D, y: D) {
        self.x = x.into();
        self.y = y.into();
    }

    /// 1-based number of the page being drawn, 0 before the first page
    pub fn page_no(&self) -> usize {
        self.surface.page_count()
    }

    pub fn page_width(&self) -> Pt {
        self.surface.page_size().0
    }

    pub fn page_height(&self) -> Pt {
        self.surface.page_size().1
    }

    /// The page margins as configured, independent of any column layout
    pub fn margins(&self) -> &Margins {
        &self.page_margins
    }

    /// Set the page margins. While columns are enabled, their geometry keeps using the
    /// margins captured when they were enabled; the new margins apply from the next
    /// column configuration on.
    pub fn set_margins(&mut self, margins: Margins) {
        self.page_margins = margins;
        if !self.columns_enabled {
            self.grid = ColumnGrid::single(self.surface.page_size(), margins);
            self.refresh_bounds();
        }
    }

    /// Line height as a multiple of the font size
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn set_line_height(&mut self, factor: f32) {
        self.line_height = factor;
    }

    /// Height of one line of text in the current font
    pub fn default_line_height(&self) -> Pt {
        self.font.size * self.line_height
    }

    /// Default alignment of paragraphs
    pub fn align(&self) -> Align {
        self.default_align
    }

    pub fn set_align(&mut self, align: Align) {
        self.default_align = align;
    }

    pub fn list_style(&self) -> &ListStyle {
        &self.list_style
    }

    pub fn set_list_style(&mut self, style: ListStyle) {
        self.list_style = style;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingSurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn composer() -> Composer<RecordingSurface> {
        let mut composer = Composer::new(RecordingSurface::new((Pt(200.0), Pt(300.0))));
        composer.set_margins(Margins::all(Pt(10.0)));
        composer
    }

    #[test]
    fn starts_at_the_margin_box() {
        let composer = composer();
        assert_eq!((composer.x(), composer.y()), (Pt(10.0), Pt(10.0)));
        assert_eq!(composer.page_no(), 0);
    }

    #[test]
    fn header_and_footer_run_around_pages() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut composer = composer();

        let log = events.clone();
        composer.set_header(move |c| {
            log.borrow_mut().push(format!("header {}", c.page_no()));
            Ok(())
        });
        let log = events.clone();
        composer.set_footer(move |c| {
            log.borrow_mut().push(format!("footer {}", c.page_no()));
            Ok(())
        });

        composer.add_page().unwrap();
        composer.add_page().unwrap();
        composer.finish().unwrap();

        assert_eq!(
            *events.borrow(),
            ["header 1", "footer 1", "header 2", "footer 2"]
        );
    }

    #[test]
    fn header_can_draw_and_move_the_cursor() {
        let mut composer = composer();
        composer.set_header(|c| {
            c.cell("title", CellOptions::default())?;
            c.ln(None)?;
            Ok(())
        });
        composer.add_page().unwrap();
        assert_eq!(composer.y(), Pt(22.0));
        assert_eq!(composer.surface().cells().count(), 1);
    }

    #[test]
    fn finish_without_pages_skips_the_footer() {
        let mut composer = composer();
        composer.set_footer(|_| panic!("no page to close"));
        let surface = composer.finish().unwrap();
        assert_eq!(surface.page_count(), 0);
    }

    #[test]
    fn set_y_returns_to_the_left_edge() {
        let mut composer = composer();
        composer.set_x(Pt(50.0));
        composer.set_y(Pt(40.0));
        assert_eq!((composer.x(), composer.y()), (Pt(10.0), Pt(40.0)));
    }
}
