use super::{Composer, Slot, EPSILON};
use crate::error::LayoutError;
use crate::layout::{Advance, BreakOutcome, ColumnGrid, Corner, HookOutcome, Padding};
use crate::rect::Rect;
use crate::surface::Surface;
use crate::units::Pt;
use log::{debug, trace};

impl<S: Surface> Composer<S> {
    /// Split the page into columns, one per padding entry, and move the cursor to the
    /// top of the first one. The current page margins are captured as the baseline for
    /// the column bands, and the column cursor restarts at zero.
    pub fn set_columns<I, P>(&mut self, padding: I) -> Result<(), LayoutError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Padding>,
    {
        let padding: Vec<Padding> = padding.into_iter().map(Into::into).collect();
        self.grid = ColumnGrid::new(self.surface.page_size(), self.page_margins, padding)?;
        self.columns_enabled = true;
        self.published = 0;
        debug!(
            "enabled {} columns, {} wide",
            self.grid.column_count(),
            self.grid.column_width()
        );
        self.prepare_column();
        Ok(())
    }

    /// Go back to a single column spanning the page margins. The column cursor resets
    /// to zero and the cursor returns to the left edge; its vertical position is kept.
    pub fn unset_columns(&mut self) {
        self.grid = ColumnGrid::single(self.surface.page_size(), self.page_margins);
        self.columns_enabled = false;
        self.published = 0;
        self.refresh_bounds();
        self.x = self.bounds.x1;
        debug!("disabled columns");
    }

    pub fn columns_enabled(&self) -> bool {
        self.columns_enabled
    }

    pub fn grid(&self) -> &ColumnGrid {
        &self.grid
    }

    pub fn column_count(&self) -> usize {
        self.grid.column_count()
    }

    /// Index of the column currently being filled
    pub fn column(&self) -> usize {
        self.published % self.grid.column_count()
    }

    /// How many column advances happened since columns were last configured
    pub fn advances(&self) -> usize {
        self.published
    }

    /// A corner of a column's content box; the current column when `column` is `None`
    pub fn column_corner(&self, corner: Corner, column: Option<usize>) -> (Pt, Pt) {
        self.grid
            .corner(corner, column.unwrap_or_else(|| self.column()))
    }

    /// Width of the current column's content box
    pub fn content_width(&self) -> Pt {
        self.grid.content_width(self.column())
    }

    /// Height of the current column's content box
    pub fn content_height(&self) -> Pt {
        self.grid.content_height(self.column())
    }

    /// How far the cursor is below the top of the current column's content box. The
    /// top is the page's top margin plus the column's top padding, so both are taken
    /// off the cursor's y.
    pub fn top_offset(&self) -> Pt {
        self.y - self.grid.corner(Corner::TopLeft, self.column()).1
    }

    /// Vertical space left in the current column below the cursor
    pub fn remaining_height(&self) -> Pt {
        self.bounds.y2 - self.y
    }

    /// The live content area: the current column's box, with the indent applied on
    /// the left
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Width between the indented left edge and the right edge of the current column
    pub fn available_width(&self) -> Pt {
        self.bounds.width()
    }

    pub(crate) fn at_column_top(&self) -> bool {
        self.y <= self.bounds.y1 + EPSILON
    }

    pub fn indent(&self) -> Pt {
        self.indent
    }

    /// Push the left edge of every column right by `amount`, e.g. for the body of a
    /// list. Survives column and page advances until it is decreased again.
    pub fn increase_indent<D: Into<Pt>>(&mut self, amount: D) {
        self.indent += amount.into();
        self.refresh_bounds();
    }

    /// Undo an [`increase_indent`](Composer::increase_indent)
    pub fn decrease_indent<D: Into<Pt>>(&mut self, amount: D) -> Result<(), LayoutError> {
        let indent = self.indent - amount.into();
        if indent < -EPSILON {
            return Err(LayoutError::IndentUnderflow(indent));
        }
        self.indent = indent.max(Pt::ZERO);
        self.refresh_bounds();
        Ok(())
    }

    /// Register a hook consulted before every hook-checked break. Registering an
    /// existing name replaces that hook in place.
    pub fn add_before_page_break<N, F>(&mut self, name: N, hook: F)
    where
        N: Into<String>,
        F: FnMut(&mut Composer<S>) -> HookOutcome + 'static,
    {
        self.hooks.insert(name, hook);
    }

    /// Remove a pre-break hook, returning whether it was registered
    pub fn remove_before_page_break(&mut self, name: &str) -> bool {
        self.hooks.remove(name)
    }

    /// Break to the next column (or page) the way an overflow does: the pre-break
    /// hooks are consulted first and any of them can veto. On success the cursor sits
    /// at the top of the next column and the page-break callback has run.
    pub fn page_break(&mut self) -> Result<BreakOutcome, LayoutError> {
        let mut hooks = std::mem::take(&mut self.hooks);
        let outcome = hooks.run(self);
        // keep anything registered while the chain ran
        let added = std::mem::replace(&mut self.hooks, hooks);
        self.hooks.absorb(added);

        if outcome == HookOutcome::Veto {
            return Ok(BreakOutcome::Vetoed);
        }

        let advance = self.advance()?;
        self.run_callback(Slot::PageBreak)?;
        Ok(BreakOutcome::Advanced(advance))
    }

    /// Move to the next column now, starting a new page after the last column. No
    /// hooks are consulted.
    pub fn next_row(&mut self) -> Result<Advance, LayoutError> {
        self.advance()
    }

    fn advance(&mut self) -> Result<Advance, LayoutError> {
        let vacated = self.column();
        let new_page = self.grid.is_last(vacated);
        if new_page {
            if self.surface.page_count() > 0 {
                self.run_callback(Slot::Footer)?;
            }
            self.surface.add_page()?;
        }

        self.published += 1;
        self.prepare_column();
        if new_page {
            self.run_callback(Slot::Header)?;
            self.settle_after_header();
        }

        let advance = Advance {
            column: self.column(),
            new_page,
        };
        debug!(
            "advanced from column {vacated} to {} (page {}, new page: {new_page})",
            advance.column,
            self.surface.page_count()
        );
        Ok(advance)
    }

    /// Put the cursor at the top-left of the current column and align the live
    /// bounds with it
    pub(crate) fn prepare_column(&mut self) {
        self.refresh_bounds();
        self.x = self.bounds.x1;
        self.y = self.bounds.y1;
    }

    /// Content resumes at the left edge, below whatever the header drew but never
    /// above the top of the column
    pub(crate) fn settle_after_header(&mut self) {
        self.refresh_bounds();
        self.x = self.bounds.x1;
        self.y = self.y.max(self.bounds.y1);
    }

    pub(crate) fn refresh_bounds(&mut self) {
        let content = self.grid.content_box(self.column());
        self.bounds = Rect {
            x1: content.x1 + self.indent,
            ..content
        };
    }

    /// Reactive overflow check run before drawing something `height` tall at the
    /// cursor. Breaks are skipped inside headers and footers, and at the very top of
    /// a column, where advancing can't make more room. Returns true when the cursor
    /// moved to another column.
    pub(crate) fn check_overflow(&mut self, height: Pt) -> Result<bool, LayoutError> {
        if self.in_page_callback || self.at_column_top() {
            return Ok(false);
        }
        if self.y + height > self.bounds.y2 + EPSILON {
            trace!(
                "{height} at y {} overflows column {} ending at {}",
                self.y,
                self.column(),
                self.bounds.y2
            );
            return Ok(!self.page_break()?.is_vetoed());
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Margins;
    use crate::recording::RecordingSurface;
    use std::cell::Cell;
    use std::rc::Rc;

    /// 200 x 300 page, 10pt margins: 180 x 280 usable
    fn composer() -> Composer<RecordingSurface> {
        let mut composer = Composer::new(RecordingSurface::new((Pt(200.0), Pt(300.0))));
        composer.set_margins(Margins::all(Pt(10.0)));
        composer.add_page().unwrap();
        composer
    }

    #[test]
    fn set_columns_moves_to_the_first_column() {
        let mut c = composer();
        c.set_y(Pt(100.0));
        c.set_columns([Padding::trbl(Pt(2.0), Pt(3.0), Pt(4.0), Pt(5.0)); 2])
            .unwrap();
        assert_eq!((c.x(), c.y()), (Pt(15.0), Pt(12.0)));
        assert_eq!(c.content_width(), Pt(82.0));
        assert_eq!(c.content_height(), Pt(274.0));
        assert_eq!(c.column(), 0);
        assert!(c.columns_enabled());
    }

    #[test]
    fn rejects_an_empty_table() {
        let mut c = composer();
        assert!(matches!(
            c.set_columns(Vec::<Padding>::new()),
            Err(LayoutError::NoColumns)
        ));
        assert!(!c.columns_enabled());
    }

    #[test]
    fn next_row_walks_columns_then_pages() {
        let mut c = composer();
        c.set_columns([Padding::empty(); 3]).unwrap();

        let a = c.next_row().unwrap();
        assert_eq!(a, Advance { column: 1, new_page: false });
        assert_eq!((c.x(), c.y()), (Pt(70.0), Pt(10.0)));

        c.next_row().unwrap();
        let a = c.next_row().unwrap();
        assert_eq!(a, Advance { column: 0, new_page: true });
        assert_eq!(c.page_no(), 2);
        assert_eq!(c.advances(), 3);
        assert_eq!(c.x(), Pt(10.0));
    }

    #[test]
    fn unset_and_single_column_reproduce_the_margin_box() {
        let mut c = composer();
        let original = c.bounds();
        c.set_columns([Padding::all(Pt(4.0)); 3]).unwrap();
        c.next_row().unwrap();
        c.unset_columns();
        assert_eq!(c.bounds(), original);
        assert_eq!(c.advances(), 0);

        c.set_columns([Padding::empty()]).unwrap();
        assert_eq!(c.bounds(), original);
        assert_eq!((c.x(), c.y()), (original.x1, original.y1));
    }

    #[test]
    fn column_margins_are_a_snapshot() {
        let mut c = composer();
        c.set_columns([Padding::empty(); 2]).unwrap();
        c.set_margins(Margins::all(Pt(30.0)));
        assert_eq!(c.bounds().x1, Pt(10.0));

        c.unset_columns();
        assert_eq!(c.bounds().x1, Pt(30.0));
    }

    #[test]
    fn top_offset_and_remaining_height() {
        let mut c = composer();
        c.set_columns([Padding::trbl(Pt(5.0), Pt(0.0), Pt(5.0), Pt(0.0)); 2])
            .unwrap();
        c.set_y(Pt(40.0));
        assert_eq!(c.top_offset(), Pt(25.0));
        assert_eq!(c.remaining_height(), c.content_height() - c.top_offset());
    }

    #[test]
    fn indent_follows_advances_and_nets_out() {
        let mut c = composer();
        c.set_columns([Padding::empty(); 2]).unwrap();
        let left = c.bounds().x1;

        c.increase_indent(Pt(7.0));
        c.next_row().unwrap();
        assert_eq!(c.x(), Pt(107.0));
        c.increase_indent(Pt(3.0));
        c.next_row().unwrap();
        c.decrease_indent(Pt(3.0)).unwrap();
        c.decrease_indent(Pt(7.0)).unwrap();
        assert_eq!(c.bounds().x1, left);

        assert!(matches!(
            c.decrease_indent(Pt(1.0)),
            Err(LayoutError::IndentUnderflow(_))
        ));
        assert_eq!(c.indent(), Pt::ZERO);
    }

    #[test]
    fn veto_blocks_the_break_until_removed() {
        let mut c = composer();
        c.set_columns([Padding::empty(); 2]).unwrap();
        c.add_before_page_break("X", |_| HookOutcome::Veto);

        for _ in 0..1000 {
            assert_eq!(c.page_break().unwrap(), BreakOutcome::Vetoed);
        }
        assert_eq!(c.advances(), 0);
        assert_eq!(c.page_no(), 1);

        assert!(c.remove_before_page_break("X"));
        assert!(!c.page_break().unwrap().is_vetoed());
        assert_eq!(c.advances(), 1);
    }

    #[test]
    fn hooks_see_the_composer_and_run_in_order() {
        let mut c = composer();
        let seen = Rc::new(Cell::new(0usize));
        let counter = seen.clone();
        c.add_before_page_break("count", move |c| {
            counter.set(counter.get() + 1 + c.column() * 10);
            HookOutcome::Continue
        });

        c.page_break().unwrap();
        c.set_columns([Padding::empty(); 2]).unwrap();
        c.page_break().unwrap();
        c.page_break().unwrap();
        assert_eq!(seen.get(), 1 + 1 + 11);
    }

    #[test]
    fn page_break_callback_runs_only_for_hooked_breaks() {
        let mut c = composer();
        let calls = Rc::new(Cell::new(0usize));
        let counter = calls.clone();
        c.set_page_break_callback(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        c.page_break().unwrap();
        c.next_row().unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(c.page_no(), 3);
    }

    #[test]
    fn failing_page_emission_is_an_error() {
        let mut c = Composer::new(RecordingSurface::new((Pt(200.0), Pt(300.0))).with_page_limit(1));
        c.add_page().unwrap();
        assert!(matches!(c.next_row(), Err(LayoutError::PageUnavailable)));
    }

    #[test]
    fn column_corners_default_to_the_current_column() {
        let mut c = composer();
        c.set_columns([Padding::empty(); 2]).unwrap();
        c.next_row().unwrap();
        assert_eq!(
            c.column_corner(Corner::TopLeft, None),
            c.column_corner(Corner::TopLeft, Some(1))
        );
        assert_eq!(c.column_corner(Corner::BottomRight, Some(0)), (Pt(100.0), Pt(290.0)));
    }
}
