use super::{Composer, EPSILON};
use crate::error::LayoutError;
use crate::layout::{normalize_text, wrap_lines, WrappedLine};
use crate::rect::Rect;
use crate::surface::{Align, Border, CellStyle, Paint, Surface};
use crate::units::{Mm, Pt};
use log::warn;

/// Options for [`Composer::cell`]
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct CellOptions {
    /// Defaults to the width of the text
    pub width: Option<Pt>,
    /// Defaults to the line height
    pub height: Option<Pt>,
    pub border: Border,
    pub align: Align,
    pub fill: bool,
}

/// Options for [`Composer::paragraph`]
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ParagraphOptions {
    /// Defaults to the space between the cursor and the right edge of the column
    pub width: Option<Pt>,
    /// Height of each line, defaults to the line height
    pub height: Option<Pt>,
    /// Frame around the whole block of lines
    pub border: Border,
    /// Defaults to the composer's alignment
    pub align: Option<Align>,
    pub fill: bool,
    /// Stop after this many lines; 0 means no limit
    pub max_lines: usize,
}

/// Options for [`Composer::list`]
#[derive(Default, Clone, Copy)]
pub struct ListOptions<'a> {
    /// Width of the item text, defaults to the rest of the column
    pub width: Option<Pt>,
    /// Applied to each item before it is drawn, e.g. to normalize its encoding
    pub transform: Option<&'a dyn Fn(&str) -> String>,
}

/// Geometry of bulleted lists
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ListStyle {
    /// Indent of the item text
    pub margin: Pt,
    /// Distance from the start of the item text to the centre of the bullet
    pub bullet_offset: Pt,
    pub bullet_radius: Pt,
}

impl Default for ListStyle {
    fn default() -> Self {
        ListStyle {
            margin: Mm(5.0).into(),
            bullet_offset: Mm(1.8).into(),
            bullet_radius: Mm(0.7).into(),
        }
    }
}

/// Where a block of drawn lines started, and what didn't fit
struct Drawn {
    first_line: Option<(Pt, Pt)>,
    residual: String,
}

impl<S: Surface> Composer<S> {
    fn margin_top(&self) -> Pt {
        self.style.margin_top.unwrap_or(Pt::ZERO)
    }

    fn apply_margin_top(&mut self) {
        self.y += self.margin_top();
    }

    /// Draw a single-line box at the cursor and move the cursor to its right edge
    pub fn cell(&mut self, text: &str, options: CellOptions) -> Result<(), LayoutError> {
        self.ensure_page()?;
        self.apply_margin_top();

        let width = options
            .width
            .unwrap_or_else(|| self.surface.text_width(text));
        let height = options
            .height
            .unwrap_or_else(|| self.default_line_height());
        self.check_overflow(height)?;

        self.surface.cell(
            Rect::from_xywh(self.x, self.y, width, height),
            text,
            CellStyle {
                border: options.border,
                align: options.align,
                fill: options.fill,
            },
        );
        self.x += width;
        Ok(())
    }

    /// Draw wrapped text starting at the cursor. Lines that run past the bottom of the
    /// column break to the next one as they go. Returns the text left over after
    /// `max_lines` lines, empty if everything was drawn. The cursor ends at the left
    /// edge below the last line.
    pub fn paragraph(
        &mut self,
        text: &str,
        options: ParagraphOptions,
    ) -> Result<String, LayoutError> {
        self.ensure_page()?;
        self.apply_margin_top();
        let drawn = self.draw_lines(&normalize_text(text), &options)?;
        Ok(drawn.residual)
    }

    fn draw_lines(
        &mut self,
        text: &str,
        options: &ParagraphOptions,
    ) -> Result<Drawn, LayoutError> {
        let height = options
            .height
            .unwrap_or_else(|| self.default_line_height());
        let align = options.align.unwrap_or(self.default_align);

        let mut first_line = None;
        let mut residual = String::new();
        let mut drawn = 0;
        // byte offset of the text still to draw
        let mut offset = 0;
        let mut fresh_column = false;

        'column: loop {
            let width = match options.width {
                Some(width) if width > Pt::ZERO => width,
                _ => self.bounds.x2 - self.x,
            };
            let rest = &text[offset..];
            let lines = self.wrap(rest, width);

            for (i, line) in lines.iter().enumerate() {
                if options.max_lines > 0 && drawn == options.max_lines {
                    residual = rest[line.start..].to_string();
                    break 'column;
                }
                if !fresh_column && self.check_overflow(height)? {
                    // the new column may be narrower, so wrap what's left again
                    offset += line.start;
                    fresh_column = true;
                    continue 'column;
                }
                fresh_column = false;
                first_line.get_or_insert((self.x, self.y));

                let last = i + 1 == lines.len() || drawn + 1 == options.max_lines;
                let edges = Border {
                    top: drawn == 0,
                    bottom: last,
                    left: true,
                    right: true,
                };
                let align = match align {
                    Align::Justify if line.hard => Align::Left,
                    align => align,
                };
                self.surface.cell(
                    Rect::from_xywh(self.x, self.y, width, height),
                    line.text(rest),
                    CellStyle {
                        border: options.border.intersect(edges),
                        align,
                        fill: options.fill,
                    },
                );
                self.y += height;
                drawn += 1;
            }
            break;
        }
        self.x = self.bounds.x1;

        Ok(Drawn {
            first_line,
            residual,
        })
    }

    /// Wrap `text` into cells `width` wide, leaving the surface's cell padding free
    /// on both sides
    fn wrap(&self, text: &str, width: Pt) -> Vec<WrappedLine> {
        let inner = width - self.surface.cell_padding() * 2.0;
        wrap_lines(text, inner, |s| self.surface.text_width(s))
    }

    fn line_count(&self, text: &str, width: Pt) -> usize {
        self.wrap(text, width).len()
    }

    /// Height `text` would take as a paragraph started at the cursor, at the default
    /// line height and including the style's top margin. Nothing is drawn.
    pub fn estimate_height(&self, text: &str) -> Pt {
        let lines = self.line_count(&normalize_text(text), self.bounds.x2 - self.x);
        self.margin_top() + self.default_line_height() * lines as f32
    }

    /// Whether drawing `text` as a paragraph at the cursor would run past the bottom
    /// of the current column
    pub fn will_overflow(&self, text: &str) -> bool {
        self.y + self.estimate_height(text) > self.bounds.y2 + EPSILON
    }

    /// Draw a bulleted list, one paragraph per item.
    ///
    /// Items are indented by the list margin. Before an item is drawn, the room left
    /// in the column is checked: an item that doesn't fit draws as many lines as fit
    /// and continues in the next column, and one that can't even fit its first line
    /// moves to the next column whole, so a bullet never ends up apart from its text.
    /// Breaks go through the pre-break hooks; when one vetoes, the rest of the item is
    /// drawn in place.
    pub fn list<I, T>(&mut self, items: I, options: ListOptions<'_>) -> Result<(), LayoutError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.ensure_page()?;
        let margin = self.list_style.margin;
        self.increase_indent(margin);
        self.x = self.bounds.x1;

        let result = items.into_iter().try_for_each(|item| {
            let text = match options.transform {
                Some(transform) => transform(item.as_ref()),
                None => item.as_ref().to_string(),
            };
            self.list_item(&normalize_text(&text), options.width)
        });

        self.decrease_indent(margin)?;
        self.x = self.bounds.x1;
        result
    }

    fn list_item(&mut self, text: &str, width: Option<Pt>) -> Result<(), LayoutError> {
        let line_height = self.default_line_height();
        let mut pending = text.to_string();
        let mut first = true;

        loop {
            let margin = if first { self.margin_top() } else { Pt::ZERO };
            let width = width.unwrap_or_else(|| self.available_width());
            let needed = margin + line_height * self.line_count(&pending, width) as f32;

            let mut max_lines = 0;
            if self.y + needed > self.bounds.y2 + EPSILON {
                let room = self.bounds.y2 - self.y - margin;
                let fit = ((room + EPSILON) / line_height).floor().max(0.0) as usize;
                if fit > 0 {
                    max_lines = fit;
                } else if !self.at_column_top() {
                    if !self.page_break()?.is_vetoed() {
                        continue;
                    }
                } else {
                    warn!("a list line is taller than the whole column, drawing it anyway");
                    max_lines = 1;
                }
            }

            self.y += margin;
            let options = ParagraphOptions {
                width: Some(width),
                height: Some(line_height),
                max_lines,
                ..ParagraphOptions::default()
            };
            let drawn = self.draw_lines(&pending, &options)?;
            if first {
                if let Some(start) = drawn.first_line {
                    self.draw_bullet(start, line_height);
                }
                first = false;
            }

            if drawn.residual.is_empty() {
                return Ok(());
            }
            if self.page_break()?.is_vetoed() {
                let options = ParagraphOptions {
                    max_lines: 0,
                    ..options
                };
                self.draw_lines(&drawn.residual, &options)?;
                return Ok(());
            }
            pending = drawn.residual;
        }
    }

    fn draw_bullet(&mut self, line_start: (Pt, Pt), line_height: Pt) {
        let centre = (
            line_start.0 - self.list_style.bullet_offset,
            line_start.1 + line_height / 2.0,
        );
        self.surface
            .circle(centre, self.list_style.bullet_radius, Paint::Fill);
    }

    /// Draw a line of text with its baseline at the cursor, without moving it
    pub fn text(&mut self, text: &str) -> Result<(), LayoutError> {
        self.ensure_page()?;
        self.surface.text((self.x, self.y), text);
        Ok(())
    }

    /// Line feed: back to the left edge and down by `height`, or by one line
    pub fn ln(&mut self, height: Option<Pt>) -> Result<(), LayoutError> {
        self.x = self.bounds.x1;
        self.y += height.unwrap_or_else(|| self.default_line_height());
        Ok(())
    }

    /// Draw a rectangle with its top-left corner at the cursor
    pub fn rect<D: Into<Pt>>(&mut self, width: D, height: D, paint: Paint) -> Result<(), LayoutError> {
        self.ensure_page()?;
        self.surface
            .rect(Rect::from_xywh(self.x, self.y, width.into(), height.into()), paint);
        Ok(())
    }
}
