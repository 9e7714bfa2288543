//! The drawing primitive the layout engine composes pages on top of.
//!
//! A [`Surface`] knows how to start pages, measure and draw text in its current font,
//! and draw a handful of shapes and images. It owns no layout state: the cursor, the
//! columns and every break decision live in [`Composer`](crate::Composer), which tells
//! the surface exactly where to put things.
//!
//! Coordinates are in points, measured from the top-left corner of the page with `y`
//! growing downward.

use crate::colour::Colour;
use crate::error::{AssetError, LayoutError};
use crate::rect::Rect;
use crate::units::Pt;
use std::fmt;

/// Bold / italic / underline flags of a font selection
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FontVariant {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FontVariant {
    pub const REGULAR: FontVariant = FontVariant {
        bold: false,
        italic: false,
        underline: false,
    };

    /// Parse the short form used by style maps: any combination of `B`, `I` and `U`
    /// (case-insensitive). An empty string or `none` is the regular variant.
    pub fn parse(value: &str) -> FontVariant {
        let value = value.trim();
        if value.eq_ignore_ascii_case("none") {
            return FontVariant::REGULAR;
        }
        let mut variant = FontVariant::REGULAR;
        for ch in value.chars() {
            match ch.to_ascii_uppercase() {
                'B' => variant.bold = true,
                'I' => variant.italic = true,
                'U' => variant.underline = true,
                _ => {}
            }
        }
        variant
    }

    /// The same variant without underlining. Underlining is drawn, not a separate face,
    /// so surfaces look fonts up by this key.
    pub fn face(self) -> FontVariant {
        FontVariant {
            underline: false,
            ..self
        }
    }
}

impl fmt::Display for FontVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == FontVariant::REGULAR {
            return f.write_str("regular");
        }
        if self.bold {
            f.write_str("B")?;
        }
        if self.italic {
            f.write_str("I")?;
        }
        if self.underline {
            f.write_str("U")?;
        }
        Ok(())
    }
}

/// A complete font selection
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub variant: FontVariant,
    pub size: Pt,
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec {
            family: "Helvetica".to_string(),
            variant: FontVariant::REGULAR,
            size: Pt(12.0),
        }
    }
}

/// Horizontal alignment of text within a cell
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    /// Stretch word spacing so each line fills the cell, except the last one
    Justify,
}

/// Which edges of a cell get a frame
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Border {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Border {
    pub const NONE: Border = Border {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };

    pub const ALL: Border = Border {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub fn is_none(&self) -> bool {
        *self == Border::NONE
    }

    /// Only the edges of `self` that are also in `mask`
    pub fn intersect(self, mask: Border) -> Border {
        Border {
            top: self.top && mask.top,
            right: self.right && mask.right,
            bottom: self.bottom && mask.bottom,
            left: self.left && mask.left,
        }
    }
}

/// How a closed shape is painted
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Paint {
    /// Outline with the draw colour
    #[default]
    Stroke,
    /// Fill with the fill colour
    Fill,
    /// Fill, then outline
    FillStroke,
}

/// Appearance of a single drawn cell
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct CellStyle {
    pub border: Border,
    pub align: Align,
    pub fill: bool,
}

/// A page-oriented drawing primitive
pub trait Surface {
    /// Handle of an image the surface knows how to draw
    type Image: Copy;

    /// Size of the pages this surface emits
    fn page_size(&self) -> (Pt, Pt);

    /// Number of pages emitted so far
    fn page_count(&self) -> usize;

    /// Start a new page. Drawing always goes to the most recently added page.
    fn add_page(&mut self) -> Result<(), LayoutError>;

    /// Select the font used by subsequent measuring and drawing
    fn set_font(&mut self, font: &FontSpec) -> Result<(), LayoutError>;

    /// Width of `text` in the current font
    fn text_width(&self, text: &str) -> Pt;

    fn set_text_colour(&mut self, colour: Colour);

    fn set_draw_colour(&mut self, colour: Colour);

    fn set_fill_colour(&mut self, colour: Colour);

    /// Draw a single line of text with its baseline starting at `origin`
    fn text(&mut self, origin: (Pt, Pt), text: &str);

    /// Horizontal inset between a cell's edges and its text, on each side
    fn cell_padding(&self) -> Pt {
        Pt::ZERO
    }

    /// Draw a single-line cell: optional fill, frame edges, and `text` aligned inside
    fn cell(&mut self, bounds: Rect, text: &str, style: CellStyle);

    fn circle(&mut self, centre: (Pt, Pt), radius: Pt, paint: Paint);

    fn rect(&mut self, bounds: Rect, paint: Paint);

    /// Intrinsic (width, height) of an image, used for its aspect ratio
    fn image_size(&self, image: Self::Image) -> Result<(f32, f32), AssetError>;

    /// Draw an image scaled into `bounds`
    fn image(&mut self, image: Self::Image, bounds: Rect) -> Result<(), LayoutError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_font_variants() {
        assert_eq!(FontVariant::parse(""), FontVariant::REGULAR);
        assert_eq!(FontVariant::parse("none"), FontVariant::REGULAR);
        let bi = FontVariant::parse("bi");
        assert!(bi.bold && bi.italic && !bi.underline);
        assert_eq!(FontVariant::parse("BU").face(), FontVariant::parse("B"));
        assert_eq!(FontVariant::parse("IBU").to_string(), "BIU");
    }

    #[test]
    fn border_intersection() {
        let top_bottom = Border {
            top: true,
            bottom: true,
            ..Border::NONE
        };
        assert_eq!(Border::ALL.intersect(top_bottom), top_bottom);
        assert!(Border::NONE.intersect(Border::ALL).is_none());
    }
}
