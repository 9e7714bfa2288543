use crate::colour::Colour;
use crate::error::{AssetError, LayoutError};
use crate::rect::Rect;
use crate::surface::{CellStyle, FontSpec, Paint, Surface};
use crate::units::Pt;

/// A drawing operation captured by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        origin: (Pt, Pt),
        text: String,
    },
    Cell {
        bounds: Rect,
        text: String,
        style: CellStyle,
    },
    Circle {
        centre: (Pt, Pt),
        radius: Pt,
        paint: Paint,
    },
    Rect {
        bounds: Rect,
        paint: Paint,
    },
    Image {
        image: usize,
        bounds: Rect,
    },
    Font(FontSpec),
    TextColour(Colour),
    DrawColour(Colour),
    FillColour(Colour),
}

/// A surface that measures text with a fixed advance per character and records every
/// operation instead of rendering it.
///
/// Useful for dry runs (how many pages will this take?) and for checking layouts
/// without any font or image assets. Every character is `advance × font size` wide.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    page_size: (Pt, Pt),
    advance: f32,
    cell_padding: Pt,
    font: FontSpec,
    pages: usize,
    max_pages: Option<usize>,
    images: Vec<(f32, f32)>,
    ops: Vec<(usize, DrawOp)>,
}

impl RecordingSurface {
    pub fn new(page_size: (Pt, Pt)) -> RecordingSurface {
        RecordingSurface {
            page_size,
            advance: 0.5,
            cell_padding: Pt::ZERO,
            font: FontSpec::default(),
            pages: 0,
            max_pages: None,
            images: Vec::new(),
            ops: Vec::new(),
        }
    }

    /// Set the width of every character as a fraction of the font size
    pub fn with_advance(mut self, advance: f32) -> Self {
        self.advance = advance;
        self
    }

    /// Inset cell text by `padding` on both sides, like a PDF cell margin
    pub fn with_cell_padding<D: Into<Pt>>(mut self, padding: D) -> Self {
        self.cell_padding = padding.into();
        self
    }

    /// Refuse to add pages past `max_pages`
    pub fn with_page_limit(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Register an image of the given intrinsic size, returning its handle
    pub fn add_image(&mut self, width: f32, height: f32) -> usize {
        self.images.push((width, height));
        self.images.len() - 1
    }

    /// All recorded operations, tagged with the 1-based page they were drawn on
    pub fn ops(&self) -> &[(usize, DrawOp)] {
        &self.ops
    }

    /// The current font selection
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Text and bounds of every drawn cell, in drawing order
    pub fn cells(&self) -> impl Iterator<Item = (usize, &str, &Rect)> + '_ {
        self.ops.iter().filter_map(|(page, op)| match op {
            DrawOp::Cell { bounds, text, .. } => Some((*page, text.as_str(), bounds)),
            _ => None,
        })
    }

    /// Every drawn circle, in drawing order
    pub fn circles(&self) -> impl Iterator<Item = (usize, (Pt, Pt), Pt)> + '_ {
        self.ops.iter().filter_map(|(page, op)| match op {
            DrawOp::Circle { centre, radius, .. } => Some((*page, *centre, *radius)),
            _ => None,
        })
    }

    fn record(&mut self, op: DrawOp) {
        self.ops.push((self.pages, op));
    }
}

impl Surface for RecordingSurface {
    type Image = usize;

    fn page_size(&self) -> (Pt, Pt) {
        self.page_size
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn add_page(&mut self) -> Result<(), LayoutError> {
        if self.max_pages.is_some_and(|max| self.pages >= max) {
            return Err(LayoutError::PageUnavailable);
        }
        self.pages += 1;
        Ok(())
    }

    fn set_font(&mut self, font: &FontSpec) -> Result<(), LayoutError> {
        self.font = font.clone();
        self.record(DrawOp::Font(font.clone()));
        Ok(())
    }

    fn text_width(&self, text: &str) -> Pt {
        self.font.size * (self.advance * text.chars().count() as f32)
    }

    fn set_text_colour(&mut self, colour: Colour) {
        self.record(DrawOp::TextColour(colour));
    }

    fn set_draw_colour(&mut self, colour: Colour) {
        self.record(DrawOp::DrawColour(colour));
    }

    fn set_fill_colour(&mut self, colour: Colour) {
        self.record(DrawOp::FillColour(colour));
    }

    fn text(&mut self, origin: (Pt, Pt), text: &str) {
        self.record(DrawOp::Text {
            origin,
            text: text.to_string(),
        });
    }

    fn cell_padding(&self) -> Pt {
        self.cell_padding
    }

    fn cell(&mut self, bounds: Rect, text: &str, style: CellStyle) {
        self.record(DrawOp::Cell {
            bounds,
            text: text.to_string(),
            style,
        });
    }

    fn circle(&mut self, centre: (Pt, Pt), radius: Pt, paint: Paint) {
        self.record(DrawOp::Circle {
            centre,
            radius,
            paint,
        });
    }

    fn rect(&mut self, bounds: Rect, paint: Paint) {
        self.record(DrawOp::Rect { bounds, paint });
    }

    fn image_size(&self, image: usize) -> Result<(f32, f32), AssetError> {
        self.images
            .get(image)
            .copied()
            .ok_or(AssetError::UnknownImage)
    }

    fn image(&mut self, image: usize, bounds: Rect) -> Result<(), LayoutError> {
        self.image_size(image)?;
        self.record(DrawOp::Image { image, bounds });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_with_a_fixed_advance() {
        let mut surface = RecordingSurface::new((Pt(100.0), Pt(100.0)));
        surface
            .set_font(&FontSpec {
                size: Pt(10.0),
                ..FontSpec::default()
            })
            .unwrap();
        assert_eq!(surface.text_width("abcd"), Pt(20.0));
        assert_eq!(surface.text_width("äöü"), Pt(15.0));
    }

    #[test]
    fn enforces_page_limit() {
        let mut surface = RecordingSurface::new((Pt(100.0), Pt(100.0))).with_page_limit(1);
        surface.add_page().unwrap();
        assert!(matches!(
            surface.add_page(),
            Err(LayoutError::PageUnavailable)
        ));
        assert_eq!(surface.page_count(), 1);
    }

    #[test]
    fn unknown_images_are_asset_errors() {
        let mut surface = RecordingSurface::new((Pt(100.0), Pt(100.0)));
        let id = surface.add_image(4.0, 3.0);
        assert_eq!(surface.image_size(id).unwrap(), (4.0, 3.0));
        assert!(matches!(
            surface.image_size(id + 1),
            Err(AssetError::UnknownImage)
        ));
    }
}
