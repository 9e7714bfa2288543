//! A [`Surface`] that produces real PDF documents through [`pdf_writer`].
//!
//! Fonts are TrueType/OpenType files registered under a family name and variant, and
//! embedded whole as CID fonts. Images are decoded with the `image` crate; RGB JPEGs
//! are passed through untouched, everything else is zlib-compressed with an alpha
//! mask where needed. Nothing is serialized until [`PdfSurface::write`].
//!
//! # Example
//!
//! ```no_run
//! use pdf_columns::pdf::{Font, Info, PdfSurface};
//! use pdf_columns::{pagesize, Composer, Padding, Pt};
//!
//! let mut surface = PdfSurface::new(pagesize::A4);
//! surface.set_info(Info::new().title("Columns"));
//! surface.add_font("Body", "", Font::from_file("assets/Body-Regular.ttf")?);
//!
//! let mut composer = Composer::new(surface);
//! composer.set_font("Body", "", Pt(11.0))?;
//! composer.set_columns(vec![Padding::all(Pt(6.0)); 2])?;
//! composer.paragraph("Lorem ipsum dolor sit amet.", Default::default())?;
//!
//! let file = std::fs::File::create("columns.pdf")?;
//! composer.finish()?.write(file)?;
//! # Ok::<(), pdf_columns::LayoutError>(())
//! ```

mod content;
mod font;
mod image;
mod info;
mod page;
mod refs;

pub use self::image::Image;
pub use font::Font;
pub use info::Info;

use crate::colour::{colours, Colour};
use crate::error::{AssetError, LayoutError};
use crate::rect::Rect;
use crate::surface::{Align, CellStyle, FontSpec, FontVariant, Paint, Surface};
use crate::units::{Mm, Pt};
use content::{ImageLayout, PageContents, Shape, ShapeLayout, SpanFont, SpanLayout};
use id_arena::{Arena, Id};
use log::warn;
use page::Page;
use pdf_writer::{Finish, Pdf};
use refs::{ObjectReferences, RefType};
use std::collections::HashMap;
use std::io::Write;

/// Builds a PDF document in memory, page by page
pub struct PdfSurface {
    page_size: (Pt, Pt),
    info: Option<Info>,
    fonts: Arena<Font>,
    /// (lowercased family, variant without underline) to font
    families: HashMap<(String, FontVariant), Id<Font>>,
    images: Arena<Image>,
    pages: Vec<Page>,
    font: Option<SpanFont>,
    underline: bool,
    text_colour: Colour,
    draw_colour: Colour,
    fill_colour: Colour,
    line_width: Pt,
    cell_margin: Pt,
}

impl PdfSurface {
    pub fn new(page_size: (Pt, Pt)) -> PdfSurface {
        PdfSurface {
            page_size,
            info: None,
            fonts: Arena::new(),
            families: HashMap::new(),
            images: Arena::new(),
            pages: Vec::new(),
            font: None,
            underline: false,
            text_colour: colours::BLACK,
            draw_colour: colours::BLACK,
            fill_colour: colours::BLACK,
            line_width: Mm(0.2).into(),
            cell_margin: Mm(1.0).into(),
        }
    }

    /// Sets information about the document. Without it, no information block is
    /// written.
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Register `font` as the given family and variant (`""`, `"B"`, `"I"`, `"BI"`).
    /// Registering the same pair again replaces the earlier font for later selections.
    pub fn add_font<S: AsRef<str>>(&mut self, family: S, variant: &str, font: Font) -> Id<Font> {
        let id = self.fonts.alloc(font);
        let key = (
            family.as_ref().to_lowercase(),
            FontVariant::parse(variant).face(),
        );
        self.families.insert(key, id);
        id
    }

    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Load and register an image file
    pub fn load_image<P: AsRef<std::path::Path>>(&mut self, path: P) -> Result<Id<Image>, LayoutError> {
        Ok(self.add_image(Image::from_file(path)?))
    }

    /// Width of stroked lines: borders, outlines and underlines use it
    pub fn set_line_width<D: Into<Pt>>(&mut self, width: D) {
        self.line_width = width.into();
    }

    /// Horizontal padding between a cell's edge and left- or right-aligned text
    pub fn set_cell_margin<D: Into<Pt>>(&mut self, margin: D) {
        self.cell_margin = margin.into();
    }

    fn page_height(&self) -> f32 {
        *self.page_size.1
    }

    fn to_pdf_point(&self, (x, y): (Pt, Pt)) -> (f32, f32) {
        (*x, self.page_height() - *y)
    }

    fn current_page(&mut self) -> Option<&mut Page> {
        let page = self.pages.last_mut();
        if page.is_none() {
            warn!("drawing before the first page was added, ignoring");
        }
        page
    }

    fn shape(&mut self, shape: Shape, paint: Paint) {
        let layout = ShapeLayout {
            shape,
            paint,
            stroke: self.draw_colour,
            fill: self.fill_colour,
            line_width: *self.line_width,
        };
        if let Some(page) = self.current_page() {
            page.add(PageContents::Shape(layout));
        }
    }

    fn line(&mut self, from: (Pt, Pt), to: (Pt, Pt)) {
        let shape = Shape::Line {
            from: self.to_pdf_point(from),
            to: self.to_pdf_point(to),
        };
        self.shape(shape, Paint::Stroke);
    }

    /// Draw `text` with its baseline starting at `origin`, spacing words out by
    /// `word_spacing`
    fn span(&mut self, origin: (Pt, Pt), text: &str, word_spacing: Pt) {
        let Some(font) = self.font else {
            warn!("no font selected, dropping text {text:?}");
            return;
        };
        let span = SpanLayout {
            text: text.to_string(),
            font,
            colour: self.text_colour,
            coords: self.to_pdf_point(origin),
            word_spacing: *word_spacing,
        };
        if let Some(page) = self.current_page() {
            page.add_span(span);
        }

        if self.underline {
            let size = Pt(font.size);
            let width = self.text_width(text)
                + word_spacing * text.matches(' ').count() as f32;
            let y = origin.1 + size * 0.1;
            let (saved_colour, saved_width) = (self.draw_colour, self.line_width);
            self.draw_colour = self.text_colour;
            self.line_width = size * 0.05;
            self.line((origin.0, y), (origin.0 + width, y));
            self.draw_colour = saved_colour;
            self.line_width = saved_width;
        }
    }

    /// Serialize the document. The whole document is rendered in memory first.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), LayoutError> {
        let PdfSurface {
            info,
            pages,
            fonts,
            images,
            ..
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<pdf_writer::Ref> = (0..pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, font) in fonts.iter() {
            font.write(&mut refs, id.index(), &mut writer);
        }
        for (id, image) in images.iter() {
            image.write(&mut refs, id.index(), &mut writer);
        }
        for (page_index, page) in pages.iter().enumerate() {
            page.write(&mut refs, page_index, page_tree_id, &fonts, &images, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice())?;
        Ok(())
    }
}

impl Surface for PdfSurface {
    type Image = Id<Image>;

    fn page_size(&self) -> (Pt, Pt) {
        self.page_size
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) -> Result<(), LayoutError> {
        let (width, height) = self.page_size;
        self.pages.push(Page::new(*width, *height));
        Ok(())
    }

    fn set_font(&mut self, font: &FontSpec) -> Result<(), LayoutError> {
        let face = font.variant.face();
        let id = self
            .families
            .get(&(font.family.to_lowercase(), face))
            .copied()
            .ok_or_else(|| LayoutError::UnknownFont {
                family: font.family.clone(),
                variant: face.to_string(),
            })?;
        self.font = Some(SpanFont {
            id,
            size: *font.size,
        });
        self.underline = font.variant.underline;
        Ok(())
    }

    fn text_width(&self, text: &str) -> Pt {
        match self.font {
            Some(SpanFont { id, size }) => self
                .fonts
                .get(id)
                .map(|font| font.width_of(text, Pt(size)))
                .unwrap_or_default(),
            None => Pt::ZERO,
        }
    }

    fn set_text_colour(&mut self, colour: Colour) {
        self.text_colour = colour;
    }

    fn set_draw_colour(&mut self, colour: Colour) {
        self.draw_colour = colour;
    }

    fn set_fill_colour(&mut self, colour: Colour) {
        self.fill_colour = colour;
    }

    fn text(&mut self, origin: (Pt, Pt), text: &str) {
        self.span(origin, text, Pt::ZERO);
    }

    fn cell_padding(&self) -> Pt {
        self.cell_margin
    }

    fn cell(&mut self, bounds: Rect, text: &str, style: CellStyle) {
        let border = style.border;
        let boxed = border.top && border.right && border.bottom && border.left;
        if style.fill || boxed {
            let paint = match (style.fill, boxed) {
                (true, true) => Paint::FillStroke,
                (true, false) => Paint::Fill,
                _ => Paint::Stroke,
            };
            let page_height = self.page_size.1;
            self.shape(Shape::Rect(bounds.to_pdf(page_height)), paint);
        }
        if !boxed {
            let (left, top, right, bottom) = (bounds.x1, bounds.y1, bounds.x2, bounds.y2);
            if border.top {
                self.line((left, top), (right, top));
            }
            if border.right {
                self.line((right, top), (right, bottom));
            }
            if border.bottom {
                self.line((left, bottom), (right, bottom));
            }
            if border.left {
                self.line((left, top), (left, bottom));
            }
        }

        if text.is_empty() {
            return;
        }
        let Some(font) = self.font else {
            warn!("no font selected, dropping text {text:?}");
            return;
        };
        let size = Pt(font.size);
        let width = bounds.width();
        let text_width = self.text_width(text);
        let mut word_spacing = Pt::ZERO;
        let dx = match style.align {
            Align::Right => width - self.cell_margin - text_width,
            Align::Center => (width - text_width) / 2.0,
            Align::Left => self.cell_margin,
            Align::Justify => {
                let spaces = text.matches(' ').count();
                if spaces > 0 {
                    word_spacing = (width - self.cell_margin * 2.0 - text_width) / spaces as f32;
                }
                self.cell_margin
            }
        };
        let baseline = bounds.y1 + bounds.height() / 2.0 + size * 0.3;
        self.span((bounds.x1 + dx, baseline), text, word_spacing);
    }

    fn circle(&mut self, centre: (Pt, Pt), radius: Pt, paint: Paint) {
        let shape = Shape::Circle {
            centre: self.to_pdf_point(centre),
            radius: *radius,
        };
        self.shape(shape, paint);
    }

    fn rect(&mut self, bounds: Rect, paint: Paint) {
        let page_height = self.page_size.1;
        self.shape(Shape::Rect(bounds.to_pdf(page_height)), paint);
    }

    fn image_size(&self, image: Id<Image>) -> Result<(f32, f32), AssetError> {
        self.images
            .get(image)
            .map(|image| (image.width, image.height))
            .ok_or(AssetError::UnknownImage)
    }

    fn image(&mut self, image: Id<Image>, bounds: Rect) -> Result<(), LayoutError> {
        self.image_size(image)?;
        let position = bounds.to_pdf(self.page_size.1);
        if let Some(page) = self.current_page() {
            page.add(PageContents::Image(ImageLayout { image, position }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Border;
    use ::image::{DynamicImage, RgbImage};

    fn surface() -> PdfSurface {
        let mut surface = PdfSurface::new((Pt(200.0), Pt(100.0)));
        surface.add_page().unwrap();
        surface
    }

    fn contents(surface: &PdfSurface) -> &[PageContents] {
        &surface.pages[0].contents
    }

    #[test]
    fn cell_padding_is_the_cell_margin() {
        let mut surface = surface();
        assert_eq!(surface.cell_padding(), Pt::from(Mm(1.0)));
        surface.set_cell_margin(Pt(3.0));
        assert_eq!(surface.cell_padding(), Pt(3.0));
    }

    #[test]
    fn unknown_fonts_are_errors() {
        let mut surface = surface();
        let err = surface
            .set_font(&FontSpec {
                family: "Missing".into(),
                variant: FontVariant::parse("BU"),
                size: Pt(10.0),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::UnknownFont { ref family, ref variant } if family == "Missing" && variant == "B"
        ));
    }

    #[test]
    fn shapes_are_flipped_into_pdf_space() {
        let mut surface = surface();
        surface.set_fill_colour(colours::RED);
        surface.rect(Rect::from_xywh(Pt(10.0), Pt(20.0), Pt(30.0), Pt(40.0)), Paint::Fill);
        surface.circle((Pt(50.0), Pt(10.0)), Pt(2.0), Paint::Stroke);

        match &contents(&surface)[0] {
            PageContents::Shape(layout) => {
                assert_eq!(layout.shape, Shape::Rect(pdf_writer::Rect::new(10.0, 40.0, 40.0, 80.0)));
                assert_eq!(layout.fill, colours::RED);
            }
            other => panic!("expected a shape, got {other:?}"),
        }
        match &contents(&surface)[1] {
            PageContents::Shape(layout) => assert_eq!(
                layout.shape,
                Shape::Circle {
                    centre: (50.0, 90.0),
                    radius: 2.0
                }
            ),
            other => panic!("expected a shape, got {other:?}"),
        }
    }

    #[test]
    fn partial_borders_are_lines() {
        let mut surface = surface();
        let style = CellStyle {
            border: Border {
                top: true,
                left: true,
                ..Border::NONE
            },
            ..CellStyle::default()
        };
        surface.cell(Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(10.0), Pt(10.0)), "", style);
        assert_eq!(contents(&surface).len(), 2);
        assert!(contents(&surface).iter().all(|c| matches!(
            c,
            PageContents::Shape(ShapeLayout {
                shape: Shape::Line { .. },
                ..
            })
        )));
    }

    #[test]
    fn places_images() {
        let mut surface = surface();
        let image = surface.add_image(Image::from_image(DynamicImage::ImageRgb8(RgbImage::new(8, 4))));
        assert_eq!(surface.image_size(image).unwrap(), (8.0, 4.0));
        surface
            .image(image, Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(16.0), Pt(8.0)))
            .unwrap();
        assert!(matches!(
            &contents(&surface)[0],
            PageContents::Image(ImageLayout { position, .. }) if position.y1 == 92.0
        ));
    }

    #[test]
    fn writes_a_document() {
        let mut surface = surface();
        surface.set_info(Info::new().title("test"));
        surface.add_image(Image::from_image(DynamicImage::ImageRgb8(RgbImage::new(2, 2))));
        surface.rect(Rect::from_xywh(Pt(1.0), Pt(1.0), Pt(5.0), Pt(5.0)), Paint::Stroke);
        surface.add_page().unwrap();

        let mut out = Vec::new();
        surface.write(&mut out).unwrap();
        assert!(out.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/Title (test)"));
    }
}
