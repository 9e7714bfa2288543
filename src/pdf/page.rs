use super::content::{render_contents, PageContents, SpanLayout};
use super::font::Font;
use super::image::Image;
use super::refs::{ObjectReferences, RefType};
use crate::error::LayoutError;
use id_arena::Arena;
use pdf_writer::{Finish, Name, Pdf, Rect};

/// One page of a [`PdfSurface`](super::PdfSurface), holding its content until the
/// document is written
pub struct Page {
    pub media_box: Rect,
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(width: f32, height: f32) -> Page {
        Page {
            media_box: Rect::new(0.0, 0.0, width, height),
            contents: Vec::new(),
        }
    }

    /// Add a text span, joining it to the text block just before it if there is one
    pub fn add_span(&mut self, span: SpanLayout) {
        match self.contents.last_mut() {
            Some(PageContents::Text(spans)) => spans.push(span),
            _ => self.contents.push(PageContents::Text(vec![span])),
        }
    }

    pub fn add(&mut self, content: PageContents) {
        self.contents.push(content);
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        page_tree: pdf_writer::Ref,
        fonts: &Arena<Font>,
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), LayoutError> {
        let id = refs.gen(RefType::Page(page_index));
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box);
        page.parent(page_tree);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (font_id, _) in fonts.iter() {
            resource_fonts.pair(
                Name(format!("F{}", font_id.index()).as_bytes()),
                refs.gen(RefType::Font(font_id.index())),
            );
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for (image_id, _) in images.iter() {
            resource_xobjects.pair(
                Name(format!("I{}", image_id.index()).as_bytes()),
                refs.gen(RefType::Image(image_id.index())),
            );
        }
        resource_xobjects.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = render_contents(&self.contents, fonts)?;
        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}
