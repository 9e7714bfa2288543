//! Page content items and their rendering into PDF content streams.
//!
//! Items are positioned in PDF space (origin at the bottom-left); the surface does
//! the flip from layout space when it records them.

use super::font::Font;
use super::image::Image;
use crate::colour::Colour;
use crate::surface::Paint;
use id_arena::{Arena, Id};
use std::io::Write;

/// Control point distance for approximating a quarter circle with a cubic Bézier
const KAPPA: f32 = 0.552_284_8;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: f32,
}

/// A run of text starting at a baseline point
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (f32, f32),
    /// Extra space after every space character, for justified lines
    pub word_spacing: f32,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image: Id<Image>,
    pub position: pdf_writer::Rect,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Shape {
    Rect(pdf_writer::Rect),
    Circle { centre: (f32, f32), radius: f32 },
    Line { from: (f32, f32), to: (f32, f32) },
}

#[derive(Clone, PartialEq, Debug)]
pub struct ShapeLayout {
    pub shape: Shape,
    pub paint: Paint,
    pub stroke: Colour,
    pub fill: Colour,
    pub line_width: f32,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(Vec<SpanLayout>),
    Image(ImageLayout),
    Shape(ShapeLayout),
}

#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(spans) => render_text_spans(&mut content, spans, fonts)?,
            PageContents::Image(image) => {
                let p = &image.position;
                write!(&mut content, "q\n")?;
                write!(
                    &mut content,
                    "{} 0 0 {} {} {} cm\n",
                    p.x2 - p.x1,
                    p.y2 - p.y1,
                    p.x1,
                    p.y1
                )?;
                write!(&mut content, "/I{} Do\n", image.image.index())?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::Shape(shape) => render_shape(&mut content, shape)?,
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), std::io::Error> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;
    let mut current_font = first.font;
    let mut current_colour = first.colour;
    write!(content, "/F{} {} Tf\n", current_font.id.index(), current_font.size)?;
    write_colour(content, current_colour, false)?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write!(content, "/F{} {} Tf\n", current_font.id.index(), current_font.size)?;
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            write_colour(content, current_colour, false)?;
        }
        let Some(font) = fonts.get(current_font.id) else {
            continue;
        };

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
        if span.word_spacing == 0.0 {
            write!(content, "<")?;
            write_glyphs(content, font, &span.text)?;
            write!(content, "> Tj\n")?;
        } else {
            // Tw doesn't apply to two-byte codes, so spaces are widened by hand
            let adjust = -span.word_spacing * 1000.0 / current_font.size;
            write!(content, "[<")?;
            for (i, word) in span.text.split(' ').enumerate() {
                if i > 0 {
                    write_glyphs(content, font, " ")?;
                    write!(content, "> {adjust} <")?;
                }
                write_glyphs(content, font, word)?;
            }
            write!(content, ">] TJ\n")?;
        }
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

fn write_glyphs(content: &mut Vec<u8>, font: &Font, text: &str) -> Result<(), std::io::Error> {
    for ch in text.chars() {
        write!(content, "{:04x}", font.glyph_or_fallback(ch))?;
    }
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_shape(content: &mut Vec<u8>, layout: &ShapeLayout) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    write!(content, "{} w\n", layout.line_width)?;
    write_colour(content, layout.stroke, true)?;
    write_colour(content, layout.fill, false)?;

    match layout.shape {
        Shape::Rect(r) => {
            write!(content, "{} {} {} {} re\n", r.x1, r.y1, r.x2 - r.x1, r.y2 - r.y1)?;
        }
        Shape::Circle {
            centre: (cx, cy),
            radius: r,
        } => {
            let k = KAPPA * r;
            write!(content, "{} {} m\n", cx + r, cy)?;
            let quarters = [
                (cx + r, cy + k, cx + k, cy + r, cx, cy + r),
                (cx - k, cy + r, cx - r, cy + k, cx - r, cy),
                (cx - r, cy - k, cx - k, cy - r, cx, cy - r),
                (cx + k, cy - r, cx + r, cy - k, cx + r, cy),
            ];
            for (x1, y1, x2, y2, x3, y3) in quarters {
                write!(content, "{x1} {y1} {x2} {y2} {x3} {y3} c\n")?;
            }
        }
        Shape::Line { from, to } => {
            write!(content, "{} {} m {} {} l\n", from.0, from.1, to.0, to.1)?;
        }
    }

    let op = match (layout.shape, layout.paint) {
        (Shape::Line { .. }, _) | (_, Paint::Stroke) => "S",
        (_, Paint::Fill) => "f",
        (_, Paint::FillStroke) => "B",
    };
    write!(content, "{op}\nQ\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_colour(content: &mut Vec<u8>, colour: Colour, stroke: bool) -> Result<(), std::io::Error> {
    match (colour, stroke) {
        (Colour::RGB { r, g, b }, false) => write!(content, "{r} {g} {b} rg\n"),
        (Colour::RGB { r, g, b }, true) => write!(content, "{r} {g} {b} RG\n"),
        (Colour::CMYK { c, m, y, k }, false) => write!(content, "{c} {m} {y} {k} k\n"),
        (Colour::CMYK { c, m, y, k }, true) => write!(content, "{c} {m} {y} {k} K\n"),
        (Colour::Grey { g }, false) => write!(content, "{g} g\n"),
        (Colour::Grey { g }, true) => write!(content, "{g} G\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;

    fn render(shape: Shape, paint: Paint) -> String {
        let mut content = Vec::new();
        render_shape(
            &mut content,
            &ShapeLayout {
                shape,
                paint,
                stroke: colours::BLACK,
                fill: colours::RED,
                line_width: 0.5,
            },
        )
        .unwrap();
        String::from_utf8(content).unwrap()
    }

    #[test]
    fn rectangles_use_re() {
        let out = render(
            Shape::Rect(pdf_writer::Rect::new(1.0, 2.0, 4.0, 6.0)),
            Paint::FillStroke,
        );
        assert!(out.contains("1 2 3 4 re\n"));
        assert!(out.contains("0.5 w\n"));
        assert!(out.contains("0 G\n"));
        assert!(out.ends_with("B\nQ\n"));
    }

    #[test]
    fn circles_are_four_curves() {
        let out = render(
            Shape::Circle {
                centre: (10.0, 10.0),
                radius: 2.0,
            },
            Paint::Fill,
        );
        assert!(out.contains("12 10 m\n"));
        assert_eq!(out.matches(" c\n").count(), 4);
        assert!(out.ends_with("f\nQ\n"));
    }

    #[test]
    fn lines_are_always_stroked() {
        let out = render(
            Shape::Line {
                from: (0.0, 0.0),
                to: (5.0, 0.0),
            },
            Paint::Fill,
        );
        assert!(out.contains("0 0 m 5 0 l\n"));
        assert!(out.ends_with("S\nQ\n"));
    }

    #[test]
    fn nothing_to_render() {
        let fonts: Arena<Font> = Arena::new();
        assert!(render_contents(&[], &fonts).unwrap().is_empty());
    }
}
