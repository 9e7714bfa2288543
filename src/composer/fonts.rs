use super::Composer;
use crate::colour::Colour;
use crate::error::LayoutError;
use crate::style::TextStyle;
use crate::surface::{FontSpec, FontVariant, Surface};
use crate::units::Pt;

impl<S: Surface> Composer<S> {
    /// Apply a text style. Family, variant, size and colour change only when the style
    /// sets them. The style's top margin replaces the current one, so a style without
    /// a margin clears it.
    pub fn font(&mut self, style: &TextStyle) -> Result<(), LayoutError> {
        let mut font = self.font.clone();
        if let Some(family) = &style.family {
            font.family = family.clone();
        }
        if let Some(variant) = style.variant {
            font.variant = variant;
        }
        if let Some(size) = style.size {
            font.size = size;
        }
        self.select_font(font)?;

        if let Some(colour) = style.colour {
            self.surface.set_text_colour(colour);
            self.style.colour = Some(colour);
        }
        self.style.margin_top = style.margin_top;
        Ok(())
    }

    /// Resolve a property map into a [`TextStyle`] and apply it
    pub fn font_properties<I, K, V>(&mut self, properties: I) -> Result<(), LayoutError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let style = TextStyle::from_properties(properties)?;
        self.font(&style)
    }

    fn select_font(&mut self, font: FontSpec) -> Result<(), LayoutError> {
        // the surface keeps its old font if it rejects the new one
        if font != self.font {
            self.surface.set_font(&font)?;
        }
        self.style.family = Some(font.family.clone());
        self.style.variant = Some(font.variant);
        self.style.size = Some(font.size);
        self.font = font;
        Ok(())
    }

    /// Select a font by family, variant letters (`"B"`, `"BI"`, `""` ...) and size
    pub fn set_font<F, D>(&mut self, family: F, variant: &str, size: D) -> Result<(), LayoutError>
    where
        F: Into<String>,
        D: Into<Pt>,
    {
        self.select_font(FontSpec {
            family: family.into(),
            variant: FontVariant::parse(variant),
            size: size.into(),
        })
    }

    pub fn set_font_family<F: Into<String>>(&mut self, family: F) -> Result<(), LayoutError> {
        self.select_font(FontSpec {
            family: family.into(),
            ..self.font.clone()
        })
    }

    pub fn set_font_style(&mut self, variant: &str) -> Result<(), LayoutError> {
        self.select_font(FontSpec {
            variant: FontVariant::parse(variant),
            ..self.font.clone()
        })
    }

    pub fn set_font_size<D: Into<Pt>>(&mut self, size: D) -> Result<(), LayoutError> {
        self.select_font(FontSpec {
            size: size.into(),
            ..self.font.clone()
        })
    }

    pub fn font_size(&self) -> Pt {
        self.font.size
    }

    pub fn current_font(&self) -> &FontSpec {
        &self.font
    }

    /// Snapshot of the style in effect
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Set the text colour from `#RRGGBB` or `#RGB`
    pub fn set_text_colour(&mut self, hex: &str) -> Result<(), LayoutError> {
        let colour = Colour::from_hex(hex)?;
        self.surface.set_text_colour(colour);
        self.style.colour = Some(colour);
        Ok(())
    }

    /// Set the stroke colour for borders and outlines from `#RRGGBB` or `#RGB`
    pub fn set_draw_colour(&mut self, hex: &str) -> Result<(), LayoutError> {
        self.surface.set_draw_colour(Colour::from_hex(hex)?);
        Ok(())
    }

    /// Set the fill colour for filled cells and shapes from `#RRGGBB` or `#RGB`
    pub fn set_fill_colour(&mut self, hex: &str) -> Result<(), LayoutError> {
        self.surface.set_fill_colour(Colour::from_hex(hex)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawOp, RecordingSurface};

    fn composer() -> Composer<RecordingSurface> {
        Composer::new(RecordingSurface::new((Pt(200.0), Pt(300.0))))
    }

    fn fonts(c: &Composer<RecordingSurface>) -> Vec<FontSpec> {
        c.surface()
            .ops()
            .iter()
            .filter_map(|(_, op)| match op {
                DrawOp::Font(font) => Some(font.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn style_merges_into_the_current_font() {
        let mut c = composer();
        c.add_page().unwrap();
        c.set_font("Times", "B", Pt(14.0)).unwrap();
        c.font(&TextStyle::default().size(Pt(9.0))).unwrap();

        let font = c.current_font();
        assert_eq!(font.family, "Times");
        assert_eq!(font.variant, FontVariant::parse("B"));
        assert_eq!(font.size, Pt(9.0));
        assert_eq!(c.style().size, Some(Pt(9.0)));
        assert_eq!(c.default_line_height(), Pt(9.0));
    }

    #[test]
    fn unchanged_fonts_are_not_reselected() {
        let mut c = composer();
        c.add_page().unwrap();
        c.set_font_size(Pt(10.0)).unwrap();
        c.set_font_size(Pt(10.0)).unwrap();
        c.set_font_style("I").unwrap();
        assert_eq!(fonts(&c).len(), 2);
    }

    #[test]
    fn margin_top_is_replaced_by_every_style() {
        let mut c = composer();
        c.font(&TextStyle::default().margin_top(Pt(5.0))).unwrap();
        assert_eq!(c.style().margin_top, Some(Pt(5.0)));
        c.font(&TextStyle::default().family("Courier")).unwrap();
        assert_eq!(c.style().margin_top, None);
        assert_eq!(c.current_font().family, "Courier");
    }

    #[test]
    fn property_maps_apply_colour_and_size() {
        let mut c = composer();
        c.font_properties([("size", "11"), ("color", "#00f")]).unwrap();
        assert_eq!(c.font_size(), Pt(11.0));
        assert!(c
            .surface()
            .ops()
            .iter()
            .any(|(_, op)| *op == DrawOp::TextColour(Colour::new_rgb_bytes(0, 0, 255))));
    }

    #[test]
    fn hex_colour_setters() {
        let mut c = composer();
        c.set_draw_colour("#102030").unwrap();
        c.set_fill_colour("fff").unwrap();
        assert!(matches!(
            c.set_text_colour("#12"),
            Err(LayoutError::InvalidColour(_))
        ));
        let ops: Vec<&DrawOp> = c.surface().ops().iter().map(|(_, op)| op).collect();
        assert_eq!(
            ops,
            [
                &DrawOp::DrawColour(Colour::new_rgb_bytes(0x10, 0x20, 0x30)),
                &DrawOp::FillColour(Colour::new_rgb_bytes(255, 255, 255)),
            ]
        );
    }
}
