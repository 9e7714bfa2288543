//! Typed style records resolved from flat property maps.
//!
//! Style strings are parsed elsewhere into `key → value` pairs; this module turns those
//! pairs into [`TextStyle`] and [`ImageStyle`] records. Keys are matched
//! case-insensitively and unknown keys are ignored. A property that is absent stays
//! unset (`None`), which is different from any explicit value.

use crate::colour::Colour;
use crate::error::LayoutError;
use crate::surface::FontVariant;
use crate::units::{In, Mm, Pt};
use log::trace;

/// A length that is either absolute or relative to some reference width
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Length {
    Absolute(Pt),
    /// Percentage of the reference, `50.0` meaning half
    Percent(f32),
}

impl Length {
    /// Parse `50%`, `12`, `12pt`, `10mm` or `1in`. Bare numbers are points.
    pub fn parse(value: &str) -> Result<Length, LayoutError> {
        let value = value.trim();
        let invalid = || LayoutError::InvalidLength(value.to_string());
        let number = |s: &str| s.trim().parse::<f32>().map_err(|_| invalid());

        let length = if let Some(percent) = value.strip_suffix('%') {
            Length::Percent(number(percent)?)
        } else if let Some(mm) = value.strip_suffix("mm") {
            Length::Absolute(Mm(number(mm)?).into())
        } else if let Some(inches) = value.strip_suffix("in") {
            Length::Absolute(In(number(inches)?).into())
        } else if let Some(pt) = value.strip_suffix("pt") {
            Length::Absolute(Pt(number(pt)?))
        } else {
            Length::Absolute(Pt(number(value)?))
        };

        match length {
            Length::Absolute(Pt(v)) | Length::Percent(v) if !v.is_finite() => Err(invalid()),
            length => Ok(length),
        }
    }

    /// The length in points, with percentages taken of `reference`
    pub fn resolve(self, reference: Pt) -> Pt {
        match self {
            Length::Absolute(pt) => pt,
            Length::Percent(percent) => reference * (percent / 100.0),
        }
    }
}

fn absolute(key: &str, value: &str) -> Result<Pt, LayoutError> {
    match Length::parse(value)? {
        Length::Absolute(pt) => Ok(pt),
        Length::Percent(_) => Err(LayoutError::InvalidLength(format!("{key}: {value}"))),
    }
}

/// Font and spacing settings. Every field is optional; applying a style only
/// changes what it sets, except `margin_top`, which always replaces the previous
/// one (unset meaning no margin).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TextStyle {
    pub family: Option<String>,
    pub variant: Option<FontVariant>,
    pub size: Option<Pt>,
    pub colour: Option<Colour>,
    /// Vertical space added before each drawing call
    pub margin_top: Option<Pt>,
}

impl TextStyle {
    /// Resolve a property map with the keys `family`, `style`, `size`, `color` (or
    /// `colour`) and `margin-top`
    pub fn from_properties<I, K, V>(properties: I) -> Result<TextStyle, LayoutError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut style = TextStyle::default();
        for (key, value) in properties {
            let key = key.as_ref().trim().to_ascii_lowercase();
            let value = value.as_ref().trim();
            match key.as_str() {
                "family" => style.family = Some(value.to_string()),
                "style" => style.variant = Some(FontVariant::parse(value)),
                "size" => style.size = Some(absolute(&key, value)?),
                "color" | "colour" => style.colour = Some(Colour::from_hex(value)?),
                "margin-top" => style.margin_top = Some(absolute(&key, value)?),
                _ => trace!("ignoring text style property `{key}`"),
            }
        }
        Ok(style)
    }

    pub fn family<S: Into<String>>(mut self, family: S) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn variant(mut self, variant: FontVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn size<D: Into<Pt>>(mut self, size: D) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn colour(mut self, colour: Colour) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn margin_top<D: Into<Pt>>(mut self, margin: D) -> Self {
        self.margin_top = Some(margin.into());
        self
    }
}

/// Horizontal placement of an image within the current column
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ImageAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Placement settings for an image
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ImageStyle {
    pub align: ImageAlign,
    /// Width of the image; the full content width of the column when unset.
    /// Percentages are of the current column's content width.
    pub width: Option<Length>,
    pub margin_top: Pt,
}

impl ImageStyle {
    /// Resolve a property map with the keys `align`, `width` and `margin-top`
    pub fn from_properties<I, K, V>(properties: I) -> Result<ImageStyle, LayoutError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut style = ImageStyle::default();
        for (key, value) in properties {
            let key = key.as_ref().trim().to_ascii_lowercase();
            let value = value.as_ref().trim();
            match key.as_str() {
                "align" => {
                    style.align = match value.to_ascii_lowercase().as_str() {
                        "center" | "centre" => ImageAlign::Center,
                        "right" => ImageAlign::Right,
                        _ => ImageAlign::Left,
                    }
                }
                "width" => style.width = Some(Length::parse(value)?),
                "margin-top" => style.margin_top = absolute(&key, value)?,
                _ => trace!("ignoring image style property `{key}`"),
            }
        }
        Ok(style)
    }
}
