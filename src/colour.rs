use crate::error::LayoutError;

/// A colour, expressed in RGB or CMYK colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Default for Colour {
    fn default() -> Self {
        colours::BLACK
    }
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Parse a `#RRGGBB` (or shorthand `#RGB`) string into an RGB colour
    pub fn from_hex(hex: &str) -> Result<Colour, LayoutError> {
        let (r, g, b) = hex_to_rgb(hex)?;
        Ok(Colour::new_rgb_bytes(r, g, b))
    }
}

/// Convert a `#RRGGBB` or `#RGB` string into its red, green and blue bytes.
/// The leading `#` is optional.
pub fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8), LayoutError> {
    let invalid = || LayoutError::InvalidColour(hex.to_string());
    let digits = hex.trim().trim_start_matches('#');
    if !digits.is_ascii() {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match digits.len() {
        6 => Ok((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            // #abc is shorthand for #aabbcc
            let r = channel(&digits[0..1])?;
            let g = channel(&digits[1..2])?;
            let b = channel(&digits[2..3])?;
            Ok((r * 17, g * 17, b * 17))
        }
        _ => Err(invalid()),
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    pub const RED: Colour = Colour::RGB {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const GREEN: Colour = Colour::RGB {
        r: 0.0,
        g: 1.0,
        b: 0.0,
    };
    pub const BLUE: Colour = Colour::RGB {
        r: 0.0,
        g: 0.0,
        b: 1.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(hex_to_rgb("#ff8000").unwrap(), (255, 128, 0));
        assert_eq!(hex_to_rgb("00FF10").unwrap(), (0, 255, 16));
        assert_eq!(hex_to_rgb("#fa0").unwrap(), (255, 170, 0));
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#12", "#12345", "#gg0000", "#ffffffff", "#ü12"] {
            assert!(
                matches!(hex_to_rgb(bad), Err(LayoutError::InvalidColour(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn hex_colour_is_rgb() {
        assert_eq!(
            Colour::from_hex("#ffffff").unwrap(),
            Colour::RGB {
                r: 1.0,
                g: 1.0,
                b: 1.0
            }
        );
    }
}
