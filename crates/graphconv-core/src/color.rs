//! Color values.
//!
//! Colors are carried through the model as a plain [`Rgb`] triple. Parsing of
//! the many CSS notations is delegated to `csscolorparser`; formatting only
//! happens where a document is serialized.

use std::fmt;
use std::str::FromStr;

use graphconv_error::{Error, Result};

use crate::scalar::Scalar;

/// An opaque (r, g, b) color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels in `r`, `g`, `b` order, named as they appear on the wire.
    pub fn channels(&self) -> [(&'static str, u8); 3] {
        [("r", self.r), ("g", self.g), ("b", self.b)]
    }

    /// Assemble a color from three scalar channels (GraphML `data`, GEXF
    /// `viz:color`). Channels are rounded and clamped to 0..=255.
    pub fn from_channels(r: &Scalar, g: &Scalar, b: &Scalar) -> Result<Self> {
        Ok(Self {
            r: channel("r", r)?,
            g: channel("g", g)?,
            b: channel("b", b)?,
        })
    }
}

fn channel(name: &'static str, value: &Scalar) -> Result<u8> {
    let n = value
        .as_number()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::invalid_value(name, "a color channel between 0 and 255"))?;
    Ok(n.round().clamp(0.0, 255.0) as u8)
}

/// Parse `#rgb`, `#rrggbb`, `rgb(...)`, `hsl(...)` or a named color.
/// Alpha is discarded.
pub fn parse_color(input: &str) -> Result<Rgb> {
    let color = csscolorparser::parse(input.trim())
        .map_err(|err| Error::invalid_color(input).set_source(err))?;
    let [r, g, b, _] = color.to_rgba8();
    Ok(Rgb { r, g, b })
}

/// Format as `rgb(r, g, b)`.
pub fn format_rgb(rgb: Rgb) -> String {
    format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b)
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_rgb(*self))
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_color(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphconv_error::ErrorKind;

    #[test]
    fn test_parse_notations() {
        assert_eq!(parse_color("#ff0000").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(parse_color("#0f0").unwrap(), Rgb::new(0, 255, 0));
        assert_eq!(parse_color("rgb(1, 2, 3)").unwrap(), Rgb::new(1, 2, 3));
        assert_eq!(parse_color("blue").unwrap(), Rgb::new(0, 0, 255));
        assert_eq!(parse_color("  #00ff00 ").unwrap(), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse_color("not-a-color").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidColor);
        assert!(err.source_ref().is_some());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_rgb(Rgb::new(255, 0, 0)), "rgb(255, 0, 0)");
        assert_eq!(Rgb::new(0, 255, 0).to_string(), "rgb(0, 255, 0)");
        let back: Rgb = "rgb(0, 255, 0)".parse().unwrap();
        assert_eq!(back, Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_from_channels() {
        let rgb = Rgb::from_channels(
            &Scalar::Number(12.4),
            &Scalar::String("300".into()),
            &Scalar::Number(-1.0),
        )
        .unwrap();
        assert_eq!(rgb, Rgb::new(12, 255, 0));

        let err = Rgb::from_channels(
            &Scalar::Boolean(true),
            &Scalar::Number(0.0),
            &Scalar::Number(0.0),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }
}
