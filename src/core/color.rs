use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
///
/// Serialized as `#rrggbb` (opaque) or `#rrggbbaa` so threshold tables and
/// chart styles stay readable in JSON config files. Serialization keeps 8 bits
/// per channel: a color survives a JSON round trip unchanged only when it
/// equals its [`Color::quantized`] form, as every `rgb8`/`from_hex` color does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds an opaque color from 8-bit channels.
    #[must_use]
    pub fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(input: &str) -> ChartResult<Self> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        let invalid = || ChartError::InvalidData(format!("invalid hex color `{input}`"));
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| -> ChartResult<u8> {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        let short = |index: usize| -> ChartResult<u8> {
            let nibble = u8::from_str_radix(&digits[index..=index], 16).map_err(|_| invalid())?;
            Ok(nibble * 17)
        };

        let (red, green, blue, alpha) = match digits.len() {
            3 => (short(0)?, short(1)?, short(2)?, 255),
            6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?, 255),
            8 => (
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            ),
            _ => return Err(invalid()),
        };

        Ok(Self::rgb8(red, green, blue).with_alpha(f64::from(alpha) / 255.0))
    }

    /// Snaps every channel to the nearest 8-bit step, matching what
    /// [`Color::to_hex`] writes.
    #[must_use]
    pub fn quantized(self) -> Self {
        let snap = |value: f64| f64::from(channel_byte(value)) / 255.0;
        Self::rgba(
            snap(self.red),
            snap(self.green),
            snap(self.blue),
            snap(self.alpha),
        )
    }

    /// Formats as `#rrggbb`, appending alpha only when the color is translucent.
    #[must_use]
    pub fn to_hex(self) -> String {
        let alpha = channel_byte(self.alpha);
        if alpha == 255 {
            format!(
                "#{:02x}{:02x}{:02x}",
                channel_byte(self.red),
                channel_byte(self.green),
                channel_byte(self.blue)
            )
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                channel_byte(self.red),
                channel_byte(self.green),
                channel_byte(self.blue),
                alpha
            )
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

fn channel_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
