//! Cell presentation applied to appended rows.
//!
//! A [`StyleSpec`] is a batch-level setting: every cell of every row written
//! in one append call gets the same background, foreground and font. The
//! serialized [`StyledCell`] matches the remote grid's batch-update cell
//! shape so transports can forward it unchanged.

use serde::{Deserialize, Serialize};

use super::value::CellValue;

pub const DEFAULT_FONT: &str = "Arial";

/// An opaque 8-bit RGB color.
///
/// Decodes from a `[r, g, b]` or `[r, g, b, a]` array; alpha is accepted for
/// compatibility and dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "[u8; 3]")]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Rgb {
        Rgb { red, green, blue }
    }

    /// Channels scaled into `[0, 1]`.
    pub fn normalized(&self) -> RgbColor {
        RgbColor {
            red: f64::from(self.red) / 255.0,
            green: f64::from(self.green) / 255.0,
            blue: f64::from(self.blue) / 255.0,
        }
    }
}

impl TryFrom<Vec<u8>> for Rgb {
    type Error = String;

    fn try_from(channels: Vec<u8>) -> Result<Self, Self::Error> {
        match channels.as_slice() {
            [r, g, b] | [r, g, b, _] => Ok(Rgb::new(*r, *g, *b)),
            other => Err(format!(
                "expected 3 or 4 color channels, got {}",
                other.len()
            )),
        }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.red, c.green, c.blue]
    }
}

/// Presentation applied uniformly to an appended batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSpec {
    pub background: Rgb,
    pub foreground: Rgb,
    pub font: String,
}

impl Default for StyleSpec {
    fn default() -> Self {
        StyleSpec {
            background: Rgb::WHITE,
            foreground: Rgb::BLACK,
            font: DEFAULT_FONT.to_string(),
        }
    }
}

impl StyleSpec {
    /// Apply per-request overrides; anything not overridden is kept.
    pub fn with_overrides(&self, overrides: &StyleOverrides) -> StyleSpec {
        StyleSpec {
            background: overrides.bgrgb.unwrap_or(self.background),
            foreground: overrides.fgrgb.unwrap_or(self.foreground),
            font: overrides.font.clone().unwrap_or_else(|| self.font.clone()),
        }
    }

    pub fn cell_format(&self) -> CellFormat {
        CellFormat {
            background_color_style: ColorStyle {
                rgb_color: self.background.normalized(),
            },
            vertical_alignment: VerticalAlignment::Middle,
            horizontal_alignment: HorizontalAlignment::Center,
            text_format: TextFormat {
                font_family: self.font.clone(),
                foreground_color_style: ColorStyle {
                    rgb_color: self.foreground.normalized(),
                },
            },
        }
    }
}

/// Optional style fields as they arrive with an append request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgrgb: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fgrgb: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorStyle {
    pub rgb_color: RgbColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerticalAlignment {
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormat {
    pub font_family: String,
    pub foreground_color_style: ColorStyle,
}

/// The `userEnteredFormat` payload of a styled cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    pub background_color_style: ColorStyle,
    pub vertical_alignment: VerticalAlignment,
    pub horizontal_alignment: HorizontalAlignment,
    pub text_format: TextFormat,
}

/// The `userEnteredValue` payload: exactly one typed field is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtendedValue {
    StringValue(String),
    NumberValue(f64),
    BoolValue(bool),
}

impl From<CellValue> for ExtendedValue {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Text(s) => ExtendedValue::StringValue(s),
            CellValue::Number(n) => ExtendedValue::NumberValue(n),
            CellValue::Bool(b) => ExtendedValue::BoolValue(b),
        }
    }
}

impl From<ExtendedValue> for CellValue {
    fn from(value: ExtendedValue) -> Self {
        match value {
            ExtendedValue::StringValue(s) => CellValue::Text(s),
            ExtendedValue::NumberValue(n) => CellValue::Number(n),
            ExtendedValue::BoolValue(b) => CellValue::Bool(b),
        }
    }
}

/// A scalar paired with its presentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledCell {
    pub user_entered_value: ExtendedValue,
    pub user_entered_format: CellFormat,
}

impl StyledCell {
    pub fn new(value: CellValue, format: CellFormat) -> StyledCell {
        StyledCell {
            user_entered_value: value.into(),
            user_entered_format: format,
        }
    }

    /// The plain scalar, without presentation.
    pub fn value(&self) -> CellValue {
        self.user_entered_value.clone().into()
    }
}

/// One appended row in batch-update form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyledRow {
    pub values: Vec<StyledCell>,
}
