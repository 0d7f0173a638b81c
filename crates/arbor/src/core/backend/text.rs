//! Font descriptions and the text measurement collaborator.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// A font request. How it maps onto concrete faces is up to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontDescription {
    /// Family name.
    pub family: String,
    /// Size in device-independent pixels.
    pub size: f64,
    /// Weight.
    pub weight: FontWeight,
    /// Italic style.
    pub italic: bool,
}

impl FontDescription {
    /// A regular font of the given family and size.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            weight: FontWeight::Normal,
            italic: false,
        }
    }

    /// This font in bold.
    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }
}

impl Default for FontDescription {
    fn default() -> Self {
        Self::new("Sans", 12.0)
    }
}

/// Metrics for a single line of measured text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    /// Advance width of the line.
    pub width: f64,
    /// Height of the line box.
    pub height: f64,
}

/// The extent of a measured string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextMetrics {
    /// Width of the widest line.
    pub width: f64,
    /// Total height of all lines.
    pub height: f64,
    /// Distance from the top of the first line to its baseline.
    pub baseline: f64,
    /// Per-line metrics, when the provider reports them.
    pub lines: Vec<LineMetrics>,
}

/// Measures strings for layout. Implemented by the platform's text stack.
pub trait TextMeasure {
    /// Measure `text` set in `font`.
    fn measure(&self, font: &FontDescription, text: &str) -> TextMetrics;
}

/// A text measurer for fixed-pitch rendering. Each terminal column of a
/// line is one cell wide, so wide glyphs count double.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Cell advance as a fraction of the font size, or an absolute width
    /// when `fixed` is set.
    advance: f64,
    /// Line height as a fraction of the font size, or an absolute height
    /// when `fixed` is set.
    line_height: f64,
    /// Ignore the font size and use absolute cell dimensions.
    fixed: bool,
}

impl MonospaceMetrics {
    /// Metrics proportional to the requested font size.
    pub fn new() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
            fixed: false,
        }
    }

    /// Metrics with absolute cell dimensions, regardless of font size.
    pub fn cell(width: f64, height: f64) -> Self {
        Self {
            advance: width,
            line_height: height,
            fixed: true,
        }
    }

    fn cell_size(&self, font: &FontDescription) -> (f64, f64) {
        if self.fixed {
            (self.advance, self.line_height)
        } else {
            (self.advance * font.size, self.line_height * font.size)
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for MonospaceMetrics {
    fn measure(&self, font: &FontDescription, text: &str) -> TextMetrics {
        if text.is_empty() {
            return TextMetrics::default();
        }
        let (cw, ch) = self.cell_size(font);
        let lines: Vec<LineMetrics> = text
            .split('\n')
            .map(|l| LineMetrics {
                width: l.width() as f64 * cw,
                height: ch,
            })
            .collect();
        TextMetrics {
            width: lines.iter().map(|l| l.width).fold(0.0, f64::max),
            height: lines.iter().map(|l| l.height).sum(),
            baseline: ch * 0.8,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_glyphs_take_two_cells() {
        let m = MonospaceMetrics::cell(1.0, 2.0);
        let font = FontDescription::default();
        assert_eq!(m.measure(&font, "ab").width, 2.0);
        assert_eq!(m.measure(&font, "日本").width, 4.0);
    }

    #[test]
    fn multiline() {
        let m = MonospaceMetrics::new();
        let font = FontDescription::new("Mono", 10.0);
        let t = m.measure(&font, "abc\na");
        assert_eq!(t.lines.len(), 2);
        assert!((t.width - 18.0).abs() < 1e-9);
        assert!((t.height - 24.0).abs() < 1e-9);
        assert_eq!(m.measure(&font, ""), TextMetrics::default());
    }
}
