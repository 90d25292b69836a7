//! Fonts and text measurement for inline layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use std::fmt;

use lantern_common::warning::warn_once;
use lantern_dom::PropertyMap;
use serde::Serialize;

use crate::cascade::DEFAULT_FONT_SIZE_PX;

/// [§ 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// `bold`, `bolder`, or a numeric weight of 600 or more.
    Bold,
}

/// [§ 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum FontSlant {
    /// Upright glyphs.
    #[default]
    Roman,
    /// `italic` or `oblique`.
    Italic,
}

/// Everything needed to pick and measure a font.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontDescriptor {
    /// Font size in pixels.
    pub size: f32,
    /// Weight class.
    pub weight: FontWeight,
    /// Slant.
    pub slant: FontSlant,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            size: DEFAULT_FONT_SIZE_PX as f32,
            weight: FontWeight::Normal,
            slant: FontSlant::Roman,
        }
    }
}

impl FontDescriptor {
    /// Read the font from a computed style.
    ///
    /// Every node carries the inherited font properties once the cascade
    /// has run. A missing or unreadable one is reported and replaced by
    /// its default.
    #[must_use]
    pub fn from_style(style: Option<&PropertyMap>) -> Self {
        let lookup = |property: &str| {
            let value = style.and_then(|s| s.get(property)).map(String::as_str);
            if value.is_none() {
                warn_once(
                    "Layout",
                    &format!("node has no computed '{property}', using the default"),
                );
            }
            value
        };

        let size = lookup("font-size")
            .and_then(|v| v.strip_suffix("px"))
            .and_then(|px| px.trim().parse::<f32>().ok())
            .unwrap_or(DEFAULT_FONT_SIZE_PX as f32);

        let weight = match lookup("font-weight") {
            Some("bold" | "bolder") => FontWeight::Bold,
            Some(numeric) if numeric.parse::<u16>().is_ok_and(|w| w >= 600) => FontWeight::Bold,
            _ => FontWeight::Normal,
        };

        let slant = match lookup("font-style") {
            Some("italic" | "oblique") => FontSlant::Italic,
            _ => FontSlant::Roman,
        };

        Self {
            size,
            weight,
            slant,
        }
    }

    /// Hashable identity of the font: size bits, weight and slant.
    #[must_use]
    pub const fn cache_key(&self) -> (u32, FontWeight, FontSlant) {
        (self.size.to_bits(), self.weight, self.slant)
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.size)?;
        if self.weight == FontWeight::Bold {
            write!(f, " bold")?;
        }
        if self.slant == FontSlant::Italic {
            write!(f, " italic")?;
        }
        Ok(())
    }
}

/// Font metrics interface for text measurement during layout.
///
/// Implementors must be referentially transparent: the same text and font
/// always measure the same, so laying out a tree twice gives identical
/// geometry.
pub trait FontMetrics {
    /// Total advance width of `text` in `font`.
    fn text_width(&self, text: &str, font: &FontDescriptor) -> f32;

    /// Height above the baseline.
    fn ascent(&self, font: &FontDescriptor) -> f32;

    /// Depth below the baseline, as a positive number.
    fn descent(&self, font: &FontDescriptor) -> f32;

    /// Distance between consecutive baselines without leading.
    fn linespace(&self, font: &FontDescriptor) -> f32 {
        self.ascent(font) + self.descent(font)
    }

    /// Width of one space, the gap between adjacent words.
    fn space_width(&self, font: &FontDescriptor) -> f32 {
        self.text_width(" ", font)
    }
}

/// Approximate font metrics using fixed ratios.
///
/// Implementation note: Without access to actual font data, we use fixed
/// ratio approximations. The average advance width of Latin glyphs in a
/// proportional font is approximately 0.6× the font size. Ascent and
/// descent split the em box 0.8 / 0.2.
///
/// This is used as a fallback when no font is available, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl ApproximateFontMetrics {
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const ASCENT_RATIO: f32 = 0.8;
    const DESCENT_RATIO: f32 = 0.2;
}

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, font: &FontDescriptor) -> f32 {
        text.chars().count() as f32 * font.size * Self::CHAR_WIDTH_RATIO
    }

    fn ascent(&self, font: &FontDescriptor) -> f32 {
        font.size * Self::ASCENT_RATIO
    }

    fn descent(&self, font: &FontDescriptor) -> f32 {
        font.size * Self::DESCENT_RATIO
    }
}
