//! Resolving margin values to pixels.
//!
//! [§ 6 Margins](https://www.w3.org/TR/css-box-3/#margins)

use lantern_common::warning::warn_once;
use lantern_dom::PropertyMap;

use super::box_model::EdgeSizes;
use crate::cascade::DEFAULT_FONT_SIZE_PX;

/// Longhand margin properties in CSS edge order.
const MARGIN_LONGHANDS: [&str; 4] = ["margin-top", "margin-right", "margin-bottom", "margin-left"];

/// [§ 5.1.2 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
///
/// Resolve one length to pixels. `font_size` is the node's own computed
/// font size, used for `em`.
///
/// - `px` gives the number
/// - `em` multiplies the node font size, `rem` the default font size
/// - `auto` and `0` give zero
/// - percentages and anything else give zero with a warning
#[must_use]
pub fn resolve_length(value: &str, font_size: f32) -> f32 {
    let value = value.trim();
    if value == "auto" {
        return 0.0;
    }

    let (number, factor) = if let Some(px) = value.strip_suffix("px") {
        (px, 1.0)
    } else if let Some(rem) = value.strip_suffix("rem") {
        (rem, DEFAULT_FONT_SIZE_PX as f32)
    } else if let Some(em) = value.strip_suffix("em") {
        (em, font_size)
    } else if value.ends_with('%') {
        // Percentages need the containing block width, which margins here
        // never see.
        warn_once("Layout", &format!("percentage margin '{value}' treated as 0"));
        return 0.0;
    } else {
        (value, 0.0)
    };

    let Ok(parsed) = number.trim().parse::<f32>() else {
        warn_once("Layout", &format!("cannot resolve length '{value}', using 0"));
        return 0.0;
    };
    if factor == 0.0 && parsed != 0.0 {
        warn_once("Layout", &format!("unitless length '{value}' treated as 0"));
    }
    parsed * factor
}

/// [§ 6.2 'margin' shorthand](https://www.w3.org/TR/css-box-3/#margin-shorthand)
///
/// "If there is only one component value, it applies to all sides. If there
/// are two values, the top and bottom margins are set to the first value
/// and the right and left margins are set to the second. If there are three
/// values, the top is set to the first value, the left and right are set to
/// the second, and the bottom is set to the third. If there are four values
/// they apply to the top, right, bottom, and left, respectively."
///
/// Returns the four raw components, or `None` for zero or more than four.
#[must_use]
pub fn expand_margin_shorthand(value: &str) -> Option<[&str; 4]> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [all] => Some([all, all, all, all]),
        [vertical, horizontal] => Some([vertical, horizontal, vertical, horizontal]),
        [top, horizontal, bottom] => Some([top, horizontal, bottom, horizontal]),
        [top, right, bottom, left] => Some([top, right, bottom, left]),
        _ => None,
    }
}

/// Resolve the margin of a node from its computed style.
///
/// Longhands override the matching component of the shorthand.
#[must_use]
pub fn resolve_margins(style: Option<&PropertyMap>, font_size: f32) -> EdgeSizes {
    let Some(style) = style else {
        return EdgeSizes::default();
    };

    let mut raw: [Option<&str>; 4] = [None; 4];
    if let Some(shorthand) = style.get("margin") {
        match expand_margin_shorthand(shorthand) {
            Some(parts) => raw = parts.map(Some),
            None => warn_once("Layout", &format!("invalid margin shorthand '{shorthand}'")),
        }
    }
    for (slot, longhand) in raw.iter_mut().zip(MARGIN_LONGHANDS) {
        if let Some(value) = style.get(longhand) {
            *slot = Some(value.as_str());
        }
    }

    let [top, right, bottom, left] =
        raw.map(|value| value.map_or(0.0, |v| resolve_length(v, font_size)));
    EdgeSizes::new(top, right, bottom, left)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_length_units() {
        assert!((resolve_length("12px", 16.0) - 12.0).abs() < 1e-4);
        assert!((resolve_length("1.5em", 20.0) - 30.0).abs() < 1e-4);
        assert!((resolve_length("2rem", 20.0) - 32.0).abs() < 1e-4);
        assert!(resolve_length("auto", 16.0).abs() < f32::EPSILON);
        assert!(resolve_length("0", 16.0).abs() < f32::EPSILON);
        assert!(resolve_length("10%", 16.0).abs() < f32::EPSILON);
        assert!(resolve_length("3vw", 16.0).abs() < f32::EPSILON);
        assert!(resolve_length("7", 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_negative_lengths() {
        assert!((resolve_length("-4px", 16.0) + 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_shorthand_expansion() {
        assert_eq!(expand_margin_shorthand("1px"), Some(["1px"; 4]));
        assert_eq!(
            expand_margin_shorthand("1px 2px"),
            Some(["1px", "2px", "1px", "2px"])
        );
        assert_eq!(
            expand_margin_shorthand("1px 2px 3px"),
            Some(["1px", "2px", "3px", "2px"])
        );
        assert_eq!(
            expand_margin_shorthand("1px 2px 3px 4px"),
            Some(["1px", "2px", "3px", "4px"])
        );
        assert_eq!(expand_margin_shorthand(""), None);
        assert_eq!(expand_margin_shorthand("1px 2px 3px 4px 5px"), None);
    }

    #[test]
    fn test_longhand_overrides_shorthand() {
        let margins = resolve_margins(
            Some(&style(&[("margin", "10px 20px"), ("margin-left", "5px")])),
            16.0,
        );
        assert_eq!(margins, EdgeSizes::new(10.0, 20.0, 10.0, 5.0));
    }

    #[test]
    fn test_em_margins_use_node_font_size() {
        let margins = resolve_margins(Some(&style(&[("margin", "1em 0")])), 24.0);
        assert_eq!(margins, EdgeSizes::new(24.0, 0.0, 24.0, 0.0));
    }

    #[test]
    fn test_no_style_means_no_margin() {
        assert_eq!(resolve_margins(None, 16.0), EdgeSizes::default());
    }
}
