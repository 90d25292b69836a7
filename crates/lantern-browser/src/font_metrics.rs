//! Font metrics backed by fontdue for accurate text measurement during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use std::cell::RefCell;
use std::collections::HashMap;

use fontdue::{Font, FontSettings};
use lantern_common::warning::warn_once;
use lantern_css::{ApproximateFontMetrics, FontDescriptor, FontMetrics, FontSlant, FontWeight};

/// Common system font paths to search, per face.
const REGULAR_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BOLD_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const ITALIC_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

const BOLD_ITALIC_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

type FaceKey = (FontWeight, FontSlant);

/// Vertical metrics of one face at one size.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SizedMetrics {
    ascent: f32,
    descent: f32,
}

/// Session font cache.
///
/// Faces are loaded once, when the cache is created. Vertical metrics are
/// memoized per (size, weight, slant) on first use and never invalidated,
/// so repeated layouts of the same page measure identically.
///
/// When a face is missing the closest loaded face stands in. With no faces
/// at all, every measurement falls back to [`ApproximateFontMetrics`].
pub struct FontCache {
    faces: HashMap<FaceKey, Font>,
    sized: RefCell<HashMap<(u32, FontWeight, FontSlant), SizedMetrics>>,
}

impl FontCache {
    /// Load whichever system faces can be found.
    #[must_use]
    pub fn load_system() -> Self {
        let mut faces = HashMap::new();
        let sets = [
            ((FontWeight::Normal, FontSlant::Roman), REGULAR_PATHS),
            ((FontWeight::Bold, FontSlant::Roman), BOLD_PATHS),
            ((FontWeight::Normal, FontSlant::Italic), ITALIC_PATHS),
            ((FontWeight::Bold, FontSlant::Italic), BOLD_ITALIC_PATHS),
        ];
        for (key, paths) in sets {
            if let Some(font) = load_font_from_paths(paths) {
                let _ = faces.insert(key, font);
            }
        }
        if faces.is_empty() {
            warn_once("Layout", "no system font found, using approximate metrics");
        }
        Self::from_faces(faces)
    }

    /// A cache with no faces. Every measurement is approximate.
    #[must_use]
    pub fn approximate() -> Self {
        Self::from_faces(HashMap::new())
    }

    fn from_faces(faces: HashMap<FaceKey, Font>) -> Self {
        Self {
            faces,
            sized: RefCell::new(HashMap::new()),
        }
    }

    /// Number of faces that were loaded.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The loaded face for `font`, falling back to the regular weight, then
    /// to the upright slant, then to the regular face.
    fn face(&self, font: &FontDescriptor) -> Option<&Font> {
        [
            (font.weight, font.slant),
            (FontWeight::Normal, font.slant),
            (font.weight, FontSlant::Roman),
            (FontWeight::Normal, FontSlant::Roman),
        ]
        .iter()
        .find_map(|key| self.faces.get(key))
    }

    fn sized_metrics(&self, font: &FontDescriptor) -> SizedMetrics {
        let key = font.cache_key();
        if let Some(cached) = self.sized.borrow().get(&key) {
            return *cached;
        }

        // fontdue reports descent as a negative offset from the baseline.
        let metrics = self
            .face(font)
            .and_then(|face| face.horizontal_line_metrics(font.size))
            .map_or_else(
                || SizedMetrics {
                    ascent: ApproximateFontMetrics.ascent(font),
                    descent: ApproximateFontMetrics.descent(font),
                },
                |line| SizedMetrics {
                    ascent: line.ascent,
                    descent: -line.descent,
                },
            );
        let _ = self.sized.borrow_mut().insert(key, metrics);
        metrics
    }
}

impl FontMetrics for FontCache {
    fn text_width(&self, text: &str, font: &FontDescriptor) -> f32 {
        let Some(face) = self.face(font) else {
            return ApproximateFontMetrics.text_width(text, font);
        };
        // Uses Font::metrics() instead of Font::rasterize() to avoid
        // generating bitmaps when only measurements are needed.
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, font.size).advance_width)
            .sum()
    }

    fn ascent(&self, font: &FontDescriptor) -> f32 {
        self.sized_metrics(font).ascent
    }

    fn descent(&self, font: &FontDescriptor) -> f32 {
        self.sized_metrics(font).descent
    }
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths(paths: &[&str]) -> Option<Font> {
    paths.iter().find_map(|path| {
        let data = std::fs::read(path).ok()?;
        Font::from_bytes(data, FontSettings::default()).ok()
    })
}
