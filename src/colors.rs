//! Foreground/background contrast selection.
//!
//! Brightness is the YIQ luma of a hex color,
//! `(r * 299 + g * 587 + b * 114) / 1000`, compared against
//! [`YIQ_CONTRAST_THRESHOLD`]. Nothing here fails: malformed channels score
//! NaN and classify as dark.
//!
//! ```rust
//! use helper_kit::colors::{high_contrast_content_on_background_color, ContentCandidates};
//!
//! let text = ContentCandidates { dark: "black", light: "white" };
//! assert_eq!(high_contrast_content_on_background_color("#17daa9", text), "white");
//! assert_eq!(high_contrast_content_on_background_color("#ffefc", text), "black");
//! ```

/// Scores at or above this are light backgrounds.
pub const YIQ_CONTRAST_THRESHOLD: f64 = 180.0;

/// Whether a color is closer to white or to black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrightnessDirection {
    /// Closer to white; pair with dark content.
    Light,
    /// Closer to black; pair with light content.
    Dark,
}

/// One foreground candidate for each kind of background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentCandidates<T> {
    /// Content that reads well on light backgrounds.
    pub dark: T,
    /// Content that reads well on dark backgrounds.
    pub light: T,
}

/// Pick the candidate that contrasts with `background_color`.
pub fn high_contrast_content_on_background_color<T>(
    background_color: &str,
    candidates: ContentCandidates<T>,
) -> T {
    match color_brightness_direction(background_color) {
        BrightnessDirection::Dark => candidates.light,
        BrightnessDirection::Light => candidates.dark,
    }
}

/// Classify a hex color (any length, optional `#`) by its YIQ score.
pub fn color_brightness_direction(hex_color: &str) -> BrightnessDirection {
    // NaN compares false and lands on Dark.
    if yiq_contrast_score(&normalize_hex_color(hex_color)) >= YIQ_CONTRAST_THRESHOLD {
        BrightnessDirection::Light
    } else {
        BrightnessDirection::Dark
    }
}

/// YIQ score of a normalized `RRGGBB` string.
///
/// Each channel reads the leading hex digits of its two characters; a
/// channel with none is NaN, and so is the score.
pub fn yiq_contrast_score(hex_color: &str) -> f64 {
    let chars: Vec<char> = hex_color.chars().collect();
    let channel = |start: usize| -> f64 {
        let end = (start + 2).min(chars.len());
        let digits = chars.get(start..end).unwrap_or_default();
        digits
            .iter()
            .map_while(|c| c.to_digit(16))
            .fold(None, |acc: Option<f64>, digit| Some(acc.unwrap_or(0.0) * 16.0 + f64::from(digit)))
            .unwrap_or(f64::NAN)
    };

    (channel(0) * 299.0 + channel(2) * 587.0 + channel(4) * 114.0) / 1000.0
}

/// Normalize any hex color string to six characters, without `#`.
///
/// | input | output |
/// |---|---|
/// | `f1f1f1f` | `f1f1f1` |
/// | `f1f1f1` | `f1f1f1` |
/// | `f1f1f` | `f1f1f0` |
/// | `f1f` | `ff11ff` |
/// | `f1` | `ff1100` |
/// | `f` | `ff0000` |
/// | `` | `000000` |
/// | `#ffffff` | `ffffff` |
///
/// Characters are not validated.
pub fn normalize_hex_color(color: &str) -> String {
    let color = color.strip_prefix('#').unwrap_or(color);
    let len = color.chars().count();

    let mut normalized: String = match len {
        0 => return String::from("000000"),
        1..=3 => color.chars().flat_map(|c| [c, c]).collect(),
        _ => color.chars().take(6).collect(),
    };
    while normalized.chars().count() < 6 {
        normalized.push('0');
    }
    normalized
}
