// Conversions between model colors/fonts and egui's

use diagram::Rgb;
use eframe::egui::{Color32, FontFamily};

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

pub fn from_color32(color: Color32) -> Rgb {
    Rgb(color.r(), color.g(), color.b())
}

/// Picks the egui family closest to a CSS font-family list. egui only
/// ships a proportional and a monospace face.
pub fn font_family(css: &str) -> FontFamily {
    let lower = css.to_ascii_lowercase();
    if lower.contains("mono")
        || (lower.contains("code") && !lower.contains("sans"))
    {
        FontFamily::Monospace
    } else {
        FontFamily::Proportional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_survives_color32() {
        let rgb = Rgb(0x12, 0x34, 0x56);
        assert_eq!(from_color32(to_color32(rgb)), rgb);
        assert_eq!(to_color32(Rgb::WHITE), Color32::WHITE);
    }

    #[test]
    fn test_font_family_mapping() {
        assert_eq!(
            font_family(diagram::style::DEFAULT_FONT_FAMILY),
            FontFamily::Proportional
        );
        assert_eq!(font_family("'Fira Mono', monospace"), FontFamily::Monospace);
        assert_eq!(font_family("Source Code Pro"), FontFamily::Monospace);
        assert_eq!(font_family("serif"), FontFamily::Proportional);
    }
}
