use once_cell::sync::Lazy;
use regex::Regex;

pub const PLACEHOLDER_HEX: &str = "#cccccc";
pub const TEXT_BLACK: &str = "#000000";
pub const TEXT_WHITE: &str = "#ffffff";

const LUMINANCE_THRESHOLD: f64 = 0.179;

static HEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));

pub const PENLIGHT_COLORS: &[(&str, &str)] = &[
    ("白", "#FFFFFF"),
    ("オレンジ", "#FF8C00"),
    ("青", "#0000FF"),
    ("黄", "#FFD700"),
    ("紫", "#800080"),
    ("緑", "#008000"),
    ("ピンク", "#FF69B4"),
    ("赤", "#FF0000"),
    ("水色", "#87CEEB"),
    ("黄緑", "#ADFF2F"),
    ("ターコイズ", "#40E0D0"),
    ("黒", "#000000"),
];

/// Order in which the official penlight steps through its colors.
pub const COLOR_CYCLE: &[&str] = &[
    "白",
    "オレンジ",
    "青",
    "黄",
    "紫",
    "緑",
    "ピンク",
    "赤",
    "水色",
    "黄緑",
    "ターコイズ",
];

pub fn resolve_color(name: &str) -> Option<&'static str> {
    PENLIGHT_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, hex)| *hex)
}

pub fn is_valid_hex(code: &str) -> bool {
    HEX_RE.is_match(code)
}

fn channel(hex: &str, start: usize) -> f64 {
    u8::from_str_radix(&hex[start..start + 2], 16).unwrap_or(0) as f64 / 255.0
}

fn to_linear(c: f64) -> f64 {
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a validated `#RRGGBB` code.
fn luminance(hex: &str) -> f64 {
    let r = to_linear(channel(hex, 1));
    let g = to_linear(channel(hex, 3));
    let b = to_linear(channel(hex, 5));
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Text color that stays legible on `bg`. Anything that is not a strict
/// `#RRGGBB` code gets black.
pub fn contrast_text_color(bg: &str) -> &'static str {
    if !is_valid_hex(bg) {
        return TEXT_BLACK;
    }
    if luminance(bg) > LUMINANCE_THRESHOLD {
        TEXT_BLACK
    } else {
        TEXT_WHITE
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Swatch {
    pub name: String,
    pub background: String,
    pub text: String,
    pub recognized: bool,
}

impl Swatch {
    pub fn for_name(name: &str) -> Self {
        match resolve_color(name).filter(|hex| is_valid_hex(hex)) {
            Some(hex) => Self {
                name: name.to_string(),
                background: hex.to_string(),
                text: contrast_text_color(hex).to_string(),
                recognized: true,
            },
            None => Self {
                name: name.to_string(),
                background: PLACEHOLDER_HEX.to_string(),
                text: TEXT_BLACK.to_string(),
                recognized: false,
            },
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        parse_rgb(&self.background).unwrap_or((0xcc, 0xcc, 0xcc))
    }

    pub fn text_rgb(&self) -> (u8, u8, u8) {
        parse_rgb(&self.text).unwrap_or((0, 0, 0))
    }
}

pub fn parse_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    if !is_valid_hex(hex) {
        return None;
    }
    let part = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((part(1)?, part(3)?, part(5)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_names_only() {
        assert_eq!(resolve_color("紫"), Some("#800080"));
        assert_eq!(resolve_color("金"), None);
        assert_eq!(resolve_color(""), None);
    }

    #[test]
    fn hex_validation_is_strict() {
        assert!(is_valid_hex("#ffFF00"));
        assert!(!is_valid_hex("ffff00"));
        assert!(!is_valid_hex("#fff"));
        assert!(!is_valid_hex("#ffff001"));
        assert!(!is_valid_hex("#gggggg"));
    }

    #[test]
    fn contrast_matches_luminance_formula() {
        assert_eq!(contrast_text_color("#FFFFFF"), "#000000");
        assert_eq!(contrast_text_color("#000000"), "#ffffff");
        // 0.2126 for pure red sits above the threshold.
        assert_eq!(contrast_text_color("#FF0000"), "#000000");
        assert_eq!(contrast_text_color("#0000FF"), "#ffffff");
        assert_eq!(contrast_text_color("#800080"), "#ffffff");
        assert_eq!(contrast_text_color("#FFD700"), "#000000");
    }

    #[test]
    fn invalid_background_gets_black_text() {
        assert_eq!(contrast_text_color("purple"), "#000000");
        assert_eq!(contrast_text_color("#12345"), "#000000");
    }

    #[test]
    fn unknown_color_falls_back_to_placeholder() {
        let s = Swatch::for_name("金");
        assert!(!s.recognized);
        assert_eq!(s.background, PLACEHOLDER_HEX);
        assert_eq!(s.text, TEXT_BLACK);
        assert_eq!(s.rgb(), (0xcc, 0xcc, 0xcc));
    }

    #[test]
    fn cycle_names_are_all_in_palette() {
        for name in COLOR_CYCLE {
            assert!(resolve_color(name).is_some(), "{name} missing");
        }
    }
}
