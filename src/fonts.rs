//! Text measurement for the two builtin fonts the report uses
//! (Helvetica and Helvetica-Bold).
//!
//! Widths come from the standard AFM metrics, in 1/1000 em, for printable
//! ASCII. Anything outside that range is measured as a digit-wide glyph,
//! which matches most accented Latin letters.

/// Helvetica advance widths for U+0020..=U+007E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold advance widths for U+0020..=U+007E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

const FALLBACK_WIDTH: u16 = 556;

/// Builtin-font metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontManager;

impl FontManager {
    pub fn new() -> Self {
        Self
    }

    fn glyph_width(ch: char, bold: bool) -> u16 {
        let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
        match ch as u32 {
            0x20..=0x7E => table[(ch as u32 - 0x20) as usize],
            _ => FALLBACK_WIDTH,
        }
    }

    /// Width of `text` at `font_size`, in points.
    pub fn measure_text_width(&self, text: &str, font_size: f32, bold: bool) -> f32 {
        let units: u32 = text.chars().map(|c| Self::glyph_width(c, bold) as u32).sum();
        units as f32 * font_size / 1000.0
    }
}

/// Word-wrap text to fit within `max_width` points. Returns a vec of lines.
///
/// A word wider than the line is broken between characters, so no text is
/// ever dropped.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    bold: bool,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in words
            .iter()
            .flat_map(|w| split_word(w, font_size, bold, max_width, fonts))
        {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            let w = fonts.measure_text_width(&candidate, font_size, bold);
            if w > max_width && !current_line.is_empty() {
                lines.push(current_line);
                current_line = word;
            } else {
                current_line = candidate;
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// `word` as pieces no wider than `max_width`, each holding at least one char.
fn split_word(
    word: &str,
    font_size: f32,
    bold: bool,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    if fonts.measure_text_width(word, font_size, bold) <= max_width {
        return vec![word.to_string()];
    }
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut used = 0.0;
    for ch in word.chars() {
        let w = fonts.measure_text_width(ch.encode_utf8(&mut [0; 4]), font_size, bold);
        if used + w > max_width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            used = 0.0;
        }
        used += w;
        piece.push(ch);
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn afm_text_width() {
        let mgr = FontManager::new();
        // H e l l o = 722 + 556 + 222 + 222 + 556 = 2278
        let w = mgr.measure_text_width("Hello", 10.0, false);
        assert!((w - 22.78).abs() < 0.01);
        assert!(mgr.measure_text_width("Hello", 10.0, true) > w);
    }

    #[test]
    fn non_ascii_uses_fallback() {
        let mgr = FontManager::new();
        let w = mgr.measure_text_width("é", 10.0, false);
        assert!((w - 5.56).abs() < 0.01);
    }

    #[test]
    fn word_wrap_basic() {
        let mgr = FontManager::new();
        let lines = wrap_text("Hello world foo bar", 16.0, false, 60.0, &mgr);
        assert!(lines.len() >= 2, "Expected wrapping, got {:?}", lines);
        assert_eq!(lines.join(" "), "Hello world foo bar");
    }

    #[test]
    fn long_word_is_broken_not_cut() {
        let mgr = FontManager::new();
        let stamp = "2024-06-01T10:00:00.500+02:00";
        let lines = wrap_text(stamp, 9.0, false, 60.0, &mgr);
        assert!(lines.len() > 1, "{lines:?}");
        assert_eq!(lines.concat(), stamp);
        assert!(lines
            .iter()
            .all(|l| mgr.measure_text_width(l, 9.0, false) <= 60.0));
    }
}
