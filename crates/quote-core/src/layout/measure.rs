//! Text measurement used by the wrapper and the table column fitting.

use super::document::{FontWeight, TextStyle};

/// Measures the rendered width of a text run in points.
///
/// Widths are additive: a run measures the same as the sum of its
/// characters. There is no kerning, which lets callers grow a line one
/// character at a time with a running width.
pub trait TextMeasurer {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32;

    /// Width of a single character.
    fn char_width(&self, c: char, style: &TextStyle) -> f32 {
        let mut buf = [0u8; 4];
        self.text_width(c.encode_utf8(&mut buf), style)
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        (**self).text_width(text, style)
    }

    fn char_width(&self, c: char, style: &TextStyle) -> f32 {
        (**self).char_width(c, style)
    }
}

/// Advance widths of the standard Helvetica face, in 1/1000 em, for the
/// printable ASCII range `' '..='~'`.
const HELVETICA_WIDTHS: [u16; 95] = [
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

/// Width used for characters outside the table (`£`, `²`, accented letters).
const FALLBACK_WIDTH: u16 = 556;

/// Bold runs are wider; a flat factor keeps the table small.
const BOLD_FACTOR: f32 = 1.06;

/// Built-in Helvetica metrics, matching the standard PDF base font.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl TextMeasurer for HelveticaMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| {
                let code = c as u32;
                if (0x20..=0x7e).contains(&code) {
                    u32::from(HELVETICA_WIDTHS[(code - 0x20) as usize])
                } else {
                    u32::from(FALLBACK_WIDTH)
                }
            })
            .sum();
        let width = units as f32 * style.size / 1000.0;
        match style.weight {
            FontWeight::Regular => width,
            FontWeight::Bold => width * BOLD_FACTOR,
        }
    }
}

/// Fixed advance per character, as a fraction of the font size.
///
/// Handy for plain-text targets and for predictable wrapping in tests.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    pub advance_em: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        MonospaceMetrics { advance_em: 0.6 }
    }
}

impl TextMeasurer for MonospaceMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        text.chars().count() as f32 * style.size * self.advance_em
    }
}

/// Shortens `text` with a trailing ellipsis until it fits `max_width`.
pub fn fit_to_width(
    text: &str,
    max_width: f32,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> String {
    if measurer.text_width(text, style) <= max_width {
        return text.to_string();
    }

    // Longest proper prefix whose trimmed width plus the ellipsis fits.
    // Trimmed width only grows with the prefix, so the first miss ends it.
    let budget = max_width - measurer.text_width("…", style);
    let mut width = 0.0;
    let mut trimmed_end = 0;
    let mut trimmed_width = 0.0;
    let mut keep = 0;
    for (i, c) in text.char_indices() {
        if trimmed_width > budget {
            break;
        }
        keep = trimmed_end;
        width += measurer.char_width(c, style);
        if !c.is_whitespace() {
            trimmed_end = i + c.len_utf8();
            trimmed_width = width;
        }
    }
    format!("{}…", &text[..keep])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    /// Monospace at 0.6em that counts every character it measures.
    #[derive(Default)]
    pub(crate) struct CountingMetrics {
        pub(crate) measured: Cell<usize>,
    }

    impl TextMeasurer for CountingMetrics {
        fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
            self.measured.set(self.measured.get() + text.chars().count());
            MonospaceMetrics::default().text_width(text, style)
        }
    }

    #[test]
    fn test_helvetica_width_table_lookup() {
        let style = TextStyle::regular(10.0);
        // 'H' = 722, 'i' = 222
        let width = HelveticaMetrics.text_width("Hi", &style);
        assert!((width - 9.44).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider() {
        let text = "Grand total";
        let regular = HelveticaMetrics.text_width(text, &TextStyle::regular(12.0));
        let bold = HelveticaMetrics.text_width(text, &TextStyle::bold(12.0));
        assert!(bold > regular);
    }

    #[test]
    fn test_non_ascii_uses_fallback_width() {
        let style = TextStyle::regular(10.0);
        assert!((HelveticaMetrics.text_width("£", &style) - 5.56).abs() < 1e-4);
    }

    #[test]
    fn test_fit_to_width_adds_ellipsis() {
        let metrics = MonospaceMetrics { advance_em: 1.0 };
        let style = TextStyle::regular(10.0);
        assert_eq!(fit_to_width("short", 100.0, &style, &metrics), "short");
        assert_eq!(fit_to_width("abcdefghij", 50.0, &style, &metrics), "abcd…");
        assert_eq!(fit_to_width("ab   cdefgh", 50.0, &style, &metrics), "ab…");
        assert_eq!(fit_to_width("abcdef", 5.0, &style, &metrics), "…");
    }

    #[test]
    fn test_fit_to_width_measures_each_char_once() {
        let metrics = CountingMetrics::default();
        let text = "x".repeat(5_000);
        let fitted = fit_to_width(&text, 100.0, &TextStyle::regular(10.0), &metrics);
        assert_eq!(fitted.chars().count(), 16);
        assert!(metrics.measured.get() <= 2 * 5_000 + 1);
    }
}
