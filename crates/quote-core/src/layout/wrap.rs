//! Greedy word wrapping against a measured column width.
//!
//! ## Algorithm
//! ```text
//! for each paragraph (split on '\n'):
//!     line = ""
//!     for each word:
//!         if measure(line + " " + word) <= width  → append
//!         else                                    → emit line, start new line
//!         a word wider than the column on its own is split by characters
//!     emit the remainder
//! ```
//! Every emitted line holds at least one character, so wrapping always
//! terminates, even when the column is narrower than a single glyph.

use super::document::TextStyle;
use super::measure::TextMeasurer;

/// Wraps `text` to `max_width`, handing each finished line to `on_line` as
/// soon as it is known.
///
/// Blank paragraphs produce an empty line so paragraph spacing survives.
pub fn for_each_wrapped_line<F>(
    text: &str,
    max_width: f32,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
    mut on_line: F,
) where
    F: FnMut(&str),
{
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            on_line("");
            continue;
        }

        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line = place_word(word, max_width, style, measurer, &mut on_line);
                continue;
            }

            let candidate = format!("{line} {word}");
            if measurer.text_width(&candidate, style) <= max_width {
                line = candidate;
            } else {
                on_line(&line);
                line = place_word(word, max_width, style, measurer, &mut on_line);
            }
        }
        if !line.is_empty() {
            on_line(&line);
        }
    }
}

/// Collects the wrapped lines of `text`.
///
/// ```rust
/// use quote_core::layout::{wrap_text, MonospaceMetrics, TextStyle};
///
/// let metrics = MonospaceMetrics { advance_em: 1.0 };
/// let lines = wrap_text("the quick brown fox", 100.0, &TextStyle::regular(10.0), &metrics);
/// assert_eq!(lines, vec!["the quick", "brown fox"]);
/// ```
pub fn wrap_text(
    text: &str,
    max_width: f32,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut lines = Vec::new();
    for_each_wrapped_line(text, max_width, style, measurer, |line| {
        lines.push(line.to_string())
    });
    lines
}

/// Starts a fresh line with `word`. A word that fits is returned whole;
/// one that does not is split into column-wide chunks, all but the last of
/// which are emitted straight away.
fn place_word<F>(
    word: &str,
    max_width: f32,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
    on_line: &mut F,
) -> String
where
    F: FnMut(&str),
{
    if measurer.text_width(word, style) <= max_width {
        return word.to_string();
    }

    let mut chunk = String::new();
    let mut chunk_width = 0.0;
    for c in word.chars() {
        let advance = measurer.char_width(c, style);
        // Always keep at least one character per line
        if !chunk.is_empty() && chunk_width + advance > max_width {
            on_line(&chunk);
            chunk.clear();
            chunk_width = 0.0;
        }
        chunk.push(c);
        chunk_width += advance;
    }
    chunk
}
