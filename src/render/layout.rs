//! Line breaking
//!
//! Greedy word wrapping against the Helvetica metrics. A word wider than the
//! whole line is split between characters.

use super::metrics::text_width;
use crate::document::FontWeight;

/// One wrapped line of text
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: f32,
    /// Last line of its paragraph (never stretched when justifying)
    pub ends_paragraph: bool,
}

/// Wrap `text` into lines no wider than `max_width`.
///
/// Explicit newlines start a new paragraph; runs of whitespace collapse to a
/// single space. An empty paragraph still yields one empty line so blank
/// lines survive.
pub fn wrap_text(text: &str, weight: FontWeight, font_size: f32, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let start = lines.len();
        wrap_paragraph(paragraph, weight, font_size, max_width, &mut lines);
        if lines.len() == start {
            lines.push(Line {
                text: String::new(),
                width: 0.0,
                ends_paragraph: true,
            });
        }
        if let Some(last) = lines.last_mut() {
            last.ends_paragraph = true;
        }
    }
    lines
}

fn wrap_paragraph(
    paragraph: &str,
    weight: FontWeight,
    font_size: f32,
    max_width: f32,
    out: &mut Vec<Line>,
) {
    let space = text_width(" ", weight, font_size);
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in paragraph.split_whitespace() {
        let word_width = text_width(word, weight, font_size);

        if word_width > max_width {
            if !current.is_empty() {
                out.push(line(std::mem::take(&mut current), current_width));
                current_width = 0.0;
            }
            for piece in split_long_word(word, weight, font_size, max_width) {
                let width = text_width(&piece, weight, font_size);
                out.push(line(piece, width));
            }
            // Continue on the fragment left over by the split.
            if let Some(last) = out.pop() {
                current_width = last.width;
                current = last.text;
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + space + word_width
        };

        if needed <= max_width || current.is_empty() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
        } else {
            out.push(line(std::mem::take(&mut current), current_width));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        out.push(line(current, current_width));
    }
}

fn split_long_word(word: &str, weight: FontWeight, font_size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if text_width(&piece, weight, font_size) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

fn line(text: String, width: f32) -> Line {
    Line {
        text,
        width,
        ends_paragraph: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_line() {
        let lines = wrap_text("Executor: Jane Doe", FontWeight::Regular, 12.0, 500.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Executor: Jane Doe");
        assert!(lines[0].ends_paragraph);
    }

    #[test]
    fn test_wraps_within_width() {
        let text = "word ".repeat(200);
        let lines = wrap_text(&text, FontWeight::Regular, 11.0, 200.0);
        assert!(lines.len() > 1);
        for l in &lines {
            assert!(l.width <= 200.0 + 0.01, "line too wide: {}", l.width);
        }
        assert!(lines.iter().rev().skip(1).all(|l| !l.ends_paragraph));
        assert_eq!(
            lines.iter().map(|l| l.text.split(' ').count()).sum::<usize>(),
            200
        );
    }

    #[test]
    fn test_newlines_start_paragraphs() {
        let lines = wrap_text("first\n\nsecond", FontWeight::Regular, 12.0, 500.0);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "", "second"]);
        assert!(lines.iter().all(|l| l.ends_paragraph));
    }

    #[test]
    fn test_long_word_is_split() {
        let word = "W".repeat(100);
        let lines = wrap_text(&word, FontWeight::Bold, 12.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.iter().map(|l| l.text.len()).sum::<usize>(), 100);
        assert!(lines.iter().all(|l| l.width <= 100.0 + 0.01));
    }
}
