//! Line normalization
//!
//! Turns one raw line into lowercase word tokens:
//! - ASCII letters are folded to lowercase
//! - Characters in [`STRIPPED_PUNCTUATION`] are deleted wherever they occur
//! - A single quote is deleted when it touches whitespace (or a line edge) on
//!   either side; an apostrophe inside a word (`don't`) is kept
//! - The result is split on whitespace runs, dropping empty pieces

use std::str::SplitWhitespace;

/// Characters removed from every line before splitting.
pub const STRIPPED_PUNCTUATION: &[char] = &[
    ',', '.', '?', '/', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '-', '_', '[', ']', '{',
    '}', '|', ':', ';', '"',
];

#[inline]
fn is_stripped(c: char) -> bool {
    STRIPPED_PUNCTUATION.contains(&c)
}

/// A line after case folding and punctuation removal.
///
/// Tokens are produced lazily by [`NormalizedLine::tokens`]; calling it again
/// starts a fresh pass over the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    text: String,
}

impl NormalizedLine {
    /// Iterate the non-empty tokens of this line.
    pub fn tokens(&self) -> SplitWhitespace<'_> {
        self.text.split_whitespace()
    }

    /// The cleaned text, whitespace left as-is.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Normalize a single line of input.
///
/// ```
/// use phrasecount::phrases::normalize_line;
///
/// let line = normalize_line("Hello, World!");
/// assert_eq!(line.tokens().collect::<Vec<_>>(), ["hello", "world"]);
/// ```
pub fn normalize_line(line: &str) -> NormalizedLine {
    let mut text = String::with_capacity(line.len());

    // Quote checks look at the raw neighbours, not at what survives stripping.
    let mut prev: Option<char> = None;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        let keep = match c {
            '\'' => {
                let open = prev.map_or(true, char::is_whitespace);
                let close = next.map_or(true, char::is_whitespace);
                !(open || close)
            }
            c => !is_stripped(c),
        };
        if keep {
            text.push(c.to_ascii_lowercase());
        }
        prev = Some(c);
    }

    NormalizedLine { text }
}
