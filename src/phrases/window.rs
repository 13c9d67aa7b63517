//! Sliding three-token window

use super::Phrase;
use std::collections::VecDeque;

/// Number of tokens in a phrase.
pub const PHRASE_LEN: usize = 3;

/// Sliding buffer that turns a token stream into overlapping phrases.
///
/// One window belongs to one source and is fed across line boundaries, so the
/// last tokens of a line combine with the first tokens of the next.
#[derive(Debug, Default)]
pub struct PhraseWindow {
    buf: VecDeque<String>,
}

impl PhraseWindow {
    pub fn new() -> Self {
        Self {
            buf: VecDeque::with_capacity(PHRASE_LEN + 1),
        }
    }

    /// Append a token, evicting the oldest once the window is over-full.
    /// Returns the phrase currently in the window once it holds three tokens.
    pub fn push(&mut self, token: &str) -> Option<Phrase> {
        self.buf.push_back(token.to_string());
        if self.buf.len() > PHRASE_LEN {
            self.buf.pop_front();
        }
        if self.buf.len() != PHRASE_LEN {
            return None;
        }

        let mut joined = String::with_capacity(self.buf.iter().map(|t| t.len() + 1).sum());
        for (i, t) in self.buf.iter().enumerate() {
            if i > 0 {
                joined.push(' ');
            }
            joined.push_str(t);
        }
        Some(Phrase::from(joined))
    }

    /// Feed every token from `tokens`, yielding phrases as they complete.
    pub fn phrases<'a, I, T>(&'a mut self, tokens: I) -> impl Iterator<Item = Phrase> + 'a
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
        T: AsRef<str> + 'a,
    {
        tokens.into_iter().filter_map(move |t| self.push(t.as_ref()))
    }

    /// Tokens currently buffered (at most three).
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
