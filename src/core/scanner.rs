//! Placeholder scanning using memchr
//!
//! Finds `$(` ... `)` spans in template text. The closing `)` is the first
//! one outside a quoted key, so `$(m[")"])` is a single placeholder.

use std::ops::Range;

use memchr::memchr;

use crate::error::{Result, TemplateSyntaxError};

/// How a placeholder starting at the scanner position ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderEnd {
    /// Position of the closing `)`
    Closed(usize),
    /// Position of a `(` found before any closing `)`
    Nested(usize),
    /// No closing `)` before end of input
    Unclosed,
}

/// Scanner for template delimiters
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Find the next `$(` at or after the current position
    pub fn find_placeholder_start(&self) -> Option<usize> {
        let mut pos = self.pos;
        while pos < self.input.len() {
            let at = pos + memchr(b'$', &self.input[pos..])?;
            if self.input.get(at + 1) == Some(&b'(') {
                return Some(at);
            }
            pos = at + 1;
        }
        None
    }

    /// Find the end of a placeholder whose `$(` is at the current position.
    ///
    /// Quotes (`"` or `'`) hide parentheses from the search.
    pub fn find_placeholder_end(&self) -> PlaceholderEnd {
        let mut pos = self.pos + 2;

        while pos < self.input.len() {
            match self.input[pos] {
                q @ (b'"' | b'\'') => {
                    // Skip straight to the closing quote
                    match memchr(q, &self.input[pos + 1..]) {
                        Some(len) => pos += len + 1,
                        None => return PlaceholderEnd::Unclosed,
                    }
                }
                b')' => return PlaceholderEnd::Closed(pos),
                b'(' => return PlaceholderEnd::Nested(pos),
                _ => {}
            }
            pos += 1;
        }
        PlaceholderEnd::Unclosed
    }

    /// Read the next placeholder span (including `$(` and `)`), advancing past it
    pub fn read_placeholder(&mut self) -> Result<Option<Range<usize>>> {
        let Some(start) = self.find_placeholder_start() else {
            self.pos = self.input.len();
            return Ok(None);
        };
        self.pos = start;
        match self.find_placeholder_end() {
            PlaceholderEnd::Closed(end) => {
                self.pos = end + 1;
                Ok(Some(start..end + 1))
            }
            PlaceholderEnd::Nested(offset) => {
                Err(TemplateSyntaxError::NestedParenthesis { offset })
            }
            PlaceholderEnd::Unclosed => {
                Err(TemplateSyntaxError::UnclosedPlaceholder { offset: start })
            }
        }
    }
}

/// All placeholder spans in `text`, in order of appearance
pub fn placeholder_spans(text: &str) -> Result<Vec<Range<usize>>> {
    let mut scanner = Scanner::new(text.as_bytes());
    let mut spans = Vec::new();
    while let Some(span) = scanner.read_placeholder()? {
        spans.push(span);
    }
    Ok(spans)
}
