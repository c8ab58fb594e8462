//! Template compile errors
//!
//! Only compilation can fail. Rendering absorbs every runtime condition
//! (missing fields, nil references, cycles) into its output instead.

use thiserror::Error;

/// Result alias used by the compile-time entry points.
pub type Result<T, E = TemplateSyntaxError> = std::result::Result<T, E>;

/// A malformed template or placeholder path.
///
/// Offsets are byte offsets: into the cleaned template text for
/// [`UnclosedPlaceholder`](Self::UnclosedPlaceholder) and
/// [`NestedParenthesis`](Self::NestedParenthesis), into the placeholder path
/// for everything else. Path errors carry the path text as written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateSyntaxError {
    /// `$(` without a matching `)`.
    #[error("unclosed placeholder starting at byte {offset}")]
    UnclosedPlaceholder { offset: usize },

    /// A `(` inside a placeholder.
    #[error("nested '(' at byte {offset} inside placeholder")]
    NestedParenthesis { offset: usize },

    /// The path between `$(` and `)` is blank.
    #[error("empty placeholder path")]
    EmptyPath,

    /// Two dots in a row, or a leading/trailing dot.
    #[error("empty segment at byte {offset} in `{path}`")]
    EmptySegment { path: String, offset: usize },

    /// A character that cannot start or continue a segment.
    #[error("unexpected '{ch}' at byte {offset} in `{path}`")]
    UnexpectedChar {
        path: String,
        ch: char,
        offset: usize,
    },

    /// `[` without a matching `]`.
    #[error("unterminated bracket at byte {offset} in `{path}`")]
    UnterminatedBracket { path: String, offset: usize },

    /// A quoted key without its closing quote.
    #[error("unterminated quoted key at byte {offset} in `{path}`")]
    UnterminatedQuote { path: String, offset: usize },

    /// `[]` or `[  ]`.
    #[error("empty brackets at byte {offset} in `{path}`")]
    EmptyBrackets { path: String, offset: usize },
}

impl TemplateSyntaxError {
    /// Byte offset where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            TemplateSyntaxError::UnclosedPlaceholder { offset }
            | TemplateSyntaxError::NestedParenthesis { offset }
            | TemplateSyntaxError::EmptySegment { offset, .. }
            | TemplateSyntaxError::UnexpectedChar { offset, .. }
            | TemplateSyntaxError::UnterminatedBracket { offset, .. }
            | TemplateSyntaxError::UnterminatedQuote { offset, .. }
            | TemplateSyntaxError::EmptyBrackets { offset, .. } => *offset,
            TemplateSyntaxError::EmptyPath => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_placeholder() {
        let err = TemplateSyntaxError::UnexpectedChar {
            path: "a-b".to_string(),
            ch: '-',
            offset: 1,
        };
        assert_eq!(err.to_string(), "unexpected '-' at byte 1 in `a-b`");
        assert_eq!(err.offset(), 1);
    }

    #[test]
    fn test_offset_of_empty_path() {
        assert_eq!(TemplateSyntaxError::EmptyPath.offset(), 0);
    }
}
