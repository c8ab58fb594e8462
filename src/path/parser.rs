//! Path Parser
//!
//! Turns a placeholder path into segments:
//!
//! ```text
//! path     := segment ('.' segment)*
//! segment  := '*' | ident bracket* | bracket+
//! bracket  := '[' (quoted | raw) ']'
//! ```
//!
//! Dots inside brackets never split a segment.

use std::fmt;

use super::lexer::{Lexer, Token};
use crate::error::{Result, TemplateSyntaxError};

/// One bracketed accessor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// Sequence position (unquoted, all digits)
    Position(usize),
    /// Map key
    Key(String),
}

impl Accessor {
    /// Classify unquoted bracket content: all ASCII digits is a position.
    pub fn from_raw(content: &str) -> Self {
        if !content.is_empty() && content.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = content.parse() {
                return Accessor::Position(n);
            }
        }
        Accessor::Key(content.to_string())
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Position(n) => write!(f, "[{}]", n),
            Accessor::Key(k) => write!(f, "[{:?}]", k),
        }
    }
}

/// Path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Bare identifier
    Field(String),
    /// Optional identifier followed by one or more accessors
    Index {
        base: Option<String>,
        accessors: Vec<Accessor>,
    },
    /// `*`
    Wildcard,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => f.write_str(name),
            Segment::Index { base, accessors } => {
                if let Some(base) = base {
                    f.write_str(base)?;
                }
                for accessor in accessors {
                    write!(f, "{}", accessor)?;
                }
                Ok(())
            }
            Segment::Wildcard => f.write_str("*"),
        }
    }
}

/// Path parser
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser
    pub fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Parser {
            input,
            lexer,
            current,
        })
    }

    /// Parse the whole path
    pub fn parse(&mut self) -> Result<Vec<Segment>> {
        if matches!(self.current, Token::Eof) {
            return Err(TemplateSyntaxError::EmptyPath);
        }

        let mut segments = Vec::new();
        loop {
            segments.push(self.parse_segment()?);
            match self.current {
                Token::Eof => break,
                Token::Dot => {
                    self.advance()?;
                }
                _ => return Err(self.unexpected()),
            }
        }
        Ok(segments)
    }

    /// Advance to next token
    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected(&self) -> TemplateSyntaxError {
        TemplateSyntaxError::UnexpectedChar {
            path: self.input.to_string(),
            ch: self.current.lead_char(),
            offset: self.lexer.token_start(),
        }
    }

    /// Parse one segment
    fn parse_segment(&mut self) -> Result<Segment> {
        match &self.current {
            Token::Star => {
                self.advance()?;
                if matches!(self.current, Token::Bracket { .. }) {
                    return Err(self.unexpected());
                }
                Ok(Segment::Wildcard)
            }
            Token::Ident(name) => {
                let name = name.clone();
                self.advance()?;
                let accessors = self.parse_accessors()?;
                if accessors.is_empty() {
                    Ok(Segment::Field(name))
                } else {
                    Ok(Segment::Index {
                        base: Some(name),
                        accessors,
                    })
                }
            }
            Token::Bracket { .. } => Ok(Segment::Index {
                base: None,
                accessors: self.parse_accessors()?,
            }),
            Token::Dot | Token::Eof => Err(TemplateSyntaxError::EmptySegment {
                path: self.input.to_string(),
                offset: self.lexer.token_start(),
            }),
        }
    }

    /// Parse a (possibly empty) run of bracket accessors
    fn parse_accessors(&mut self) -> Result<Vec<Accessor>> {
        let mut accessors = Vec::new();
        while let Token::Bracket { content, quoted } = &self.current {
            let accessor = if *quoted {
                Accessor::Key(content.clone())
            } else {
                Accessor::from_raw(content)
            };
            accessors.push(accessor);
            self.advance()?;
        }
        Ok(accessors)
    }
}

/// Parse a placeholder path into segments
pub fn parse(path: &str) -> Result<Vec<Segment>> {
    Parser::new(path)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(s: &str) -> Segment {
        Segment::Field(s.to_string())
    }

    #[test]
    fn test_fields() {
        assert_eq!(parse("Field.Sub").unwrap(), vec![field("Field"), field("Sub")]);
    }

    #[test]
    fn test_index_chain() {
        assert_eq!(
            parse("tags[0]['k'][x]").unwrap(),
            vec![Segment::Index {
                base: Some("tags".to_string()),
                accessors: vec![
                    Accessor::Position(0),
                    Accessor::Key("k".to_string()),
                    Accessor::Key("x".to_string()),
                ],
            }]
        );
    }

    #[test]
    fn test_dot_inside_brackets_does_not_split() {
        assert_eq!(
            parse("m[\"a.b\"].c").unwrap(),
            vec![
                Segment::Index {
                    base: Some("m".to_string()),
                    accessors: vec![Accessor::Key("a.b".to_string())],
                },
                field("c"),
            ]
        );
    }

    #[test]
    fn test_leading_bracket_and_wildcards() {
        assert_eq!(
            parse("[\"Foo\"].*.id").unwrap(),
            vec![
                Segment::Index {
                    base: None,
                    accessors: vec![Accessor::Key("Foo".to_string())],
                },
                Segment::Wildcard,
                field("id"),
            ]
        );
    }

    #[test]
    fn test_quoted_digits_are_keys() {
        assert_eq!(
            parse("m[\"10\"][10]").unwrap(),
            vec![Segment::Index {
                base: Some("m".to_string()),
                accessors: vec![Accessor::Key("10".to_string()), Accessor::Position(10)],
            }]
        );
    }

    #[test]
    fn test_accessor_classification() {
        assert_eq!(Accessor::from_raw("42"), Accessor::Position(42));
        assert_eq!(Accessor::from_raw("key1"), Accessor::Key("key1".to_string()));
        assert_eq!(Accessor::from_raw("-1"), Accessor::Key("-1".to_string()));
        assert_eq!(
            Accessor::from_raw("99999999999999999999999999"),
            Accessor::Key("99999999999999999999999999".to_string())
        );
    }

    #[test]
    fn test_display_round_trips_shape() {
        let segments = parse("a[0][\"k\"].*").unwrap();
        let shown: Vec<String> = segments.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["a[0][\"k\"]", "*"]);
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(parse("").unwrap_err(), TemplateSyntaxError::EmptyPath);
        assert_eq!(parse("   ").unwrap_err(), TemplateSyntaxError::EmptyPath);
    }

    #[test]
    fn test_empty_segments() {
        assert!(matches!(
            parse("a..b").unwrap_err(),
            TemplateSyntaxError::EmptySegment { offset: 2, .. }
        ));
        assert!(matches!(
            parse(".a").unwrap_err(),
            TemplateSyntaxError::EmptySegment { offset: 0, .. }
        ));
        assert!(matches!(
            parse("a.").unwrap_err(),
            TemplateSyntaxError::EmptySegment { offset: 2, .. }
        ));
    }

    #[test]
    fn test_accessor_after_wildcard() {
        assert!(matches!(
            parse("a.*[0]").unwrap_err(),
            TemplateSyntaxError::UnexpectedChar { ch: '[', offset: 3, .. }
        ));
    }

    #[test]
    fn test_missing_dot_between_segments() {
        assert!(matches!(
            parse("a b").unwrap_err(),
            TemplateSyntaxError::UnexpectedChar { ch: 'b', offset: 2, .. }
        ));
    }
}
