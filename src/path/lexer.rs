//! Path Lexer
//!
//! Tokenizes the path inside a placeholder: identifiers, dots, `*`, and
//! bracket groups. Whitespace between tokens is skipped.

use crate::error::{Result, TemplateSyntaxError};

/// Path token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Field name: letters, digits, underscore
    Ident(String),
    /// `.`
    Dot,
    /// `*`
    Star,
    /// `[...]` with its trimmed content; `quoted` if written as `["..."]` or `['...']`
    Bracket { content: String, quoted: bool },
    /// End of input
    Eof,
}

impl Token {
    /// First source character of the token, for error messages
    pub fn lead_char(&self) -> char {
        match self {
            Token::Ident(name) => name.chars().next().unwrap_or('?'),
            Token::Dot => '.',
            Token::Star => '*',
            Token::Bracket { .. } => '[',
            Token::Eof => '?',
        }
    }
}

/// Path lexer
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    token_start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            token_start: 0,
        }
    }

    /// Byte offset where the most recent token started
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Get the remaining input
    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Peek at current character
    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Advance by n bytes
    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Skip whitespace
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        self.token_start = self.pos;

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        match c {
            '.' => {
                self.advance(1);
                Ok(Token::Dot)
            }
            '*' => {
                self.advance(1);
                Ok(Token::Star)
            }
            '[' => {
                self.advance(1);
                self.read_bracket()
            }
            _ if is_ident_char(c) => Ok(self.read_ident()),
            _ => Err(TemplateSyntaxError::UnexpectedChar {
                path: self.input.to_string(),
                ch: c,
                offset: self.pos,
            }),
        }
    }

    /// Read an identifier
    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_char(c) {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
        Token::Ident(self.input[start..self.pos].to_string())
    }

    /// Read a bracket group; the opening `[` is already consumed
    fn read_bracket(&mut self) -> Result<Token> {
        let open = self.token_start;
        self.skip_whitespace();

        match self.peek() {
            Some(q @ ('"' | '\'')) => {
                let quote_at = self.pos;
                self.advance(1);
                let start = self.pos;
                let Some(len) = self.remaining().find(q) else {
                    return Err(TemplateSyntaxError::UnterminatedQuote {
                        path: self.input.to_string(),
                        offset: quote_at,
                    });
                };
                let content = self.input[start..start + len].to_string();
                self.advance(len + 1);

                self.skip_whitespace();
                match self.peek() {
                    Some(']') => {
                        self.advance(1);
                        Ok(Token::Bracket {
                            content,
                            quoted: true,
                        })
                    }
                    Some(c) => Err(TemplateSyntaxError::UnexpectedChar {
                        path: self.input.to_string(),
                        ch: c,
                        offset: self.pos,
                    }),
                    None => Err(TemplateSyntaxError::UnterminatedBracket {
                        path: self.input.to_string(),
                        offset: open,
                    }),
                }
            }
            _ => {
                let input = self.input;
                let start = self.pos;
                let Some(len) = self.remaining().find(']') else {
                    return Err(TemplateSyntaxError::UnterminatedBracket {
                        path: self.input.to_string(),
                        offset: open,
                    });
                };
                let content = input[start..start + len].trim();
                self.advance(len + 1);
                if content.is_empty() {
                    return Err(TemplateSyntaxError::EmptyBrackets {
                        path: self.input.to_string(),
                        offset: open,
                    });
                }
                if let Some(at) = input[start..start + len].find(['[', '"', '\'']) {
                    return Err(TemplateSyntaxError::UnexpectedChar {
                        path: input.to_string(),
                        ch: input[start + at..].chars().next().unwrap_or('['),
                        offset: start + at,
                    });
                }
                Ok(Token::Bracket {
                    content: content.to_string(),
                    quoted: false,
                })
            }
        }
    }

    /// Tokenize entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if matches!(token, Token::Eof) {
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
