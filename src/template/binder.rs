//! Template compilation and binding
//!
//! A [`Binder`] is the compiled form of a template: the cleaned text, one
//! rule per distinct placeholder, and the byte span of every occurrence.
//! Binding evaluates each rule once and splices the results into the spans.

use std::collections::HashMap;
use std::ops::Range;

use log::debug;

use crate::core::{cleaner, scanner};
use crate::error::Result;
use crate::path::{compile_rule, CompiledRule};
use crate::value::Value;

/// Substituted when a placeholder renders nothing
const EMPTY_SUBSTITUTE: &str = "null";

/// Options for [`Binder::compile_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    treat_top_as_map: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            treat_top_as_map: true,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the first path segment as a map key or position rather than a
    /// field. On by default.
    pub fn treat_top_as_map(mut self, yes: bool) -> Self {
        self.treat_top_as_map = yes;
        self
    }

    pub fn top_level_map(&self) -> bool {
        self.treat_top_as_map
    }
}

/// One distinct placeholder and its compiled rule
#[derive(Debug, Clone)]
pub struct Placeholder {
    literal: String,
    rule: CompiledRule,
}

impl Placeholder {
    /// Placeholder text as it appears in the template, `$(` and `)` included
    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn rule(&self) -> &CompiledRule {
        &self.rule
    }
}

#[derive(Debug, Clone)]
enum Piece {
    Literal(Range<usize>),
    Slot(usize),
}

/// Compiled template
#[derive(Debug, Clone)]
pub struct Binder {
    text: String,
    placeholders: Vec<Placeholder>,
    pieces: Vec<Piece>,
}

impl Binder {
    /// Compile with default options
    pub fn compile(text: &str) -> Result<Self> {
        Self::compile_with(text, CompileOptions::default())
    }

    /// Compile template text
    pub fn compile_with(text: &str, options: CompileOptions) -> Result<Self> {
        let text = cleaner::clean_template(text);
        let spans = scanner::placeholder_spans(&text)?;

        let mut placeholders: Vec<Placeholder> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut pieces = Vec::with_capacity(spans.len() * 2 + 1);
        let mut last = 0;

        for span in spans {
            if span.start > last {
                pieces.push(Piece::Literal(last..span.start));
            }
            last = span.end;

            let literal = &text[span];
            let slot = match slots.get(literal) {
                Some(&slot) => slot,
                None => {
                    let path = &literal[2..literal.len() - 1];
                    let rule = compile_rule(path, options.top_level_map())?;
                    placeholders.push(Placeholder {
                        literal: literal.to_string(),
                        rule,
                    });
                    slots.insert(literal, placeholders.len() - 1);
                    placeholders.len() - 1
                }
            };
            pieces.push(Piece::Slot(slot));
        }
        if last < text.len() {
            pieces.push(Piece::Literal(last..text.len()));
        }

        debug!(
            "compiled template ({} bytes): {} placeholders, {} distinct",
            text.len(),
            pieces.iter().filter(|p| matches!(p, Piece::Slot(_))).count(),
            placeholders.len()
        );

        Ok(Binder {
            text,
            placeholders,
            pieces,
        })
    }

    /// Render the template against `value`.
    ///
    /// Each distinct placeholder is evaluated once; one that renders nothing
    /// becomes `null`.
    pub fn bind(&self, value: &Value) -> String {
        let rendered: Vec<String> = self
            .placeholders
            .iter()
            .map(|p| {
                let out = p.rule.render(value);
                if out.is_empty() {
                    EMPTY_SUBSTITUTE.to_string()
                } else {
                    out
                }
            })
            .collect();

        let extra: usize = rendered.iter().map(String::len).sum();
        let mut out = String::with_capacity(self.text.len() + extra);
        for piece in &self.pieces {
            match piece {
                Piece::Literal(range) => out.push_str(&self.text[range.clone()]),
                Piece::Slot(i) => out.push_str(&rendered[*i]),
            }
        }
        out
    }

    /// The cleaned template text
    pub fn template(&self) -> &str {
        &self.text
    }

    /// Distinct placeholders in order of first appearance
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Compiled rule for a placeholder literal such as `$(a.b)`
    pub fn rule(&self, literal: &str) -> Option<&CompiledRule> {
        self.placeholders
            .iter()
            .find(|p| p.literal == literal)
            .map(|p| &p.rule)
    }
}
