//! Path Compiler
//!
//! Compiles parsed path segments into a flat list of rendering ops.
//! Every rule ends in exactly one [`Op::Serialize`].

use std::fmt;

use log::trace;

use super::parser::{self, Accessor, Segment};
use crate::error::Result;

/// Compiled path rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    path: String,
    ops: Vec<Op>,
}

/// Compiled operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Descend into a record field or string map key, if present and non-empty
    Field(String),
    /// Descend into a string map key, if present and non-empty
    Key(String),
    /// Descend into a list position or integer map key, if present and non-empty
    Position(usize),
    /// First step against the root: a map key or position, or a field of a record root
    Top(Accessor),
    /// Run the remaining ops once per non-empty element
    Each,
    /// Encode the current scope
    Serialize,
}

impl From<Accessor> for Op {
    fn from(accessor: Accessor) -> Self {
        match accessor {
            Accessor::Position(n) => Op::Position(n),
            Accessor::Key(k) => Op::Key(k),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Field(name) => write!(f, "with .{}", name),
            Op::Key(key) => write!(f, "with index {:?}", key),
            Op::Position(n) => write!(f, "with index {}", n),
            Op::Top(Accessor::Key(key)) => write!(f, "with top {:?}", key),
            Op::Top(Accessor::Position(n)) => write!(f, "with top {}", n),
            Op::Each => f.write_str("range"),
            Op::Serialize => f.write_str("serialize"),
        }
    }
}

impl CompiledRule {
    /// Compile parsed segments.
    ///
    /// With `top_level_map`, the first field name becomes an [`Op::Top`]:
    /// `Foo` behaves like `["Foo"]` and `0` like `[0]` on a map root, and
    /// still names a field on a record root.
    pub fn compile(path: &str, segments: Vec<Segment>, top_level_map: bool) -> Self {
        let mut ops: Vec<Op> = Vec::with_capacity(segments.len() + 1);
        let last = segments.len().saturating_sub(1);

        for (i, segment) in segments.into_iter().enumerate() {
            let top = top_level_map && i == 0;
            match segment {
                Segment::Field(name) if top => ops.push(Op::Top(Accessor::from_raw(&name))),
                Segment::Field(name) => ops.push(Op::Field(name)),
                Segment::Index { base, accessors } => {
                    match base {
                        Some(name) if top => ops.push(Op::Top(Accessor::from_raw(&name))),
                        Some(name) => ops.push(Op::Field(name)),
                        None => {}
                    }
                    ops.extend(accessors.into_iter().map(Op::from));
                }
                // Terminal wildcard: encode the whole collection
                Segment::Wildcard if i == last => break,
                Segment::Wildcard => ops.push(Op::Each),
            }
        }
        ops.push(Op::Serialize);

        CompiledRule {
            path: path.to_string(),
            ops,
        }
    }

    /// The compiled ops, in execution order
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// The path this rule was compiled from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether any op expands a collection
    pub fn has_wildcard(&self) -> bool {
        self.ops.contains(&Op::Each)
    }
}

impl fmt::Display for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// Parse and compile a placeholder path
pub fn compile_rule(path: &str, top_level_map: bool) -> Result<CompiledRule> {
    let segments = parser::parse(path)?;
    let rule = CompiledRule::compile(path, segments, top_level_map);
    trace!("compiled `{}` => {}", path, rule);
    Ok(rule)
}
