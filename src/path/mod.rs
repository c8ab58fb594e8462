//! Placeholder path compilation and evaluation
//!
//! - Lexer: tokenizes a path
//! - Parser: builds segments (field, bracket index, wildcard)
//! - Compiler: lowers segments to a flat op list
//! - Eval: runs the ops against a [`Value`](crate::value::Value)

pub mod compiler;
pub mod eval;
pub mod lexer;
pub mod parser;

pub use compiler::{compile_rule, CompiledRule, Op};
pub use parser::{parse, Accessor, Segment};
