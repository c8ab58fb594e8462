//! Rule Evaluator
//!
//! Runs a [`CompiledRule`] against a root value. A step whose target is
//! missing or empty ends the rule with no output; the caller decides what
//! empty output means.

use std::mem;

use super::compiler::{CompiledRule, Op};
use super::parser::Accessor;
use crate::encode::Encoder;
use crate::value::{Key, Value};

impl CompiledRule {
    /// Render this rule against `root`; empty when the path does not resolve
    pub fn render(&self, root: &Value) -> String {
        let mut out = String::new();
        run(self.ops(), root, &mut out);
        out
    }
}

fn run(ops: &[Op], scope: &Value, out: &mut String) {
    let Some((op, rest)) = ops.split_first() else {
        return;
    };

    match op {
        Op::Serialize => {
            let mut encoder = Encoder::with_buffer(mem::take(out));
            encoder.encode(scope);
            *out = encoder.finish();
        }
        Op::Each => {
            for element in elements(scope) {
                if !element.is_empty() {
                    run(rest, element, out);
                }
            }
        }
        Op::Field(name) => descend(scope.field(name), rest, out),
        Op::Key(key) => descend(scope.key(key), rest, out),
        Op::Position(n) => descend(scope.position(*n), rest, out),
        Op::Top(accessor) => descend(top(scope, accessor), rest, out),
    }
}

/// Root lookup: records are read by field, everything else by index
fn top<'v>(root: &'v Value, accessor: &Accessor) -> Option<&'v Value> {
    match (root.resolve(), accessor) {
        (Value::Record(record), Accessor::Key(name)) => record.get(name),
        (_, Accessor::Key(key)) => root.key(key),
        (_, Accessor::Position(n)) => root.position(*n),
    }
}

#[inline]
fn descend(next: Option<&Value>, rest: &[Op], out: &mut String) {
    if let Some(next) = next.filter(|v| !v.is_empty()) {
        run(rest, next, out);
    }
}

/// Elements of a collection in iteration order: lists by position, maps by
/// natural key order (integers numerically, strings bytewise). Anything else
/// has no elements.
fn elements(scope: &Value) -> Vec<&Value> {
    match scope.resolve() {
        Value::List(items) => items.iter().collect(),
        Value::Map(map) => {
            let mut entries: Vec<(&Key, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            entries.into_iter().map(|(_, v)| v).collect()
        }
        _ => Vec::new(),
    }
}
