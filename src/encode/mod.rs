//! Structural Encoder
//!
//! Deterministic JSON-like text for any [`Value`]:
//! - Lists keep source order
//! - Map pairs are ordered by the quoted text of their keys
//! - Record fields keep declaration order, honoring renames and skipping private fields
//! - A reference already visited in the same encode renders as `null`
//!
//! Encoding never fails.

pub mod fields;
pub mod scalar;

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use log::trace;

use crate::value::{Key, Record, Ref, Value};

/// Encoder state for one encode call: output buffer plus visited references.
///
/// Visited references are never forgotten during the life of an encoder, so
/// a reference reached a second time through any path renders as `null`.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: String,
    visited: HashSet<usize>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder appending to an existing buffer
    pub fn with_buffer(buf: String) -> Self {
        Encoder {
            buf,
            visited: HashSet::new(),
        }
    }

    /// Append the encoding of `value`
    pub fn encode(&mut self, value: &Value) {
        match value {
            Value::Null => self.buf.push_str("null"),
            Value::Ref(r) => self.encode_ref(r),
            Value::List(items) => self.encode_list(items),
            Value::Map(map) => self.encode_map(map),
            Value::Record(record) => self.encode_record(record),
            scalar => self.encode_scalar(scalar),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn encode_ref(&mut self, r: &Ref) {
        let Some(target) = r.get() else {
            self.buf.push_str("null");
            return;
        };
        if !self.visited.insert(r.addr()) {
            trace!("reference {:#x} already visited, writing null", r.addr());
            self.buf.push_str("null");
            return;
        }
        self.encode(target);
    }

    fn encode_list(&mut self, items: &[Value]) {
        self.buf.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.encode(item);
        }
        self.buf.push(']');
    }

    fn encode_map(&mut self, map: &HashMap<Key, Value>) {
        self.buf.push('{');
        for (i, (key, value)) in sorted_entries(map).into_iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.buf.push_str(&key);
            self.buf.push(':');
            self.encode(value);
        }
        self.buf.push('}');
    }

    fn encode_record(&mut self, record: &Record) {
        let layout = fields::layout_of(record.ty());
        self.buf.push('{');
        let mut first = true;
        for (i, value) in record.values().iter().enumerate() {
            let Some(name) = layout.encoded_name(i) else {
                continue;
            };
            if !first {
                self.buf.push(',');
            }
            first = false;
            self.buf.push_str(name);
            self.buf.push(':');
            self.encode(value);
        }
        self.buf.push('}');
    }

    fn encode_scalar(&mut self, value: &Value) {
        match value {
            Value::Bool(b) => self.buf.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => {
                let _ = write!(self.buf, "{}", i);
            }
            Value::Uint(u) => {
                let _ = write!(self.buf, "{}", u);
            }
            Value::Float(f) => scalar::write_float(&mut self.buf, *f),
            Value::Complex(re, im) => scalar::write_complex(&mut self.buf, *re, *im),
            Value::String(s) | Value::Opaque(s) => scalar::write_quoted(&mut self.buf, s),
            // containers are dispatched by `encode`
            other => self.encode(other),
        }
    }
}

/// Map entries with their quoted key text, in canonical order.
///
/// Distinct keys with the same text (`3` and `"3"`) fall back to key order so
/// the result never depends on hash iteration order.
pub fn sorted_entries(map: &HashMap<Key, Value>) -> Vec<(String, &Value)> {
    let mut entries: Vec<(String, &Key, &Value)> = map
        .iter()
        .map(|(k, v)| (scalar::key_text(k), k, v))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    entries.into_iter().map(|(text, _, v)| (text, v)).collect()
}

/// Encode a value to its canonical text
pub fn encode(value: &Value) -> String {
    let mut encoder = Encoder::new();
    encoder.encode(value);
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Field, RecordType};

    static MESSAGE: RecordType = RecordType::new(
        "Message",
        &[
            Field::new("Message").rename("msg"),
            Field::new("hidden").private(),
            Field::new("Level"),
        ],
    );

    static NODE: RecordType = RecordType::new("Node", &[Field::new("Name"), Field::new("Next")]);

    #[test]
    fn test_scalars() {
        assert_eq!(encode(&Value::Null), "null");
        assert_eq!(encode(&Value::from(true)), "true");
        assert_eq!(encode(&Value::from(-42)), "-42");
        assert_eq!(encode(&Value::from(u64::MAX)), "18446744073709551615");
        assert_eq!(encode(&Value::from(2.5)), "2.5");
        assert_eq!(encode(&Value::Complex(1.0, -2.0)), "(1-2i)");
        assert_eq!(encode(&Value::from("a\"b")), "\"a\\\"b\"");
        assert_eq!(encode(&Value::opaque(7)), "\"7\"");
    }

    #[test]
    fn test_list_keeps_order() {
        let v = Value::List(vec![Value::from(3), Value::from("x"), Value::Null]);
        assert_eq!(encode(&v), "[3,\"x\",null]");
        assert_eq!(encode(&Value::List(vec![])), "[]");
    }

    #[test]
    fn test_map_sorted_by_quoted_key() {
        let v: Value = [("b", 1), ("a", 2), ("c", 3)].into_iter().collect();
        assert_eq!(encode(&v), "{\"a\":2,\"b\":1,\"c\":3}");
    }

    #[test]
    fn test_map_integer_keys_quoted_and_lexicographic() {
        let v: Value = [(10_i64, "ten"), (2, "two")].into_iter().collect();
        assert_eq!(encode(&v), "{\"10\":\"ten\",\"2\":\"two\"}");
    }

    #[test]
    fn test_map_insertion_order_irrelevant() {
        let a: Value = [("x", 1), ("y", 2), ("z", 3)].into_iter().collect();
        let b: Value = [("z", 3), ("x", 1), ("y", 2)].into_iter().collect();
        assert_eq!(encode(&a), encode(&b));
    }

    #[test]
    fn test_record_rename_and_private() {
        let r = Record::new(
            &MESSAGE,
            [Value::from("hello"), Value::from("secret"), Value::from("INFO")],
        );
        assert_eq!(
            encode(&Value::Record(r)),
            "{\"msg\":\"hello\",\"Level\":\"INFO\"}"
        );
    }

    #[test]
    fn test_self_reference_breaks_to_null() {
        let node = Ref::pending();
        let record = Record::new(&NODE, [Value::from("root"), Value::Ref(node.clone())]);
        node.set(Value::Record(record)).unwrap();

        assert_eq!(
            encode(&Value::Ref(node)),
            "{\"Name\":\"root\",\"Next\":null}"
        );
    }

    #[test]
    fn test_two_node_cycle() {
        let a = Ref::pending();
        let b = Ref::pending();
        a.set(Value::Record(Record::new(&NODE, [Value::from("a"), Value::Ref(b.clone())])))
            .unwrap();
        b.set(Value::Record(Record::new(&NODE, [Value::from("b"), Value::Ref(a.clone())])))
            .unwrap();

        assert_eq!(
            encode(&Value::Ref(a)),
            "{\"Name\":\"a\",\"Next\":{\"Name\":\"b\",\"Next\":null}}"
        );
    }

    #[test]
    fn test_shared_reference_second_visit_is_null() {
        let shared = Ref::new(Value::from(1));
        let v = Value::List(vec![Value::Ref(shared.clone()), Value::Ref(shared)]);
        assert_eq!(encode(&v), "[1,null]");
    }

    #[test]
    fn test_pending_ref_is_null() {
        assert_eq!(encode(&Value::Ref(Ref::pending())), "null");
    }

    #[test]
    fn test_visited_set_is_per_call() {
        let shared = Ref::new(Value::from("s"));
        let v = Value::Ref(shared);
        assert_eq!(encode(&v), "\"s\"");
        assert_eq!(encode(&v), "\"s\"");
    }

    #[test]
    fn test_with_buffer_appends() {
        let mut encoder = Encoder::with_buffer("x=".to_string());
        encoder.encode(&Value::from(1));
        assert_eq!(encoder.as_str(), "x=1");
    }
}
