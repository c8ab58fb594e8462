use std::collections::{BTreeMap, HashMap};

use rustybind::{encode, Encoder, Field, Key, Record, RecordType, Ref, Value};

static LOG_LINE: RecordType = RecordType::new(
    "LogLine",
    &[
        Field::new("Message").rename("msg"),
        Field::new("Level"),
        Field::new("attempts").private(),
    ],
);

static NODE: RecordType = RecordType::new("Node", &[Field::new("Value"), Field::new("Next")]);

#[test]
fn test_rename_override() {
    let line = Record::new(&LOG_LINE, [Value::from("hi"), Value::from("WARN"), Value::from(3)]);
    assert_eq!(
        encode(&Value::Record(line)),
        "{\"msg\":\"hi\",\"Level\":\"WARN\"}"
    );
}

#[test]
fn test_self_referencing_record_terminates() {
    let node = Ref::pending();
    let record = Record::new(&NODE, [Value::from(1), Value::Ref(node.clone())]);
    node.set(Value::Record(record)).unwrap();

    assert_eq!(encode(&Value::Ref(node)), "{\"Value\":1,\"Next\":null}");
}

#[test]
fn test_long_chain_with_back_edge() {
    let refs: Vec<Ref> = (0..5).map(|_| Ref::pending()).collect();
    for (i, r) in refs.iter().enumerate() {
        let next = refs[(i + 1) % refs.len()].clone();
        r.set(Value::Record(Record::new(&NODE, [Value::from(i), Value::Ref(next)])))
            .unwrap();
    }
    assert_eq!(
        encode(&Value::Ref(refs[0].clone())),
        "{\"Value\":0,\"Next\":{\"Value\":1,\"Next\":{\"Value\":2,\"Next\":\
         {\"Value\":3,\"Next\":{\"Value\":4,\"Next\":null}}}}}"
    );
}

#[test]
fn test_map_determinism_across_insertion_orders() {
    let keys = ["delta", "alpha", "charlie", "bravo", "10", "2"];
    let mut forward = HashMap::new();
    for (i, k) in keys.iter().enumerate() {
        forward.insert(Key::from(*k), Value::from(i));
    }
    let mut backward = HashMap::new();
    for (i, k) in keys.iter().enumerate().rev() {
        backward.insert(Key::from(*k), Value::from(i));
    }

    let a = encode(&Value::Map(forward));
    let b = encode(&Value::Map(backward));
    assert_eq!(a, b);
    assert_eq!(
        a,
        "{\"10\":4,\"2\":5,\"alpha\":1,\"bravo\":3,\"charlie\":2,\"delta\":0}"
    );
}

#[test]
fn test_numeric_keys_order_lexicographically() {
    let map: BTreeMap<i64, &str> = [(2, "two"), (10, "ten"), (1, "one")].into_iter().collect();
    assert_eq!(
        encode(&Value::from(map)),
        "{\"1\":\"one\",\"10\":\"ten\",\"2\":\"two\"}"
    );
}

#[test]
fn test_nested_structures() {
    let inner: Value = [("k", Value::list([1.5, -0.0]))].into_iter().collect();
    let v = Value::List(vec![inner, Value::Null, Value::from(Some("x")), Value::from(None::<i32>)]);
    assert_eq!(encode(&v), "[{\"k\":[1.5,-0]},null,\"x\",null]");
}

#[test]
fn test_floats_use_shortest_form() {
    assert_eq!(encode(&Value::from(0.1)), "0.1");
    assert_eq!(encode(&Value::from(1e21)), "1e+21");
    assert_eq!(encode(&Value::from(123456.0)), "123456");
    assert_eq!(encode(&Value::from(1234567.0)), "1.234567e+06");
    assert_eq!(encode(&Value::from(0.00001)), "1e-05");
    assert_eq!(encode(&Value::from(f64::NAN)), "NaN");
    assert_eq!(encode(&Value::from(f64::NEG_INFINITY)), "-Inf");
}

#[test]
fn test_string_escaping() {
    assert_eq!(encode(&Value::from("tab\there")), "\"tab\\there\"");
    assert_eq!(encode(&Value::from("line\n")), "\"line\\n\"");
    assert_eq!(encode(&Value::from("back\\slash")), "\"back\\\\slash\"");
    assert_eq!(encode(&Value::from("\u{1}")), "\"\\x01\"");
    assert_eq!(encode(&Value::from("héllo")), "\"héllo\"");
    assert_eq!(encode(&Value::from("para\u{2029}")), "\"para\\u2029\"");
}

#[test]
fn test_encoder_reused_keeps_visited() {
    let shared = Ref::new(Value::from("s"));
    let mut encoder = Encoder::new();
    encoder.encode(&Value::Ref(shared.clone()));
    encoder.encode(&Value::Ref(shared));
    assert_eq!(encoder.finish(), "\"s\"null");
}

#[test]
fn test_encode_from_many_threads() {
    let line = Value::Record(Record::new(&LOG_LINE, [Value::from("m"), Value::from("I")]));
    let expected = encode(&line);
    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| assert_eq!(encode(&line), expected));
        }
    });
}
