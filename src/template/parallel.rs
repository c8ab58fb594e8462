//! Parallel binding
//!
//! Uses Rayon to render many events through one template, or one event
//! through many templates. Binders are immutable, so no locking is involved.

use rayon::prelude::*;

use super::binder::Binder;
use crate::value::Value;

/// Bind each value with the same template, preserving input order
pub fn bind_parallel(binder: &Binder, values: &[Value]) -> Vec<String> {
    values.par_iter().map(|value| binder.bind(value)).collect()
}

/// Bind one value with several named templates
pub fn bind_each(binders: &[(&str, &Binder)], value: &Value) -> Vec<(String, String)> {
    binders
        .par_iter()
        .map(|(name, binder)| (name.to_string(), binder.bind(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(n: i64) -> Value {
        [("n", Value::from(n)), ("app", Value::from("svc"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_bind_parallel_keeps_order() {
        let binder = Binder::compile("{\"n\":$(n)}").unwrap();
        let values: Vec<Value> = (1..=50).map(event).collect();

        let results = bind_parallel(&binder, &values);
        assert_eq!(results.len(), 50);
        assert_eq!(results[0], "{\"n\":1}");
        assert_eq!(results[49], "{\"n\":50}");
        assert!(results.iter().zip(&values).all(|(r, v)| *r == binder.bind(v)));
    }

    #[test]
    fn test_bind_each() {
        let logger = Binder::compile("$(app): $(n)").unwrap();
        let meter = Binder::compile("[$(n)]").unwrap();
        let binders = [("logger", &logger), ("meter", &meter)];

        let results = bind_each(&binders, &event(7));
        assert_eq!(
            results,
            vec![
                ("logger".to_string(), "\"svc\":7".to_string()),
                ("meter".to_string(), "[7]".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let binder = Binder::compile("x").unwrap();
        assert!(bind_parallel(&binder, &[]).is_empty());
        assert!(bind_each(&[], &Value::Null).is_empty());
    }
}
