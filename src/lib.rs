//! RustyBind - Placeholder templates over structured values
//!
//! Templates carry `$(Field.Sub[0].*)` placeholders naming a path through a
//! value. Compile a template once, bind it per event:
//!
//! ```
//! use rustybind::Value;
//!
//! let binder = rustybind::compile("{\"app\": $(App), \"ids\": $(items.*.id)}").unwrap();
//! let one: Value = [("id", 1)].into_iter().collect();
//! let two: Value = [("id", 2)].into_iter().collect();
//! let event: Value = [("App", Value::from("api")), ("items", Value::List(vec![one, two]))]
//!     .into_iter()
//!     .collect();
//!
//! assert_eq!(rustybind::bind(&binder, &event), "{\"app\":\"api\",\"ids\":12}");
//! ```
//!
//! Components:
//! - path: placeholder path lexer, parser, compiler, evaluator
//! - encode: deterministic, cycle-safe structural encoder
//! - template: binder, compiled template cache, parallel binding
//!
//! Only compilation fails. Binding and encoding always produce text.

pub mod core;
pub mod encode;
pub mod error;
pub mod path;
pub mod template;
pub mod value;

pub use encode::Encoder;
pub use error::{Result, TemplateSyntaxError};
pub use path::CompiledRule;
pub use template::{compile_cached, Binder, CompileOptions, Placeholder, TemplateCache};
#[cfg(feature = "parallel")]
pub use template::{bind_each, bind_parallel};
pub use value::{Field, Key, Record, RecordType, Ref, Value};

// ============================================================================
// Templates
// ============================================================================

/// Compile a template with default options
pub fn compile(text: &str) -> Result<Binder> {
    Binder::compile(text)
}

/// Compile a template with explicit options
pub fn compile_with(text: &str, options: CompileOptions) -> Result<Binder> {
    Binder::compile_with(text, options)
}

/// Render a compiled template against `value`
pub fn bind(binder: &Binder, value: &Value) -> String {
    binder.bind(value)
}

// ============================================================================
// Encoding
// ============================================================================

/// Canonical text of `value`
pub fn encode(value: &Value) -> String {
    encode::encode(value)
}
