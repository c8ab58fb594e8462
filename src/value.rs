//! Value Model
//!
//! Everything a template renders is a [`Value`]: a closed set of runtime
//! shapes (scalars, sequences, maps, records, shared references, nil).
//! Both the path evaluator and the encoder consume it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::encode::fields;

/// Refs that point straight at other refs are followed at most this far.
const MAX_REF_HOPS: usize = 64;

static NULL: Value = Value::Null;

/// A runtime value
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub enum Value {
    /// Absent value / nil
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    /// Complex number as (real, imaginary)
    Complex(f64, f64),
    String(String),
    /// Host value of an unsupported kind, carried as its string form
    Opaque(String),
    /// Ordered sequence
    List(Vec<Value>),
    /// Unordered associative map
    Map(HashMap<Key, Value>),
    /// Struct-like value with declared fields
    Record(Record),
    /// Shared reference with identity
    Ref(Ref),
}

/// Map key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Uint(u64),
    String(String),
}

impl Key {
    /// String content, for string keys
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is an integer key equal to `n`
    pub fn is_position(&self, n: usize) -> bool {
        match self {
            Key::Int(i) => usize::try_from(*i).is_ok_and(|i| i == n),
            Key::Uint(u) => usize::try_from(*u).is_ok_and(|u| u == n),
            _ => false,
        }
    }
}

/// One declared field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    ident: &'static str,
    rename: Option<&'static str>,
    exported: bool,
}

impl Field {
    /// An exported field rendered under its own identifier
    pub const fn new(ident: &'static str) -> Self {
        Field {
            ident,
            rename: None,
            exported: true,
        }
    }

    /// Render this field under `name` instead of its identifier
    pub const fn rename(self, name: &'static str) -> Self {
        Field {
            rename: Some(name),
            ..self
        }
    }

    /// Hide this field from paths and from the encoder
    pub const fn private(self) -> Self {
        Field {
            exported: false,
            ..self
        }
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn renamed(&self) -> Option<&'static str> {
        self.rename
    }

    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Name used in encoded output
    pub fn encoded_name(&self) -> &'static str {
        self.rename.unwrap_or(self.ident)
    }
}

/// Declaration of a record type: its name and fields in declaration order.
///
/// Declare these as `static` items. The encoder caches field layouts by the
/// address of the declaration.
///
/// ```
/// use rustybind::{Field, RecordType};
///
/// static EVENT: RecordType = RecordType::new(
///     "Event",
///     &[Field::new("Message").rename("msg"), Field::new("secret").private()],
/// );
/// assert_eq!(EVENT.fields().len(), 2);
/// ```
#[derive(Debug)]
pub struct RecordType {
    name: &'static str,
    fields: &'static [Field],
}

impl RecordType {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        RecordType { name, fields }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }
}

/// An instance of a [`RecordType`]: one value per declared field.
#[derive(Debug, Clone)]
pub struct Record {
    ty: &'static RecordType,
    values: Vec<Value>,
}

impl Record {
    /// Build a record from field values in declaration order.
    ///
    /// Missing trailing values are `Null`; extra values are dropped.
    pub fn new(ty: &'static RecordType, values: impl IntoIterator<Item = Value>) -> Self {
        let mut values: Vec<Value> = values.into_iter().collect();
        values.resize(ty.fields.len(), Value::Null);
        Record { ty, values }
    }

    pub fn ty(&self) -> &'static RecordType {
        self.ty
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Exported field by declared identifier
    pub fn get(&self, ident: &str) -> Option<&Value> {
        let layout = fields::layout_of(self.ty);
        layout.index_of(ident).and_then(|i| self.values.get(i))
    }

    /// Replace an exported field's value. Returns false if there is no such field.
    pub fn set(&mut self, ident: &str, value: Value) -> bool {
        let layout = fields::layout_of(self.ty);
        match layout.index_of(ident).and_then(|i| self.values.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ty, other.ty) && self.values == other.values
    }
}

/// Shared reference to a value.
///
/// Identity is the address of the shared cell, so clones of one `Ref` are the
/// same reference. A ref can be created empty and filled once, which is how
/// self-referencing graphs are built:
///
/// ```
/// use rustybind::{Ref, Value};
///
/// let node = Ref::pending();
/// let list = Value::List(vec![Value::from(1), Value::Ref(node.clone())]);
/// node.set(list).unwrap();
/// assert_eq!(rustybind::encode(&Value::Ref(node)), "[1,null]");
/// ```
///
/// Cyclic graphs built this way are never freed.
#[derive(Clone, Default)]
pub struct Ref(Arc<OnceLock<Value>>);

impl Ref {
    pub fn new(value: Value) -> Self {
        Ref(Arc::new(OnceLock::from(value)))
    }

    /// A reference with no target yet; behaves as nil until [`set`](Self::set)
    pub fn pending() -> Self {
        Ref(Arc::new(OnceLock::new()))
    }

    /// Fill a pending reference. Gives the value back if already set.
    pub fn set(&self, value: Value) -> Result<(), Value> {
        self.0.set(value)
    }

    pub fn get(&self) -> Option<&Value> {
        self.0.get()
    }

    /// Identity of the referenced cell
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref({:#x})", self.addr())
    }
}

impl PartialEq for Ref {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Value {
    /// Value of an unsupported host kind, kept as its display form
    pub fn opaque(value: impl fmt::Display) -> Self {
        Value::Opaque(value.to_string())
    }

    /// Build a list from anything convertible
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the runtime shape, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::Complex(..) => "complex",
            Value::String(_) => "string",
            Value::Opaque(_) => "opaque",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Ref(_) => "ref",
        }
    }

    /// Follow references to the value they point at; unset refs resolve to `Null`.
    pub fn resolve(&self) -> &Value {
        let mut current = self;
        for _ in 0..MAX_REF_HOPS {
            match current {
                Value::Ref(r) => match r.get() {
                    Some(v) => current = v,
                    None => return &NULL,
                },
                other => return other,
            }
        }
        &NULL
    }

    /// Emptiness as a scope: nil, false, zero, and empty strings and collections.
    ///
    /// References are judged by whether they are set, not by their target.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Uint(u) => *u == 0,
            Value::Float(f) => *f == 0.0,
            Value::Complex(re, im) => *re == 0.0 && *im == 0.0,
            Value::String(s) => s.is_empty(),
            Value::Opaque(_) => false,
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::Record(_) => false,
            Value::Ref(r) => r.get().is_none(),
        }
    }

    /// Field of a record (by identifier) or string key of a map
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self.resolve() {
            Value::Record(record) => record.get(name),
            Value::Map(map) => map.get(&Key::String(name.to_string())),
            _ => None,
        }
    }

    /// String key of a map
    pub fn key(&self, key: &str) -> Option<&Value> {
        match self.resolve() {
            Value::Map(map) => map.get(&Key::String(key.to_string())),
            _ => None,
        }
    }

    /// Position in a list, or integer key of a map
    pub fn position(&self, n: usize) -> Option<&Value> {
        match self.resolve() {
            Value::List(items) => items.get(n),
            Value::Map(map) => map.iter().find(|(k, _)| k.is_position(n)).map(|(_, v)| v),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )*
    };
}

impl_from!(Int as i64: i8, i16, i32, i64, isize);
impl_from!(Uint as u64: u8, u16, u32, u64, usize);
impl_from!(Float as f64: f32, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

impl From<Ref> for Value {
    fn from(v: Ref) -> Self {
        Value::Ref(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::list(v)
    }
}

impl<K: Into<Key>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(v: HashMap<K, V>) -> Self {
        v.into_iter().collect()
    }
}

impl<K: Into<Key>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(v: BTreeMap<K, V>) -> Self {
        v.into_iter().collect()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

macro_rules! impl_key_from {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Key {
                fn from(v: $t) -> Self {
                    Key::$variant(v as $target)
                }
            }
        )*
    };
}

impl_key_from!(Int as i64: i8, i16, i32, i64, isize);
impl_key_from!(Uint as u64: u8, u16, u32, u64, usize);

impl From<bool> for Key {
    fn from(v: bool) -> Self {
        Key::Bool(v)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::String(v.to_string())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::String(v)
    }
}
