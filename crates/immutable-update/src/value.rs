//! The value model the engine updates, and the predicates that classify it.
//!
//! Containers and sequences are shared behind [`Arc`], so copying a value is
//! a pointer bump and "unchanged" can be decided by pointer identity (see
//! [`Value::same`]).

use crate::error::UpdateResult;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// A caller-supplied unary function, the argument of `$apply`.
pub type Func = Arc<dyn Fn(&Value) -> UpdateResult<Value> + Send + Sync>;

// ------------------------------------------------------------------ Symbol

/// An opaque key token.
///
/// Two symbols are equal only if they come from the same [`Symbol::new`]
/// call (or the same [`Symbol::for_name`] registration); the description is
/// informational.
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Creates a fresh symbol, distinct from every other symbol.
    pub fn new(description: &str) -> Self {
        Symbol(Arc::from(description))
    }

    /// Returns the process-wide symbol registered under `name`, creating it
    /// on first use.
    pub fn for_name(name: &str) -> Self {
        static REGISTRY: OnceLock<Mutex<HashMap<String, Symbol>>> = OnceLock::new();
        let mut registry = REGISTRY
            .get_or_init(Default::default)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        registry
            .entry(name.to_string())
            .or_insert_with(|| Symbol::new(name))
            .clone()
    }

    pub fn description(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0) as *const u8, state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

// --------------------------------------------------------------------- Key

/// A container key: either a string or an opaque [`Symbol`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    Symbol(Symbol),
}

/// Largest key accepted as a sequence index (`2^32 - 2`).
pub const MAX_INDEX: usize = u32::MAX as usize - 1;

impl Key {
    /// Interprets the key as a sequence index.
    ///
    /// Only canonical decimal forms up to [`MAX_INDEX`] qualify: `"0"` and
    /// `"12"` do, `"012"`, `"-1"`, `"1.0"` and `"4294967295"` do not.
    pub fn as_index(&self) -> Option<usize> {
        let Key::Str(s) = self else { return None };
        let canonical = s == "0"
            || (!s.is_empty() && !s.starts_with('0') && s.bytes().all(|b| b.is_ascii_digit()));
        if !canonical {
            return None;
        }
        s.parse::<u64>()
            .ok()
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&n| n <= MAX_INDEX)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            Key::Symbol(_) => None,
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::Str(s.clone())
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Str(index.to_string())
    }
}

impl From<Symbol> for Key {
    fn from(symbol: Symbol) -> Self {
        Key::Symbol(symbol)
    }
}

impl From<&Symbol> for Key {
    fn from(symbol: &Symbol) -> Self {
        Key::Symbol(symbol.clone())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => f.write_str(s),
            Key::Symbol(sym) => write!(f, "Symbol({})", sym.description()),
        }
    }
}

// --------------------------------------------------------------- Container

/// An insertion-ordered key-value container.
///
/// A container may be backed by a `proto` container: keys of the proto are
/// visible through [`Container::get`] but are not *own* keys, so they are
/// neither copied into nor removable from the container itself.
#[derive(Clone, Default)]
pub struct Container {
    entries: IndexMap<Key, Value>,
    proto: Option<Arc<Container>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty container backed by `proto`.
    pub fn with_proto(proto: Arc<Container>) -> Self {
        Container {
            entries: IndexMap::new(),
            proto: Some(proto),
        }
    }

    pub fn proto(&self) -> Option<&Arc<Container>> {
        self.proto.as_ref()
    }

    /// Whether `key` is held directly by this container.
    pub fn has_own(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get_own(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Looks `key` up in this container, then along the proto chain.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        let mut node = self;
        loop {
            if let Some(value) = node.entries.get(key) {
                return Some(value);
            }
            node = node.proto.as_deref()?;
        }
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes an own key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Own keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    /// Own entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Container {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Container {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            proto: None,
        }
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        let protos_equal = match (&self.proto, &other.proto) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        };
        protos_equal
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.entries.get(k).is_some_and(|o| v == o))
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

// ------------------------------------------------------------------- Value

/// Coarse classification of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Undefined,
    Null,
    Bool,
    Number,
    String,
    Symbol,
    Function,
    Sequence,
    Container,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Symbol => "symbol",
            ValueKind::Function => "function",
            ValueKind::Sequence => "array",
            ValueKind::Container => "object",
        }
    }
}

/// A node of a target or spec tree.
#[derive(Clone, Default)]
pub enum Value {
    /// An absent value, e.g. what a missing key reads as.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    Function(Func),
    Sequence(Arc<Vec<Value>>),
    Container(Arc<Container>),
}

impl Value {
    /// Builds a container value from `(key, value)` pairs.
    pub fn object<K, V, I>(entries: I) -> Value
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Container(Arc::new(entries.into_iter().collect()))
    }

    /// Builds a sequence value.
    pub fn array<V: Into<Value>, I: IntoIterator<Item = V>>(items: I) -> Value {
        Value::Sequence(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Wraps a closure as a function value.
    pub fn func<F>(f: F) -> Value
    where
        F: Fn(&Value) -> UpdateResult<Value> + Send + Sync + 'static,
    {
        Value::Function(Arc::new(f))
    }

    pub fn symbol(symbol: &Symbol) -> Value {
        Value::Symbol(symbol.clone())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Function(_) => ValueKind::Function,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Container(_) => ValueKind::Container,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Container(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_container(&self) -> Option<&Arc<Container>> {
        match self {
            Value::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Arc<Vec<Value>>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Func> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Reads a child: a container key (through the proto chain) or a
    /// sequence index.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        let key = key.into();
        match self {
            Value::Container(c) => c.get(&key),
            Value::Sequence(items) => key.as_index().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Reference identity.
    ///
    /// Sequences, containers and functions are the same only if they share an
    /// allocation; scalars are the same if they are equal (so `NaN` is never
    /// the same as anything).
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            (Value::Sequence(a), Value::Sequence(b)) => Arc::ptr_eq(a, b),
            (Value::Container(a), Value::Container(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Structural equality; functions still compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Sequence(a), Value::Sequence(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Container(a), Value::Container(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => self.same(other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(Arc::new(items))
    }
}

impl From<Container> for Value {
    fn from(container: Container) -> Self {
        Value::Container(Arc::new(container))
    }
}

impl From<Arc<Container>> for Value {
    fn from(container: Arc<Container>) -> Self {
        Value::Container(container)
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}

// ----------------------------------------------------------------- Display

pub(crate) fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

struct Nested<'a>(&'a Value);

impl fmt::Display for Nested<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => write!(f, "{s:?}"),
            other => fmt::Display::fmt(other, f),
        }
    }
}

/// Human-readable rendering used in error messages. Top-level strings are
/// written bare; strings nested in containers are quoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => format_number(*n, f),
            Value::String(s) => f.write_str(s),
            Value::Symbol(sym) => write!(f, "Symbol({})", sym.description()),
            Value::Function(_) => f.write_str("function"),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", Nested(item))?;
                }
                f.write_str("]")
            }
            Value::Container(c) => {
                f.write_str("{")?;
                for (i, (key, value)) in c.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {}", Nested(value))?;
                }
                f.write_str("}")
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "{b:?}"),
            Value::Number(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(sym) => write!(f, "{sym:?}"),
            Value::Function(_) => f.write_str("Function"),
            Value::Sequence(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Container(c) => fmt::Debug::fmt(c.as_ref(), f),
        }
    }
}
