//! Dynamic value model

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use indexmap::IndexMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::function::Callable;
use super::types::PrimitiveType;

/// Error carried by a rejected [`Deferred`]
pub type SharedError = Arc<anyhow::Error>;

/// A dynamically typed value
///
/// Every variant maps to exactly one [`PrimitiveType`] through
/// [`Value::primitive_type`].
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Undefined,

    /// The null value
    Null,

    /// Boolean value
    Boolean(bool),

    /// Double precision number
    Number(f64),

    /// Integer outside the plain number domain
    BigInt(i128),

    /// String value
    String(String),

    /// Unique symbol
    Symbol(Symbol),

    /// Ordered, indexable array
    Array(Vec<Value>),

    /// Plain object with ordered keys
    Object(IndexMap<String, Value>),

    /// Collection of distinct values
    Set(Vec<Value>),

    /// Key-value collection with arbitrary keys
    Map(Vec<(Value, Value)>),

    /// Lazily produced sequence
    Generator(Generator),

    /// Deferred result, computed when first awaited
    Promise(Deferred),

    /// Callable value
    Function(Callable),
}

impl Value {
    /// Built-in classification of this value, before any custom refinement
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Value::Undefined => PrimitiveType::Undefined,
            Value::Null => PrimitiveType::Null,
            Value::Boolean(_) => PrimitiveType::Boolean,
            Value::Number(_) => PrimitiveType::Number,
            Value::BigInt(_) => PrimitiveType::BigInt,
            Value::String(_) => PrimitiveType::String,
            Value::Symbol(_) => PrimitiveType::Symbol,
            Value::Array(_) => PrimitiveType::Array,
            Value::Object(_) => PrimitiveType::Object,
            Value::Set(_) | Value::Map(_) | Value::Generator(_) => PrimitiveType::Iterable,
            Value::Promise(_) => PrimitiveType::Promise,
            Value::Function(Callable::Sync(_)) => PrimitiveType::Function,
            Value::Function(Callable::Async(_)) => PrimitiveType::AsyncFunction,
        }
    }

    /// Create an object from key-value pairs
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Create a set, dropping duplicate values
    pub fn set<I: IntoIterator<Item = Value>>(values: I) -> Self {
        let mut items: Vec<Value> = Vec::new();
        for value in values {
            if !items.contains(&value) {
                items.push(value);
            }
        }
        Value::Set(items)
    }

    /// Create a fresh symbol with the given description
    pub fn symbol(description: impl AsRef<str>) -> Self {
        Value::Symbol(Symbol::new(description))
    }

    /// Property lookup on objects
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Borrow the string contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric contents
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the callable, if this is a function
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Function(c) => Some(c),
            _ => None,
        }
    }

    /// Check if the value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Produce the values of an array or iterable
    ///
    /// Map entries are produced as two-element arrays. Returns `None` for values
    /// that cannot be iterated.
    pub fn iter_values(&self) -> Option<Box<dyn Iterator<Item = Value> + Send + '_>> {
        match self {
            Value::Array(items) | Value::Set(items) => Some(Box::new(items.iter().cloned())),
            Value::Map(entries) => Some(Box::new(
                entries
                    .iter()
                    .map(|(k, v)| Value::Array(vec![k.clone(), v.clone()])),
            )),
            Value::Generator(generator) => Some(generator.iter()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Generator(a), Value::Generator(b)) => a.ptr_eq(b),
            (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::BigInt(n) => write!(f, "{n}n"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Symbol(s) => write!(f, "Symbol({})", s.description()),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Object(map) => f.debug_map().entries(map).finish(),
            Value::Set(items) => {
                write!(f, "Set ")?;
                f.debug_set().entries(items).finish()
            }
            Value::Map(entries) => {
                write!(f, "Map ")?;
                f.debug_map()
                    .entries(entries.iter().map(|(k, v)| (k, v)))
                    .finish()
            }
            Value::Generator(_) => write!(f, "[object Generator]"),
            Value::Promise(_) => write!(f, "Promise {{ <pending> }}"),
            Value::Function(c) => write!(f, "{c:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
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
        Value::Array(items)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Function(c)
    }
}

impl From<Deferred> for Value {
    fn from(d: Deferred) -> Self {
        Value::Promise(d)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Unique symbol; two symbols are equal only if they are the same symbol
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Create a new, distinct symbol
    pub fn new(description: impl AsRef<str>) -> Self {
        Self(Arc::from(description.as_ref()))
    }

    /// Description given at creation
    pub fn description(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

type ProducerFn = dyn Fn() -> Box<dyn Iterator<Item = Value> + Send> + Send + Sync;

/// Sequence producer that is iterable without being an array
#[derive(Clone)]
pub struct Generator {
    produce: Arc<ProducerFn>,
}

impl Generator {
    /// Create a generator from a function producing a fresh iterator on each call
    pub fn new<F, I>(produce: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Iterator<Item = Value> + Send + 'static,
    {
        Self {
            produce: Arc::new(move || {
                Box::new(produce()) as Box<dyn Iterator<Item = Value> + Send>
            }),
        }
    }

    /// Start a new pass over the sequence
    pub fn iter(&self) -> Box<dyn Iterator<Item = Value> + Send> {
        (self.produce)()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.produce, &other.produce)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Generator")
    }
}

/// Pending result of an asynchronous computation
///
/// Cloning shares the same underlying computation; every clone settles to the
/// same outcome.
#[derive(Clone)]
pub struct Deferred {
    inner: Shared<BoxFuture<'static, Result<Value, SharedError>>>,
}

impl Deferred {
    /// Wrap a future
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self {
            inner: future.map(|result| result.map_err(Arc::new)).boxed().shared(),
        }
    }

    /// A deferred that settles to `value`
    pub fn resolved(value: Value) -> Self {
        Self::new(futures::future::ready(Ok(value)))
    }

    /// A deferred that settles to `error`
    pub fn rejected(error: anyhow::Error) -> Self {
        Self::new(futures::future::ready(Err(error)))
    }

    /// Wait for the outcome
    pub async fn settle(self) -> Result<Value, SharedError> {
        self.inner.await
    }

    /// Outcome if already settled
    pub fn peek(&self) -> Option<&Result<Value, SharedError>> {
        self.inner.peek()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("settled", &self.peek().is_some())
            .finish()
    }
}
