//! Key-value attribute types for log records.
//!
//! Attributes are key-value pairs that are attached to a log record either at the call site or
//! when deriving a [`Handler`](crate::Handler) with [`with_attrs`](crate::Handler::with_attrs).
//! Keys use dot notation (`"event.action"`) to describe nested JSON objects.
//!
//! # Value Types
//!
//! The [`Value`] enum is closed over the kinds the encoder knows how to write:
//! - **Bool**, **I64**, **U64**, **F64**: JSON literals and numbers
//! - **Duration**: integer nanoseconds
//! - **Time**: RFC 3339 string
//! - **String**: escaped JSON string
//! - **Group**: nested object built from member attributes
//! - **Lazy**: resolved right before encoding
//! - **Any**: anything implementing [`serde::Serialize`]
//!
//! # Examples
//!
//! ```rust
//! use veecle_ecs_log::{Attr, Value};
//!
//! let action = Attr::new("event.action", "login");
//! let port = Attr::new("server.port", 8080_u64);
//! let admin = Attr::new("user.admin", true);
//! let labels = Attr::any("labels", vec!["a", "b"]);
//!
//! assert!(matches!(port.value, Value::U64(8080)));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Key reserved for the record timestamp at the top level.
pub const TIMESTAMP_KEY: &str = "@timestamp";

/// Key reserved for the record message at the top level.
pub const MESSAGE_KEY: &str = "message";

/// Separator between the components of a dotted key.
pub(crate) const SEPARATOR: u8 = b'.';

/// Returns `true` for keys that user attributes may not occupy at the top level.
pub(crate) fn is_reserved_key(key: &str) -> bool {
    key == TIMESTAMP_KEY || key == MESSAGE_KEY
}

/// A key-value attribute pair attached to a log record.
///
/// # Examples
///
/// ```rust
/// use veecle_ecs_log::Attr;
///
/// let hostname = Attr::new("log.syslog.hostname", "edge-01");
/// let priority = Attr::int("log.syslog.priority", 1);
/// let origin = Attr::group("source", vec![Attr::new("ip", "10.0.0.1")]);
/// ```
#[derive(Clone, Debug)]
pub struct Attr {
    /// The dotted attribute key.
    pub key: Cow<'static, str>,
    /// The attribute value.
    pub value: Value,
}

impl Attr {
    /// Creates a new attribute.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<Cow<'static, str>>,
        V: Into<Value>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a string attribute.
    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    /// Creates a signed integer attribute.
    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, Value::I64(value))
    }

    /// Creates an unsigned integer attribute.
    pub fn uint(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, Value::U64(value))
    }

    /// Creates a floating point attribute.
    pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, Value::F64(value))
    }

    /// Creates a boolean attribute.
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    /// Creates a duration attribute, encoded as integer nanoseconds.
    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self::new(key, Value::Duration(value))
    }

    /// Creates a timestamp attribute.
    pub fn time(key: impl Into<Cow<'static, str>>, value: DateTime<Utc>) -> Self {
        Self::new(key, Value::Time(value))
    }

    /// Creates a group attribute, encoded as a nested object.
    ///
    /// A group without a key has its members inlined into the enclosing level.
    pub fn group(key: impl Into<Cow<'static, str>>, members: Vec<Attr>) -> Self {
        Self::new(key, Value::Group(members))
    }

    /// Creates an attribute from any serializable value.
    pub fn any<T>(key: impl Into<Cow<'static, str>>, value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Self::new(key, Value::Any(Arc::new(value)))
    }

    /// Creates an attribute whose value is computed right before it is encoded.
    pub fn lazy<F>(key: impl Into<Cow<'static, str>>, value: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::new(key, Value::Lazy(Arc::new(value)))
    }

    /// Returns `true` if this attribute is a no-op and must be ignored.
    ///
    /// That is the case for an empty group, and for a keyless attribute that is not a group
    /// (keyless groups are inlined instead).
    pub fn is_empty(&self) -> bool {
        match &self.value {
            Value::Group(members) => members.is_empty(),
            _ => self.key.is_empty(),
        }
    }

    /// Returns the members of a keyless group, which replace the attribute itself.
    pub(crate) fn inlined_members(&self) -> Option<&[Attr]> {
        match &self.value {
            Value::Group(members) if self.key.is_empty() => Some(members),
            _ => None,
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// A value whose computation is deferred until the record is encoded.
///
/// Implemented for every `Fn() -> Value`; implement it directly for types that know how to
/// present themselves in a log.
pub trait LogValue: Send + Sync {
    /// Produces the value to encode.
    fn log_value(&self) -> Value;
}

impl<F> LogValue for F
where
    F: Fn() -> Value + Send + Sync,
{
    fn log_value(&self) -> Value {
        self()
    }
}

/// Object-safe view of a [`serde::Serialize`] value.
pub trait Structured: fmt::Debug + Send + Sync {
    /// Writes the value as compact JSON into `output`.
    fn write_json(&self, output: &mut Vec<u8>) -> serde_json::Result<()>;
}

impl<T> Structured for T
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn write_json(&self, output: &mut Vec<u8>) -> serde_json::Result<()> {
        serde_json::to_writer(output, self)
    }
}

/// JSON text produced when a handler captured an attribute value.
///
/// Only the handler creates these; the bytes are copied into the output unchanged.
#[derive(Clone, PartialEq, Eq)]
pub struct Encoded(Arc<[u8]>);

impl Encoded {
    pub(crate) fn new(json: Vec<u8>) -> Self {
        Self(json.into())
    }

    /// Returns the encoded JSON text.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Encoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Encoded")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

/// A value that can be stored in an attribute.
#[derive(Clone)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    I64(i64),
    /// A 64-bit unsigned integer.
    U64(u64),
    /// A 64-bit floating-point number.
    F64(f64),
    /// A duration, encoded as integer nanoseconds.
    Duration(Duration),
    /// A point in time, encoded as an RFC 3339 string.
    Time(DateTime<Utc>),
    /// A string value.
    String(Cow<'static, str>),
    /// A nested group of attributes.
    Group(Vec<Attr>),
    /// A value resolved right before encoding.
    Lazy(Arc<dyn LogValue>),
    /// An arbitrary serializable value.
    Any(Arc<dyn Structured>),
    /// Already encoded JSON, captured by [`Handler::with_attrs`](crate::Handler::with_attrs).
    Encoded(Encoded),
}

impl Value {
    /// Returns `true` for the kinds that are worth encoding once when bound to a handler.
    pub(crate) fn is_expensive(&self) -> bool {
        matches!(self, Value::Group(_) | Value::Any(_) | Value::Lazy(_))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Value::I64(value) => f.debug_tuple("I64").field(value).finish(),
            Value::U64(value) => f.debug_tuple("U64").field(value).finish(),
            Value::F64(value) => f.debug_tuple("F64").field(value).finish(),
            Value::Duration(value) => f.debug_tuple("Duration").field(value).finish(),
            Value::Time(value) => f.debug_tuple("Time").field(value).finish(),
            Value::String(value) => f.debug_tuple("String").field(value).finish(),
            Value::Group(members) => f.debug_tuple("Group").field(members).finish(),
            Value::Lazy(_) => f.write_str("Lazy(..)"),
            Value::Any(value) => f.debug_tuple("Any").field(value).finish(),
            Value::Encoded(value) => value.fmt(f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Strings get delimiters so the end of the value stays visible.
            Value::String(value) => write!(f, "{value:?}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::I64(value) => write!(f, "{value}"),
            Value::U64(value) => write!(f, "{value}"),
            Value::F64(value) => write!(f, "{value}"),
            Value::Duration(value) => write!(f, "{value:?}"),
            Value::Time(value) => write!(f, "{value}"),
            Value::Group(members) => {
                f.write_str("{")?;
                for (index, member) in members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str("}")
            }
            Value::Lazy(_) => f.write_str("<lazy>"),
            Value::Any(value) => write!(f, "{value:?}"),
            Value::Encoded(value) => f.write_str(&String::from_utf8_lossy(value.as_bytes())),
        }
    }
}

impl From<Cow<'static, str>> for Value {
    fn from(value: Cow<'static, str>) -> Self {
        Value::String(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into())
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::String(Cow::Borrowed(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I64(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::U64(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::U64(value.into())
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::U64(value as u64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::Duration(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Time(value)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(value: Vec<Attr>) -> Self {
        Value::Group(value)
    }
}
