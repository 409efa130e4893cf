//! JSON encoding of single attribute values.
//!
//! Encoding never fails: values that cannot be represented are written as a JSON string holding
//! an `ERR!` diagnostic so the rest of the record is still emitted.

use std::fmt;
use std::io::Write;

use chrono::{DateTime, Timelike, Utc};

use crate::escape::append_string;
use crate::resolve::resolve_members;
use crate::value::{LogValue, Structured, Value};

/// Upper bound on lazy values resolving to further lazy values.
const MAX_LAZY_DEPTH: usize = 100;

/// Appends the JSON encoding of `value`.
///
/// Lazy values are resolved here, once per encoding.
pub fn encode_value(output: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Lazy(lazy) => encode_resolved(output, &resolve_lazy(lazy.as_ref())),
        value => encode_resolved(output, value),
    }
}

/// Encodes `value` into a fresh buffer.
pub(crate) fn encode_to_vec(value: &Value) -> Vec<u8> {
    let mut output = Vec::new();
    encode_value(&mut output, value);
    output
}

fn resolve_lazy(lazy: &dyn LogValue) -> Value {
    let mut value = lazy.log_value();
    for _ in 1..MAX_LAZY_DEPTH {
        value = match value {
            Value::Lazy(next) => next.log_value(),
            resolved => return resolved,
        };
    }

    match value {
        Value::Lazy(_) => Value::String(
            format!("ERR! lazy value not resolved after {MAX_LAZY_DEPTH} steps").into(),
        ),
        resolved => resolved,
    }
}

fn encode_resolved(output: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Bool(true) => output.extend_from_slice(b"true"),
        Value::Bool(false) => output.extend_from_slice(b"false"),
        Value::I64(value) => push_display(output, value),
        Value::U64(value) => push_display(output, value),
        Value::Duration(value) => push_display(output, value.as_nanos()),
        Value::F64(value) if !value.is_finite() => {
            append_diagnostic(output, format_args!("unsupported float value: {value}"));
        }
        Value::F64(value) => append_structured(output, value),
        Value::Time(value) => append_time(output, value),
        Value::String(value) => append_string(output, value),
        Value::Group(members) => resolve_members(output, members),
        Value::Encoded(encoded) => output.extend_from_slice(encoded.as_bytes()),
        Value::Any(value) => append_structured(output, value.as_ref()),
        Value::Lazy(_) => append_diagnostic(output, format_args!("unresolved lazy value")),
    }
}

/// Appends `time` as a quoted RFC 3339 timestamp with up to nanosecond precision.
///
/// Trailing zeros of the fractional second are omitted, as is a zero fraction.
pub(crate) fn append_time(output: &mut Vec<u8>, time: &DateTime<Utc>) {
    output.push(b'"');
    push_display(output, time.format("%Y-%m-%dT%H:%M:%S"));
    // Leap seconds carry the extra second in the nanosecond field.
    let nanos = time.nanosecond() % 1_000_000_000;
    if nanos != 0 {
        push_display(output, format_args!(".{nanos:09}"));
        while output.last() == Some(&b'0') {
            output.pop();
        }
    }
    output.extend_from_slice(b"Z\"");
}

fn append_structured(output: &mut Vec<u8>, value: &dyn Structured) {
    let start = output.len();
    if let Err(error) = value.write_json(output) {
        output.truncate(start);
        append_diagnostic(output, format_args!("{error}"));
    }
}

fn append_diagnostic(output: &mut Vec<u8>, message: fmt::Arguments<'_>) {
    tracing::warn!(diagnostic = %message, "attribute value encoded as diagnostic");
    append_string(output, &format!("ERR! {message}"));
}

fn push_display(output: &mut Vec<u8>, value: impl fmt::Display) {
    // Writing into a `Vec` cannot fail.
    let _ = write!(output, "{value}");
}
