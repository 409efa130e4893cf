//! Single-pass conversion of sorted dotted attributes into nested JSON objects.
//!
//! The resolver expects its input sorted with [`compare_keys`]: all attributes sharing a path
//! component are then contiguous, members of a group come before a scalar with the group's name,
//! and identical keys keep their original relative order.
//! Under that ordering one linear pass is enough to:
//!
//! - collect the run of attributes belonging to a group and emit it as a nested object,
//! - drop a collected group when a scalar with exactly the group's name follows it,
//! - drop all but the last of several attributes with the same key.
//!
//! No intermediate tree is built.

use std::borrow::Cow;

use chrono::{DateTime, Utc};

use crate::encode::{append_time, encode_value};
use crate::escape::append_string;
use crate::order::compare_keys;
use crate::value::{Attr, MESSAGE_KEY, SEPARATOR, TIMESTAMP_KEY, Value, is_reserved_key};

/// One entry of the working list: a full (prefixed) key and a borrowed value.
#[derive(Debug)]
pub(crate) struct Field<'a> {
    pub(crate) key: Cow<'a, str>,
    pub(crate) value: &'a Value,
}

/// Pushes the non-empty `attrs` onto `fields`, prefixing their keys.
///
/// Keyless groups are inlined. With `top_level` set, attributes using a reserved key are dropped.
pub(crate) fn push_fields<'a>(
    fields: &mut Vec<Field<'a>>,
    prefix: &str,
    attrs: &'a [Attr],
    top_level: bool,
) {
    for attr in attrs {
        if let Some(members) = attr.inlined_members() {
            push_fields(fields, prefix, members, top_level);
            continue;
        }
        if attr.is_empty() {
            tracing::trace!(key = %attr.key, "ignoring empty attribute");
            continue;
        }
        if top_level && is_reserved_key(&attr.key) {
            tracing::trace!(key = %attr.key, "ignoring attribute with reserved key");
            continue;
        }

        let key = if prefix.is_empty() {
            Cow::Borrowed(&*attr.key)
        } else {
            Cow::Owned(format!("{prefix}{}", attr.key))
        };
        fields.push(Field {
            key,
            value: &attr.value,
        });
    }
}

/// Stable sort of `fields` by key.
pub(crate) fn sort_fields(fields: &mut [Field<'_>]) {
    fields.sort_by(|a, b| compare_keys(&a.key, &b.key));
}

/// Appends a complete record object.
///
/// The timestamp and non-empty message come first, followed by the sorted `fields`.
pub(crate) fn resolve_record(
    output: &mut Vec<u8>,
    time: Option<&DateTime<Utc>>,
    message: &str,
    fields: &[Field<'_>],
) {
    output.push(b'{');

    let mut has_value = false;
    if let Some(time) = time {
        append_key(output, has_value, TIMESTAMP_KEY);
        append_time(output, time);
        has_value = true;
    }
    if !message.is_empty() {
        append_key(output, has_value, MESSAGE_KEY);
        append_string(output, message);
        has_value = true;
    }

    resolve_content(output, has_value, 0, fields);
    output.push(b'}');
}

/// Appends the members of a group value as an object.
///
/// Group members are not sorted by the caller, so they go through the same filtering and
/// ordering as record attributes.
pub(crate) fn resolve_members(output: &mut Vec<u8>, members: &[Attr]) {
    let mut fields = Vec::with_capacity(members.len());
    push_fields(&mut fields, "", members, false);
    sort_fields(&mut fields);
    resolve_group(output, 0, &fields);
}

fn resolve_group(output: &mut Vec<u8>, prefix_len: usize, fields: &[Field<'_>]) {
    output.push(b'{');
    resolve_content(output, false, prefix_len, fields);
    output.push(b'}');
}

/// The run of fields collected for the group currently open at one level.
struct OpenGroup<'k> {
    name: &'k str,
    start: usize,
    end: usize,
}

/// Appends the object body for `fields`, ignoring the first `prefix_len` bytes of every key.
fn resolve_content(
    output: &mut Vec<u8>,
    mut has_value: bool,
    prefix_len: usize,
    fields: &[Field<'_>],
) {
    let mut group: Option<OpenGroup<'_>> = None;

    for (index, field) in fields.iter().enumerate() {
        let key = &field.key[prefix_len..];

        if let Some(separator) = key.bytes().position(|byte| byte == SEPARATOR) {
            let name = &key[..separator];
            if let Some(open) = group.as_mut().filter(|open| open.name == name) {
                open.end = index + 1;
                continue;
            }

            if let Some(open) = group.take() {
                flush_group(output, has_value, prefix_len, &open, fields);
                has_value = true;
            }
            group = Some(OpenGroup {
                name,
                start: index,
                end: index + 1,
            });
            continue;
        }

        if group.as_ref().is_some_and(|open| open.name == key) {
            // A scalar named exactly like the open group replaces the group.
            group = None;
        }

        // The last of several identical keys wins.
        if fields
            .get(index + 1)
            .is_some_and(|next| next.key == field.key)
        {
            continue;
        }

        append_field(output, has_value, key, field.value);
        has_value = true;
    }

    if let Some(open) = group {
        flush_group(output, has_value, prefix_len, &open, fields);
    }
}

fn flush_group(
    output: &mut Vec<u8>,
    has_value: bool,
    prefix_len: usize,
    group: &OpenGroup<'_>,
    fields: &[Field<'_>],
) {
    append_key(output, has_value, group.name);
    resolve_group(
        output,
        prefix_len + group.name.len() + 1,
        &fields[group.start..group.end],
    );
}

fn append_field(output: &mut Vec<u8>, has_value: bool, key: &str, value: &Value) {
    append_key(output, has_value, key);
    encode_value(output, value);
}

fn append_key(output: &mut Vec<u8>, has_value: bool, key: &str) {
    if has_value {
        output.push(b',');
    }
    append_string(output, key);
    output.push(b':');
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn resolve(attrs: &[Attr]) -> String {
        let mut fields = Vec::new();
        push_fields(&mut fields, "", attrs, true);
        sort_fields(&mut fields);
        let mut output = Vec::new();
        resolve_record(&mut output, None, "", &fields);
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn nests_dotted_keys() {
        let output = resolve(&[
            Attr::new("log.level", "INFO"),
            Attr::new("event.dataset", "testing"),
            Attr::new("event.action", "test"),
        ]);
        assert_eq!(
            output,
            r#"{"log":{"level":"INFO"},"event":{"dataset":"testing","action":"test"}}"#
        );
    }

    #[test]
    fn deep_nesting() {
        let output = resolve(&[
            Attr::new("a.b.c.d", 1),
            Attr::new("a.b.e", 2),
            Attr::new("a.f", 3),
            Attr::new("g", 4),
        ]);
        assert_eq!(output, r#"{"g":4,"a":{"f":3,"b":{"e":2,"c":{"d":1}}}}"#);
    }

    #[test]
    fn last_duplicate_wins() {
        let output = resolve(&[
            Attr::new("log.syslog.hostname", "slog"),
            Attr::new("user", "first"),
            Attr::new("log.syslog.hostname", "ecslog"),
            Attr::new("log.syslog.priority", 1),
            Attr::new("user", "second"),
        ]);
        assert_eq!(
            output,
            r#"{"user":"second","log":{"syslog":{"priority":1,"hostname":"ecslog"}}}"#
        );
    }

    #[test]
    fn scalar_overrides_group() {
        let output = resolve(&[
            Attr::new("event.action", "test()"),
            Attr::group("event", vec![Attr::new("dataset", "tests")]),
            Attr::new("event.kind", "alert"),
        ]);
        assert_eq!(output, r#"{"event":{"dataset":"tests"}}"#);
    }

    #[test]
    fn scalar_overrides_nested_group() {
        let output = resolve(&[
            Attr::new("http.request.method", "GET"),
            Attr::new("http.request.body.bytes", 10),
            Attr::new("http.request", "raw"),
            Attr::new("http.version", "1.1"),
        ]);
        assert_eq!(output, r#"{"http":{"version":"1.1","request":"raw"}}"#);
    }

    #[test]
    fn repeated_override_is_written_once() {
        let output = resolve(&[
            Attr::new("user.name", "alice"),
            Attr::new("user", "first"),
            Attr::new("user", "second"),
        ]);
        assert_eq!(output, r#"{"user":"second"}"#);
    }

    #[test]
    fn flat_keys_between_groups() {
        let output = resolve(&[
            Attr::new("user.name", "alice"),
            Attr::new("tags", "x"),
            Attr::new("host.name", "edge"),
        ]);
        assert_eq!(
            output,
            r#"{"tags":"x","user":{"name":"alice"},"host":{"name":"edge"}}"#
        );
    }

    #[test]
    fn similar_names_stay_apart() {
        let output = resolve(&[
            Attr::new("event.action", "test()"),
            Attr::new("events.action", "tests"),
            Attr::new("event.dataset", "test"),
            Attr::new("event-id", 3),
        ]);
        assert_eq!(
            output,
            r#"{"event-id":3,"events":{"action":"tests"},"event":{"dataset":"test","action":"test()"}}"#
        );
    }

    #[test]
    fn reserved_and_empty_attributes_are_dropped() {
        let output = resolve(&[
            Attr::new("message", "shadow"),
            Attr::new("@timestamp", "shadow"),
            Attr::new("", "keyless"),
            Attr::group("empty", vec![]),
            Attr::group(
                "",
                vec![Attr::new("inlined", true), Attr::new("message", "shadow")],
            ),
        ]);
        assert_eq!(output, r#"{"inlined":true}"#);
    }

    #[test]
    fn prefixed_fields() {
        let attrs = [Attr::new("syslog.hostname", "edge"), Attr::new("source", "x")];
        let mut fields = Vec::new();
        push_fields(&mut fields, "log.", &attrs, false);
        sort_fields(&mut fields);

        let mut output = Vec::new();
        resolve_record(&mut output, None, "hello \"world\"", &fields);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            indoc! {r#"
                {"message":"hello \"world\"","log":{"source":"x","syslog":{"hostname":"edge"}}}"#
            }
        );
    }

    #[test]
    fn timestamp_and_message_first() {
        let time = DateTime::from_timestamp(946_684_800, 500_000_000).unwrap();
        let attrs = [Attr::new("a", 1)];
        let mut fields = Vec::new();
        push_fields(&mut fields, "", &attrs, true);

        let mut output = Vec::new();
        resolve_record(&mut output, Some(&time), "hi", &fields);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            r#"{"@timestamp":"2000-01-01T00:00:00.5Z","message":"hi","a":1}"#
        );
    }

    /// Builds the expected JSON tree for keys that survive deduplication and overrides.
    fn expected_tree(attrs: &[(String, i64)]) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        for (key, value) in attrs {
            let mut node = &mut root;
            let mut parts = key.split('.').peekable();
            while let Some(part) = parts.next() {
                if parts.peek().is_none() {
                    node.insert(part.to_owned(), json!(value));
                    break;
                }
                let entry = node.entry(part).or_insert_with(|| json!({}));
                if !entry.is_object() {
                    // A scalar already claimed this name and always beats the group.
                    break;
                }
                node = entry.as_object_mut().unwrap();
            }
        }
        serde_json::Value::Object(root)
    }

    fn leaf_key() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[a-c]{1,2}(\\.[a-c]{1,2}){0,2}").unwrap()
    }

    proptest! {
        #[test]
        fn output_tree_matches_key_paths(
            keys in proptest::collection::vec(leaf_key(), 0..16)
        ) {
            let attrs: Vec<(String, i64)> = keys
                .into_iter()
                .enumerate()
                .map(|(index, key)| (key, index as i64))
                .collect();

            // Scalars win over groups of the same name, so apply them last.
            let mut ordered = attrs.clone();
            ordered.sort_by_key(|(key, _)| std::cmp::Reverse(key.matches('.').count()));
            let expected = expected_tree(&ordered);

            let input: Vec<Attr> = attrs
                .iter()
                .map(|(key, value)| Attr::new(key.clone(), *value))
                .collect();
            let output = resolve(&input);
            let decoded: serde_json::Value = serde_json::from_str(&output).unwrap();
            prop_assert_eq!(decoded, expected);
        }
    }
}
