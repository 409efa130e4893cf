//! Record assembly and derived handlers.
//!
//! A [`Handler`] turns a [`Record`] into one line of JSON and hands it to its exporter.
//! Handlers are cheap to clone and immutable: [`Handler::with_attrs`] and
//! [`Handler::with_group`] return new handlers sharing their parent's state, so handlers can be
//! derived from a common ancestor on many threads at once without synchronization.
//!
//! Bound attributes are prepared once when a handler is derived: they are filtered, prefixed
//! with the current group path, and their expensive values are encoded right away so later
//! records only copy the bytes.

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::encode::encode_to_vec;
use crate::export::Export;
use crate::level::Level;
use crate::logger::{Record, Source};
use crate::options::{HandlerBuilder, Options};
use crate::pool::{Pool, Scratch, recycle};
use crate::resolve::{Field, push_fields, resolve_record, sort_fields};
use crate::value::{Attr, Encoded, Value, is_reserved_key};

/// Key of the record level.
pub const LEVEL_KEY: &str = "log.level";

/// Key of the function that emitted the record.
pub const ORIGIN_FUNCTION_KEY: &str = "log.origin.function";

/// Key of the source file that emitted the record.
pub const ORIGIN_FILE_KEY: &str = "log.origin.file";

/// Key of the source line that emitted the record.
pub const ORIGIN_LINE_KEY: &str = "log.origin.line";

/// State shared by a handler and all handlers derived from it.
struct Shared {
    options: Options,
    exporter: Box<dyn Export>,
    pool: Pool,
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("options", &self.options)
            .field("exporter", &self.exporter)
            .finish_non_exhaustive()
    }
}

/// One link of the persistent chain of bound attribute groups.
#[derive(Debug)]
struct Bound {
    parent: Option<Arc<Bound>>,
    /// Prefixed, filtered attributes with pre-encoded expensive values.
    attrs: Arc<[Attr]>,
}

/// Encodes records as newline-delimited JSON.
///
/// # Examples
///
/// ```rust
/// use veecle_ecs_log::export::TestExporter;
/// use veecle_ecs_log::{Attr, Handler, Level, Record};
///
/// let (exporter, lines) = TestExporter::new();
/// let handler = Handler::builder()
///     .timestamp(false)
///     .build(exporter)
///     .with_attrs([Attr::new("service.name", "checkout")])
///     .with_group("http");
///
/// let record = Record::new(Level::Info, "request done")
///     .with_attrs(vec![Attr::new("request.method", "GET")]);
/// handler.handle(&record).unwrap();
///
/// assert_eq!(
///     lines.lock().unwrap()[0],
///     concat!(
///         r#"{"message":"request done","service":{"name":"checkout"},"#,
///         r#""log":{"level":"INFO"},"http":{"request":{"method":"GET"}}}"#,
///         "\n",
///     )
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Handler {
    shared: Arc<Shared>,
    /// Accumulated group path, empty or ending with the separator.
    prefix: Arc<str>,
    bound: Option<Arc<Bound>>,
}

impl Handler {
    /// Creates a builder for configuring a handler.
    pub fn builder() -> HandlerBuilder {
        HandlerBuilder::new()
    }

    pub(crate) fn new(options: Options, exporter: Box<dyn Export>) -> Self {
        Self {
            shared: Arc::new(Shared {
                options,
                exporter,
                pool: Pool::default(),
            }),
            prefix: Arc::from(""),
            bound: None,
        }
    }

    /// Returns the options this handler was built with.
    pub fn options(&self) -> &Options {
        &self.shared.options
    }

    /// Returns `true` if records at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        self.shared.options.level.enabled(level)
    }

    /// Returns a handler that adds `attrs` to every record.
    ///
    /// The attributes are nested under the groups opened with [`with_group`](Self::with_group)
    /// so far. Later bindings and per-record attributes with the same key take precedence.
    pub fn with_attrs<I>(&self, attrs: I) -> Self
    where
        I: IntoIterator<Item = Attr>,
    {
        let mut bound = Vec::new();
        bind_attrs(&mut bound, &self.prefix, attrs, self.prefix.is_empty());
        if bound.is_empty() {
            return self.clone();
        }

        Self {
            shared: self.shared.clone(),
            prefix: self.prefix.clone(),
            bound: Some(Arc::new(Bound {
                parent: self.bound.clone(),
                attrs: bound.into(),
            })),
        }
    }

    /// Returns a handler that nests attributes added afterwards under `name`.
    ///
    /// An empty name returns an equivalent handler.
    pub fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }

        Self {
            shared: self.shared.clone(),
            prefix: format!("{}{name}.", self.prefix).into(),
            bound: self.bound.clone(),
        }
    }

    /// Encodes `record` and writes it to the exporter.
    ///
    /// The level filter is not consulted here; callers check [`enabled`](Self::enabled) before
    /// building a record. The only error is a failed write, returned unchanged.
    pub fn handle(&self, record: &Record) -> io::Result<()> {
        let options = &self.shared.options;
        let Scratch { mut output, fields } = self.shared.pool.take();
        let mut fields = recycle(fields);

        let level = Attr::string(LEVEL_KEY, record.level.as_str());
        let source = record
            .source
            .as_ref()
            .filter(|_| options.include_source)
            .map(source_attrs);

        push_fields(&mut fields, "", std::slice::from_ref(&level), false);
        if let Some(source) = &source {
            push_fields(&mut fields, "", source, false);
        }
        if let Some(bound) = &self.bound {
            push_bound(&mut fields, bound);
        }
        push_fields(
            &mut fields,
            &self.prefix,
            &record.attributes,
            self.prefix.is_empty(),
        );
        sort_fields(&mut fields);

        let time = record.time.as_ref().filter(|_| options.include_timestamp);
        resolve_record(&mut output, time, &record.message, &fields);
        output.push(b'\n');

        let result = self.shared.exporter.export(&output);
        self.shared.pool.put(Scratch {
            output,
            fields: recycle(fields),
        });
        result
    }
}

/// Filters, prefixes and pre-encodes attributes for binding.
fn bind_attrs<I>(bound: &mut Vec<Attr>, prefix: &str, attrs: I, top_level: bool)
where
    I: IntoIterator<Item = Attr>,
{
    for attr in attrs {
        if attr.is_empty() {
            tracing::trace!(key = %attr.key, "ignoring empty attribute");
            continue;
        }
        if top_level && is_reserved_key(&attr.key) {
            tracing::trace!(key = %attr.key, "ignoring attribute with reserved key");
            continue;
        }

        let Attr { key, value } = attr;
        let value = match value {
            Value::Group(members) if key.is_empty() => {
                bind_attrs(bound, prefix, members, top_level);
                continue;
            }
            value if value.is_expensive() => Value::Encoded(Encoded::new(encode_to_vec(&value))),
            value => value,
        };
        let key = if prefix.is_empty() {
            key
        } else {
            Cow::Owned(format!("{prefix}{key}"))
        };
        bound.push(Attr { key, value });
    }
}

/// Pushes the bound attribute groups, oldest binding first.
fn push_bound<'a>(fields: &mut Vec<Field<'a>>, bound: &'a Bound) {
    if let Some(parent) = &bound.parent {
        push_bound(fields, parent);
    }
    push_fields(fields, "", &bound.attrs, false);
}

fn source_attrs(source: &Source) -> [Attr; 3] {
    [
        Attr::string(ORIGIN_FUNCTION_KEY, source.function.clone()),
        Attr::string(ORIGIN_FILE_KEY, source.file.clone()),
        Attr::uint(ORIGIN_LINE_KEY, source.line.into()),
    ]
}
