//! Logging front end.
//!
//! A [`Logger`] consults the level filter of its [`Handler`] before any work is done, builds a
//! [`Record`] with the caller's location and passes it on.
//!
//! # Examples
//!
//! ```rust
//! use veecle_ecs_log::export::TestExporter;
//! use veecle_ecs_log::{Attr, Handler, Logger};
//!
//! let (exporter, lines) = TestExporter::new();
//! let logger = Logger::new(Handler::builder().timestamp(false).build(exporter))
//!     .with([Attr::new("event.dataset", "orders")]);
//!
//! logger.debug("not written", vec![]).unwrap();
//! logger.info("written", vec![Attr::new("event.action", "create")]).unwrap();
//!
//! let lines = lines.lock().unwrap();
//! assert_eq!(lines.len(), 1);
//! assert_eq!(
//!     lines[0],
//!     concat!(
//!         r#"{"message":"written","log":{"level":"INFO"},"#,
//!         r#""event":{"dataset":"orders","action":"create"}}"#,
//!         "\n",
//!     )
//! );
//! ```

use std::borrow::Cow;
use std::io;
use std::panic::Location;

use chrono::{DateTime, Utc};

use crate::Handler;
use crate::level::Level;
use crate::value::Attr;

/// The location a record was emitted from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    /// Module or function path, written as an empty string if unknown.
    pub function: Cow<'static, str>,
    /// Source file path.
    pub file: Cow<'static, str>,
    /// Line within `file`.
    pub line: u32,
}

impl Source {
    /// Returns the location of the caller, which is propagated through `#[track_caller]`
    /// functions.
    #[track_caller]
    pub fn caller(function: &'static str) -> Self {
        let location = Location::caller();
        Self {
            function: Cow::Borrowed(function),
            file: Cow::Borrowed(location.file()),
            line: location.line(),
        }
    }
}

/// One log event as received by a [`Handler`].
#[derive(Clone, Debug)]
pub struct Record {
    /// When the event happened; records without a time never get `@timestamp`.
    pub time: Option<DateTime<Utc>>,
    /// Severity of the event.
    pub level: Level,
    /// Human readable message, omitted from the output when empty.
    pub message: String,
    /// Where the event was emitted from.
    pub source: Option<Source>,
    /// Attributes in the order they were given.
    pub attributes: Vec<Attr>,
}

impl Record {
    /// Creates a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Some(Utc::now()),
            level,
            message: message.into(),
            source: None,
            attributes: Vec::new(),
        }
    }

    /// Replaces the record time.
    pub fn with_time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.time = time;
        self
    }

    /// Sets the emitting location.
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Appends attributes.
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attributes.extend(attrs);
        self
    }
}

/// A handle for emitting records through a [`Handler`].
///
/// Cheap to clone; derived loggers never affect the logger they were derived from.
#[derive(Clone, Debug)]
pub struct Logger {
    handler: Handler,
}

impl Logger {
    /// Creates a logger writing through `handler`.
    pub fn new(handler: Handler) -> Self {
        Self { handler }
    }

    /// Returns the underlying handler.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Returns `true` if records at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// Returns a logger adding `attrs` to every record.
    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(self.handler.with_attrs(attrs))
    }

    /// Returns a logger nesting attributes added afterwards under `name`.
    pub fn with_group(&self, name: &str) -> Self {
        Self::new(self.handler.with_group(name))
    }

    /// Logs `message` at `level`.
    ///
    /// Returns the exporter error if writing the record failed. Records below the level filter are
    /// dropped without error.
    #[track_caller]
    pub fn log(
        &self,
        level: Level,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> io::Result<()> {
        self.log_from("", level, message, attrs)
    }

    /// Logs `message` at `level`, naming `function` as its origin.
    ///
    /// Prefer using the macros, which fill in the module path.
    #[doc(hidden)]
    #[track_caller]
    pub fn log_from(
        &self,
        function: &'static str,
        level: Level,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> io::Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }

        let record = Record::new(level, message)
            .with_source(Source::caller(function))
            .with_attrs(attrs);
        self.handler.handle(&record)
    }

    /// Logs `message` at [`Level::Trace`].
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>, attrs: Vec<Attr>) -> io::Result<()> {
        self.log(Level::Trace, message, attrs)
    }

    /// Logs `message` at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>, attrs: Vec<Attr>) -> io::Result<()> {
        self.log(Level::Debug, message, attrs)
    }

    /// Logs `message` at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, message: impl Into<String>, attrs: Vec<Attr>) -> io::Result<()> {
        self.log(Level::Info, message, attrs)
    }

    /// Logs `message` at [`Level::Warn`].
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>, attrs: Vec<Attr>) -> io::Result<()> {
        self.log(Level::Warn, message, attrs)
    }

    /// Logs `message` at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, message: impl Into<String>, attrs: Vec<Attr>) -> io::Result<()> {
        self.log(Level::Error, message, attrs)
    }

    /// Logs `message` at [`Level::Fatal`].
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>, attrs: Vec<Attr>) -> io::Result<()> {
        self.log(Level::Fatal, message, attrs)
    }
}
