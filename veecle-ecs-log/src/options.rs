//! Handler configuration.
//!
//! Handlers are configured either programmatically through [`HandlerBuilder`] or from a
//! deserialized [`Config`] section of an application configuration file.
//!
//! ```rust
//! use veecle_ecs_log::options::Config;
//! use veecle_ecs_log::export::ConsoleExporter;
//! use veecle_ecs_log::Level;
//!
//! let config: Config = serde_json::from_str(r#"{ "level": "debug", "source": true }"#).unwrap();
//! assert_eq!(config.level, Level::Debug);
//! assert!(config.timestamp);
//!
//! let handler = config.into_builder().build(ConsoleExporter);
//! assert!(handler.enabled(Level::Debug));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Handler;
use crate::export::Export;
use crate::level::Level;

/// Decides which levels a handler emits.
#[derive(Clone)]
pub enum LevelFilter {
    /// Emit records at this level or above.
    Minimum(Level),
    /// Emit records for which the predicate returns `true`.
    Predicate(Arc<dyn Fn(Level) -> bool + Send + Sync>),
}

impl LevelFilter {
    /// Returns `true` if records at `level` pass the filter.
    pub fn enabled(&self, level: Level) -> bool {
        match self {
            LevelFilter::Minimum(minimum) => level >= *minimum,
            LevelFilter::Predicate(predicate) => predicate(level),
        }
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        LevelFilter::Minimum(Level::Info)
    }
}

impl fmt::Debug for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFilter::Minimum(level) => f.debug_tuple("Minimum").field(level).finish(),
            LevelFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Options shared by a handler and every handler derived from it.
#[derive(Clone, Debug)]
pub struct Options {
    /// Write the record time as `@timestamp`.
    pub include_timestamp: bool,
    /// Write the caller location under `log.origin`.
    pub include_source: bool,
    /// Level gate consulted before a record is built.
    pub level: LevelFilter,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            include_timestamp: true,
            include_source: false,
            level: LevelFilter::default(),
        }
    }
}

/// Builder for [`Handler`]s.
///
/// Created via [`Handler::builder`] and finalized with [`build`](HandlerBuilder::build).
///
/// # Examples
///
/// ```rust
/// use veecle_ecs_log::export::TestExporter;
/// use veecle_ecs_log::{Handler, Level};
///
/// let (exporter, _lines) = TestExporter::new();
/// let handler = Handler::builder()
///     .timestamp(false)
///     .source(true)
///     .level_fn(|level| level != Level::Debug)
///     .build(exporter);
///
/// assert!(handler.enabled(Level::Trace));
/// assert!(!handler.enabled(Level::Debug));
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct HandlerBuilder {
    options: Options,
}

impl HandlerBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder starting from `options`.
    pub fn from_options(options: Options) -> Self {
        Self { options }
    }

    /// Sets whether records include `@timestamp` (default `true`).
    pub fn timestamp(mut self, enabled: bool) -> Self {
        self.options.include_timestamp = enabled;
        self
    }

    /// Sets whether records include the caller location (default `false`).
    pub fn source(mut self, enabled: bool) -> Self {
        self.options.include_source = enabled;
        self
    }

    /// Emits records at `level` or above (default [`Level::Info`]).
    ///
    /// Replaces a predicate set with [`level_fn`](Self::level_fn).
    pub fn min_level(mut self, level: Level) -> Self {
        self.options.level = LevelFilter::Minimum(level);
        self
    }

    /// Emits records for which `predicate` returns `true`.
    ///
    /// Replaces a minimum set with [`min_level`](Self::min_level).
    pub fn level_fn<F>(mut self, predicate: F) -> Self
    where
        F: Fn(Level) -> bool + Send + Sync + 'static,
    {
        self.options.level = LevelFilter::Predicate(Arc::new(predicate));
        self
    }

    /// Returns the options configured so far.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Creates a handler writing to `exporter`.
    pub fn build<E>(self, exporter: E) -> Handler
    where
        E: Export + 'static,
    {
        Handler::new(self.options, Box::new(exporter))
    }
}

/// Deserializable handler configuration.
///
/// All fields are optional and default to the [`Options`] defaults.
/// Unknown fields are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Write the record time as `@timestamp`.
    pub timestamp: bool,
    /// Write the caller location under `log.origin`.
    pub source: bool,
    /// Minimum level to emit.
    pub level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timestamp: true,
            source: false,
            level: Level::Info,
        }
    }
}

impl Config {
    /// Converts the configuration into a builder, for further programmatic setup.
    pub fn into_builder(self) -> HandlerBuilder {
        HandlerBuilder::new()
            .timestamp(self.timestamp)
            .source(self.source)
            .min_level(self.level)
    }
}

impl From<Config> for Options {
    fn from(config: Config) -> Self {
        config.into_builder().options
    }
}
