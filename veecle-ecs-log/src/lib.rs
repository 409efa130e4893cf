//! # `veecle-ecs-log`
//!
//! A structured logging encoder writing one JSON object per record, in the shape expected by
//! Elastic Common Schema consumers.
//!
//! Attribute keys use dot notation to describe nested objects: `event.action` and
//! `event.dataset` end up as members of one `event` object.
//! Keys are grouped, deduplicated and nested in a single pass over a specially ordered list of
//! attributes, without building an intermediate tree.
//!
//! ## Features
//!
//! - **Nesting**: dotted keys become nested JSON objects
//! - **Last wins**: repeated keys keep the most recently bound value
//! - **Derived handlers**: bind attributes and groups once, reuse them for every record
//! - **Lazy values**: compute expensive values only when a record is actually written
//! - **Exporters**: write to stdout, any [`std::io::Write`], or collect in memory for tests
//!
//! ## Basic Usage
//!
//! ```rust
//! use veecle_ecs_log::export::TestExporter;
//! use veecle_ecs_log::{Handler, Logger, info};
//!
//! let (exporter, lines) = TestExporter::new();
//! let handler = Handler::builder().timestamp(false).build(exporter);
//! let logger = Logger::new(handler).with(veecle_ecs_log::attributes!("event.action" = "test"));
//!
//! info!(logger, "Test!").unwrap();
//!
//! assert_eq!(
//!     lines.lock().unwrap()[0],
//!     "{\"message\":\"Test!\",\"log\":{\"level\":\"INFO\"},\"event\":{\"action\":\"test\"}}\n"
//! );
//! ```
//!
//! ## Key Resolution
//!
//! - A key bound later replaces an identical key bound earlier, and per-record attributes
//!   replace bound ones.
//! - A scalar whose key is exactly the name of a group replaces the whole group:
//!   `user.name` and `user.id` are dropped when `user` is also set.
//! - Empty groups and attributes without a key are ignored; a keyless group contributes its
//!   members directly.
//! - `@timestamp` and `message` are reserved at the top level.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod encode;
pub mod error;
pub mod escape;
pub mod export;
mod handler;
pub mod level;
mod logger;
mod macros;
pub mod options;
pub mod order;
mod pool;
mod resolve;
pub mod value;

pub use encode::encode_value;
pub use error::ParseLevelError;
pub use handler::{Handler, LEVEL_KEY, ORIGIN_FILE_KEY, ORIGIN_FUNCTION_KEY, ORIGIN_LINE_KEY};
pub use level::Level;
pub use logger::{Logger, Record, Source};
pub use options::{Config, HandlerBuilder, LevelFilter, Options};
pub use value::{Attr, Encoded, LogValue, MESSAGE_KEY, Structured, TIMESTAMP_KEY, Value};
