//! Output sinks for encoded records.
//!
//! # Export Trait
//!
//! The [`Export`] trait defines where encoded records go.
//! Custom sinks can be implemented by providing an implementation of this trait.
//!
//! # Built-in Exporters
//!
//! - [`WriterExporter`] - Writes records to any [`std::io::Write`] implementation
//! - [`ConsoleExporter`] - Writes records to stdout
//! - [`TestExporter`] - Collects records in memory for testing purposes

mod test_exporter;
mod writer;

use std::fmt::Debug;
use std::io;

pub use test_exporter::TestExporter;
pub use writer::{ConsoleExporter, WriterExporter};

/// Trait for writing encoded records to an output.
///
/// # Examples
///
/// ```rust
/// use std::io;
///
/// use veecle_ecs_log::export::Export;
///
/// #[derive(Debug)]
/// struct Stderr;
///
/// impl Export for Stderr {
///     fn export(&self, line: &[u8]) -> io::Result<()> {
///         use std::io::Write;
///         io::stderr().lock().write_all(line)
///     }
/// }
/// ```
pub trait Export: Debug + Send + Sync {
    /// Writes one record.
    ///
    /// `line` holds exactly one JSON object followed by a newline.
    /// The slice is reused for the next record once this returns, so implementations must copy
    /// anything they want to keep.
    ///
    /// Errors are returned to the logging caller unchanged.
    fn export(&self, line: &[u8]) -> io::Result<()>;
}

impl<E> Export for Box<E>
where
    E: Export + ?Sized,
{
    fn export(&self, line: &[u8]) -> io::Result<()> {
        (**self).export(line)
    }
}
