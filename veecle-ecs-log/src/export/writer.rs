use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use super::Export;

/// An exporter writing each record to a wrapped [`Write`] implementation.
///
/// Every record is passed to a single [`Write::write_all`] call while holding a lock, so records
/// from concurrent callers never interleave.
///
/// # Examples
///
/// ```rust
/// use veecle_ecs_log::Handler;
/// use veecle_ecs_log::export::WriterExporter;
///
/// let handler = Handler::builder().build(WriterExporter::new(Vec::new()));
/// ```
pub struct WriterExporter<W> {
    writer: Mutex<W>,
}

impl<W> WriterExporter<W>
where
    W: Write + Send,
{
    /// Creates an exporter writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W> fmt::Debug for WriterExporter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterExporter").finish_non_exhaustive()
    }
}

impl<W> Export for WriterExporter<W>
where
    W: Write + Send,
{
    fn export(&self, line: &[u8]) -> io::Result<()> {
        // Poisoning only marks a panic inside the writer; the lock itself stays usable.
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line)
    }
}

/// An exporter that writes records to stdout.
///
/// # Examples
///
/// ```rust
/// use veecle_ecs_log::Handler;
/// use veecle_ecs_log::export::ConsoleExporter;
///
/// let handler = Handler::builder().build(ConsoleExporter);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleExporter;

impl Export for ConsoleExporter {
    fn export(&self, line: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(line)
    }
}
