use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use super::Export;

/// An exporter for testing that stores all records in memory.
///
/// This exporter is useful for unit tests and integration tests where you need
/// to verify the exact JSON written for a logging call.
#[derive(Debug)]
pub struct TestExporter {
    /// Shared vector storing all exported records, one entry per line including its newline.
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl TestExporter {
    /// Creates a new test exporter and returns both the exporter and a handle to the line storage.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use veecle_ecs_log::export::TestExporter;
    /// use veecle_ecs_log::{Handler, Logger};
    ///
    /// let (exporter, lines) = TestExporter::new();
    /// let logger = Logger::new(Handler::builder().timestamp(false).build(exporter));
    ///
    /// logger.info("Hello World", vec![]).unwrap();
    /// assert_eq!(
    ///     lines.lock().unwrap()[0],
    ///     "{\"message\":\"Hello World\",\"log\":{\"level\":\"INFO\"}}\n"
    /// );
    /// ```
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                lines: lines.clone(),
            },
            lines,
        )
    }
}

impl Export for TestExporter {
    fn export(&self, line: &[u8]) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(String::from_utf8_lossy(line).into_owned());
        Ok(())
    }
}
