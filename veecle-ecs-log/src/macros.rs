//! Macros for structured logging.
//!
//! # Logging Macros
//!
//! - `log!`: Generic logging macro that accepts a level
//! - `trace!`: Logs trace-level messages (most verbose)
//! - `debug!`: Logs debug-level messages
//! - `info!`: Logs informational messages
//! - `warn!`: Logs warning messages
//! - `error!`: Logs error messages
//! - `fatal!`: Logs fatal error messages
//!
//! The logging macros evaluate to the [`std::io::Result`] of writing the record and record the
//! calling module as `log.origin.function` when source locations are enabled.
//!
//! # Attribute Handling
//!
//! - `attributes!`: Creates a vector of attributes
//! - `attribute!`: Creates a single attribute
//!
//! Keys are written either as a string literal or as a dotted path of identifiers.
//! A bare identifier path uses the variable (or field) of that name as the value.

/// Logs a message at the specified level.
///
/// This is the base logging macro that the level-specific macros build upon.
///
/// # Examples
///
/// ```rust
/// use veecle_ecs_log::export::ConsoleExporter;
/// use veecle_ecs_log::{Handler, Level, Logger, log};
///
/// let logger = Logger::new(Handler::builder().build(ConsoleExporter));
///
/// log!(logger, Level::Info, "Application started").unwrap();
///
/// let port = 8080;
/// log!(logger, Level::Info, "Server listening", port, server.version = "1.0.0", "url.scheme" = "http")
///     .unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $message:expr $(, $($attributes:tt)*)?) => {
        ($logger).log_from(
            ::core::module_path!(),
            $level,
            $message,
            $crate::attributes!($($($attributes)*)?),
        )
    };
}

/// Logs a trace-level message.
///
/// # Examples
///
/// ```rust
/// use veecle_ecs_log::export::ConsoleExporter;
/// use veecle_ecs_log::{Handler, Level, Logger, trace};
///
/// let logger = Logger::new(Handler::builder().min_level(Level::Trace).build(ConsoleExporter));
/// trace!(logger, "Entering function", function = "process_data").unwrap();
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::Level::Trace, $($args)*)
    };
}

/// Logs a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::Level::Debug, $($args)*)
    };
}

/// Logs an info-level message.
///
/// # Examples
///
/// ```rust
/// use veecle_ecs_log::export::ConsoleExporter;
/// use veecle_ecs_log::{Handler, Logger, info};
///
/// let logger = Logger::new(Handler::builder().build(ConsoleExporter));
/// info!(logger, "User logged in", {
///     user.id = 123,
///     "event.action" = "login",
/// })
/// .unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::Level::Info, $($args)*)
    };
}

/// Logs a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::Level::Warn, $($args)*)
    };
}

/// Logs an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::Level::Error, $($args)*)
    };
}

/// Logs a fatal-level message.
///
/// Logging at this level does not terminate the program.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($args:tt)*) => {
        $crate::log!($logger, $crate::Level::Fatal, $($args)*)
    };
}

/// Constructs a vector of attributes.
///
/// # Examples
///
/// ```rust
/// use veecle_ecs_log::attributes;
///
/// let status = 200;
/// let attrs = attributes!(status, http.method = "GET", "url.path" = "/");
/// assert_eq!(attrs.len(), 3);
/// assert_eq!(attrs[1].key, "http.method");
///
/// let attrs = attributes!({ "labels.env" = "prod" });
/// assert_eq!(attrs[0].key, "labels.env");
/// ```
#[macro_export]
macro_rules! attributes {
    ({ $($kvs:tt)* }) => {
        $crate::attributes_inner!(@ { }, { $($kvs)* })
    };
    ($($kvs:tt)*) => {
        $crate::attributes_inner!(@ { }, { $($kvs)* })
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! attributes_inner {
    // Base case, remaining tokens is empty.
    (@ { $($val:expr,)* }, { } ) => {
        ::std::vec![ $($val,)* ]
    };

    // Recursive cases, take one key-value pair, add it to the output, and recurse on the remaining
    // tokens.
    (@ { $($out:expr,)* }, { $($key:ident).+ = $value:expr $(, $($rest:tt)*)? }) => {
        $crate::attributes_inner!(
            @ { $($out,)* $crate::attribute!($($key).+ = $value), },
            { $($($rest)*)? }
        )
    };
    (@ { $($out:expr,)* }, { $key:literal = $value:expr $(, $($rest:tt)*)? }) => {
        $crate::attributes_inner!(
            @ { $($out,)* $crate::attribute!($key = $value), },
            { $($($rest)*)? }
        )
    };
    (@ { $($out:expr,)* }, { $($key:ident).+ $(, $($rest:tt)*)? }) => {
        $crate::attributes_inner!(
            @ { $($out,)* $crate::attribute!($($key).+), },
            { $($($rest)*)? }
        )
    };
}

/// Constructs a single [`Attr`](crate::Attr).
#[macro_export]
macro_rules! attribute {
    ($($key:ident).+ = $value:expr) => {
        $crate::Attr::new(::core::stringify!($($key).+), $value)
    };
    ($key:literal = $value:expr) => {
        $crate::Attr::new($key, $value)
    };
    ($($key:ident).+) => {
        $crate::Attr::new(::core::stringify!($($key).+), $($key).+)
    };
}
