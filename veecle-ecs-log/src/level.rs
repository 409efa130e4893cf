//! Log record severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseLevelError;

/// Log record severity levels.
///
/// These levels follow standard logging conventions, ordered from most verbose
/// to most critical.
/// The upper-case label of a level is written to the `log.level` field of every record.
///
/// # Examples
///
/// ```rust
/// use veecle_ecs_log::Level;
///
/// assert!(Level::Warn > Level::Info);
/// assert_eq!(Level::Warn.as_str(), "WARN");
/// assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
/// ```
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// The "trace" level.
    ///
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// The "debug" level.
    ///
    /// Designates lower priority information.
    Debug,

    /// The "info" level.
    ///
    /// Designates useful information.
    #[default]
    Info,

    /// The "warn" level.
    ///
    /// Designates hazardous situations.
    #[serde(alias = "warning")]
    Warn,

    /// The "error" level.
    ///
    /// Designates very serious errors.
    Error,

    /// The "fatal" level.
    ///
    /// Designates critical failures that might crash the program.
    Fatal,
}

impl Level {
    /// All levels, from most verbose to most critical.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Returns the label written to the `log.level` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.eq_ignore_ascii_case("warning") {
            return Ok(Level::Warn);
        }

        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(input))
            .ok_or_else(|| ParseLevelError::new(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("trace", Level::Trace)]
    #[test_case("DEBUG", Level::Debug)]
    #[test_case("Info", Level::Info)]
    #[test_case("warn", Level::Warn)]
    #[test_case("WARNING", Level::Warn)]
    #[test_case("error", Level::Error)]
    #[test_case("fatal", Level::Fatal)]
    fn parses(input: &str, expected: Level) {
        assert_eq!(input.parse::<Level>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown() {
        let error = "verbose".parse::<Level>().unwrap_err();
        assert_eq!(error.to_string(), "unknown log level `verbose`");
    }

    #[test]
    fn ordered_by_severity() {
        let mut sorted = Level::ALL;
        sorted.sort();
        assert_eq!(sorted, Level::ALL);
    }

    #[test]
    fn labels_round_trip() {
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>(), Ok(level));
        }
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), r#""warn""#);
        assert_eq!(
            serde_json::from_str::<Level>(r#""warning""#).unwrap(),
            Level::Warn
        );
        assert_eq!(
            serde_json::from_str::<Level>(r#""debug""#).unwrap(),
            Level::Debug
        );
        assert!(serde_json::from_str::<Level>(r#""DEBUG""#).is_err());
    }
}
