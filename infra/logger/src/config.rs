use crate::error::LoggerError;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;

const DEFAULT_MAX_FILES: usize = 10;

/// How often the rolling file appender starts a new file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Minutely => Self::MINUTELY,
            LogRotation::Hourly => Self::HOURLY,
            LogRotation::Daily => Self::DAILY,
            LogRotation::Never => Self::NEVER,
        }
    }
}

/// Logger settings, deserializable from the `[logger]` table of an application config.
///
/// ```toml
/// [logger]
/// name = "tidings-demo"
/// level = "debug"
/// directory = "logs"
/// rotation = "hourly"
/// filter = "tidings_dispatcher=trace"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Identifier of the log stream; also the prefix of rolling log files.
    pub name: String,
    /// Default level directive, e.g. `info` or `trace`.
    pub level: String,
    pub console: bool,
    /// Writes file output as JSON lines instead of plain text.
    pub json: bool,
    /// Directory for rolling log files. `None` disables file output.
    pub directory: Option<PathBuf>,
    pub rotation: LogRotation,
    pub max_files: usize,
    /// Extra `EnvFilter` directives (e.g. `tidings_dispatcher=trace`). `RUST_LOG` is
    /// consulted only when this is unset.
    pub filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: "tidings".to_owned(),
            level: "info".to_owned(),
            console: true,
            json: false,
            directory: None,
            rotation: LogRotation::default(),
            max_files: DEFAULT_MAX_FILES,
            filter: None,
        }
    }
}

impl LoggerConfig {
    /// Parses [`level`](Self::level) into a filter.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an unknown level name.
    pub fn level_filter(&self) -> Result<LevelFilter, LoggerError> {
        LevelFilter::from_str(self.level.trim()).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid level '{}': {e}", self.level).into(),
            context: None,
        })
    }

    /// Checks everything that can be checked without touching the global subscriber.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for an empty name, an unknown
    /// level, zero `max_files`, or when neither console nor file output is enabled.
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }

        self.level_filter()?;

        if self.max_files == 0 {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
                context: None,
            });
        }

        if !self.console && self.directory.is_none() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        Ok(())
    }
}
