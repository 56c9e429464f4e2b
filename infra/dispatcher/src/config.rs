use crate::error::DispatcherError;
use serde::Deserialize;

const DEFAULT_NAME: &str = "dispatcher";
/// Listener count for a single event that usually means subscriptions are leaking.
const DEFAULT_LISTENER_WARN_THRESHOLD: usize = 64;

/// Runtime knobs of a [`Dispatcher`](crate::Dispatcher).
///
/// Deserializable so it can be embedded in an application config file:
///
/// ```toml
/// [dispatcher]
/// name = "ui"
/// listener_warn_threshold = 128
/// trace_emissions = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Label attached to every diagnostic record of the dispatcher.
    pub name: String,
    /// Logs a warning when one event reaches this many listeners. `None` disables it.
    pub listener_warn_threshold: Option<usize>,
    /// Emits a `trace` record with the outcome of every emission.
    pub trace_emissions: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            listener_warn_threshold: Some(DEFAULT_LISTENER_WARN_THRESHOLD),
            trace_emissions: true,
        }
    }
}

impl DispatcherConfig {
    /// Checks the values a deserialized or hand-built config may get wrong.
    ///
    /// # Errors
    /// Returns [`DispatcherError::InvalidConfiguration`] for an empty name or a
    /// zero warning threshold.
    pub fn validate(&self) -> Result<(), DispatcherError> {
        if self.name.trim().is_empty() {
            return Err(DispatcherError::InvalidConfiguration {
                message: "name cannot be empty".into(),
                context: None,
            });
        }

        if self.listener_warn_threshold == Some(0) {
            return Err(DispatcherError::InvalidConfiguration {
                message: "listener_warn_threshold must be greater than zero".into(),
                context: Some("use `None` to disable the warning".into()),
            });
        }

        Ok(())
    }
}
