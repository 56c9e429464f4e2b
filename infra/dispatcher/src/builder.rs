use crate::config::DispatcherConfig;
use crate::dispatcher::Dispatcher;
use crate::error::DispatcherError;
use crate::event::EventMap;
use crate::listener::{FailureHook, ListenerFailure};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Configures and builds a [`Dispatcher`].
///
/// ```rust
/// use tidings_dispatcher::{Dispatcher, EventMap};
///
/// enum Ui {}
/// impl EventMap for Ui {
///     const NAME: &'static str = "Ui";
/// }
///
/// # fn main() -> Result<(), tidings_dispatcher::DispatcherError> {
/// let dispatcher = Dispatcher::<Ui>::builder()
///     .name("ui")
///     .listener_warn_threshold(Some(16))
///     .on_failure(|failure| eprintln!("{failure}"))
///     .build()?;
/// assert_eq!(dispatcher.name(), "ui");
/// # Ok(())
/// # }
/// ```
pub struct DispatcherBuilder<M> {
    config: DispatcherConfig,
    on_failure: Option<FailureHook>,
    _map: PhantomData<fn() -> M>,
}

impl<M: EventMap> DispatcherBuilder<M> {
    pub(crate) fn new() -> Self {
        Self { config: DispatcherConfig::default(), on_failure: None, _map: PhantomData }
    }

    /// Replaces every config value at once, e.g. with one loaded from a file.
    #[must_use = "The builder must be configured before it can be used to build the dispatcher."]
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the label attached to diagnostics.
    #[must_use = "The builder must be configured before it can be used to build the dispatcher."]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the per-event listener count that triggers a leak warning.
    #[must_use = "The builder must be configured before it can be used to build the dispatcher."]
    pub const fn listener_warn_threshold(mut self, threshold: Option<usize>) -> Self {
        self.config.listener_warn_threshold = threshold;
        self
    }

    /// Toggles the per-emission `trace` record.
    #[must_use = "The builder must be configured before it can be used to build the dispatcher."]
    pub const fn trace_emissions(mut self, enabled: bool) -> Self {
        self.config.trace_emissions = enabled;
        self
    }

    /// Installs a hook that receives every [`ListenerFailure`] in addition to the log.
    ///
    /// The hook runs on the emitting thread, right after the failing listener.
    /// A panic inside the hook is caught and logged.
    #[must_use = "The builder must be configured before it can be used to build the dispatcher."]
    pub fn on_failure(mut self, hook: impl Fn(&ListenerFailure) + Send + Sync + 'static) -> Self {
        self.on_failure = Some(Arc::new(hook));
        self
    }

    /// Validates the configuration and creates the dispatcher.
    ///
    /// # Errors
    /// Returns [`DispatcherError::InvalidConfiguration`] if the configuration is invalid.
    pub fn build(self) -> Result<Dispatcher<M>, DispatcherError> {
        self.config.validate()?;
        Ok(Dispatcher::from_parts(self.config, self.on_failure))
    }
}

impl<M> fmt::Debug for DispatcherBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("config", &self.config)
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}
