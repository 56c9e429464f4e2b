use crate::builder::DispatcherBuilder;
use crate::config::DispatcherConfig;
use crate::error::DispatcherError;
use crate::event::{Event, EventMap};
use crate::listener::{
    FailureHook, FailureKind, Listener, ListenerFailure, ListenerResult, panic_message,
};
use crate::subscription::{Subscription, SubscriptionGuard, SubscriptionId};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, trace, warn};

struct Entry<P> {
    id: SubscriptionId,
    listener: Listener<P>,
}

impl<P> Clone for Entry<P> {
    fn clone(&self) -> Self {
        Self { id: self.id, listener: self.listener.clone() }
    }
}

/// Payload-independent view of one event's registrations.
trait Entries: Send + Sync {
    fn count(&self) -> usize;
    fn has(&self, id: SubscriptionId) -> bool;
    fn discard(&mut self, id: SubscriptionId) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<P: 'static> Entries for Vec<Entry<P>> {
    fn count(&self) -> usize {
        self.len()
    }

    fn has(&self, id: SubscriptionId) -> bool {
        self.iter().any(|entry| entry.id == id)
    }

    fn discard(&mut self, id: SubscriptionId) -> bool {
        self.iter().position(|entry| entry.id == id).map(|index| self.remove(index)).is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct Slot {
    event: &'static str,
    entries: Box<dyn Entries>,
}

impl Slot {
    fn new<P: 'static>(event: &'static str) -> Self {
        Self { event, entries: Box::new(Vec::<Entry<P>>::new()) }
    }

    fn typed<P: 'static>(&self) -> Option<&Vec<Entry<P>>> {
        let entries = self.entries.as_any().downcast_ref::<Vec<Entry<P>>>();
        if entries.is_none() {
            error!(
                event = self.event,
                payload = std::any::type_name::<P>(),
                "Listener slot type mismatch"
            );
        }
        entries
    }

    fn typed_mut<P: 'static>(&mut self) -> Option<&mut Vec<Entry<P>>> {
        let event = self.event;
        let entries = self.entries.as_any_mut().downcast_mut::<Vec<Entry<P>>>();
        if entries.is_none() {
            error!(event, payload = std::any::type_name::<P>(), "Listener slot type mismatch");
        }
        entries
    }
}

/// Erased state shared by a dispatcher and its subscriptions.
///
/// A slot is present only while its event has at least one registration.
pub(crate) struct Registry {
    slots: RwLock<FxHashMap<TypeId, Slot>>,
    next_id: AtomicU64,
    config: DispatcherConfig,
    on_failure: Option<FailureHook>,
    map: &'static str,
}

impl Registry {
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn contains(&self, key: TypeId, id: SubscriptionId) -> bool {
        self.slots.read().get(&key).is_some_and(|slot| slot.entries.has(id))
    }

    pub(crate) fn remove(&self, key: TypeId, id: SubscriptionId) -> bool {
        let (event, remaining) = {
            let mut slots = self.slots.write();
            let Some(slot) = slots.get_mut(&key) else {
                return false;
            };
            if !slot.entries.discard(id) {
                return false;
            }
            let event = slot.event;
            let remaining = slot.entries.count();
            if remaining == 0 {
                slots.remove(&key);
            }
            (event, remaining)
        };

        trace!(
            dispatcher = %self.config.name,
            event,
            subscription = %id,
            remaining,
            "Listener unsubscribed"
        );
        true
    }

    fn report(&self, failure: &ListenerFailure) {
        error!(
            dispatcher = %failure.dispatcher,
            map = failure.map,
            event = failure.event,
            subscription = %failure.subscription,
            kind = %failure.kind,
            error = %failure.message,
            "Listener failed; continuing dispatch"
        );

        if let Some(hook) = &self.on_failure
            && panic::catch_unwind(AssertUnwindSafe(|| hook(failure))).is_err()
        {
            warn!(
                dispatcher = %failure.dispatcher,
                event = failure.event,
                "Failure hook panicked while handling a listener failure"
            );
        }
    }
}

/// Outcome of one emission, for callers that want to observe the fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitReport {
    pub event: &'static str,
    /// Listeners called, failed ones included.
    pub invoked: usize,
    pub failed: usize,
}

impl EmitReport {
    const fn new(event: &'static str) -> Self {
        Self { event, invoked: 0, failed: 0 }
    }

    /// Listeners that completed without panicking or returning an error.
    #[must_use]
    pub const fn delivered(&self) -> usize {
        self.invoked - self.failed
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// A strongly-typed, synchronous publish/subscribe dispatcher.
///
/// Listeners are kept per event name of the map `M`, in registration order.
/// [`emit`](Self::emit) calls them one after another on the calling thread and
/// isolates every call: a listener that panics or returns an error is reported
/// to the log (and the optional failure hook) and the remaining listeners still
/// run.
///
/// # Re-entrancy
///
/// Each emission iterates over a snapshot of the registrations taken when it
/// starts, and no lock is held while listeners run. A listener may therefore
/// call back into the dispatcher: registrations added during an emission are
/// first called by the next one, and registrations removed during an emission
/// are still called by the one in progress.
///
/// A listener that calls back into its own dispatcher should capture a
/// [`WeakDispatcher`] from [`downgrade`](Self::downgrade). A captured strong
/// handle is owned by the registrations it reaches, so they are never freed.
///
/// Cloning is cheap and yields a handle to the same registrations.
///
/// ```rust
/// use tidings_dispatcher::{Dispatcher, event_map};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// #[event_map]
/// pub enum Counter {
///     Added(u64),
///     Reset,
/// }
///
/// let dispatcher = Dispatcher::<Counter>::new();
/// let total = Arc::new(AtomicU64::new(0));
///
/// let sink = Arc::clone(&total);
/// let subscription = dispatcher.on::<counter::Added>(move |n| {
///     sink.fetch_add(*n, Ordering::SeqCst);
/// });
///
/// dispatcher.emit::<counter::Added>(5);
/// dispatcher.emit::<counter::Added>(7);
/// dispatcher.notify::<counter::Reset>();
/// assert_eq!(total.load(Ordering::SeqCst), 12);
///
/// subscription.unsubscribe();
/// assert_eq!(dispatcher.subscriber_count::<counter::Added>(), 0);
/// ```
pub struct Dispatcher<M> {
    registry: Arc<Registry>,
    _map: PhantomData<fn() -> M>,
}

impl<M: EventMap> Dispatcher<M> {
    /// Creates a dispatcher with no registrations and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(DispatcherConfig::default(), None)
    }

    /// Returns a [`DispatcherBuilder`] for custom configuration and a failure hook.
    #[must_use = "The builder must be configured before it can be used to build the dispatcher."]
    pub fn builder() -> DispatcherBuilder<M> {
        DispatcherBuilder::new()
    }

    /// Creates a dispatcher from a configuration, e.g. one loaded from a file.
    ///
    /// # Errors
    /// Returns [`DispatcherError::InvalidConfiguration`] if the configuration is invalid.
    pub fn with_config(config: DispatcherConfig) -> Result<Self, DispatcherError> {
        Self::builder().config(config).build()
    }

    pub(crate) fn from_parts(config: DispatcherConfig, on_failure: Option<FailureHook>) -> Self {
        Self {
            registry: Arc::new(Registry {
                slots: RwLock::new(FxHashMap::default()),
                next_id: AtomicU64::new(1),
                config,
                on_failure,
                map: M::NAME,
            }),
            _map: PhantomData,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.registry.config.name
    }

    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.registry.config
    }

    /// Creates a handle that does not keep the registrations alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakDispatcher<M> {
        WeakDispatcher { registry: Arc::downgrade(&self.registry), _map: PhantomData }
    }

    /// Returns `true` when both handles share the same registrations.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.registry, &other.registry)
    }

    /// Registers `listener` for `E` after every existing registration.
    ///
    /// The returned [`Subscription`] removes exactly this registration. Dropping
    /// it keeps the listener registered; see [`on_scoped`](Self::on_scoped).
    pub fn on<E: Event<M>>(
        &self,
        listener: impl Fn(&E::Payload) + Send + Sync + 'static,
    ) -> Subscription {
        self.on_listener::<E>(Listener::new(listener))
    }

    /// Registers a listener whose `Err` results are reported as failures.
    pub fn try_on<E: Event<M>>(
        &self,
        listener: impl Fn(&E::Payload) -> ListenerResult + Send + Sync + 'static,
    ) -> Subscription {
        self.on_listener::<E>(Listener::fallible(listener))
    }

    /// Like [`on`](Self::on), but the registration ends when the guard is dropped.
    pub fn on_scoped<E: Event<M>>(
        &self,
        listener: impl Fn(&E::Payload) + Send + Sync + 'static,
    ) -> SubscriptionGuard {
        SubscriptionGuard::new(self.on::<E>(listener))
    }

    /// Registers a shared [`Listener`] so it can later be removed with [`off`](Self::off).
    ///
    /// Registering the same listener twice yields two independent registrations.
    pub fn on_listener<E: Event<M>>(&self, listener: Listener<E::Payload>) -> Subscription {
        let key = TypeId::of::<E>();
        let id = self.registry.next_id();

        let count = {
            let mut slots = self.registry.slots.write();
            let slot = slots.entry(key).or_insert_with(|| Slot::new::<E::Payload>(E::NAME));
            slot.typed_mut::<E::Payload>().map(|entries| {
                entries.push(Entry { id, listener });
                entries.len()
            })
        };

        let Some(count) = count else {
            return Subscription::new(std::sync::Weak::new(), key, E::NAME, id);
        };

        trace!(
            dispatcher = %self.name(),
            event = E::NAME,
            subscription = %id,
            listeners = count,
            "Listener registered"
        );

        if self.registry.config.listener_warn_threshold == Some(count) {
            warn!(
                dispatcher = %self.name(),
                event = E::NAME,
                listeners = count,
                "Listener count reached the warning threshold; subscriptions may be leaking"
            );
        }

        Subscription::new(Arc::downgrade(&self.registry), key, E::NAME, id)
    }

    /// Removes every registration of `listener` for `E`.
    ///
    /// Returns the number of registrations removed; absent listeners are a no-op.
    pub fn off<E: Event<M>>(&self, listener: &Listener<E::Payload>) -> usize {
        let key = TypeId::of::<E>();

        let (removed, remaining) = {
            let mut slots = self.registry.slots.write();
            let Some(entries) = slots.get_mut(&key).and_then(Slot::typed_mut::<E::Payload>) else {
                return 0;
            };
            let before = entries.len();
            entries.retain(|entry| !entry.listener.same_as(listener));
            let remaining = entries.len();
            if remaining == 0 {
                slots.remove(&key);
            }
            (before - remaining, remaining)
        };

        if removed > 0 {
            trace!(
                dispatcher = %self.name(),
                event = E::NAME,
                removed,
                remaining,
                "Listener removed"
            );
        }
        removed
    }

    /// Delivers `payload` to every listener of `E`, in registration order.
    ///
    /// Never fails: listener failures are isolated, reported, and counted in
    /// the returned [`EmitReport`].
    pub fn emit<E: Event<M>>(&self, payload: E::Payload) -> EmitReport {
        self.emit_ref::<E>(&payload)
    }

    /// Emits an event whose payload carries no value.
    pub fn notify<E: Event<M, Payload = ()>>(&self) -> EmitReport {
        self.emit_ref::<E>(&())
    }

    /// Same as [`emit`](Self::emit) for a payload the caller keeps.
    pub fn emit_ref<E: Event<M>>(&self, payload: &E::Payload) -> EmitReport {
        let snapshot = self.snapshot::<E>();
        let mut report = EmitReport::new(E::NAME);

        for entry in &snapshot {
            report.invoked += 1;

            let (kind, message) =
                match panic::catch_unwind(AssertUnwindSafe(|| entry.listener.call(payload))) {
                    Ok(Ok(())) => continue,
                    Ok(Err(err)) => (FailureKind::Returned, Cow::Owned(err.to_string())),
                    Err(panic) => (FailureKind::Panicked, panic_message(panic.as_ref())),
                };

            report.failed += 1;
            self.registry.report(&ListenerFailure {
                dispatcher: Cow::Owned(self.registry.config.name.clone()),
                map: self.registry.map,
                event: E::NAME,
                subscription: entry.id,
                kind,
                message,
            });
        }

        if self.registry.config.trace_emissions {
            trace!(
                dispatcher = %self.name(),
                event = E::NAME,
                invoked = report.invoked,
                failed = report.failed,
                "Event dispatched"
            );
        }

        report
    }

    /// Number of active registrations for `E`.
    #[must_use]
    pub fn subscriber_count<E: Event<M>>(&self) -> usize {
        self.registry.slots.read().get(&TypeId::of::<E>()).map_or(0, |slot| slot.entries.count())
    }

    #[must_use]
    pub fn has_subscribers<E: Event<M>>(&self) -> bool {
        self.registry.slots.read().contains_key(&TypeId::of::<E>())
    }

    /// Names of the events that currently have listeners, sorted.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> =
            self.registry.slots.read().values().map(|slot| slot.event).collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` when no event has listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.slots.read().is_empty()
    }

    /// Removes every registration of `E`. Returns how many were removed.
    pub fn clear_event<E: Event<M>>(&self) -> usize {
        let removed = self.registry.slots.write().remove(&TypeId::of::<E>());
        let count = removed.map_or(0, |slot| slot.entries.count());
        if count > 0 {
            debug!(dispatcher = %self.name(), event = E::NAME, removed = count, "Event cleared");
        }
        count
    }

    /// Removes every registration of every event.
    ///
    /// Returns the number of event names that had listeners.
    pub fn clear_all(&self) -> usize {
        let count = {
            let mut slots = self.registry.slots.write();
            let count = slots.len();
            slots.clear();
            count
        };
        debug!(dispatcher = %self.name(), events = count, "All listeners cleared");
        count
    }

    fn snapshot<E: Event<M>>(&self) -> Vec<Entry<E::Payload>> {
        self.registry
            .slots
            .read()
            .get(&TypeId::of::<E>())
            .and_then(Slot::typed::<E::Payload>)
            .map(|entries| entries.to_vec())
            .unwrap_or_default()
    }
}

impl<M: EventMap> Default for Dispatcher<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for Dispatcher<M> {
    fn clone(&self) -> Self {
        Self { registry: Arc::clone(&self.registry), _map: PhantomData }
    }
}

/// Non-owning handle to a [`Dispatcher`], obtained with [`Dispatcher::downgrade`].
pub struct WeakDispatcher<M> {
    registry: Weak<Registry>,
    _map: PhantomData<fn() -> M>,
}

impl<M> WeakDispatcher<M> {
    /// Returns the dispatcher while any strong handle to it is alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Dispatcher<M>> {
        self.registry.upgrade().map(|registry| Dispatcher { registry, _map: PhantomData })
    }
}

impl<M> Clone for WeakDispatcher<M> {
    fn clone(&self) -> Self {
        Self { registry: Weak::clone(&self.registry), _map: PhantomData }
    }
}

impl<M> fmt::Debug for WeakDispatcher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakDispatcher")
            .field("alive", &(self.registry.strong_count() > 0))
            .finish()
    }
}

impl<M> fmt::Debug for Dispatcher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.registry.config.name)
            .field("map", &self.registry.map)
            .field("events", &self.registry.slots.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Probe {}
    impl EventMap for Probe {
        const NAME: &'static str = "Probe";
    }

    struct Ping;
    impl Event<Probe> for Ping {
        type Payload = u8;
        const NAME: &'static str = "ping";
    }

    #[test]
    fn empty_sequences_are_never_stored() {
        let dispatcher = Dispatcher::<Probe>::new();
        let listener = Listener::new(|_: &u8| {});

        dispatcher.on_listener::<Ping>(listener.clone());
        assert!(dispatcher.has_subscribers::<Ping>());

        assert_eq!(dispatcher.off::<Ping>(&listener), 1);
        assert!(!dispatcher.has_subscribers::<Ping>());
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn subscription_ids_are_unique_per_dispatcher() {
        let dispatcher = Dispatcher::<Probe>::new();
        let a = dispatcher.on::<Ping>(|_| {});
        let b = dispatcher.on::<Ping>(|_| {});
        assert_ne!(a.id(), b.id());
        assert!(a.id() < b.id());
    }

    #[test]
    fn subscriptions_do_not_keep_the_dispatcher_alive() {
        let dispatcher = Dispatcher::<Probe>::new();
        let subscription = dispatcher.on::<Ping>(|_| {});
        drop(dispatcher);

        assert!(!subscription.is_active());
        assert!(!subscription.unsubscribe());
    }

    #[test]
    fn with_config_validates_before_building() {
        let config = DispatcherConfig { name: "probe".to_owned(), ..DispatcherConfig::default() };
        let dispatcher = Dispatcher::<Probe>::with_config(config).expect("valid configuration");
        assert_eq!(dispatcher.name(), "probe");

        let invalid = DispatcherConfig { name: String::new(), ..DispatcherConfig::default() };
        assert!(matches!(
            Dispatcher::<Probe>::with_config(invalid),
            Err(DispatcherError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn report_counts_delivered_listeners() {
        let report = EmitReport { event: "ping", invoked: 3, failed: 1 };
        assert_eq!(report.delivered(), 2);
        assert!(!report.is_clean());
    }
}
