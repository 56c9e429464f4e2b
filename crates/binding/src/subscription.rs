use std::fmt;
use tidings_dispatcher::{Dispatcher, Event, EventMap, Listener, Subscription};
use tracing::trace;

/// A registration that follows the lifetime of its owner.
///
/// Created inactive by [`new`](Self::new); [`Scope::subscribe`] returns one
/// that is already active. The listener is registered at most once at a time:
/// [`activate`](Self::activate) on an active guard does nothing, and the
/// registration is removed exactly once by [`deactivate`](Self::deactivate) or
/// on drop.
///
/// The optional dependency value `D` mirrors the inputs a listener was built
/// from. [`set_deps`](Self::set_deps) with a different value re-subscribes, so
/// the registration moves to the end of the event's listener order.
///
/// A registration removed behind the guard's back (`off`, `clear_event`,
/// `clear_all`) leaves the guard inactive until the next `activate`.
///
/// [`Scope::subscribe`]: crate::Scope::subscribe
pub struct ScopedSubscription<M: EventMap, E: Event<M>, D = ()> {
    dispatcher: Dispatcher<M>,
    listener: Listener<E::Payload>,
    deps: D,
    active: Option<Subscription>,
}

impl<M: EventMap, E: Event<M>> ScopedSubscription<M, E> {
    /// Creates an inactive guard without dependencies.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher<M>, listener: Listener<E::Payload>) -> Self {
        Self::with_deps(dispatcher, listener, ())
    }
}

impl<M: EventMap, E: Event<M>, D> ScopedSubscription<M, E, D> {
    /// Creates an inactive guard tracking `deps`.
    #[must_use]
    pub const fn with_deps(dispatcher: Dispatcher<M>, listener: Listener<E::Payload>, deps: D) -> Self {
        Self { dispatcher, listener, deps, active: None }
    }

    /// Registers the listener unless it is already registered.
    ///
    /// Returns `true` when a new registration was made.
    pub fn activate(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.active = Some(self.dispatcher.on_listener::<E>(self.listener.clone()));
        true
    }

    /// Removes the registration, if any. Returns `true` when one was removed.
    pub fn deactivate(&mut self) -> bool {
        self.active.take().is_some_and(|subscription| subscription.unsubscribe())
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(Subscription::is_active)
    }

    #[must_use]
    pub const fn deps(&self) -> &D {
        &self.deps
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher<M> {
        &self.dispatcher
    }

    /// Swaps the listener, re-registering it when the guard is active.
    pub fn set_listener(&mut self, listener: Listener<E::Payload>) {
        self.listener = listener;
        self.resubscribe();
    }

    fn resubscribe(&mut self) {
        if !self.is_active() {
            self.active = None;
            return;
        }
        self.deactivate();
        trace!(dispatcher = %self.dispatcher.name(), event = E::NAME, "Re-subscribing listener");
        self.activate();
    }
}

impl<M: EventMap, E: Event<M>, D: PartialEq> ScopedSubscription<M, E, D> {
    /// Stores new dependencies and re-subscribes if they differ from the current ones.
    ///
    /// Returns `true` when the value changed. An inactive guard stays inactive.
    pub fn set_deps(&mut self, deps: D) -> bool {
        if self.deps == deps {
            return false;
        }
        self.deps = deps;
        self.resubscribe();
        true
    }

    /// Like [`set_deps`](Self::set_deps), also replacing the listener built from them.
    pub fn rebind(&mut self, deps: D, listener: Listener<E::Payload>) -> bool {
        if self.deps == deps {
            return false;
        }
        self.deps = deps;
        self.listener = listener;
        self.resubscribe();
        true
    }
}

impl<M: EventMap, E: Event<M>, D> Drop for ScopedSubscription<M, E, D> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl<M: EventMap, E: Event<M>, D: fmt::Debug> fmt::Debug for ScopedSubscription<M, E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedSubscription")
            .field("dispatcher", &self.dispatcher.name())
            .field("event", &E::NAME)
            .field("deps", &self.deps)
            .field("subscription", &self.active.as_ref().map(Subscription::id))
            .finish()
    }
}
