use std::fmt;
use std::marker::PhantomData;
use tidings_dispatcher::{Dispatcher, EmitReport, Event, EventMap};

/// Emit-only handle bound to the event name `E`.
///
/// Holds no state besides the dispatcher handle, so clones are interchangeable.
pub struct Emitter<M, E> {
    dispatcher: Dispatcher<M>,
    _event: PhantomData<fn() -> E>,
}

impl<M: EventMap, E: Event<M>> Emitter<M, E> {
    #[must_use]
    pub const fn new(dispatcher: Dispatcher<M>) -> Self {
        Self { dispatcher, _event: PhantomData }
    }

    /// Forwards to [`Dispatcher::emit`].
    pub fn emit(&self, payload: E::Payload) -> EmitReport {
        self.dispatcher.emit::<E>(payload)
    }

    #[must_use]
    pub const fn event(&self) -> &'static str {
        E::NAME
    }
}

impl<M: EventMap, E: Event<M, Payload = ()>> Emitter<M, E> {
    /// Forwards to [`Dispatcher::notify`].
    pub fn notify(&self) -> EmitReport {
        self.dispatcher.notify::<E>()
    }
}

impl<M, E> Clone for Emitter<M, E> {
    fn clone(&self) -> Self {
        Self { dispatcher: self.dispatcher.clone(), _event: PhantomData }
    }
}

impl<M: EventMap, E: Event<M>> fmt::Debug for Emitter<M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("dispatcher", &self.dispatcher.name())
            .field("event", &E::NAME)
            .finish()
    }
}
