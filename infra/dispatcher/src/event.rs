/// A closed, user-declared set of event names.
///
/// Implementors are marker types with no runtime representation; the map
/// exists so the compiler can check that a [`Dispatcher`](crate::Dispatcher)
/// only ever sees the event names declared for it. Usually generated with
/// [`event_map`](crate::event_map).
pub trait EventMap: 'static {
    /// Display name of the map, used in diagnostics.
    const NAME: &'static str;

    /// Display names of every event in the map, in declaration order.
    const EVENT_NAMES: &'static [&'static str] = &[];
}

/// An event name belonging to the event map `M`.
///
/// The implementing type is the key; [`Event::Payload`] is the value every
/// listener for this name receives. Events that carry no meaningful value use
/// `()` and can be emitted with [`Dispatcher::notify`](crate::Dispatcher::notify).
///
/// ```rust
/// use tidings_dispatcher::{Event, EventMap};
///
/// enum Clock {}
/// impl EventMap for Clock {
///     const NAME: &'static str = "Clock";
/// }
///
/// struct Tick;
/// impl Event<Clock> for Tick {
///     type Payload = u64;
///     const NAME: &'static str = "tick";
/// }
/// ```
///
/// # Compile-time checks
///
/// A payload of the wrong type is rejected:
///
/// ```compile_fail,E0308
/// use tidings_dispatcher::{Dispatcher, event_map};
///
/// #[event_map]
/// pub enum Clock {
///     Tick(u64),
/// }
///
/// Dispatcher::<Clock>::new().emit::<clock::Tick>("noon");
/// ```
///
/// So is a listener expecting another payload type:
///
/// ```compile_fail
/// use tidings_dispatcher::{Dispatcher, event_map};
///
/// #[event_map]
/// pub enum Clock {
///     Tick(u64),
/// }
///
/// Dispatcher::<Clock>::new().on::<clock::Tick>(|at: &String| println!("{at}"));
/// ```
///
/// An event declared by a different map does not belong to this dispatcher:
///
/// ```compile_fail,E0277
/// use tidings_dispatcher::{Dispatcher, event_map};
///
/// #[event_map]
/// pub enum Clock {
///     Tick(u64),
/// }
///
/// #[event_map]
/// pub enum Alarm {
///     Ring(u64),
/// }
///
/// Dispatcher::<Clock>::new().emit::<alarm::Ring>(7);
/// ```
///
/// `notify` only accepts events whose payload is `()`:
///
/// ```compile_fail,E0271
/// use tidings_dispatcher::{Dispatcher, event_map};
///
/// #[event_map]
/// pub enum Clock {
///     Tick(u64),
/// }
///
/// Dispatcher::<Clock>::new().notify::<clock::Tick>();
/// ```
pub trait Event<M: EventMap>: 'static {
    /// Payload delivered to listeners of this event.
    type Payload: Send + Sync + 'static;

    /// Display name of the event, used in diagnostics.
    const NAME: &'static str;
}
