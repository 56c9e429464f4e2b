//! # Dispatcher
//!
//! A strongly-typed, synchronous, in-process publish/subscribe dispatcher.
//!
//! ## Overview
//!
//! Producers and consumers talk through a [`Dispatcher`] by event name instead of
//! holding references to each other. The set of event names and the payload type
//! of each one form an [`EventMap`], checked at compile time.
//!
//! ## Features
//!
//! * **Type-Safe**: listeners and payloads are checked against the event map.
//! * **Ordered fan-out**: listeners run synchronously in registration order.
//! * **Failure isolation**: a panicking or failing listener is reported via
//!   `tracing` (and an optional hook) and never stops delivery to the others.
//! * **Re-entrant**: emissions iterate over a snapshot, so listeners may
//!   subscribe, unsubscribe or emit from inside a callback through a
//!   [`WeakDispatcher`].
//! * **Thread-safe**: `FxHashMap` behind a `parking_lot::RwLock`, never held
//!   while listeners run.
//!
//! # Example
//!
//! ```rust
//! use tidings_dispatcher::{Dispatcher, Listener, event_map};
//!
//! #[event_map]
//! pub enum Chat {
//!     Message(String),
//!     #[event(name = "chat:closed")]
//!     Closed,
//! }
//!
//! let dispatcher = Dispatcher::<Chat>::new();
//!
//! let printer = Listener::new(|text: &String| println!("> {text}"));
//! dispatcher.on_listener::<chat::Message>(printer.clone());
//! let closed = dispatcher.on::<chat::Closed>(|_| println!("bye"));
//!
//! let report = dispatcher.emit::<chat::Message>("hello".to_owned());
//! assert_eq!(report.delivered(), 1);
//!
//! dispatcher.off::<chat::Message>(&printer);
//! closed.unsubscribe();
//! assert!(dispatcher.is_empty());
//! ```

mod builder;
mod config;
mod dispatcher;
mod error;
mod event;
mod listener;
mod subscription;

pub use builder::DispatcherBuilder;
pub use config::DispatcherConfig;
pub use dispatcher::{Dispatcher, EmitReport, WeakDispatcher};
pub use error::{DispatcherError, DispatcherErrorExt};
pub use event::{Event, EventMap};
pub use listener::{
    BoxError, FailureHook, FailureKind, Listener, ListenerFailure, ListenerResult,
};
pub use subscription::{Subscription, SubscriptionGuard, SubscriptionId};
pub use tidings_derive::event_map;
