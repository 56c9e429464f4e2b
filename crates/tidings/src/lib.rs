//! Facade crate for the tidings dispatcher and its collaborators.
//! Re-exports the core, the scope bindings and (with the `logger` feature) the
//! logger, so applications depend on one crate.
//! Keep this crate thin: it should compose other crates, not implement behavior.
//!
//! ## Usage
//! - Add `tidings`, enabling `logger` for binaries that install the global subscriber.
//! - Declare maps with `#[event_map(crate = ::tidings)]` so expansions resolve
//!   through the facade.
//!
//! ```rust
//! use tidings::prelude::*;
//!
//! #[event_map(crate = ::tidings)]
//! pub enum Door {
//!     Opened(u8),
//! }
//!
//! let root = Scope::root();
//! root.provide(Dispatcher::<Door>::new());
//! let _guard = root.subscribe::<Door, door::Opened>(|floor| assert_eq!(*floor, 3)).unwrap();
//! root.emitter::<Door, door::Opened>().unwrap().emit(3);
//! ```

pub use tidings_binding as binding;
pub use tidings_dispatcher as dispatcher;
#[cfg(feature = "logger")]
pub use tidings_logger as logger;

pub use tidings_binding::{BindingError, BindingErrorExt, Emitter, Scope, ScopedSubscription};
pub use tidings_dispatcher::{
    BoxError, Dispatcher, DispatcherBuilder, DispatcherConfig, DispatcherError,
    DispatcherErrorExt, EmitReport, Event, EventMap, FailureHook, FailureKind, Listener,
    ListenerFailure, ListenerResult, Subscription, SubscriptionGuard, SubscriptionId, WeakDispatcher,
    event_map,
};

/// Build-time enabled optional features (by Cargo feature).
pub const FEATURES: &[&str] = &[
    #[cfg(feature = "logger")]
    "logger",
];

/// Everything needed to declare, provide, subscribe to and emit events.
pub mod prelude {
    pub use crate::{
        BindingError, Dispatcher, EmitReport, Emitter, Event, EventMap, Listener, Scope,
        ScopedSubscription, Subscription, SubscriptionGuard, WeakDispatcher, event_map,
    };
}
