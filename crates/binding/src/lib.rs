//! # Binding
//!
//! Collaborators that connect application code to a [`Dispatcher`] without a
//! global registry.
//!
//! * [`Scope`]: an explicit provider tree. A scope holds at most one dispatcher
//!   per event map; lookups fall back to the ancestors.
//! * [`ScopedSubscription`]: an RAII registration that can be switched on and
//!   off, and re-subscribes when its dependency value changes.
//! * [`Emitter`]: a clonable, emit-only handle bound to one event name.
//!
//! ```rust
//! use tidings_binding::Scope;
//! use tidings_dispatcher::{Dispatcher, event_map};
//!
//! #[event_map]
//! pub enum Theme {
//!     Changed(String),
//! }
//!
//! # fn main() -> Result<(), tidings_binding::BindingError> {
//! let root = Scope::root();
//! root.provide(Dispatcher::<Theme>::new());
//!
//! let panel = root.child("panel");
//! let _guard = panel.subscribe::<Theme, theme::Changed>(|name| println!("theme: {name}"))?;
//!
//! let toggle = root.emitter::<Theme, theme::Changed>()?;
//! assert_eq!(toggle.emit("dark".to_owned()).delivered(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! [`Dispatcher`]: tidings_dispatcher::Dispatcher

mod emitter;
mod error;
mod scope;
mod subscription;

pub use emitter::Emitter;
pub use error::{BindingError, BindingErrorExt};
pub use scope::Scope;
pub use subscription::ScopedSubscription;
