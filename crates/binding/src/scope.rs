use crate::emitter::Emitter;
use crate::error::BindingError;
use crate::subscription::ScopedSubscription;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tidings_dispatcher::{Dispatcher, Event, EventMap, Listener};
use tracing::{debug, trace};

type Provided = FxHashMap<TypeId, Box<dyn Any + Send + Sync>>;

struct Node {
    name: Cow<'static, str>,
    parent: Option<Scope>,
    provided: RwLock<Provided>,
}

/// A node of an explicit provider tree.
///
/// Each scope holds at most one [`Dispatcher`] per event map. Lookups search
/// the scope itself, then its ancestors up to the root, so a child scope may
/// shadow a dispatcher provided higher up. Cloning yields a handle to the same
/// node.
#[derive(Clone)]
pub struct Scope {
    node: Arc<Node>,
}

impl Scope {
    /// Creates a parentless scope named `root`.
    #[must_use]
    pub fn root() -> Self {
        Self::named("root")
    }

    /// Creates a parentless scope with a diagnostic name.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_parent(name.into(), None)
    }

    /// Creates a scope whose lookups fall back to `self`.
    #[must_use]
    pub fn child(&self, name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_parent(name.into(), Some(self.clone()))
    }

    fn with_parent(name: Cow<'static, str>, parent: Option<Self>) -> Self {
        Self { node: Arc::new(Node { name, parent, provided: RwLock::new(Provided::default()) }) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.node.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.node.parent.as_ref()
    }

    /// Makes `dispatcher` available to this scope and its descendants.
    ///
    /// Returns the dispatcher previously provided here for the same map, if any.
    pub fn provide<M: EventMap>(&self, dispatcher: Dispatcher<M>) -> Option<Dispatcher<M>> {
        let previous = self.node.provided.write().insert(TypeId::of::<M>(), Box::new(dispatcher));
        let replaced = previous.and_then(|boxed| boxed.downcast::<Dispatcher<M>>().ok());

        debug!(
            scope = %self.name(),
            map = M::NAME,
            replaced = replaced.is_some(),
            "Dispatcher provided"
        );
        replaced.map(|boxed| *boxed)
    }

    /// Removes the dispatcher provided directly in this scope.
    pub fn withdraw<M: EventMap>(&self) -> Option<Dispatcher<M>> {
        let removed = self.node.provided.write().remove(&TypeId::of::<M>())?;
        debug!(scope = %self.name(), map = M::NAME, "Dispatcher withdrawn");
        removed.downcast::<Dispatcher<M>>().ok().map(|boxed| *boxed)
    }

    /// Returns `true` when this scope itself (not an ancestor) provides `M`.
    #[must_use]
    pub fn provides<M: EventMap>(&self) -> bool {
        self.node.provided.read().contains_key(&TypeId::of::<M>())
    }

    /// Resolves the nearest dispatcher for `M`.
    ///
    /// # Errors
    /// Returns [`BindingError::NotProvided`] when neither this scope nor any of
    /// its ancestors provides one.
    pub fn dispatcher<M: EventMap>(&self) -> Result<Dispatcher<M>, BindingError> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(dispatcher) = scope.local::<M>() {
                if !std::ptr::eq(scope, self) {
                    trace!(
                        scope = %self.name(),
                        provider = %scope.name(),
                        map = M::NAME,
                        "Dispatcher resolved from ancestor"
                    );
                }
                return Ok(dispatcher);
            }
            current = scope.parent();
        }

        Err(BindingError::NotProvided {
            map: M::NAME,
            scope: Cow::Owned(self.name().to_owned()),
            context: None,
        })
    }

    /// Resolves the dispatcher for `M` and registers `listener` for `E` on it.
    ///
    /// The registration is active immediately and ends when the guard drops.
    ///
    /// # Errors
    /// Returns [`BindingError::NotProvided`] when no dispatcher for `M` is in scope.
    pub fn subscribe<M: EventMap, E: Event<M>>(
        &self,
        listener: impl Fn(&E::Payload) + Send + Sync + 'static,
    ) -> Result<ScopedSubscription<M, E>, BindingError> {
        let mut subscription = ScopedSubscription::new(self.dispatcher()?, Listener::new(listener));
        subscription.activate();
        Ok(subscription)
    }

    /// Resolves an emit-only handle for `E`.
    ///
    /// # Errors
    /// Returns [`BindingError::NotProvided`] when no dispatcher for `M` is in scope.
    pub fn emitter<M: EventMap, E: Event<M>>(&self) -> Result<Emitter<M, E>, BindingError> {
        Ok(Emitter::new(self.dispatcher()?))
    }

    fn local<M: EventMap>(&self) -> Option<Dispatcher<M>> {
        self.node
            .provided
            .read()
            .get(&TypeId::of::<M>())
            .and_then(|boxed| boxed.downcast_ref::<Dispatcher<M>>())
            .cloned()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("name", &self.node.name)
            .field("parent", &self.parent().map(Self::name))
            .field("provided", &self.node.provided.read().len())
            .finish()
    }
}
