use crate::dispatcher::Registry;
use std::any::TypeId;
use std::fmt;
use std::sync::Weak;

/// Identifier of a single registration, unique within its dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl SubscriptionId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to one registration returned by [`Dispatcher::on`](crate::Dispatcher::on).
///
/// Dropping the handle leaves the listener registered. [`Subscription::unsubscribe`]
/// removes exactly this registration; later calls do nothing. The handle does
/// not keep the dispatcher alive.
pub struct Subscription {
    registry: Weak<Registry>,
    key: TypeId,
    event: &'static str,
    id: SubscriptionId,
}

impl Subscription {
    pub(crate) const fn new(
        registry: Weak<Registry>,
        key: TypeId,
        event: &'static str,
        id: SubscriptionId,
    ) -> Self {
        Self { registry, key, event, id }
    }

    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Display name of the event this registration listens to.
    #[must_use]
    pub const fn event(&self) -> &'static str {
        self.event
    }

    /// Returns `true` while the registration is still present in a live dispatcher.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| registry.contains(self.key, self.id))
    }

    /// Removes this registration.
    ///
    /// Returns `true` only for the call that actually removed it.
    pub fn unsubscribe(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| registry.remove(self.key, self.id))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// A [`Subscription`] that unsubscribes when dropped.
#[must_use = "dropping the guard unsubscribes the listener immediately"]
#[derive(Debug)]
pub struct SubscriptionGuard {
    subscription: Option<Subscription>,
}

impl SubscriptionGuard {
    pub(crate) const fn new(subscription: Subscription) -> Self {
        Self { subscription: Some(subscription) }
    }

    #[must_use]
    pub fn id(&self) -> Option<SubscriptionId> {
        self.subscription.as_ref().map(Subscription::id)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Unsubscribes now instead of on drop.
    pub fn unsubscribe(&mut self) -> bool {
        self.subscription.take().is_some_and(|subscription| subscription.unsubscribe())
    }

    /// Releases the registration from the guard; it stays registered.
    #[must_use]
    pub fn detach(mut self) -> Option<Subscription> {
        self.subscription.take()
    }
}

impl From<Subscription> for SubscriptionGuard {
    fn from(subscription: Subscription) -> Self {
        Self::new(subscription)
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
