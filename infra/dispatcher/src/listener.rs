use crate::subscription::SubscriptionId;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Boxed error a fallible listener may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of a single listener invocation.
pub type ListenerResult = Result<(), BoxError>;

type ListenerFn<P> = dyn Fn(&P) -> ListenerResult + Send + Sync;

/// Callback invoked by the dispatcher when its failure channel receives a report.
pub type FailureHook = Arc<dyn Fn(&ListenerFailure) + Send + Sync>;

/// A shareable listener for payloads of type `P`.
///
/// Identity follows the shared allocation: clones of one `Listener` are the
/// same listener for [`Dispatcher::off`](crate::Dispatcher::off), while two
/// listeners built from identical closures are not.
pub struct Listener<P> {
    callback: Arc<ListenerFn<P>>,
}

impl<P: 'static> Listener<P> {
    /// Wraps an infallible callback. A panic inside it is reported as a failure.
    pub fn new(callback: impl Fn(&P) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(move |payload: &P| {
                callback(payload);
                Ok(())
            }),
        }
    }

    /// Wraps a callback whose `Err` is reported as a failure.
    pub fn fallible(callback: impl Fn(&P) -> ListenerResult + Send + Sync + 'static) -> Self {
        Self { callback: Arc::new(callback) }
    }
}

impl<P> Listener<P> {
    /// Returns `true` when both handles refer to the same listener.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }

    pub(crate) fn call(&self, payload: &P) -> ListenerResult {
        (self.callback)(payload)
    }
}

impl<P> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self { callback: Arc::clone(&self.callback) }
    }
}

impl<P> PartialEq for Listener<P> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<P> Eq for Listener<P> {}

impl<P> fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("payload", &std::any::type_name::<P>())
            .field("ptr", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// How a listener invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The listener panicked; the panic was caught at the dispatcher boundary.
    Panicked,
    /// The listener returned an error.
    Returned,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Panicked => f.write_str("panicked"),
            Self::Returned => f.write_str("returned an error"),
        }
    }
}

/// Report of one failed listener invocation.
///
/// Delivered to the log and to the optional [`FailureHook`]; never returned
/// to the emitter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listener {subscription} for `{map}::{event}` {kind}: {message}")]
pub struct ListenerFailure {
    /// Name of the dispatcher that ran the listener.
    pub dispatcher: Cow<'static, str>,
    pub map: &'static str,
    pub event: &'static str,
    pub subscription: SubscriptionId,
    pub kind: FailureKind,
    pub message: Cow<'static, str>,
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> Cow<'static, str> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        Cow::Borrowed(message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        Cow::Owned(message.clone())
    } else {
        Cow::Borrowed("non-string panic payload")
    }
}
