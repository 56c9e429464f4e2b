use std::borrow::Cow;

/// Errors returned while constructing a dispatcher.
///
/// Runtime operations never fail: registration and removal always succeed and
/// listener failures are isolated and reported, not returned.
#[tidings_derive::tidings_error]
#[derive(Clone, PartialEq, Eq)]
pub enum DispatcherError {
    /// A configuration value is out of range.
    #[error("Invalid dispatcher configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
