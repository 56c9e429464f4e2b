#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the dispatcher workspace.
//!
//! * [`macro@event_map`] turns an enum listing event names and payload types into a
//!   closed event map usable with `tidings_dispatcher::Dispatcher`.
//! * [`macro@tidings_error`] wires an error enum with `thiserror`, a `context` extension
//!   trait and `From` conversions for wrapped sources.
//!
//! The examples are `ignore`d here because proc-macro crates cannot depend on
//! the crates their expansions refer to; working copies live in `tests/ui`.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemEnum, parse_macro_input};

/// Declares a closed event map.
///
/// Every variant becomes an event-name type in a module named after the enum in
/// `snake_case`. The variant's payload is its single field, a tuple of its fields
/// when there are several, or `()` for unit variants. The enum itself is replaced
/// by an uninhabited marker type implementing `EventMap`.
///
/// # Arguments
///
/// * `crate = path` - Path of the crate exporting `EventMap` and `Event`
///   (defaults to `::tidings_dispatcher`).
/// * `module = ident` - Overrides the name of the generated module.
///
/// Variants accept `#[event(name = "...")]` to override the display name used in
/// diagnostics.
///
/// # Example
///
/// ```rust,ignore
/// use tidings_dispatcher::{Dispatcher, event_map};
///
/// #[event_map]
/// pub enum Session {
///     LoggedIn(String),
///     #[event(name = "session:expired")]
///     Expired,
/// }
///
/// let dispatcher = Dispatcher::<Session>::new();
/// let _sub = dispatcher.on::<session::LoggedIn>(|user| println!("{user}"));
/// dispatcher.notify::<session::Expired>();
/// ```
#[proc_macro_attribute]
pub fn event_map(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemEnum);
    macros::event_map::expand_event_map(args.into(), input).into()
}

/// Attribute macro for error enums shared by the workspace crates.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless present.
/// * **Context Support**: Generates a companion `...Ext` trait adding `.context()` to
///   `Result<T, Error>` and to results of every wrapped source error.
/// * **Conversions**: Implements `From<Source>` for variants with a `source` field (or a
///   field marked `#[source]`), so `?` works on upstream errors.
///
/// # Requirements
///
/// 1. Applied to an **enum** with **named** fields only.
/// 2. `context`, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants wrapping a source must carry a `context` field.
///
/// A private `format_context` helper is emitted next to the enum for use in
/// `#[error(...)]` strings.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[tidings_derive::tidings_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Missing key{}: {message}", format_context(.context))]
///     Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read() -> Result<Vec<u8>, StoreError> {
///     std::fs::read("store.bin").context("Reading store snapshot")
/// }
/// ```
#[proc_macro_attribute]
pub fn tidings_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
