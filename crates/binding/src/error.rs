use std::borrow::Cow;

#[tidings_derive::tidings_error]
#[derive(Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error(
        "No `{map}` dispatcher provided to scope `{scope}` or its ancestors{}",
        format_context(.context)
    )]
    NotProvided {
        map: &'static str,
        scope: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },
}
