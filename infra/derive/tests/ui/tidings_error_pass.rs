use std::borrow::Cow;
use tidings_derive::tidings_error;

#[tidings_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<Vec<u8>, DemoError> {
    std::fs::read("/definitely/not/here").context("Reading fixture")
}

fn fail() -> Result<(), DemoError> {
    Err(DemoError::Internal { message: "boom".into(), context: None })
}

fn main() {
    let err = read().unwrap_err();
    assert!(err.to_string().starts_with("IO error (Reading fixture): "));

    let err = fail().context("Running demo").unwrap_err();
    assert_eq!(err.to_string(), "Internal error (Running demo): boom");

    let converted: DemoError = std::io::Error::other("raw").into();
    assert_eq!(converted.to_string(), "IO error: raw");
}
