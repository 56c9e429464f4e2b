use tidings_derive::tidings_error;

#[tidings_error]
pub enum DemoError {
    #[error("Internal error: {message}")]
    Internal { message: String, context: String },
}

fn main() {}
