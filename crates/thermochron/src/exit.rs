use std::fmt;

pub const FAILURE: i32 = 1;
pub const USAGE: i32 = 2;

pub type CliResult = Result<(), CliError>;

/// A CLI failure: exit code plus the message shown to the user.
#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    /// A failed device operation.
    pub fn operation(what: &str, err: impl fmt::Display) -> Self {
        Self {
            code: FAILURE,
            message: format!("could not {what} ({err})"),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}
