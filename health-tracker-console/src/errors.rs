use std::io;

use thiserror::Error;

pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Standard input was closed, nobody is left to answer prompts
    #[error("Input was closed")]
    InputClosed,
    #[error("Terminal error: {0}")]
    Io(io::Error),
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl From<io::Error> for ConsoleError {
    fn from(value: io::Error) -> Self {
        match value.kind() {
            io::ErrorKind::UnexpectedEof => Self::InputClosed,
            _ => Self::Io(value),
        }
    }
}

impl From<dialoguer::Error> for ConsoleError {
    fn from(value: dialoguer::Error) -> Self {
        match value {
            dialoguer::Error::IO(e) => e.into(),
            #[allow(unreachable_patterns)]
            other => Self::Prompt(other.to_string()),
        }
    }
}
