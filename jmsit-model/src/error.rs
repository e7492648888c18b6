use std::fmt::{self, Display};

/// Errors produced when parsing model identifiers from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownMessageKind(String),
    UnknownValueType(String),
    UnknownHeader(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownMessageKind(name) => {
                write!(f, "unknown JMS message type '{name}'")
            }
            ModelError::UnknownValueType(name) => {
                write!(f, "unknown value type '{name}'")
            }
            ModelError::UnknownHeader(name) => {
                write!(f, "unknown JMS header '{name}'")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
