use bert::{DecoderError, EncodeError, Term};
use serde::{de, ser};
use std::fmt::Display;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // Encode
    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),
    #[error("{0} can't be represented as a BERT term")]
    Unsupported(&'static str),
    // Decode
    #[error("Decoding error: {0}")]
    Decode(#[from] DecoderError),
    #[error("Expected a term with {expected} elements, found {found}")]
    Arity { expected: usize, found: usize },
    #[error("Unexpected term: expected {expected}, found {found}")]
    UnexpectedTerm { expected: &'static str, found: &'static str },
    #[error("Integer {0} doesn't fit into the target type")]
    Int(String),
    // Both
    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn unexpected(expected: &'static str, found: &Term) -> Self {
        Error::UnexpectedTerm { expected, found: found.name() }
    }
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}
