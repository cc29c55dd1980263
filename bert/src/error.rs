use thiserror::Error;

/// A `DecodeError` together with the input position at which it occurred.
#[derive(Debug, Error)]
#[error("{inner} at input position {at}")]
pub struct DecoderError {
    #[source]
    inner: DecodeError,
    at: usize,
}

impl DecoderError {
    pub fn into_inner(self) -> DecodeError {
        self.inner
    }

    pub fn inner(&self) -> &DecodeError {
        &self.inner
    }

    pub fn position(&self) -> usize {
        self.at
    }

    /// Moves the reported position, used when the decoded bytes were embedded in a larger stream
    pub(crate) fn offset(self, by: usize) -> Self {
        DecoderError { inner: self.inner, at: self.at + by }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unexpected end of input while decoding")]
    Eof,
    #[error("Bad magic: expected version byte 131, found {0}")]
    BadMagic(u8),
    #[error("Unknown tag {0}")]
    UnknownTag(u8),
    #[error("Tag {0} is not supported")]
    UnsupportedTag(u8),
    #[error("Float payload {0:?} is not a number")]
    MalformedFloat(String),
    #[error("Bitstring of {len} bytes can't have {bits} trailing bits")]
    MalformedBitstring { len: usize, bits: u8 },
    #[error("String slice was not valid Utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Expected a term with {expected} elements, found {found}")]
    Arity { expected: usize, found: usize },
    #[error("Unexpected term: expected {expected}, found {found}")]
    UnexpectedTerm { expected: &'static str, found: &'static str },
    #[error("Terms nested deeper than {0} levels")]
    Depth(usize),
    #[error("{0} trailing bytes after term")]
    Trailing(usize),
    #[error("IO error {0}")]
    Io(std::io::Error),
}

impl DecodeError {
    pub fn at(self, at: usize) -> DecoderError {
        DecoderError { inner: self, at }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> DecodeError {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => DecodeError::Eof,
            _ => DecodeError::Io(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("IO error {0}")]
    Io(#[from] std::io::Error),
    #[error("{kind} of length {len} exceeds maximum {max}")]
    Length { kind: &'static str, len: usize, max: u64 },
    #[error("Tuple of arity {0} exceeds maximum 255")]
    TupleArity(usize),
}
