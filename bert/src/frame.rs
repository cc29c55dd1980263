//! BURP frames carry exactly one encoded term behind a 4 byte big endian length prefix. Requests and responses are
//! framed identically, a request being the term `{Kind, Module, Function, Arguments}`.

use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{DecodeError, DecoderError, EncodeError};
use crate::term::Term;
use crate::wire::Reader;
use log::debug;
use std::convert::{TryFrom, TryInto};
use std::io::{Read, Write};

/// Size of the length prefix
pub const PREFIX_LEN: usize = 4;

/// A remote procedure call as received over BURP, e.g. `{call, lists, reverse, [[1, 2, 3]]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// `call`, `cast` and the like
    pub kind: String,
    pub module: String,
    pub function: String,
    pub arguments: Vec<Term>,
}

impl Request {
    pub fn new<K: Into<String>, M: Into<String>, F: Into<String>>(kind: K, module: M, function: F, arguments: Vec<Term>) -> Self {
        Self { kind: kind.into(), module: module.into(), function: function.into(), arguments }
    }

    fn atom(term: Term) -> Result<String, DecodeError> {
        match term {
            Term::Atom(a) => Ok(a),
            other => Err(DecodeError::UnexpectedTerm { expected: "atom", found: other.name() }),
        }
    }
}

/// Binds the elements of a 4-tuple to the fields of the request in order. Both the arity and the type of each element
/// are checked.
impl TryFrom<Term> for Request {
    type Error = DecodeError;

    fn try_from(term: Term) -> Result<Self, Self::Error> {
        let elements = match term {
            Term::Tuple(elements) if elements.len() == 4 => elements,
            Term::Tuple(elements) => return Err(DecodeError::Arity { expected: 4, found: elements.len() }),
            other => return Err(DecodeError::UnexpectedTerm { expected: "tuple", found: other.name() }),
        };
        let [kind, module, function, arguments]: [Term; 4] = elements
            .try_into()
            .map_err(|rest: Vec<Term>| DecodeError::Arity { expected: 4, found: rest.len() })?;
        let kind = Self::atom(kind)?;
        let module = Self::atom(module)?;
        let function = Self::atom(function)?;
        let arguments = match arguments {
            Term::List(arguments) | Term::Tuple(arguments) => arguments,
            Term::Nil => Vec::new(),
            other => return Err(DecodeError::UnexpectedTerm { expected: "list", found: other.name() }),
        };
        Ok(Request { kind, module, function, arguments })
    }
}

impl From<Request> for Term {
    fn from(request: Request) -> Term {
        Term::Tuple(vec![
            Term::Atom(request.kind),
            Term::Atom(request.module),
            Term::Atom(request.function),
            Term::List(request.arguments),
        ])
    }
}

/// Writes the term as one frame. Nothing is written if the term can't be encoded. Returns the number of written
/// bytes including the prefix.
pub fn write_frame<W: Write>(writer: &mut W, term: &Term) -> Result<usize, EncodeError> {
    let payload = Encoder::to_vec(term)?;
    let len = u32::try_from(payload.len()).map_err(|_| EncodeError::Length { kind: "Frame", len: payload.len(), max: u32::MAX as u64 })?;
    let mut frame = Vec::with_capacity(PREFIX_LEN + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&payload);
    writer.write_all(&frame)?;
    debug!("wrote frame of {} bytes", len);
    Ok(frame.len())
}

/// Reads one frame and decodes its term. The term must span the whole frame.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Term, DecoderError> {
    let mut prefix = Reader::new(&mut *reader);
    let len = prefix.read_u32().map_err(|e| e.at(prefix.position()))? as usize;
    let payload = prefix.read_bytes(len).map_err(|e| e.at(prefix.position()))?;
    debug!("read frame of {} bytes", len);
    let (term, consumed) = Decoder::decode(&payload).map_err(|e| e.offset(PREFIX_LEN))?;
    if consumed < payload.len() {
        return Err(DecodeError::Trailing(payload.len() - consumed).at(PREFIX_LEN + consumed));
    }
    Ok(term)
}

/// Writes a response frame
pub fn write_response<W: Write>(writer: &mut W, term: &Term) -> Result<usize, EncodeError> {
    write_frame(writer, term)
}

/// Writes a request frame
pub fn write_request<W: Write>(writer: &mut W, request: Request) -> Result<usize, EncodeError> {
    write_frame(writer, &Term::from(request))
}

/// Reads a request frame and binds it to a `Request`
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request, DecoderError> {
    let term = read_frame(reader)?;
    Request::try_from(term).map_err(|e| e.at(PREFIX_LEN))
}
