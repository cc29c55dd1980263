use crate::bignum::from_le_magnitude;
use crate::encode::FLOAT_LEN;
use crate::error::{DecodeError, DecoderError};
use crate::tag::{Tag, VERSION};
use crate::term::{Bitstring, Term};
use crate::wire::{Reader, PREALLOC_LIMIT};
use log::trace;
use std::convert::TryFrom;
use std::io::Read;

/// Tuples and lists nested deeper than this are rejected
pub const MAX_DEPTH: usize = 512;

/// Used to decode BERT terms. Decoding is a plain recursive descent over the tag bytes, every call returns a freshly
/// allocated term which shares nothing with the input.
pub struct Decoder<R> {
    reader: Reader<R>,
    depth: usize,
}

impl<'a> Decoder<&'a [u8]> {

    /// Decode a single term, including the leading version byte, from the given buffer. Returns the term and the
    /// number of consumed bytes.
    pub fn decode<B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Result<(Term, usize), DecoderError> {
        let mut decoder = Decoder::new(buf.as_ref());
        let term = decoder.read_term()?;
        Ok((term, decoder.position()))
    }

}

impl<R: Read> Decoder<R> {

    pub fn new(reader: R) -> Self {
        Self { reader: Reader::new(reader), depth: 0 }
    }

    /// Decode a single term, including the leading version byte, from the given reader. No bytes beyond the end of
    /// the term are consumed.
    pub fn decode_from(reader: R) -> Result<Term, DecoderError> {
        Self::new(reader).read_term()
    }

    /// Decode the next term, including its leading version byte.
    pub fn read_term(&mut self) -> Result<Term, DecoderError> {
        self.read_versioned().map_err(|e| {
            trace!("rejecting input at position {}: {}", self.reader.position(), e);
            e.at(self.reader.position())
        })
    }

    /// The number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    fn read_versioned(&mut self) -> Result<Term, DecodeError> {
        self.depth = 0;
        match self.reader.read_u8()? {
            VERSION => self.decode_term(),
            other => Err(DecodeError::BadMagic(other)),
        }
    }

    fn decode_term(&mut self) -> Result<Term, DecodeError> {
        let tag = Tag::try_from(self.reader.read_u8()?)?;
        match tag {
            Tag::SmallInt   => Ok(Term::Int(i32::from(self.reader.read_u8()?))),
            Tag::Int        => Ok(Term::Int(self.reader.read_i32()?)),
            Tag::SmallBig   => {
                let len = self.reader.read_u8()?;
                self.decode_bignum(len as usize)
            },
            Tag::LargeBig   => {
                let len = self.reader.read_u32()?;
                self.decode_bignum(len as usize)
            },
            Tag::Float      => self.decode_float(),
            Tag::Atom       => Ok(Term::Atom(self.decode_text()?)),
            Tag::String     => Ok(Term::String(self.decode_text()?)),
            Tag::SmallTuple => {
                let arity = self.reader.read_u8()?;
                self.decode_tuple(arity as usize)
            },
            Tag::LargeTuple => Err(DecodeError::UnsupportedTag(tag as u8)),
            Tag::Nil        => Ok(Term::Nil),
            Tag::List       => {
                let len = self.reader.read_u32()? as usize;
                let elements = self.decode_elements(len)?;
                // the tail is always nil for proper lists and carries no information
                let _ = self.reader.read_u8()?;
                Ok(Term::List(elements))
            },
            Tag::Binary     => {
                let len = self.reader.read_u32()? as usize;
                Ok(Term::Binary(self.reader.read_bytes(len)?))
            },
            Tag::Bitstring  => self.decode_bitstring(),
        }
    }

    fn decode_bignum(&mut self, len: usize) -> Result<Term, DecodeError> {
        let negative = self.reader.read_u8()? != 0;
        let magnitude = self.reader.read_bytes(len)?;
        Ok(Term::from(from_le_magnitude(negative, &magnitude)))
    }

    fn decode_float(&mut self) -> Result<Term, DecodeError> {
        let mut payload = self.reader.read_bytes(FLOAT_LEN)?;
        if let Some(end) = payload.iter().position(|b| *b == 0) {
            payload.truncate(end);
        }
        let text = String::from_utf8(payload).map_err(|e| DecodeError::MalformedFloat(String::from_utf8_lossy(e.as_bytes()).into_owned()))?;
        text.trim().parse::<f32>()
            .map(Term::Float)
            .map_err(|_| DecodeError::MalformedFloat(text))
    }

    fn decode_text(&mut self) -> Result<String, DecodeError> {
        let len = self.reader.read_u16()? as usize;
        Ok(String::from_utf8(self.reader.read_bytes(len)?)?)
    }

    fn decode_tuple(&mut self, arity: usize) -> Result<Term, DecodeError> {
        let mut elements = self.decode_elements(arity)?;
        let complex = matches!(elements.as_slice(), [Term::Atom(marker), _] if marker == "bert");
        if !complex {
            return Ok(Term::Tuple(elements));
        }
        // complex term: {bert, true | false | nil} collapse into native values
        Ok(match elements.remove(1) {
            Term::Atom(a) if a == "true" => Term::Bool(true),
            Term::Atom(a) if a == "false" => Term::Bool(false),
            Term::Atom(a) if a == "nil" => Term::Nil,
            other => other,
        })
    }

    fn decode_elements(&mut self, len: usize) -> Result<Vec<Term>, DecodeError> {
        if self.depth >= MAX_DEPTH {
            return Err(DecodeError::Depth(MAX_DEPTH));
        }
        self.depth += 1;
        let mut elements = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            elements.push(self.decode_term()?);
        }
        self.depth -= 1;
        Ok(elements)
    }

    fn decode_bitstring(&mut self) -> Result<Term, DecodeError> {
        let len = self.reader.read_u32()? as usize;
        let bits = self.reader.read_u8()?;
        let bytes = self.reader.read_bytes(len)?;
        match bits {
            0 | 8 => Ok(Term::Binary(bytes)),
            _ => Bitstring::from_parts(bytes, bits)
                .map(Term::Bitstring)
                .ok_or(DecodeError::MalformedBitstring { len, bits }),
        }
    }

}
