use crate::bignum::to_le_magnitude;
use crate::error::EncodeError;
use crate::tag::{Tag, VERSION};
use crate::term::{Bitstring, Term};
use crate::wire::{put_u16, put_u32, put_u8};
use malachite::Integer;
use std::convert::TryFrom;
use std::io::Write;

/// Size of the float payload in bytes
pub const FLOAT_LEN: usize = 31;

const BERT: &str = "bert";

/// Used to encode BERT terms. The whole encoding is assembled in memory first, so a term which can't be encoded never
/// leaves a partial message in the writer.
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {

    /// Encode a term, including the leading version byte, to the given writer. The resulting `usize` is the amount of
    /// bytes that got written.
    pub fn encode<W: Write>(term: &Term, writer: &mut W) -> Result<usize, EncodeError> {
        let buf = Self::to_vec(term)?;
        writer.write_all(&buf)?;
        Ok(buf.len())
    }

    /// Encode a term, including the leading version byte, into a new buffer.
    pub fn to_vec(term: &Term) -> Result<Vec<u8>, EncodeError> {
        let mut encoder = Self { buf: vec![VERSION] };
        encoder.encode_term(term)?;
        Ok(encoder.buf)
    }

    fn encode_term(&mut self, term: &Term) -> Result<(), EncodeError> {
        match term {
            Term::Nil          => put_u8(&mut self.buf, Tag::Nil as u8),
            Term::Bool(v)      => {
                put_u8(&mut self.buf, Tag::SmallTuple as u8);
                put_u8(&mut self.buf, 2);
                self.encode_text(Tag::Atom, BERT)?;
                self.encode_text(Tag::Atom, if *v { "true" } else { "false" })?;
            },
            Term::Int(v)       => self.encode_int(*v),
            Term::BigInt(v)    => self.encode_bignum(v)?,
            Term::Float(v)     => self.encode_float(*v),
            Term::Atom(v)      => self.encode_text(Tag::Atom, v)?,
            Term::String(v)    => self.encode_text(Tag::String, v)?,
            Term::Binary(v)    => self.encode_binary(v)?,
            Term::Bitstring(v) => self.encode_bitstring(v)?,
            Term::Tuple(inner) => {
                let arity = u8::try_from(inner.len()).map_err(|_| EncodeError::TupleArity(inner.len()))?;
                put_u8(&mut self.buf, Tag::SmallTuple as u8);
                put_u8(&mut self.buf, arity);
                for element in inner.iter() {
                    self.encode_term(element)?;
                }
            },
            Term::List(inner)  => {
                put_u8(&mut self.buf, Tag::List as u8);
                put_u32(&mut self.buf, Self::to_u32("List", inner.len())?);
                for element in inner.iter() {
                    self.encode_term(element)?;
                }
                put_u8(&mut self.buf, Tag::Nil as u8);
            },
        }
        Ok(())
    }

    fn encode_int(&mut self, v: i32) {
        if (0..=255).contains(&v) {
            put_u8(&mut self.buf, Tag::SmallInt as u8);
            put_u8(&mut self.buf, v as u8);
        } else {
            put_u8(&mut self.buf, Tag::Int as u8);
            self.buf.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn encode_bignum(&mut self, v: &Integer) -> Result<(), EncodeError> {
        if let Ok(small) = i32::try_from(v) {
            self.encode_int(small);
            return Ok(());
        }
        let (negative, magnitude) = to_le_magnitude(v);
        match u8::try_from(magnitude.len()) {
            Ok(len) => {
                put_u8(&mut self.buf, Tag::SmallBig as u8);
                put_u8(&mut self.buf, len);
            },
            Err(_) => {
                put_u8(&mut self.buf, Tag::LargeBig as u8);
                put_u32(&mut self.buf, Self::to_u32("Bignum", magnitude.len())?);
            },
        }
        put_u8(&mut self.buf, u8::from(negative));
        self.buf.extend_from_slice(&magnitude);
        Ok(())
    }

    fn encode_float(&mut self, v: f32) {
        let text = format_float(v);
        let mut payload = [0u8; FLOAT_LEN];
        let len = text.len().min(FLOAT_LEN);
        payload[..len].copy_from_slice(&text.as_bytes()[..len]);
        put_u8(&mut self.buf, Tag::Float as u8);
        self.buf.extend_from_slice(&payload);
    }

    fn encode_text(&mut self, tag: Tag, text: &str) -> Result<(), EncodeError> {
        let len = u16::try_from(text.len()).map_err(|_| EncodeError::Length { kind: tag.name(), len: text.len(), max: u16::MAX as u64 })?;
        put_u8(&mut self.buf, tag as u8);
        put_u16(&mut self.buf, len);
        self.buf.extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn encode_binary(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        put_u8(&mut self.buf, Tag::Binary as u8);
        put_u32(&mut self.buf, Self::to_u32("Binary", bytes.len())?);
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn encode_bitstring(&mut self, bits: &Bitstring) -> Result<(), EncodeError> {
        if bits.is_byte_aligned() {
            return self.encode_binary(bits.bytes());
        }
        put_u8(&mut self.buf, Tag::Bitstring as u8);
        put_u32(&mut self.buf, Self::to_u32("Bitstring", bits.bytes().len())?);
        put_u8(&mut self.buf, bits.trailing_bits());
        self.buf.extend_from_slice(bits.bytes());
        Ok(())
    }

    #[inline]
    fn to_u32(kind: &'static str, len: usize) -> Result<u32, EncodeError> {
        u32::try_from(len).map_err(|_| EncodeError::Length { kind, len, max: u32::MAX as u64 })
    }

}

/// Scientific notation with twenty fractional digits and an exponent of at least two digits, e.g.
/// `5.00000000000000000000e-01`.
pub fn format_float(v: f32) -> String {
    let text = format!("{:.20e}", v);
    match text.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(e) => format!("{}e{}{:02}", mantissa, if e < 0 { '-' } else { '+' }, e.abs()),
            Err(_) => text,
        },
        // inf and NaN carry no exponent
        None => text,
    }
}
