use bert::{Bitstring, Encoder, Integer, Term};
use serde::ser::{self, Impossible, Serialize};
use std::io::Write;

use crate::error::{Error, Result};
use crate::types;

/// Serializes native values into `Term`s. Encoding to bytes happens only once the whole term has been built.
pub struct Serializer;

pub fn to_term<T: ?Sized + Serialize>(value: &T) -> Result<Term> {
    value.serialize(Serializer)
}

pub fn to_bytes<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(Encoder::to_vec(&to_term(value)?)?)
}

/// Nothing is written if the value can't be serialized. Returns the number of written bytes.
pub fn to_writer<T: ?Sized + Serialize, W: Write>(mut writer: W, value: &T) -> Result<usize> {
    Ok(Encoder::encode(&to_term(value)?, &mut writer)?)
}

/// Reinterprets the inner term of one of the wrappers in `types`
fn unwrap_marker(name: &'static str, term: Term) -> Result<Term> {
    match name {
        types::ATOM => match term {
            Term::String(name) => Ok(Term::Atom(name)),
            other => Err(Error::unexpected("string", &other)),
        },
        types::LIST => match term {
            Term::Tuple(elements) => Ok(Term::List(elements)),
            other => Err(Error::unexpected("tuple", &other)),
        },
        types::BIGINT => match term {
            Term::String(digits) => digits
                .parse::<Integer>()
                .map(Term::from)
                .map_err(|_| Error::Message(format!("{:?} is not an integer", digits))),
            other => Err(Error::unexpected("string", &other)),
        },
        types::BITS => match term {
            Term::List(elements) => match <[Term; 2]>::try_from(elements) {
                Ok([Term::Binary(bytes), Term::Int(bit_len)]) if bit_len >= 0 => {
                    let bit_len = bit_len as usize;
                    // no zero padding beyond the supplied bytes
                    if bit_len > bytes.len() * 8 {
                        return Err(Error::Message(format!("{} bits exceed the {} supplied bytes", bit_len, bytes.len())));
                    }
                    let bits = Bitstring::new(bytes, bit_len);
                    Ok(if bits.is_byte_aligned() { Term::Binary(bits.into_bytes()) } else { Term::Bitstring(bits) })
                }
                Ok([bytes, _]) => Err(Error::unexpected("binary and bit length", &bytes)),
                Err(elements) => Err(Error::Arity { expected: 2, found: elements.len() }),
            },
            other => Err(Error::unexpected("list", &other)),
        },
        _ => Ok(term),
    }
}

impl ser::Serializer for Serializer {

    type Ok = Term;
    type Error = Error;
    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVariant;
    type SerializeMap = Impossible<Term, Error>;
    type SerializeStruct = SerializeVec;
    type SerializeStructVariant = SerializeVariant;

    fn serialize_bool(self, v: bool) -> Result<Term> {
        Ok(Term::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Term> {
        Ok(Term::Float(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Term> {
        Ok(Term::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Term> {
        Ok(Term::from(v))
    }

    fn serialize_none(self) -> Result<Term> {
        Ok(Term::Nil)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Term> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Term> {
        Ok(Term::Nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Term> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, variant: &'static str) -> Result<Term> {
        Ok(Term::atom(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, name: &'static str, value: &T) -> Result<Term> {
        unwrap_marker(name, value.serialize(self)?)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(self, _name: &'static str, _index: u32, variant: &'static str, value: &T) -> Result<Term> {
        Ok(Term::Tuple(vec![Term::atom(variant), value.serialize(self)?]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), false))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, true))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, false))
    }

    fn serialize_tuple_variant(self, _name: &'static str, _index: u32, variant: &'static str, len: usize) -> Result<SerializeVariant> {
        Ok(SerializeVariant::new(variant, len))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::Unsupported("map"))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, false))
    }

    fn serialize_struct_variant(self, _name: &'static str, _index: u32, variant: &'static str, len: usize) -> Result<SerializeVariant> {
        Ok(SerializeVariant::new(variant, len))
    }

}

/// Collects the elements of sequences, tuples and structs. Fixed size tuples become lists, everything else a tuple.
pub struct SerializeVec {
    elements: Vec<Term>,
    list: bool,
}

impl SerializeVec {
    fn new(len: usize, list: bool) -> Self {
        Self { elements: Vec::with_capacity(len), list }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.elements.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn finish(self) -> Result<Term> {
        Ok(if self.list { Term::List(self.elements) } else { Term::Tuple(self.elements) })
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Term;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Term> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Term;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Term> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Term;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Term> {
        self.finish()
    }
}

impl ser::SerializeStruct for SerializeVec {
    type Ok = Term;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Term> {
        self.finish()
    }
}

/// Collects the fields of tuple and struct variants into `{Variant, Fields...}`
pub struct SerializeVariant {
    elements: Vec<Term>,
}

impl SerializeVariant {
    fn new(variant: &'static str, len: usize) -> Self {
        let mut elements = Vec::with_capacity(len + 1);
        elements.push(Term::atom(variant));
        Self { elements }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.elements.push(value.serialize(Serializer)?);
        Ok(())
    }
}

impl ser::SerializeTupleVariant for SerializeVariant {
    type Ok = Term;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Term> {
        Ok(Term::Tuple(self.elements))
    }
}

impl ser::SerializeStructVariant for SerializeVariant {
    type Ok = Term;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Term> {
        Ok(Term::Tuple(self.elements))
    }
}
