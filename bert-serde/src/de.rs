use bert::{Decoder, Integer, Term};
use serde::de::value::StringDeserializer;
use serde::de::{self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, SeqAccess, VariantAccess, Visitor};
use std::convert::TryFrom;
use std::io::Read;

use crate::error::{Error, Result};
use crate::types;

/// Binds a decoded `Term` to a native value. Tuples and lists bind positionally to structs, tuple structs and tuples,
/// the element count has to match exactly.
pub struct Deserializer {
    input: Term,
}

impl Deserializer {
    pub fn new(input: Term) -> Self {
        Deserializer { input }
    }
}

pub fn from_term<T: DeserializeOwned>(term: Term) -> Result<T> {
    T::deserialize(Deserializer::new(term))
}

/// The buffer must hold exactly one term
pub fn from_bytes<T: DeserializeOwned>(buf: &[u8]) -> Result<T> {
    let (term, consumed) = Decoder::decode(buf)?;
    if consumed < buf.len() {
        return Err(bert::DecodeError::Trailing(buf.len() - consumed).at(consumed).into());
    }
    from_term(term)
}

/// Reads a single term. Bytes after the term are left in the reader.
pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    from_term(Decoder::decode_from(reader)?)
}

impl Deserializer {

    fn integer<T>(&self) -> Result<T>
    where
        T: TryFrom<i32> + for<'a> TryFrom<&'a Integer>,
    {
        let v = match &self.input {
            Term::Int(i) => T::try_from(*i).ok(),
            Term::BigInt(i) => T::try_from(i).ok(),
            other => return Err(Error::unexpected("integer", other)),
        };
        v.ok_or_else(|| Error::Int(self.input.to_string()))
    }

    fn elements(self, expected: Option<usize>) -> Result<Vec<Term>> {
        let elements = match self.input {
            Term::Tuple(elements) | Term::List(elements) => elements,
            Term::Nil => Vec::new(),
            other => return Err(Error::unexpected("tuple or list", &other)),
        };
        match expected {
            Some(expected) if expected != elements.len() => Err(Error::Arity { expected, found: elements.len() }),
            _ => Ok(elements),
        }
    }

    fn text(self) -> Result<String> {
        match self.input {
            Term::String(s) | Term::Atom(s) => Ok(s),
            other => Err(Error::unexpected("string", &other)),
        }
    }

    /// Presents the inner value of one of the wrappers in `types` the way its `Deserialize` impl expects it
    fn wrap_marker(self, name: &'static str) -> Result<Term> {
        match (name, self.input) {
            (types::ATOM, Term::Atom(name)) => Ok(Term::Atom(name)),
            (types::ATOM, other) => Err(Error::unexpected("atom", &other)),
            (types::LIST, Term::List(elements)) => Ok(Term::List(elements)),
            (types::LIST, Term::Nil) => Ok(Term::List(Vec::new())),
            (types::LIST, other) => Err(Error::unexpected("list", &other)),
            (types::BIGINT, Term::Int(i)) => Ok(Term::String(i.to_string())),
            (types::BIGINT, Term::BigInt(i)) => Ok(Term::String(i.to_string())),
            (types::BIGINT, other) => Err(Error::unexpected("integer", &other)),
            (types::BITS, Term::Bitstring(bits)) => {
                let bit_len = bits.bit_len();
                Ok(Term::List(vec![Term::Binary(bits.into_bytes()), Term::from(bit_len)]))
            }
            (types::BITS, Term::Binary(bytes)) => {
                let bit_len = bytes.len() * 8;
                Ok(Term::List(vec![Term::Binary(bytes), Term::from(bit_len)]))
            }
            (types::BITS, other) => Err(Error::unexpected("bitstring", &other)),
            (_, term) => Ok(term),
        }
    }

}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.input {
            Term::Nil => visitor.visit_unit(),
            Term::Bool(v) => visitor.visit_bool(v),
            Term::Int(v) => visitor.visit_i32(v),
            Term::BigInt(v) => match (i64::try_from(&v), u64::try_from(&v)) {
                (Ok(v), _) => visitor.visit_i64(v),
                (_, Ok(v)) => visitor.visit_u64(v),
                _ => visitor.visit_string(v.to_string()),
            },
            Term::Float(v) => visitor.visit_f32(v),
            Term::Atom(v) | Term::String(v) => visitor.visit_string(v),
            Term::Binary(v) => visitor.visit_byte_buf(v),
            Term::Bitstring(v) => visitor.visit_byte_buf(v.into_bytes()),
            Term::Tuple(v) | Term::List(v) => visitor.visit_seq(SeqDeserializer::new(v)),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.input {
            Term::Bool(v) => visitor.visit_bool(v),
            other => Err(Error::unexpected("bool", &other)),
        }
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.integer()?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.integer()?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.integer()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.integer()?)
    }

    fn deserialize_i128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i128(self.integer()?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.integer()?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.integer()?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.integer()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.integer()?)
    }

    fn deserialize_u128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u128(self.integer()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.input {
            Term::Float(v) => visitor.visit_f32(v),
            other => Err(Error::unexpected("float", &other)),
        }
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.input {
            Term::Float(v) => visitor.visit_f64(f64::from(v)),
            other => Err(Error::unexpected("float", &other)),
        }
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.text()?;
        let mut chars = v.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::Message(format!("expected a single character, found {:?}", v))),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.text()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.input {
            Term::Binary(v) => visitor.visit_byte_buf(v),
            Term::Nil => visitor.visit_byte_buf(Vec::new()),
            other => Err(Error::unexpected("binary", &other)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.input {
            Term::Nil => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.input {
            Term::Nil => visitor.visit_unit(),
            other => Err(Error::unexpected("nil", &other)),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(self, name: &'static str, visitor: V) -> Result<V::Value> {
        visitor.visit_newtype_struct(Deserializer::new(self.wrap_marker(name)?))
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.elements(None)?))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.elements(Some(len))?))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(self, _name: &'static str, len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported("map"))
    }

    fn deserialize_struct<V: Visitor<'de>>(self, _name: &'static str, fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        self.deserialize_tuple(fields.len(), visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(self, _name: &'static str, _variants: &'static [&'static str], visitor: V) -> Result<V::Value> {
        match self.input {
            Term::Atom(variant) | Term::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            Term::Tuple(mut elements) if matches!(elements.first(), Some(Term::Atom(_))) => {
                let variant = match elements.remove(0) {
                    Term::Atom(variant) => variant,
                    other => return Err(Error::unexpected("atom", &other)),
                };
                visitor.visit_enum(EnumDeserializer { variant, fields: elements })
            }
            other => Err(Error::unexpected("atom or tagged tuple", &other)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.text()?)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

}

struct EnumDeserializer {
    variant: String,
    fields: Vec<Term>,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let deserializer: StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(deserializer)?;
        Ok((variant, VariantDeserializer { fields: self.fields }))
    }
}

/// The elements of a `{Variant, Fields...}` tuple after the tag
struct VariantDeserializer {
    fields: Vec<Term>,
}

impl VariantDeserializer {
    fn exactly(self, expected: usize) -> Result<Vec<Term>> {
        if self.fields.len() == expected {
            Ok(self.fields)
        } else {
            Err(Error::Arity { expected: expected + 1, found: self.fields.len() + 1 })
        }
    }
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        self.exactly(0).map(|_| ())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        let mut fields = self.exactly(1)?;
        match fields.pop() {
            Some(field) => seed.deserialize(Deserializer::new(field)),
            None => Err(Error::Arity { expected: 2, found: 1 }),
        }
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.exactly(len)?))
    }

    fn struct_variant<V: Visitor<'de>>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.exactly(fields.len())?))
    }

}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Term>,
}

impl SeqDeserializer {
    fn new(elements: Vec<Term>) -> Self {
        Self { iter: elements.into_iter() }
    }
}

impl<'de> SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        match self.iter.next() {
            Some(term) => seed.deserialize(Deserializer::new(term)).map(Some),
            None => Ok(None),
        }
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }

}

#[cfg(test)]
mod tests {
    use super::{from_bytes, from_reader, from_term};
    use crate::error::Error;
    use crate::types::{Atom, BigInt, Bits, List};
    use bert::{Bitstring, DecodeError, Integer, Term};
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    enum Command {
        Stop,
        Move(i32),
        Jump(u8, u8),
        Say { text: String, loud: bool },
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Person {
        name: String,
        age: u8,
        nickname: Option<String>,
    }

    #[test]
    fn scalars() {
        assert_eq!(true, from_term::<bool>(Term::Bool(true)).unwrap());
        assert_eq!(-5i64, from_term::<i64>(Term::Int(-5)).unwrap());
        assert_eq!(u64::MAX, from_term::<u64>(Term::BigInt(Integer::from(u64::MAX))).unwrap());
        assert_eq!(0.5f64, from_term::<f64>(Term::Float(0.5)).unwrap());
        assert_eq!('ß', from_term::<char>(Term::string("ß")).unwrap());
        assert_eq!("abc", from_term::<String>(Term::atom("abc")).unwrap());
        assert_eq!(vec![1u8, 2], from_term::<serde_bytes::ByteBuf>(Term::Binary(vec![1, 2])).unwrap().into_vec());
        assert_eq!(None, from_term::<Option<u8>>(Term::Nil).unwrap());
        assert_eq!(Some(3), from_term::<Option<u8>>(Term::Int(3)).unwrap());
    }

    #[test]
    fn integer_overflow() {
        assert!(matches!(from_term::<u8>(Term::Int(256)), Err(Error::Int(_))));
        assert!(matches!(from_term::<u32>(Term::Int(-1)), Err(Error::Int(_))));
        assert!(matches!(from_term::<i64>(Term::BigInt(Integer::from(u64::MAX))), Err(Error::Int(_))));
        assert!(matches!(from_term::<i32>(Term::Float(1.0)), Err(Error::UnexpectedTerm { expected: "integer", found: "float" })));
    }

    #[test]
    fn positional_binding() {
        let term = Term::Tuple(vec![Term::string("Ada"), Term::Int(36), Term::Nil]);
        assert_eq!(Person { name: "Ada".to_owned(), age: 36, nickname: None }, from_term(term).unwrap());
        let term = Term::List(vec![Term::string("Ada"), Term::Int(36), Term::string("Countess")]);
        assert_eq!(Some("Countess".to_owned()), from_term::<Person>(term).unwrap().nickname);
        let term = Term::List(vec![Term::Int(1), Term::string("a")]);
        assert_eq!((1u8, "a".to_owned()), from_term(term).unwrap());
    }

    #[test]
    fn binding_fails_fast() {
        let short = Term::Tuple(vec![Term::string("Ada"), Term::Int(36)]);
        assert!(matches!(from_term::<Person>(short), Err(Error::Arity { expected: 3, found: 2 })));
        let long = Term::Tuple(vec![Term::string("Ada"), Term::Int(36), Term::Nil, Term::Nil]);
        assert!(matches!(from_term::<Person>(long), Err(Error::Arity { expected: 3, found: 4 })));
        let wrong = Term::Tuple(vec![Term::Int(36), Term::Int(36), Term::Nil]);
        assert!(matches!(from_term::<Person>(wrong), Err(Error::UnexpectedTerm { expected: "string", found: "integer" })));
        assert!(matches!(from_term::<Person>(Term::Int(1)), Err(Error::UnexpectedTerm { expected: "tuple or list", found: "integer" })));
    }

    #[test]
    fn enums() {
        assert_eq!(Command::Stop, from_term(Term::atom("Stop")).unwrap());
        assert_eq!(Command::Move(-2), from_term(Term::Tuple(vec![Term::atom("Move"), Term::Int(-2)])).unwrap());
        assert_eq!(Command::Jump(1, 2), from_term(Term::Tuple(vec![Term::atom("Jump"), Term::Int(1), Term::Int(2)])).unwrap());
        assert_eq!(
            Command::Say { text: "hi".to_owned(), loud: false },
            from_term(Term::Tuple(vec![Term::atom("Say"), Term::string("hi"), Term::Bool(false)])).unwrap(),
        );
        let missing = Term::Tuple(vec![Term::atom("Jump"), Term::Int(1)]);
        assert!(matches!(from_term::<Command>(missing), Err(Error::Arity { expected: 3, found: 2 })));
        assert!(matches!(from_term::<Command>(Term::atom("Fly")), Err(Error::Message(_))));
    }

    #[test]
    fn wrappers() {
        assert_eq!(Atom::new("ok"), from_term::<Atom>(Term::atom("ok")).unwrap());
        assert!(matches!(from_term::<Atom>(Term::string("ok")), Err(Error::UnexpectedTerm { expected: "atom", found: "string" })));
        assert_eq!(List(vec![1u8, 2]), from_term(Term::List(vec![Term::Int(1), Term::Int(2)])).unwrap());
        assert_eq!(List(Vec::<u8>::new()), from_term(Term::Nil).unwrap());
        assert!(matches!(from_term::<List<u8>>(Term::Tuple(vec![])), Err(Error::UnexpectedTerm { expected: "list", .. })));
        let huge = Integer::from(u128::MAX) * Integer::from(3);
        assert_eq!(BigInt(huge.clone()), from_term(Term::BigInt(huge)).unwrap());
        assert_eq!(BigInt(Integer::from(-9)), from_term(Term::Int(-9)).unwrap());
        assert_eq!(Bits { bytes: vec![1, 128], bit_len: 9 }, from_term(Term::Bitstring(Bitstring::new(vec![1, 128], 9))).unwrap());
        assert_eq!(Bits { bytes: vec![5], bit_len: 8 }, from_term(Term::Binary(vec![5])).unwrap());
    }

    #[test]
    fn bytes() {
        let buf = [131u8, 104, 2, 100, 0, 2, 111, 107, 97, 7];
        assert_eq!((Atom::new("ok"), 7u8), from_bytes(&buf).unwrap());
        let mut trailing = buf.to_vec();
        trailing.push(0);
        match from_bytes::<(Atom, u8)>(&trailing) {
            Err(Error::Decode(e)) => {
                assert_eq!(10, e.position());
                assert!(matches!(e.into_inner(), DecodeError::Trailing(1)));
            }
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
        let mut reader = &trailing[..];
        assert_eq!((Atom::new("ok"), 7u8), from_reader(&mut reader).unwrap());
        assert_eq!(1, reader.len());
    }

}
