//! Wrappers for the BERT types which have no counterpart in the serde data model. Each of them serializes as a newtype
//! struct with a reserved name which the BERT serializer and deserializer recognize. Other serde formats just see the
//! inner value.

use bert::{Bitstring, Integer, Term};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_bytes::{ByteBuf, Bytes};
use std::fmt;
use std::marker::PhantomData;

pub(crate) const ATOM: &str = "$bert::private::Atom";
pub(crate) const LIST: &str = "$bert::private::List";
pub(crate) const BITS: &str = "$bert::private::Bits";
pub(crate) const BIGINT: &str = "$bert::private::BigInt";

/// An Erlang atom. Plain strings serialize as BERT strings, so symbolic names need this wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub String);

impl Atom {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Atom(name.into())
    }
}

impl From<Atom> for Term {
    fn from(atom: Atom) -> Term {
        Term::Atom(atom.0)
    }
}

impl Serialize for Atom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(ATOM, &self.0)
    }
}

impl<'de> Deserialize<'de> for Atom {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AtomVisitor;

        impl<'de> Visitor<'de> for AtomVisitor {
            type Value = Atom;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an atom")
            }

            fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<Atom, D::Error> {
                String::deserialize(deserializer).map(Atom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Atom, E> {
                Ok(Atom(v.to_owned()))
            }
        }

        deserializer.deserialize_newtype_struct(ATOM, AtomVisitor)
    }
}

/// An Erlang list. `Vec<T>` serializes as a tuple, wrap it in `List` to get a list instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct List<T>(pub Vec<T>);

impl<T: Serialize> Serialize for List<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(LIST, &self.0)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for List<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ListVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ListVisitor<T> {
            type Value = List<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a list")
            }

            fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<List<T>, D::Error> {
                Vec::deserialize(deserializer).map(List)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<List<T>, A::Error> {
                let mut elements = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
                while let Some(element) = seq.next_element()? {
                    elements.push(element);
                }
                Ok(List(elements))
            }
        }

        deserializer.deserialize_newtype_struct(LIST, ListVisitor(PhantomData))
    }
}

/// A bitstring of `bit_len` bits. See `Bitstring::new` for how `bytes` is fitted to the length. Serializing fails
/// when `bytes` holds fewer than `bit_len` bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bits {
    pub bytes: Vec<u8>,
    pub bit_len: usize,
}

impl From<Bits> for Bitstring {
    fn from(bits: Bits) -> Bitstring {
        Bitstring::new(bits.bytes, bits.bit_len)
    }
}

impl From<Bitstring> for Bits {
    fn from(bits: Bitstring) -> Bits {
        let bit_len = bits.bit_len();
        Bits { bytes: bits.into_bytes(), bit_len }
    }
}

impl Serialize for Bits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(BITS, &(Bytes::new(&self.bytes), self.bit_len as u64))
    }
}

impl<'de> Deserialize<'de> for Bits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BitsVisitor;

        impl<'de> Visitor<'de> for BitsVisitor {
            type Value = Bits;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a bitstring")
            }

            fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<Bits, D::Error> {
                let (bytes, bit_len) = <(ByteBuf, u64)>::deserialize(deserializer)?;
                let bit_len = usize::try_from(bit_len).map_err(|_| de::Error::custom(format!("bit length {} is too large", bit_len)))?;
                Ok(Bits { bytes: bytes.into_vec(), bit_len })
            }
        }

        deserializer.deserialize_newtype_struct(BITS, BitsVisitor)
    }
}

/// An integer of arbitrary size. Other formats see it as its decimal representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BigInt(pub Integer);

impl From<BigInt> for Term {
    fn from(v: BigInt) -> Term {
        Term::from(v.0)
    }
}

impl Serialize for BigInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(BIGINT, &self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for BigInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BigIntVisitor;

        impl<'de> Visitor<'de> for BigIntVisitor {
            type Value = BigInt;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer")
            }

            fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<BigInt, D::Error> {
                let digits = String::deserialize(deserializer)?;
                self.visit_str(&digits)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<BigInt, E> {
                v.parse::<Integer>().map(BigInt).map_err(|_| E::custom(format!("{:?} is not an integer", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigInt, E> {
                Ok(BigInt(Integer::from(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigInt, E> {
                Ok(BigInt(Integer::from(v)))
            }
        }

        deserializer.deserialize_newtype_struct(BIGINT, BigIntVisitor)
    }
}
