//! The atom of BERT is the `Term`. Every term is encoded on wire as a tag byte followed by a payload whose length is
//! either fixed by the tag or given explicitly in a size field.

use malachite::Integer;
use std::convert::TryFrom;
use std::fmt;

/// The possible values according to the BERT data model.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// The empty list, also produced by the complex term `{bert, nil}`
    Nil,
    /// Produced by the complex terms `{bert, true}` and `{bert, false}`
    Bool(bool),
    /// Any integer which fits into 32 bits, no matter if it was encoded as small integer or integer
    Int(i32),
    /// Integers outside of the 32 bit range
    BigInt(Integer),
    Float(f32),
    Atom(String),
    String(String),
    Binary(Vec<u8>),
    Bitstring(Bitstring),
    Tuple(Vec<Term>),
    List(Vec<Term>),
}

impl Term {

    pub fn atom<S: Into<String>>(name: S) -> Self {
        Term::Atom(name.into())
    }

    pub fn string<S: Into<String>>(text: S) -> Self {
        Term::String(text.into())
    }

    pub fn tuple(elements: Vec<Term>) -> Self {
        Term::Tuple(elements)
    }

    pub fn list(elements: Vec<Term>) -> Self {
        Term::List(elements)
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Term::Atom(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the name of the variant. This is useful for error messages.
    pub fn name(&self) -> &'static str {
        match *self {
            Term::Nil          => "nil",
            Term::Bool(_)      => "bool",
            Term::Int(_)       => "integer",
            Term::BigInt(_)    => "bignum",
            Term::Float(_)     => "float",
            Term::Atom(_)      => "atom",
            Term::String(_)    => "string",
            Term::Binary(_)    => "binary",
            Term::Bitstring(_) => "bitstring",
            Term::Tuple(_)     => "tuple",
            Term::List(_)      => "list",
        }
    }

    fn write_atom(f: &mut fmt::Formatter<'_>, atom: &str) -> fmt::Result {
        let mut chars = atom.chars();
        let bare = matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '@')
            && atom != "true" && atom != "false";
        if bare {
            f.write_str(atom)
        } else {
            write!(f, "'{}'", atom.replace('\\', "\\\\").replace('\'', "\\'").replace('\n', "\\n"))
        }
    }

    fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, elements: &[Term], close: &str) -> fmt::Result {
        f.write_str(open)?;
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", element)?;
        }
        f.write_str(close)
    }

}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Nil          => f.write_str("[]"),
            Term::Bool(true)   => f.write_str("true"),
            Term::Bool(false)  => f.write_str("false"),
            Term::Int(v)       => write!(f, "{}", v),
            Term::BigInt(v)    => write!(f, "{}", v),
            Term::Float(v)     => write!(f, "{:?}", v),
            Term::Atom(v)      => Self::write_atom(f, v),
            Term::String(v)    => write!(f, "\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")),
            Term::Binary(v)    => write!(f, "<<{}>>", v.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(",")),
            Term::Bitstring(v) => write!(f, "{}", v),
            Term::Tuple(v)     => Self::write_seq(f, "{", v, "}"),
            Term::List(v)      => Self::write_seq(f, "[", v, "]"),
        }
    }
}

/// A sequence of bytes whose bit length is not necessarily a multiple of eight. Only the `trailing_bits` most
/// significant bits of the last byte belong to the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitstring {
    bytes: Vec<u8>,
    bits: u8,
}

impl Bitstring {

    /// Creates a bitstring of `bit_len` bits. The buffer is cut down or left-padded with zero bytes until it holds
    /// exactly as many bytes as are needed for `bit_len` bits. Padding allocates `bit_len / 8` bytes up front, so
    /// lengths from untrusted sources need to be checked against the buffer first.
    pub fn new(mut bytes: Vec<u8>, bit_len: usize) -> Self {
        let size = bit_len / 8 + usize::from(bit_len % 8 != 0);
        if bytes.len() < size {
            let mut padded = vec![0; size - bytes.len()];
            padded.append(&mut bytes);
            bytes = padded;
        } else {
            bytes.truncate(size);
        }
        let bits = match bit_len % 8 {
            0 => 8,
            b => b as u8,
        };
        Bitstring { bytes, bits }
    }

    /// Creates a bitstring from its wire representation. Returns `None` unless `bytes` is non-empty and
    /// `trailing_bits` lies within 1..=8.
    pub fn from_parts(bytes: Vec<u8>, trailing_bits: u8) -> Option<Self> {
        if bytes.is_empty() || trailing_bits == 0 || trailing_bits > 8 {
            None
        } else {
            Some(Bitstring { bytes, bits: trailing_bits })
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The number of used bits in the last byte
    pub fn trailing_bits(&self) -> u8 {
        self.bits
    }

    pub fn bit_len(&self) -> usize {
        match self.bytes.len() {
            0 => 0,
            n => (n - 1) * 8 + self.bits as usize,
        }
    }

    /// Byte aligned bitstrings are plain binaries on wire
    pub fn is_byte_aligned(&self) -> bool {
        self.bytes.is_empty() || self.bits == 8
    }

}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<<")?;
        for (i, b) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if i + 1 == self.bytes.len() && self.bits != 8 {
                write!(f, "{}:{}", b >> (8 - self.bits), self.bits)?;
            } else {
                write!(f, "{}", b)?;
            }
        }
        f.write_str(">>")
    }
}

macro_rules! from_small_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Term {
            fn from(v: $t) -> Term {
                Term::Int(i32::from(v))
            }
        }
    )*};
}

macro_rules! from_wide_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Term {
            fn from(v: $t) -> Term {
                match i32::try_from(v) {
                    Ok(i) => Term::Int(i),
                    Err(_) => Term::BigInt(Integer::from(v)),
                }
            }
        }
    )*};
}

from_small_int!(i8, i16, i32, u8, u16);
from_wide_int!(u32, i64, u64, i128, u128, isize, usize);

impl From<Integer> for Term {
    fn from(v: Integer) -> Term {
        match i32::try_from(&v) {
            Ok(i) => Term::Int(i),
            Err(_) => Term::BigInt(v),
        }
    }
}

impl From<bool> for Term {
    fn from(v: bool) -> Term {
        Term::Bool(v)
    }
}

impl From<f32> for Term {
    fn from(v: f32) -> Term {
        Term::Float(v)
    }
}

impl From<f64> for Term {
    fn from(v: f64) -> Term {
        Term::Float(v as f32)
    }
}

impl From<&str> for Term {
    fn from(v: &str) -> Term {
        Term::String(v.to_owned())
    }
}

impl From<String> for Term {
    fn from(v: String) -> Term {
        Term::String(v)
    }
}

impl From<&[u8]> for Term {
    fn from(v: &[u8]) -> Term {
        Term::Binary(v.to_vec())
    }
}

impl From<Vec<u8>> for Term {
    fn from(v: Vec<u8>) -> Term {
        Term::Binary(v)
    }
}

impl From<Bitstring> for Term {
    fn from(v: Bitstring) -> Term {
        Term::Bitstring(v)
    }
}

impl<T: Into<Term>> From<Option<T>> for Term {
    fn from(v: Option<T>) -> Term {
        match v {
            Some(v) => v.into(),
            None => Term::Nil,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Bitstring, Term};
    use malachite::Integer;

    #[test]
    fn integers_normalize() {
        assert_eq!(Term::Int(255), Term::from(255u8));
        assert_eq!(Term::Int(i32::MAX), Term::from(i64::from(i32::MAX)));
        assert_eq!(Term::Int(i32::MIN), Term::from(i64::from(i32::MIN)));
        assert_eq!(Term::BigInt(Integer::from(2_147_483_648i64)), Term::from(2_147_483_648i64));
        assert_eq!(Term::BigInt(Integer::from(u64::MAX)), Term::from(u64::MAX));
        assert_eq!(Term::Int(7), Term::from(Integer::from(7)));
    }

    #[test]
    fn bitstring_padding() {
        let bits = Bitstring::new(vec![1], 12);
        assert_eq!(&[0, 1], bits.bytes());
        assert_eq!(4, bits.trailing_bits());
        assert_eq!(12, bits.bit_len());
        assert!(!bits.is_byte_aligned());
    }

    #[test]
    fn bitstring_truncation() {
        let bits = Bitstring::new(vec![1, 2, 3], 9);
        assert_eq!(&[1, 2], bits.bytes());
        assert_eq!(1, bits.trailing_bits());
    }

    #[test]
    fn bitstring_alignment() {
        assert!(Bitstring::new(vec![1, 2], 16).is_byte_aligned());
        assert!(Bitstring::new(Vec::new(), 0).is_byte_aligned());
        assert_eq!(0, Bitstring::new(Vec::new(), 0).bit_len());
    }

    #[test]
    fn bitstring_parts() {
        assert!(Bitstring::from_parts(vec![128], 1).is_some());
        assert!(Bitstring::from_parts(vec![128], 0).is_none());
        assert!(Bitstring::from_parts(vec![128], 9).is_none());
        assert!(Bitstring::from_parts(Vec::new(), 3).is_none());
    }

    #[test]
    fn trailing_bits_display_as_value() {
        assert_eq!("<<5:3>>", Bitstring::new(vec![0b1010_0000], 3).to_string());
        assert_eq!("<<1,127:7>>", Bitstring::new(vec![1, 0b1111_1110], 15).to_string());
    }

    #[test]
    fn display() {
        let term = Term::Tuple(vec![
            Term::atom("reply"),
            Term::List(vec![Term::Int(1), Term::Float(0.5), Term::Nil]),
            Term::string("say \"hi\""),
            Term::Binary(vec![1, 2, 3]),
            Term::Bitstring(Bitstring::new(vec![128], 1)),
            Term::atom("Capitalized"),
            Term::atom("true"),
            Term::Bool(false),
        ]);
        assert_eq!(
            "{reply, [1, 0.5, []], \"say \\\"hi\\\"\", <<1,2,3>>, <<1:1>>, 'Capitalized', 'true', false}",
            format!("{}", term)
        );
    }

}
