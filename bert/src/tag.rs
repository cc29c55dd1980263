//! Every BERT value on wire starts with a single tag byte which defines how the following payload
//! is to be read. A complete encoding is additionally prefixed with the version byte `131`.

use crate::error::DecodeError;
use std::convert::TryFrom;

/// The first byte of every top-level encoding
pub const VERSION: u8 = 131;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// 4 bytes byte count, 1 byte trailing bit count, raw bytes
    Bitstring = 77,
    /// 1 byte unsigned
    SmallInt = 97,
    /// 4 bytes signed
    Int = 98,
    /// 31 bytes of zero padded scientific notation
    Float = 99,
    /// 2 bytes length, text
    Atom = 100,
    /// 1 byte arity, elements
    SmallTuple = 104,
    /// 4 bytes arity, elements. Recognized but never decoded
    LargeTuple = 105,
    /// The empty list, no payload
    Nil = 106,
    /// 2 bytes length, text
    String = 107,
    /// 4 bytes element count, elements, trailing nil
    List = 108,
    /// 4 bytes length, raw bytes
    Binary = 109,
    /// 1 byte length, 1 byte sign, little endian magnitude
    SmallBig = 110,
    /// 4 bytes length, 1 byte sign, little endian magnitude
    LargeBig = 111,
}

impl Tag {

    /// Returns the mnemonic of the tag. This is useful for error messages.
    pub fn name(&self) -> &'static str {
        match *self {
            Tag::Bitstring  => "Bitstring",
            Tag::SmallInt   => "SmallInt",
            Tag::Int        => "Int",
            Tag::Float      => "Float",
            Tag::Atom       => "Atom",
            Tag::SmallTuple => "SmallTuple",
            Tag::LargeTuple => "LargeTuple",
            Tag::Nil        => "Nil",
            Tag::String     => "String",
            Tag::List       => "List",
            Tag::Binary     => "Binary",
            Tag::SmallBig   => "SmallBig",
            Tag::LargeBig   => "LargeBig",
        }
    }

}

impl TryFrom<u8> for Tag {
    type Error = DecodeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            x if x == Tag::Bitstring as u8  => Ok(Tag::Bitstring),
            x if x == Tag::SmallInt as u8   => Ok(Tag::SmallInt),
            x if x == Tag::Int as u8        => Ok(Tag::Int),
            x if x == Tag::Float as u8      => Ok(Tag::Float),
            x if x == Tag::Atom as u8       => Ok(Tag::Atom),
            x if x == Tag::SmallTuple as u8 => Ok(Tag::SmallTuple),
            x if x == Tag::LargeTuple as u8 => Ok(Tag::LargeTuple),
            x if x == Tag::Nil as u8        => Ok(Tag::Nil),
            x if x == Tag::String as u8     => Ok(Tag::String),
            x if x == Tag::List as u8       => Ok(Tag::List),
            x if x == Tag::Binary as u8     => Ok(Tag::Binary),
            x if x == Tag::SmallBig as u8   => Ok(Tag::SmallBig),
            x if x == Tag::LargeBig as u8   => Ok(Tag::LargeBig),
            x => Err(DecodeError::UnknownTag(x)),
        }
    }
}
