//! Conveniently serialize and deserialize your Rust data structures into the BERT wire format.
//!
//! Values are mapped onto `bert::Term`s first and encoded afterwards, so serialization either produces a complete
//! message or nothing at all. Deserialization decodes the whole term before binding it.
//!
//! # Mapping
//!
//! BERT has no notion of field names: structs, tuple structs and tuples bind positionally and their arity has to match
//! exactly. Variable length sequences like `Vec<T>` become tuples while fixed length tuples become lists. Unit variants
//! become atoms, all other variants become tuples tagged with the variant name. Maps are not supported.
//!
//! Erlang distinguishes more types than serde does. Use the wrappers [`Atom`], [`List`], [`Bits`] and [`BigInt`] to
//! get atoms, lists, bitstrings and arbitrarily large integers.
//!
//! # Examples
//!
//! ```
//! use bert_serde::{Atom, List};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub enum Species {
//!     PrionailurusViverrinus,
//!     LynxLynx,
//!     FelisCatus,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub struct Cat {
//!     name: String,
//!     species: Species,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Message {
//!     kind: Atom,
//!     cats: List<Cat>,
//! }
//!
//! // In Erlang syntax, as `bq` would print it:
//! // {cats, [{"Jessica", 'PrionailurusViverrinus'}, {"Wantan", 'LynxLynx'}]}
//! let msg = Message {
//!     kind: Atom::new("cats"),
//!     cats: List(vec![
//!         Cat { name: "Jessica".to_owned(), species: Species::PrionailurusViverrinus },
//!         Cat { name: "Wantan".to_owned(), species: Species::LynxLynx },
//!     ]),
//! };
//!
//! let bytes = bert_serde::to_bytes(&msg).unwrap();
//! assert_eq!(&bytes[..17], [
//!     131,                     // version
//!     104, 2,                  // tuple of two elements
//!       100, 0, 4,             // atom of length 4
//!         99, 97, 116, 115,    // 'cats'
//!       108, 0, 0, 0, 2,       // list of two elements
//!         104, 2,              // tuple of two elements, this is the first cat
//! ]);
//!
//! let deserialized: Message = bert_serde::from_bytes(&bytes).unwrap();
//! assert_eq!(msg, deserialized);
//! ```

mod de;
mod error;
mod frame;
mod ser;
mod types;

pub use de::{from_bytes, from_reader, from_term, Deserializer};
pub use error::{Error, Result};
pub use frame::{from_frame, to_frame};
pub use ser::{to_bytes, to_term, to_writer, Serializer};
pub use types::{Atom, BigInt, Bits, List};

#[cfg(test)]
mod tests {
    use serde::{Serialize, Deserialize};
    use super::{to_bytes, from_bytes, Atom, BigInt, Bits, List};
    use bert::Integer;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Enum {
        UnitVariant,
        NewtypeVariant(bool),
        TupleVariant(f32, f32),
        StructVariant{ a: usize, b: usize, c: usize },
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Struct {
        field: u8,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct UnitStruct;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct NewtypeStruct(String);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct TupleStruct(char, char, char);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Test {
        bool: bool,
        i8: i8,
        i16: i16,
        i32: i32,
        i64: i64,
        i128: i128,
        u8: u8,
        u16: u16,
        u32: u32,
        u64: u64,
        f32: f32,
        f64: f64,
        char: char,
        str: String,
        #[serde(with = "serde_bytes")]
        bytes: Vec<u8>,
        none: Option<u8>,
        some: Option<u8>,
        unit: (),
        unit_struct: UnitStruct,
        newtype_struct: NewtypeStruct,
        tuple_struct: TupleStruct,
        seq: Vec<String>,
        tuple: (u16, u16, u16),
        array: [u8; 2],
        r#struct: Struct,
        unit_variant: Enum,
        newtype_variant: Enum,
        tuple_variant: Enum,
        struct_variant: Enum,
        atom: Atom,
        list: List<Atom>,
        bits: Bits,
        big: BigInt,
    }

    #[test]
    fn roundtrip() {
        let message = Test {
            bool: true,
            i8: -1,
            i16: -20,
            i32: -7000,
            i64: i64::MIN,
            i128: i128::MAX,
            u8: 1,
            u16: 20,
            u32: 7000,
            u64: u64::MAX,
            f32: 1337.5,
            f64: -0.125,
            char: 'x',
            str: "Test".to_string(),
            bytes: vec![131, 104, 2, 100, 0, 4, 98, 101, 114, 116],
            none: None,
            some: Some(0),
            unit: (),
            unit_struct: UnitStruct,
            newtype_struct: NewtypeStruct("Qapla'".to_string()),
            tuple_struct: TupleStruct('a', 'ä', '𝄞'),
            seq: vec![
                "Elen".to_string(),
                "síla".to_string(),
                "lúmenn'".to_string(),
                "omentielvo".to_string(),
            ],
            tuple: (0, 0, 0),
            array: [255, 0],
            r#struct: Struct {
                field: 42,
            },
            unit_variant: Enum::UnitVariant,
            newtype_variant: Enum::NewtypeVariant(false),
            tuple_variant: Enum::TupleVariant(1.0, 0.75),
            struct_variant: Enum::StructVariant {
                a: 255,
                b: 0,
                c: 33,
            },
            atom: Atom::new("Enterprise"),
            list: List(vec![Atom::new("Voyager"), Atom::new("Defiant")]),
            bits: Bits { bytes: vec![3, 0b1010_0000], bit_len: 11 },
            big: BigInt(Integer::from(u128::MAX) * Integer::from(u128::MAX)),
        };
        assert_eq!(message, from_bytes::<Test>(&to_bytes(&message).unwrap()).unwrap());
    }

    #[test]
    fn empty_collections() {
        let empty: (Vec<u8>, List<u8>, String) = (Vec::new(), List(Vec::new()), String::new());
        assert_eq!(empty, from_bytes(&to_bytes(&empty).unwrap()).unwrap());
    }
}
