//! BERT is the subset of Erlang's external term format used for exchanging data with Erlang nodes. Every encoded term
//! starts with the version byte 131 followed by a tag byte which determines the layout of the rest of the term. All
//! multi-byte integers are big endian.
//!
//! Encoding functions take a `&Term` and a writer and return the amount of written bytes. Decoding functions take a
//! buffer and return the `Term` and the number of consumed bytes.
//!
//! # A note on integers
//!
//! Integers are normalized: any value which fits into an `i32` is represented by `Term::Int`, no matter whether it
//! arrived as a small integer, an integer or a bignum. Only values beyond that range are held as `Term::BigInt`.
//!
//! # A note on booleans and nil
//!
//! Erlang has no booleans, so `true` and `false` travel as the complex terms `{bert, true}` and `{bert, false}`. The
//! decoder collapses such two-element tuples back into their payload. The empty list doubles as nil.
//!
//! # BURP
//!
//! The `frame` functions wrap a single term into a 4 byte length prefix so that it can be sent over a stream. See
//! [`read_request`] and [`write_response`].
//!
//! # Examples
//!
//! ```
//! use bert::*;
//!
//! let term = Term::tuple(vec![Term::atom("reply"), Term::Int(42)]);
//! let mut buf = Vec::new();
//! Encoder::encode(&term, &mut buf).unwrap();
//! assert_eq!(buf, [
//!     131,        // version
//!     104, 2,     // tuple of two elements
//!     100, 0, 5,  // atom of length 5
//!     114, 101, 112, 108, 121,
//!     97, 42,     // small integer
//! ]);
//! let decoded = Decoder::decode(&buf).unwrap();
//! assert_eq!(term, decoded.0);
//! assert_eq!(13, decoded.1);
//! ```

mod bignum;
mod decode;
mod encode;
mod error;
mod frame;
mod tag;
mod term;
mod wire;

pub use decode::*;
pub use encode::*;
pub use error::*;
pub use frame::*;
pub use tag::*;
pub use term::*;
pub use malachite::Integer;
