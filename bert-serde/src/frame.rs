//! Typed BURP frames

use bert::{read_frame, write_frame};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

use crate::de::from_term;
use crate::error::Result;
use crate::ser::to_term;

/// Writes `value` as one length prefixed frame. Returns the number of written bytes including the prefix.
pub fn to_frame<T: ?Sized + Serialize, W: Write>(mut writer: W, value: &T) -> Result<usize> {
    Ok(write_frame(&mut writer, &to_term(value)?)?)
}

/// Reads one length prefixed frame and binds its term to `T`
pub fn from_frame<T: DeserializeOwned, R: Read>(mut reader: R) -> Result<T> {
    from_term(read_frame(&mut reader)?)
}

#[cfg(test)]
mod tests {
    use super::{from_frame, to_frame};
    use crate::error::Error;
    use crate::types::{Atom, List};
    use bert::DecodeError;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Call {
        kind: Atom,
        module: Atom,
        function: Atom,
        arguments: List<u32>,
    }

    #[test]
    fn request_envelope() {
        let call = Call {
            kind: Atom::new("call"),
            module: Atom::new("math"),
            function: Atom::new("sum"),
            arguments: List(vec![1, 2, 3]),
        };
        let mut buf = Vec::new();
        let written = to_frame(&mut buf, &call).unwrap();
        assert_eq!(written, buf.len());
        assert_eq!((written - 4) as u32, u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]));
        let request = bert::read_request(&mut &buf[..]).unwrap();
        assert_eq!("math", request.module);
        assert_eq!(call, from_frame(&buf[..]).unwrap());
    }

    #[test]
    fn reply() {
        let mut buf = Vec::new();
        to_frame(&mut buf, &(Atom::new("reply"), 42u8)).unwrap();
        assert_eq!(vec![0, 0, 0, 17, 131, 108, 0, 0, 0, 2, 100, 0, 5, 114, 101, 112, 108, 121, 97, 42, 106], buf);
        #[derive(Serialize)]
        struct Reply(Atom, u8);
        buf.clear();
        to_frame(&mut buf, &Reply(Atom::new("reply"), 42)).unwrap();
        assert_eq!(vec![0, 0, 0, 13, 131, 104, 2, 100, 0, 5, 114, 101, 112, 108, 121, 97, 42], buf);
    }

    #[test]
    fn short_frame() {
        let buf = [0u8, 0, 0, 9, 131, 97];
        match from_frame::<u8, _>(&buf[..]) {
            Err(Error::Decode(e)) => assert!(matches!(e.into_inner(), DecodeError::Eof)),
            other => panic!("unexpected result {:?}", other),
        }
    }

}
