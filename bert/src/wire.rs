//! Fixed width big endian integers and length delimited byte runs. All multi-byte integers are in network byte order
//! regardless of the host.

use crate::error::DecodeError;
use std::io::Read;

/// Collections announce their length up front, but that length is untrusted input, so we never reserve more than
/// this many elements before they have actually been read.
pub const PREALLOC_LIMIT: usize = 1 << 12;

/// A reader which keeps track of how many bytes have been consumed, so that errors can point at their position.
pub struct Reader<R> {
    inner: R,
    pos: usize,
}

impl<R: Read> Reader<R> {

    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        let mut filled = 0;
        while filled < N {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.pos += filled;
                    return Err(DecodeError::Eof);
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.pos += filled;
                    return Err(e.into());
                }
            }
        }
        self.pos += N;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Reads exactly `len` bytes. The buffer grows with the data actually read, not with the announced length.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        let read = (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        self.pos += read;
        if read < len {
            Err(DecodeError::Eof)
        } else {
            Ok(buf)
        }
    }

}

#[inline]
pub fn put_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

#[inline]
pub fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

#[inline]
pub fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::{put_u16, put_u32, Reader};
    use crate::error::DecodeError;

    #[test]
    fn big_endian() {
        let mut buf = Vec::new();
        put_u16(&mut buf, 0x0102);
        put_u32(&mut buf, 0x0304_0506);
        assert_eq!(vec![1, 2, 3, 4, 5, 6], buf);
        let mut reader = Reader::new(&buf[..]);
        assert_eq!(0x0102, reader.read_u16().unwrap());
        assert_eq!(0x0304_0506, reader.read_u32().unwrap());
        assert_eq!(6, reader.position());
    }

    #[test]
    fn negative_int() {
        let buf = [255, 255, 255, 248];
        assert_eq!(-8, Reader::new(&buf[..]).read_i32().unwrap());
    }

    #[test]
    fn short_reads() {
        let buf = [1, 2, 3];
        let mut reader = Reader::new(&buf[..]);
        assert!(matches!(reader.read_u32(), Err(DecodeError::Eof)));
        let mut reader = Reader::new(&buf[..]);
        assert!(matches!(reader.read_bytes(4), Err(DecodeError::Eof)));
        let mut reader = Reader::new(&buf[..]);
        assert_eq!(vec![1, 2], reader.read_bytes(2).unwrap());
        assert_eq!(3, reader.read_u8().unwrap());
        assert!(matches!(reader.read_u8(), Err(DecodeError::Eof)));
    }

    #[test]
    fn huge_announced_length() {
        let buf = [0u8; 16];
        let mut reader = Reader::new(&buf[..]);
        assert!(matches!(reader.read_bytes(u32::MAX as usize), Err(DecodeError::Eof)));
    }

}
