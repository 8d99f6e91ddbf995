// creditstream is a cross-worker streaming library with credit-based flow control.
// Copyright (C) 2024  Himbeer <himbeerserverde@gmail.com>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::io::Write;

use crate::error::CodecError;

use super::MAX_UTF8_LEN;

/// A `Writer` encodes primitive values in big-endian byte order
/// onto any [`std::io::Write`] sink.
pub struct Writer<W: Write> {
    inner: W,
}

impl<W: Write> Writer<W> {
    /// Wraps `inner` in a `Writer`.
    pub fn new(inner: W) -> Self {
        Writer { inner }
    }

    /// Writes a single byte, `0x01` for `true` and `0x00` for `false`.
    pub fn write_bool(&mut self, v: bool) -> Result<(), CodecError> {
        self.inner.write_all(&[v as u8])?;
        Ok(())
    }

    /// Writes a signed byte.
    pub fn write_i8(&mut self, v: i8) -> Result<(), CodecError> {
        self.inner.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    /// Writes an unsigned byte.
    pub fn write_u8(&mut self, v: u8) -> Result<(), CodecError> {
        self.inner.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    /// Writes a signed 16-bit integer, big-endian.
    pub fn write_i16(&mut self, v: i16) -> Result<(), CodecError> {
        self.inner.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    /// Writes an unsigned 16-bit integer, big-endian.
    pub fn write_u16(&mut self, v: u16) -> Result<(), CodecError> {
        self.inner.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    /// Writes a signed 32-bit integer, big-endian.
    pub fn write_i32(&mut self, v: i32) -> Result<(), CodecError> {
        self.inner.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    /// Writes an unsigned 32-bit integer, big-endian.
    pub fn write_u32(&mut self, v: u32) -> Result<(), CodecError> {
        self.inner.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    /// Writes a signed 64-bit integer, big-endian.
    pub fn write_i64(&mut self, v: i64) -> Result<(), CodecError> {
        self.inner.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    /// Writes an unsigned 64-bit integer, big-endian.
    pub fn write_u64(&mut self, v: u64) -> Result<(), CodecError> {
        self.inner.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    /// Writes raw bytes with no length framing.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<(), CodecError> {
        self.inner.write_all(buf)?;
        Ok(())
    }

    /// Writes a UTF-8 string prefixed by its encoded byte length
    /// as an unsigned 16-bit integer.
    ///
    /// Returns [`CodecError::LengthOverflow`] if the encoded length
    /// exceeds [`MAX_UTF8_LEN`].
    pub fn write_utf8(&mut self, s: &str) -> Result<(), CodecError> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_UTF8_LEN {
            return Err(CodecError::LengthOverflow);
        }

        self.write_u16(bytes.len() as u16)?;
        self.write_bytes(bytes)
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.inner.flush()?;
        Ok(())
    }

    /// Consumes the `Writer`, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_round_trip_bytes() {
        let mut buf = Vec::new();
        {
            let mut w = Writer::new(&mut buf);
            w.write_bool(true).unwrap();
            w.write_i8(-5).unwrap();
            w.write_u16(0xBEEF).unwrap();
            w.write_i64(-1).unwrap();
        }

        assert_eq!(
            buf,
            vec![0x01, 0xFB, 0xBE, 0xEF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn utf8_is_length_prefixed() {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write_utf8("hi").unwrap();
        assert_eq!(buf, vec![0x00, 0x02, b'h', b'i']);
    }

    #[test]
    fn utf8_overflow_is_rejected() {
        let huge = "x".repeat(MAX_UTF8_LEN + 1);
        let mut buf = Vec::new();
        let err = Writer::new(&mut buf).write_utf8(&huge).unwrap_err();
        assert!(matches!(err, CodecError::LengthOverflow));
    }

    proptest::proptest! {
        #[test]
        fn i64_round_trips_through_slice_reader(v: i64) {
            use crate::codec::{DataReader, SliceReader};

            let mut buf = Vec::new();
            Writer::new(&mut buf).write_i64(v).unwrap();
            let mut r = SliceReader::new(&buf);
            proptest::prop_assert_eq!(r.read_i64().unwrap(), v);
            proptest::prop_assert!(r.is_eof());
        }

        #[test]
        fn utf8_round_trips_through_slice_reader(s in "\\PC{0,200}") {
            use crate::codec::{DataReader, SliceReader};

            let mut buf = Vec::new();
            Writer::new(&mut buf).write_utf8(&s).unwrap();
            let mut r = SliceReader::new(&buf);
            proptest::prop_assert_eq!(r.read_utf8().unwrap(), s);
            proptest::prop_assert!(r.is_eof());
        }
    }
}
