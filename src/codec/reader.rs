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

use std::io::Read;

use crate::error::CodecError;

/// Common surface shared by [`SliceReader`] and [`StreamReader`] for decoding
/// the primitive values a [`super::Writer`] produces.
pub trait DataReader {
    /// Reads a single boolean byte.
    fn read_bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a signed byte.
    fn read_i8(&mut self) -> Result<i8, CodecError> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(i8::from_be_bytes(buf))
    }

    /// Reads an unsigned byte.
    fn read_u8(&mut self) -> Result<u8, CodecError> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(u8::from_be_bytes(buf))
    }

    /// Reads a signed 16-bit integer, big-endian.
    fn read_i16(&mut self) -> Result<i16, CodecError> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    /// Reads an unsigned 16-bit integer, big-endian.
    fn read_u16(&mut self) -> Result<u16, CodecError> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Reads a signed 32-bit integer, big-endian.
    fn read_i32(&mut self) -> Result<i32, CodecError> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    /// Reads an unsigned 32-bit integer, big-endian.
    fn read_u32(&mut self) -> Result<u32, CodecError> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Reads a signed 64-bit integer, big-endian.
    fn read_i64(&mut self) -> Result<i64, CodecError> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    /// Reads an unsigned 64-bit integer, big-endian.
    fn read_u64(&mut self) -> Result<u64, CodecError> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }

    /// Reads a length-prefixed UTF-8 string written by [`super::Writer::write_utf8`].
    fn read_utf8(&mut self) -> Result<String, CodecError> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(std::str::from_utf8(&bytes)?.to_owned())
    }

    /// Reads exactly `n` raw bytes, returning an owned copy.
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, CodecError>;

    /// Reads exactly `n` bytes into `buf`, failing with
    /// [`CodecError::Underflow`] if not enough bytes remain.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        let bytes = self.read_bytes(buf.len())?;
        buf.copy_from_slice(&bytes);
        Ok(())
    }

    /// Returns `true` if no more bytes remain to be read.
    fn is_eof(&mut self) -> bool;
}

/// A [`DataReader`] over a complete, already-buffered byte slice.
///
/// `read_bytes_immutable` hands back a zero-copy subslice tied to the
/// original slice's lifetime rather than to `self`.
pub struct SliceReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    /// Wraps `buf` in a `SliceReader` starting at position 0.
    pub fn new(buf: &'a [u8]) -> Self {
        SliceReader { buf, pos: 0 }
    }

    /// Reads exactly `n` bytes and returns a zero-copy subslice of the
    /// original backing buffer.
    pub fn read_bytes_immutable(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.buf.len() - self.pos < n {
            return Err(CodecError::Underflow);
        }

        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Number of bytes remaining unread.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

impl<'a> DataReader for SliceReader<'a> {
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, CodecError> {
        Ok(self.read_bytes_immutable(n)?.to_vec())
    }

    fn is_eof(&mut self) -> bool {
        self.pos >= self.buf.len()
    }
}

/// A [`DataReader`] over any [`std::io::Read`] source, including
/// [`crate::cipher::DecryptingStream`]. There is no backing buffer to
/// borrow from, so only owned reads are offered.
pub struct StreamReader<R: Read> {
    inner: R,
    // `is_eof` has to actually read a byte to find out whether any remain;
    // it is held here so the next `read_bytes` call sees it first instead
    // of silently dropping it.
    peeked: Option<u8>,
}

impl<R: Read> StreamReader<R> {
    /// Wraps `inner` in a `StreamReader`.
    pub fn new(inner: R) -> Self {
        StreamReader {
            inner,
            peeked: None,
        }
    }

    /// Consumes the `StreamReader`, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> DataReader for StreamReader<R> {
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, CodecError> {
        let mut buf = vec![0u8; n];
        let mut filled = 0;

        if n > 0 {
            if let Some(b) = self.peeked.take() {
                buf[0] = b;
                filled = 1;
            }
        }

        while filled < n {
            let read = self.inner.read(&mut buf[filled..])?;
            if read == 0 {
                return Err(CodecError::Underflow);
            }
            filled += read;
        }

        Ok(buf)
    }

    fn is_eof(&mut self) -> bool {
        if self.peeked.is_some() {
            return false;
        }

        let mut probe = [0u8; 1];
        match self.inner.read(&mut probe) {
            Ok(0) => true,
            Ok(_) => {
                self.peeked = Some(probe[0]);
                false
            }
            Err(_) => false,
        }
    }
}
