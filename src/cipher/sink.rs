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

use std::io::{self, Write};

use crate::error::CipherError;

use super::traits::{BlockCipher, Padding, Pkcs7};

/// An `EncryptingSink` wraps a [`Write`] destination, encrypting complete
/// blocks as they accumulate and padding the final partial block at
/// [`EncryptingSink::close`].
///
/// Dropping an `EncryptingSink` flushes the final block to the underlying
/// [`Write`] ignoring any errors. You should handle errors where applicable
/// by calling [`EncryptingSink::close`] manually before dropping the sink.
pub struct EncryptingSink<W: Write, C: BlockCipher, P: Padding = Pkcs7> {
    inner: W,
    cipher: C,
    padding: P,
    closed: bool,
    buf: Vec<u8>,
}

impl<W: Write, C: BlockCipher> EncryptingSink<W, C, Pkcs7> {
    /// Wraps `inner` in an `EncryptingSink` using PKCS#7 padding.
    pub fn new(inner: W, cipher: C) -> Self {
        Self::with_padding(inner, cipher, Pkcs7)
    }
}

impl<W: Write, C: BlockCipher, P: Padding> EncryptingSink<W, C, P> {
    /// Wraps `inner` in an `EncryptingSink` using a custom padding scheme.
    pub fn with_padding(inner: W, cipher: C, padding: P) -> Self {
        let block_size = cipher.block_size();
        EncryptingSink {
            inner,
            cipher,
            padding,
            closed: false,
            buf: Vec::with_capacity(block_size),
        }
    }

    /// Reports whether the sink is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn encrypt_and_write(&mut self, block: &[u8]) -> io::Result<()> {
        let mut out = vec![0u8; self.cipher.block_size()];
        self.cipher.process_block(block, &mut out);
        self.inner.write_all(&out)
    }

    /// Closes the sink: pads the buffered partial block to a full block,
    /// encrypts it, writes it, and flushes the underlying sink.
    ///
    /// Fails with [`CipherError::Closed`] if already closed.
    ///
    /// This method is automatically called, ignoring its result, when the
    /// sink is dropped.
    pub fn close(&mut self) -> Result<(), CipherError> {
        if self.closed {
            return Err(CipherError::Closed);
        }
        self.closed = true;

        let block_size = self.cipher.block_size();
        let data_len = self.buf.len();
        self.buf.resize(block_size, 0);
        self.padding.add_padding(&mut self.buf, data_len);

        let block = std::mem::take(&mut self.buf);
        self.encrypt_and_write(&block)?;
        self.inner.flush()?;

        Ok(())
    }
}

impl<W: Write, C: BlockCipher, P: Padding> Write for EncryptingSink<W, C, P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }

        let block_size = self.cipher.block_size();
        self.buf.extend_from_slice(buf);

        while self.buf.len() >= block_size {
            let block: Vec<u8> = self.buf.drain(..block_size).collect();
            self.encrypt_and_write(&block)?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write, C: BlockCipher, P: Padding> Drop for EncryptingSink<W, C, P> {
    fn drop(&mut self) {
        if !self.closed {
            self.close().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::test_support::XorBlockCipher;

    #[test]
    fn aligned_input_gets_a_full_extra_padding_block() {
        let cipher = XorBlockCipher::new(8, 0xAA);
        let mut out = Vec::new();
        {
            let mut sink = EncryptingSink::new(&mut out, cipher);
            sink.write_all(b"01234567").unwrap();
            sink.close().unwrap();
        }
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn close_is_idempotent_guarded() {
        let cipher = XorBlockCipher::new(8, 0xAA);
        let mut out = Vec::new();
        let mut sink = EncryptingSink::new(&mut out, cipher);
        sink.write_all(b"hi").unwrap();
        sink.close().unwrap();
        assert!(matches!(sink.close(), Err(CipherError::Closed)));
    }

    #[test]
    fn drop_flushes_final_block() {
        let cipher = XorBlockCipher::new(8, 0xAA);
        let mut out = Vec::new();
        {
            let mut sink = EncryptingSink::new(&mut out, cipher);
            sink.write_all(b"abc").unwrap();
        }
        assert_eq!(out.len(), 8);
    }
}
