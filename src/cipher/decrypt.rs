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

use std::collections::VecDeque;
use std::io::{self, BufRead, Read};

use crate::error::CipherError;

use super::traits::{BlockCipher, Padding, Pkcs7};

/// A `DecryptingStream` wraps a block-aligned ciphertext [`BufRead`] source,
/// decrypting full blocks as they arrive and stripping padding from the
/// final block once the source is exhausted.
///
/// The most recently decrypted block is always held back rather than
/// handed to the caller immediately, because only the true final block
/// carries padding and there is no way to know a block is final until
/// the source reports no more bytes.
pub struct DecryptingStream<R: BufRead, C: BlockCipher, P: Padding = Pkcs7> {
    inner: R,
    cipher: C,
    padding: P,
    held: Option<Vec<u8>>,
    out: VecDeque<u8>,
    finished: bool,
    any_block_read: bool,
}

impl<R: BufRead, C: BlockCipher> DecryptingStream<R, C, Pkcs7> {
    /// Wraps `inner` in a `DecryptingStream` using PKCS#7 padding.
    pub fn new(inner: R, cipher: C) -> Self {
        Self::with_padding(inner, cipher, Pkcs7)
    }
}

impl<R: BufRead, C: BlockCipher, P: Padding> DecryptingStream<R, C, P> {
    /// Wraps `inner` in a `DecryptingStream` using a custom padding scheme.
    pub fn with_padding(inner: R, cipher: C, padding: P) -> Self {
        DecryptingStream {
            inner,
            cipher,
            padding,
            held: None,
            out: VecDeque::new(),
            finished: false,
            any_block_read: false,
        }
    }

    fn read_block(&mut self) -> io::Result<usize> {
        let block_size = self.cipher.block_size();
        let mut chunk = vec![0u8; block_size];
        let mut filled = 0;

        while filled < block_size {
            let n = self.inner.read(&mut chunk[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled != 0 && filled != block_size {
            return Err(io::Error::other(CipherError::MalformedCipherStream));
        }

        if filled == block_size {
            self.any_block_read = true;

            let mut decrypted = vec![0u8; block_size];
            self.cipher.process_block(&chunk, &mut decrypted);

            if let Some(prev) = self.held.replace(decrypted) {
                self.out.extend(prev);
            }
        }

        Ok(filled)
    }

    fn finalize(&mut self) -> io::Result<()> {
        let block_size = self.cipher.block_size();

        match self.held.take() {
            Some(block) => {
                let pad = self.padding.pad_count(&block);
                if pad == 0 || pad > block_size {
                    return Err(io::Error::other(CipherError::BadPadding(pad, block_size)));
                }
                self.out.extend(&block[..block_size - pad]);
            }
            None => {
                debug_assert!(!self.any_block_read, "a held block is dropped only by finalize");
                return Err(io::Error::other(CipherError::MalformedCipherStream));
            }
        }

        self.finished = true;
        Ok(())
    }
}

impl<R: BufRead, C: BlockCipher, P: Padding> Read for DecryptingStream<R, C, P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.out.is_empty() && !self.finished {
            let filled = self.read_block()?;
            if filled == 0 {
                self.finalize()?;
            }
        }

        let n = buf.len().min(self.out.len());
        for (dst, src) in buf[..n].iter_mut().zip(self.out.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::EncryptingSink;
    use crate::cipher::test_support::XorBlockCipher;
    use std::io::Write;

    fn round_trip(plaintext: &[u8], block_size: usize) -> Vec<u8> {
        let cipher = XorBlockCipher::new(block_size, 0x5A);
        let mut ciphertext = Vec::new();
        {
            let mut sink = EncryptingSink::new(&mut ciphertext, cipher.clone());
            sink.write_all(plaintext).unwrap();
            sink.close().unwrap();
        }

        let mut stream = DecryptingStream::new(&ciphertext[..], cipher);
        let mut recovered = Vec::new();
        stream.read_to_end(&mut recovered).unwrap();
        recovered
    }

    #[test]
    fn empty_input_round_trips() {
        assert_eq!(round_trip(b"", 8), b"");
    }

    #[test]
    fn short_plaintext_round_trips() {
        assert_eq!(round_trip(b"hi", 8), b"hi");
    }

    #[test]
    fn exact_block_boundary_round_trips() {
        assert_eq!(round_trip(b"01234567", 8), b"01234567");
    }

    #[test]
    fn multi_block_round_trips() {
        let data = b"the quick brown fox jumps over the lazy dog";
        assert_eq!(round_trip(data, 8), data);
    }

    #[test]
    fn malformed_ciphertext_length_is_rejected() {
        let cipher = XorBlockCipher::new(8, 0x5A);
        let bogus = vec![0u8; 5];
        let mut stream = DecryptingStream::new(&bogus[..], cipher);
        let mut out = Vec::new();
        assert!(stream.read_to_end(&mut out).is_err());
    }

    #[test]
    fn empty_ciphertext_is_rejected() {
        let cipher = XorBlockCipher::new(8, 0x5A);
        let mut stream = DecryptingStream::new(&b""[..], cipher);
        let mut out = Vec::new();
        assert!(stream.read_to_end(&mut out).is_err());
    }
}
