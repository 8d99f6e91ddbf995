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

//! Concrete [`super::BlockCipher`] implementations used only by this
//! crate's own tests. Production users bring their own cipher.

use aes::Aes128;
use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use super::traits::BlockCipher;

/// A trivial reversible block transform (XOR with a fixed byte) for tests
/// that only care about block/padding bookkeeping, not real cryptography.
#[derive(Clone)]
pub struct XorBlockCipher {
    block_size: usize,
    key: u8,
}

impl XorBlockCipher {
    pub fn new(block_size: usize, key: u8) -> Self {
        XorBlockCipher { block_size, key }
    }
}

impl BlockCipher for XorBlockCipher {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn process_block(&self, input: &[u8], output: &mut [u8]) {
        for (o, i) in output.iter_mut().zip(input) {
            *o = i ^ self.key;
        }
    }
}

/// AES-128 in raw single-block ECB mode (no chaining), for round-trip
/// tests that exercise a real cipher primitive through [`BlockCipher`].
pub struct Aes128EcbCipher {
    direction: Direction,
    cipher: Aes128,
}

#[derive(Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

impl Aes128EcbCipher {
    pub fn encryptor(key: &[u8; 16]) -> Self {
        Aes128EcbCipher {
            direction: Direction::Encrypt,
            cipher: Aes128::new(GenericArray::from_slice(key)),
        }
    }

    pub fn decryptor(key: &[u8; 16]) -> Self {
        Aes128EcbCipher {
            direction: Direction::Decrypt,
            cipher: Aes128::new(GenericArray::from_slice(key)),
        }
    }
}

impl BlockCipher for Aes128EcbCipher {
    fn block_size(&self) -> usize {
        16
    }

    fn process_block(&self, input: &[u8], output: &mut [u8]) {
        let mut block = *GenericArray::from_slice(input);
        match self.direction {
            Direction::Encrypt => self.cipher.encrypt_block(&mut block),
            Direction::Decrypt => self.cipher.decrypt_block(&mut block),
        }
        output.copy_from_slice(&block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{DecryptingStream, EncryptingSink};
    use std::io::{Read, Write};

    #[test]
    fn aes128_round_trips_through_cipher_pipeline() {
        let key = [0x42u8; 16];
        let plaintext = b"the quick brown fox jumps over the lazy dog, thrice";

        let mut ciphertext = Vec::new();
        {
            let mut sink = EncryptingSink::new(&mut ciphertext, Aes128EcbCipher::encryptor(&key));
            sink.write_all(plaintext).unwrap();
            sink.close().unwrap();
        }

        let mut stream = DecryptingStream::new(&ciphertext[..], Aes128EcbCipher::decryptor(&key));
        let mut recovered = Vec::new();
        stream.read_to_end(&mut recovered).unwrap();

        assert_eq!(recovered, plaintext);
    }
}
