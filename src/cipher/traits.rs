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

/// A `BlockCipher` transforms fixed-size blocks in one direction
/// (encryption or decryption). Implementors are assumed pre-initialized
/// with whatever key material they need.
pub trait BlockCipher {
    /// The size in bytes of one block.
    fn block_size(&self) -> usize;

    /// Transforms exactly `block_size()` bytes from `input` into `output`.
    fn process_block(&self, input: &[u8], output: &mut [u8]);
}

/// A `Padding` scheme pads a partial final block up to a full block
/// and later recovers how many trailing bytes to discard.
pub trait Padding {
    /// Pads `block[data_len..]`, given that `block[..data_len]` already
    /// holds real data. `block.len()` is always the cipher's block size.
    fn add_padding(&self, block: &mut [u8], data_len: usize);

    /// Recovers the number of padding bytes appended to a decrypted
    /// final block.
    fn pad_count(&self, block: &[u8]) -> usize;
}

/// PKCS#7 padding: the final block is padded with `n` copies of the byte
/// `n`, where `n` is the number of padding bytes. If the input already
/// lands on a block boundary, a full extra block of padding is appended.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pkcs7;

impl Padding for Pkcs7 {
    fn add_padding(&self, block: &mut [u8], data_len: usize) {
        let pad_len = block.len() - data_len;
        for b in &mut block[data_len..] {
            *b = pad_len as u8;
        }
    }

    fn pad_count(&self, block: &[u8]) -> usize {
        block[block.len() - 1] as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pkcs7_pads_partial_block() {
        let mut block = [0u8; 8];
        block[..5].copy_from_slice(b"hello");
        Pkcs7.add_padding(&mut block, 5);
        assert_eq!(&block, b"hello\x03\x03\x03");
        assert_eq!(Pkcs7.pad_count(&block), 3);
    }

    #[test]
    fn pkcs7_pads_full_extra_block_when_aligned() {
        let mut block = [0u8; 8];
        Pkcs7.add_padding(&mut block, 0);
        assert_eq!(&block, &[8u8; 8]);
        assert_eq!(Pkcs7.pad_count(&block), 8);
    }
}
