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

//! A streaming block-cipher pipeline: encrypt arbitrary-sized writes into
//! block-aligned, PKCS#7-padded ciphertext, and decrypt it back.

mod decrypt;
mod sink;
mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use decrypt::DecryptingStream;
pub use sink::EncryptingSink;
pub use traits::{BlockCipher, Padding, Pkcs7};
