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

//! Big-endian primitive encoding and length-prefixed UTF-8 strings.

mod reader;
mod writer;

pub use reader::{DataReader, SliceReader, StreamReader};
pub use writer::Writer;

/// Maximum byte length of a [`Writer::write_utf8`] payload.
/// Fixed by the 2-byte unsigned length prefix used on the wire.
pub const MAX_UTF8_LEN: usize = u16::MAX as usize;
