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

//! Cross-worker streaming with credit-based flow control: a [`Generator`]
//! runs on a dedicated thread and is observed as a lazy [`CreditStream`]
//! iterator, with a bounded, self-regulating in-flight buffer.

mod consumer;
mod generator;
mod message;
mod producer;

pub use consumer::{CreditStream, KillPriority, Phase, BYTE_DEFAULT_BUDGET};
pub use generator::Generator;
pub use producer::Producer;
