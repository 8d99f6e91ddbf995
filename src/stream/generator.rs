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

use std::error::Error;
use std::marker::PhantomData;

use super::producer::Producer;

/// A `Generator` runs on a dedicated worker thread and produces a sequence
/// of values through a [`Producer`] handle.
///
/// Implementors are moved into the worker thread by [`super::CreditStream::spawn`]
/// and are never observed again by the spawning side; `Send + 'static` is
/// the compiler's guarantee that this move is sound.
pub trait Generator: Send + 'static {
    /// The type of value produced.
    type Item: Send + 'static;
    /// The error type `generate` may fail with.
    type Error: Error + Send + 'static;

    /// The session's buffer budget, read once before the generator is
    /// moved to the worker thread. A positive value bounds how many
    /// values may be in flight; zero or negative requests rendezvous
    /// semantics (each `send` blocks until the consumer has observed it).
    fn buffer_budget(&self) -> isize;

    /// The logical size of one item, used for credit accounting. The
    /// default treats every item as a single unit.
    fn size_of(_item: &Self::Item) -> usize {
        1
    }

    /// Produces values by calling `producer.send`/`producer.push`, consuming
    /// `self`. Returning from this method, by any path, ends the session.
    fn generate(self, producer: &mut Producer<Self::Item>) -> Result<(), Self::Error>;
}

/// Adapts a plain closure into a [`Generator`] over `Vec<u8>` chunks, used
/// by [`super::CreditStream::spawn_bytes`].
pub(crate) struct FnGenerator<F, E> {
    pub(crate) budget: isize,
    pub(crate) f: F,
    pub(crate) _marker: PhantomData<E>,
}

impl<F, E> Generator for FnGenerator<F, E>
where
    F: FnOnce(&mut Producer<Vec<u8>>) -> Result<(), E> + Send + 'static,
    E: Error + Send + 'static,
{
    type Item = Vec<u8>;
    type Error = E;

    fn buffer_budget(&self) -> isize {
        self.budget
    }

    fn size_of(item: &Vec<u8>) -> usize {
        std::cmp::max(1, item.len())
    }

    fn generate(self, producer: &mut Producer<Vec<u8>>) -> Result<(), E> {
        (self.f)(producer)
    }
}
