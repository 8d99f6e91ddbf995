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

/// One message on the data channel, producer to consumer.
pub(crate) enum DataMessage<T> {
    /// A value the generator produced.
    Value(T),
    /// A credit return: the consumer should send one [`AckToken`] back.
    Ack,
    /// The generator finished; no more `Value`s follow.
    Eof,
}

/// One message on the ack channel, consumer to producer. Carries no data;
/// its only purpose is to return credit. Riding its own channel and type
/// (rather than sharing the data channel) makes it impossible for either
/// side to fabricate or misroute a credit token.
pub(crate) struct AckToken;
