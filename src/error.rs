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

use std::io;

use thiserror::Error;

/// A `CodecError` indicates a failure reading or writing a primitive value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// There were not enough bytes remaining to satisfy the requested read.
    #[error("Not enough bytes remaining to decode value")]
    Underflow,
    /// A length-prefixed string was not valid UTF-8.
    #[error("Invalid UTF-8 in length-prefixed string: {0}")]
    BadUtf8(#[from] std::str::Utf8Error),
    /// A string's encoded length exceeds the 2-byte length prefix.
    #[error("UTF-8 payload exceeds maximum length of 65535 bytes")]
    LengthOverflow,
    /// A `std::io::Error` I/O error occured on the underlying sink or source.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A `CipherError` indicates a failure encrypting or decrypting a byte stream.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The ciphertext byte count was not a positive multiple of the block size.
    #[error("Ciphertext length is not a positive multiple of the block size")]
    MalformedCipherStream,
    /// The padding recovered from the final block was out of range.
    #[error("Padding count {0} out of range for block size {1}")]
    BadPadding(usize, usize),
    /// A write was attempted after the sink was already closed.
    #[error("Write attempted on a closed cipher sink")]
    Closed,
    /// A `std::io::Error` I/O error occured on the underlying sink or source.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A `ProducerError` indicates a failure on the producer side of a stream's
/// credit/ack protocol. It is not necessarily fatal to the surrounding
/// program, only to the stream session it occured on.
#[derive(Debug, Error)]
pub enum ProducerError {
    /// The consumer has dropped its end of the channel.
    #[error("Consumer is gone")]
    ConsumerGone,
}

/// A `WorkerFault` describes how a stream's worker thread ended abnormally.
#[derive(Debug, Error)]
pub enum WorkerFault<E> {
    /// The generator returned an error of its own.
    #[error("Generator failed: {0}")]
    Generator(E),
    /// The worker thread panicked instead of returning.
    #[error("Worker thread panicked")]
    Panicked,
}

/// A `StreamError` indicates an error condition observed by the consumer
/// side of a [`crate::stream::CreditStream`].
#[derive(Debug, Error)]
pub enum StreamError<E> {
    /// The worker thread did not complete successfully.
    #[error("Worker fault: {0}")]
    WorkerFault(#[from] WorkerFault<E>),
}
