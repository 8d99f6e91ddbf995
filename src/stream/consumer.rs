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
use std::marker::PhantomData;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::error::{StreamError, WorkerFault};

use super::generator::{FnGenerator, Generator};
use super::message::{AckToken, DataMessage};
use super::producer::Producer;

/// The default buffer budget, in bytes, used by [`CreditStream::spawn_bytes`]
/// when the caller does not specify one.
pub const BYTE_DEFAULT_BUDGET: usize = 64 * 1024;

/// The consumer-side lifecycle of a [`CreditStream`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Created, no message has been observed yet.
    Spawning,
    /// Actively receiving `Value`/`Ack` messages.
    Running,
    /// `Eof` observed, waiting for the worker thread to be joined.
    Draining,
    /// The session is over; no further messages will be read.
    Done,
}

/// How urgently [`CreditStream::kill`] should abandon the session.
///
/// All three variants behave identically in this realization: there is no
/// preemptive thread cancellation to rank, so every priority simply drops
/// both channel endpoints and detaches the worker thread. The variants are
/// kept for interface parity with callers that reason in these terms.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KillPriority {
    /// Stop before the next value would be produced.
    BeforeNextEvent,
    /// Stop as soon as the current in-flight event is handled.
    AsEvent,
    /// Stop immediately.
    Immediate,
}

/// A `CreditStream` is the consumer side of a cross-worker, flow-controlled
/// stream: a lazy [`Iterator`] backed by a dedicated worker thread running
/// a [`Generator`].
pub struct CreditStream<T, E> {
    data_rx: Option<mpsc::Receiver<DataMessage<T>>>,
    ack_tx: Option<mpsc::Sender<AckToken>>,
    handle: Option<JoinHandle<Result<(), E>>>,
    phase: Phase,
}

impl<T: Send + 'static, E: std::error::Error + Send + 'static> CreditStream<T, E> {
    /// Spawns `generator` on a dedicated worker thread and returns a
    /// `CreditStream` over the values it produces.
    pub fn spawn<G>(generator: G) -> io::Result<Self>
    where
        G: Generator<Item = T, Error = E>,
    {
        let budget = generator.buffer_budget();

        let (data_tx, data_rx) = mpsc::channel::<DataMessage<T>>();
        let (ack_tx, ack_rx) = mpsc::channel::<AckToken>();

        let handle = thread::Builder::new().spawn(move || {
            let mut producer = Producer::new(data_tx, ack_rx, G::size_of, budget);
            let result = generator.generate(&mut producer);
            producer.close();
            result
        })?;

        Ok(CreditStream {
            data_rx: Some(data_rx),
            ack_tx: Some(ack_tx),
            handle: Some(handle),
            phase: Phase::Spawning,
        })
    }

    /// Abandons the session. Drops both channel endpoints, which unblocks
    /// any in-progress `send`/`wait_for_acks` on the worker side with
    /// [`crate::error::ProducerError::ConsumerGone`], then detaches the
    /// worker thread without joining it.
    pub fn kill(&mut self, _priority: KillPriority) {
        self.data_rx = None;
        self.ack_tx = None;
        self.handle = None;
        self.phase = Phase::Done;
    }

    /// The session's current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn join_worker(&mut self) -> Option<Result<T, StreamError<E>>> {
        self.phase = Phase::Done;

        match self.handle.take() {
            Some(h) => match h.join() {
                Ok(Ok(())) => None,
                Ok(Err(e)) => {
                    log::warn!("creditstream worker returned an error: {e}");
                    Some(Err(StreamError::WorkerFault(WorkerFault::Generator(e))))
                }
                Err(_) => {
                    log::warn!("creditstream worker thread panicked");
                    Some(Err(StreamError::WorkerFault(WorkerFault::Panicked)))
                }
            },
            None => None,
        }
    }
}

impl CreditStream<Vec<u8>, io::Error> {
    /// Spawns a byte-sink-style session: `f` receives a [`Producer<Vec<u8>>`]
    /// and pushes chunks into it directly, instead of implementing
    /// [`Generator`]. `budget` defaults to [`BYTE_DEFAULT_BUDGET`] bytes.
    pub fn spawn_bytes<F>(budget: Option<isize>, f: F) -> io::Result<CreditStream<Vec<u8>, io::Error>>
    where
        F: FnOnce(&mut Producer<Vec<u8>>) -> Result<(), io::Error> + Send + 'static,
    {
        let generator = FnGenerator {
            budget: budget.unwrap_or(BYTE_DEFAULT_BUDGET as isize),
            f,
            _marker: PhantomData,
        };

        CreditStream::spawn(generator)
    }
}

impl<T: Send + 'static, E: std::error::Error + Send + 'static> Iterator for CreditStream<T, E> {
    type Item = Result<T, StreamError<E>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.phase == Phase::Done {
            return None;
        }
        self.phase = Phase::Running;

        loop {
            let data_rx = match &self.data_rx {
                Some(rx) => rx,
                None => return None,
            };

            match data_rx.recv() {
                Ok(DataMessage::Value(v)) => return Some(Ok(v)),
                Ok(DataMessage::Ack) => {
                    if let Some(ack_tx) = &self.ack_tx {
                        let _ = ack_tx.send(AckToken);
                    }
                    continue;
                }
                Ok(DataMessage::Eof) => {
                    if let Some(ack_tx) = &self.ack_tx {
                        let _ = ack_tx.send(AckToken);
                    }
                    self.phase = Phase::Draining;
                    return self.join_worker();
                }
                Err(_) => return self.join_worker(),
            }
        }
    }
}
