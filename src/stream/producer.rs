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

use std::sync::mpsc;

use crate::error::ProducerError;

use super::message::{AckToken, DataMessage};

/// A `Producer` is the handle a [`super::Generator`] uses to emit values.
/// It lives for the duration of one `generate()` call, runs on the worker
/// thread, and owns the credit/ack bookkeeping for that session.
///
/// `Producer` deliberately has no `close` method: only the worker harness
/// that drives `generate()` is allowed to close the session, once, after
/// `generate()` returns.
pub struct Producer<T> {
    data_tx: mpsc::Sender<DataMessage<T>>,
    ack_rx: mpsc::Receiver<AckToken>,
    size_of: fn(&T) -> usize,
    budget: isize,
    ack_unit: usize,
    amount_pending: usize,
    acks_outstanding: usize,
}

impl<T> Producer<T> {
    pub(crate) fn new(
        data_tx: mpsc::Sender<DataMessage<T>>,
        ack_rx: mpsc::Receiver<AckToken>,
        size_of: fn(&T) -> usize,
        budget: isize,
    ) -> Self {
        let ack_unit = std::cmp::max(2, budget) as usize;

        Producer {
            data_tx,
            ack_rx,
            size_of,
            budget,
            ack_unit,
            amount_pending: 0,
            acks_outstanding: 0,
        }
    }

    /// Emits `v` without suspending. Credit is still tracked and `Ack`
    /// messages are still interleaved onto the data channel as needed,
    /// but `push` itself never blocks on the consumer's progress.
    pub fn push(&mut self, v: T) -> Result<(), ProducerError> {
        let size = std::cmp::max(1, (self.size_of)(&v));

        self.data_tx
            .send(DataMessage::Value(v))
            .map_err(|_| ProducerError::ConsumerGone)?;

        self.amount_pending += size * 2;

        while self.amount_pending >= self.ack_unit {
            self.data_tx
                .send(DataMessage::Ack)
                .map_err(|_| ProducerError::ConsumerGone)?;
            self.acks_outstanding += 1;
            self.amount_pending -= self.ack_unit;
        }

        Ok(())
    }

    /// Emits `v`, suspending around it as needed to respect the session's
    /// buffer budget. With a positive budget greater than one, suspends
    /// until at most one ack is outstanding before sending. With a budget
    /// of exactly one, suspends until no ack is outstanding. With a
    /// non-positive budget, sends first and then suspends until the
    /// consumer has drained the value (rendezvous semantics).
    pub fn send(&mut self, v: T) -> Result<(), ProducerError> {
        if self.budget > 1 {
            self.wait_for_acks(1)?;
            self.push(v)
        } else if self.budget == 1 {
            self.wait_for_acks(0)?;
            self.push(v)
        } else {
            self.push(v)?;
            self.wait_for_acks(0)
        }
    }

    /// Blocks until at most `pending` acks remain outstanding.
    pub(crate) fn wait_for_acks(&mut self, pending: usize) -> Result<(), ProducerError> {
        while self.acks_outstanding > pending {
            self.ack_rx
                .recv()
                .map_err(|_| ProducerError::ConsumerGone)?;
            self.acks_outstanding -= 1;
        }
        Ok(())
    }

    /// Sends `Eof` and waits for the consumer to acknowledge it. Called
    /// exactly once, by the worker harness, after `generate()` returns.
    /// Failures are swallowed: by the time this runs there is nothing
    /// left upstream to report them to.
    pub(crate) fn close(&mut self) {
        if self.data_tx.send(DataMessage::Eof).is_err() {
            return;
        }
        self.acks_outstanding += 1;
        let _ = self.wait_for_acks(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harness(budget: isize) -> (Producer<u8>, mpsc::Receiver<DataMessage<u8>>, mpsc::Sender<AckToken>) {
        let (data_tx, data_rx) = mpsc::channel();
        let (ack_tx, ack_rx) = mpsc::channel();
        (Producer::new(data_tx, ack_rx, |_| 1, budget), data_rx, ack_tx)
    }

    #[test]
    fn ack_unit_floors_at_two() {
        let (producer, _data_rx, _ack_tx) = harness(0);
        assert_eq!(producer.ack_unit, 2);

        let (producer, _data_rx, _ack_tx) = harness(10);
        assert_eq!(producer.ack_unit, 10);
    }

    #[test]
    fn push_emits_ack_once_pending_crosses_unit() {
        let (mut producer, data_rx, _ack_tx) = harness(2);

        producer.push(1).unwrap();
        assert!(matches!(data_rx.recv().unwrap(), DataMessage::Value(1)));
        assert!(matches!(data_rx.recv().unwrap(), DataMessage::Ack));
        assert_eq!(producer.acks_outstanding, 1);
        assert_eq!(producer.amount_pending, 0);
    }

    #[test]
    fn push_reports_consumer_gone() {
        let (mut producer, data_rx, _ack_tx) = harness(2);
        drop(data_rx);
        assert!(matches!(producer.push(1), Err(ProducerError::ConsumerGone)));
    }
}
