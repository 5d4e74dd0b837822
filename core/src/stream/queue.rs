//! stream/queue.rs
//! FIFO byte buffer between the frame serializer and the pull adapter.
//!
//! Invariant: `len() == total_appended() - total_consumed()`.
//! Storage is a `BytesMut`; `consume` splits the head off in O(1) and hands it
//! out as frozen `Bytes`, so consumed bytes are never copied twice.

use bytes::{Bytes, BytesMut};
use thiserror::Error;

use crate::constants::DEFAULT_QUEUE_LIMIT;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// Appending would push the queue past its byte limit. Nothing was appended.
    #[error("allocation failed: {requested} more bytes on top of {buffered} exceeds limit {limit}")]
    AllocationError { requested: usize, buffered: usize, limit: usize },

    /// Caller asked for more bytes than are buffered.
    #[error("queue underflow: requested {requested}, available {available}")]
    Underflow { requested: usize, available: usize },
}

#[derive(Debug)]
pub struct ByteQueue {
    buf: BytesMut,
    limit: usize,
    appended: u64,
    consumed: u64,
}

impl Default for ByteQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteQueue {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_QUEUE_LIMIT)
    }

    /// Queue refusing to hold more than `limit` bytes at once.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            limit,
            appended: 0,
            consumed: 0,
        }
    }

    /// Check that `additional` bytes fit without appending anything.
    pub fn ensure_room(&self, additional: usize) -> Result<(), QueueError> {
        match self.buf.len().checked_add(additional) {
            Some(total) if total <= self.limit => Ok(()),
            _ => Err(QueueError::AllocationError {
                requested: additional,
                buffered: self.buf.len(),
                limit: self.limit,
            }),
        }
    }

    /// Copy `bytes` to the tail. All or nothing.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), QueueError> {
        self.ensure_room(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        self.appended += bytes.len() as u64;
        Ok(())
    }

    /// Remove and return the first `n` bytes.
    pub fn consume(&mut self, n: usize) -> Result<Bytes, QueueError> {
        if n > self.buf.len() {
            return Err(QueueError::Underflow {
                requested: n,
                available: self.buf.len(),
            });
        }
        self.consumed += n as u64;
        Ok(self.buf.split_to(n).freeze())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn total_appended(&self) -> u64 {
        self.appended
    }

    pub fn total_consumed(&self) -> u64 {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_rows_then_partial_consume() {
        let mut q = ByteQueue::new();
        q.append(b"AABB").unwrap();
        q.append(b"CCDD").unwrap();
        assert_eq!(q.len(), 8);

        let head = q.consume(5).unwrap();
        assert_eq!(&head[..], b"AABBC");
        assert_eq!(q.len(), 3);
        assert_eq!(&q.consume(3).unwrap()[..], b"CDD");
        assert!(q.is_empty());
    }

    #[test]
    fn over_consume_is_underflow() {
        let mut q = ByteQueue::new();
        q.append(b"xyz").unwrap();
        assert_eq!(
            q.consume(4).unwrap_err(),
            QueueError::Underflow { requested: 4, available: 3 }
        );
        // nothing was removed
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn limit_rejects_whole_append() {
        let mut q = ByteQueue::with_limit(6);
        q.append(b"abcd").unwrap();
        let err = q.append(b"efg").unwrap_err();
        assert_eq!(err, QueueError::AllocationError { requested: 3, buffered: 4, limit: 6 });
        assert_eq!(q.len(), 4);
        assert_eq!(q.total_appended(), 4);
    }

    #[test]
    fn consume_zero_is_empty() {
        let mut q = ByteQueue::new();
        assert!(q.consume(0).unwrap().is_empty());
    }
}
