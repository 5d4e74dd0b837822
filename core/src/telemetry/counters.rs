// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Mutable counters collected while one fixture runs.
//!
//! Summary: frame/byte counts on the decode side, read counts on the pull
//! boundary, layer/chunk counts on the hash side. Converted into an immutable
//! `TelemetrySnapshot` when the fixture finishes.
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::media::encoder::EncodedLayerSet;

/// Deterministic counters collected during one decode -> encode -> hash run
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub frames_decoded: u64,
    pub bytes_serialized: u64,
    pub bytes_padding: u64,
    pub reads: u64,
    pub bytes_requested: u64,
    pub bytes_served: u64,
    pub short_reads: u64,
    pub end_of_stream: u64,
    pub layer_sets: u64,
    pub layers: u64,
    pub chunks: u64,
    pub bytes_hashed: u64,
}

impl TelemetryCounters {
    /// Record one serialized frame.
    ///
    /// - `packed_len`: bytes appended to the queue
    /// - `padding_len`: row padding skipped while packing
    pub fn add_frame(&mut self, packed_len: usize, padding_len: usize) {
        self.frames_decoded += 1;
        self.bytes_serialized += packed_len as u64;
        self.bytes_padding += padding_len as u64;
    }

    /// Record one served read.
    pub fn add_read(&mut self, requested: usize, served: usize) {
        self.reads += 1;
        self.bytes_requested += requested as u64;
        self.bytes_served += served as u64;
        if served < requested {
            self.short_reads += 1;
        }
    }

    /// Record a read answered with EndOfStream.
    pub fn add_end_of_stream(&mut self) {
        self.end_of_stream += 1;
    }

    /// Record one encoder output unit fed to the digest.
    pub fn add_layer_set(&mut self, set: &EncodedLayerSet) {
        self.layer_sets += 1;
        self.layers += set.layers.len() as u64;
        self.chunks += set.chunk_count() as u64;
        self.bytes_hashed += set.byte_len() as u64;
    }

    /// Bytes decoded but never pulled by the encoder.
    pub fn bytes_unread(&self) -> u64 {
        self.bytes_serialized.saturating_sub(self.bytes_served)
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.frames_decoded += other.frames_decoded;
        self.bytes_serialized += other.bytes_serialized;
        self.bytes_padding += other.bytes_padding;
        self.reads += other.reads;
        self.bytes_requested += other.bytes_requested;
        self.bytes_served += other.bytes_served;
        self.short_reads += other.short_reads;
        self.end_of_stream += other.end_of_stream;
        self.layer_sets += other.layer_sets;
        self.layers += other.layers;
        self.chunks += other.chunks;
        self.bytes_hashed += other.bytes_hashed;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reads_are_counted() {
        let mut c = TelemetryCounters::default();
        c.add_read(10, 10);
        c.add_read(10, 4);
        assert_eq!(c.reads, 2);
        assert_eq!(c.short_reads, 1);
        assert_eq!(c.bytes_served, 14);
    }

    #[test]
    fn merge_adds_fields() {
        let mut a = TelemetryCounters::default();
        a.add_frame(100, 8);
        let mut b = TelemetryCounters::default();
        b.add_frame(50, 0);
        b.add_read(60, 60);
        a += b;
        assert_eq!(a.frames_decoded, 2);
        assert_eq!(a.bytes_serialized, 150);
        assert_eq!(a.bytes_padding, 8);
        assert_eq!(a.bytes_unread(), 90);
    }
}
