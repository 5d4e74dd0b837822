//! stream/pull.rs
//! Byte-pull contract backed by on-demand decoding.
//!
//! The encoder asks for `len` bytes at a time; the adapter decodes frames only
//! while its queue holds fewer than `len` bytes. At most one frame's worth of
//! bytes beyond the outstanding demand is ever buffered, and once the decoder
//! reports exhaustion it is never called again.

use std::time::Instant;
use bytes::Bytes;
use tracing::{debug, trace};

use crate::media::decoder::FrameDecoder;
use crate::media::frame::Frame;
use crate::stream::queue::ByteQueue;
use crate::stream::serializer::PlaneSerializer;
use crate::telemetry::{Stage, StageTimes, TelemetryCounters};
use crate::types::HarnessError;

/// Result of one pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pull {
    /// Up to `len` bytes; fewer only at the true end of the stream.
    Data(Bytes),
    /// No bytes left and none buffered. Terminal.
    EndOfStream,
}

impl Pull {
    pub fn len(&self) -> usize {
        match self {
            Pull::Data(b) => b.len(),
            Pull::EndOfStream => 0,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Pull::EndOfStream)
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Pull::Data(b) => Some(b),
            Pull::EndOfStream => None,
        }
    }
}

/// What an encoder reads its raw input from.
pub trait ByteSource {
    fn read(&mut self, len: usize) -> Result<Pull, HarnessError>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, len: usize) -> Result<Pull, HarnessError> {
        (**self).read(len)
    }
}

/// Presents a decoder as a lazy, finite, non-restartable byte stream.
pub struct PullAdapter<D: FrameDecoder> {
    decoder: D,
    queue: ByteQueue,
    exhausted: bool,
    decode_calls: u64,
    counters: TelemetryCounters,
    stage_times: StageTimes,
}

impl<D: FrameDecoder> PullAdapter<D> {
    pub fn new(decoder: D) -> Self {
        Self::with_queue(decoder, ByteQueue::new())
    }

    pub fn with_queue(decoder: D, queue: ByteQueue) -> Self {
        Self {
            decoder,
            queue,
            exhausted: false,
            decode_calls: 0,
            counters: TelemetryCounters::default(),
            stage_times: StageTimes::default(),
        }
    }

    /// Run one decode step; frames land in the queue through the serializer.
    fn decode_one(&mut self) -> Result<bool, HarnessError> {
        self.decode_calls += 1;
        let t = Instant::now();

        let queue = &mut self.queue;
        let counters = &mut self.counters;
        let has_more = self.decoder.produce_next_frame(&mut |frame: &Frame<'_>| {
            let written = PlaneSerializer::write_frame(frame, queue)?;
            counters.add_frame(written, frame.padding_len());
            Ok(())
        })?;
        self.stage_times.add(Stage::Decode, t.elapsed());

        if !has_more {
            debug!(
                frames = self.counters.frames_decoded,
                buffered = self.queue.len(),
                "decoder exhausted"
            );
            self.exhausted = true;
        }
        Ok(has_more)
    }

    /// Bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.queue.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of `produce_next_frame` calls issued so far.
    pub fn decode_calls(&self) -> u64 {
        self.decode_calls
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    pub fn stage_times(&self) -> &StageTimes {
        &self.stage_times
    }

    pub fn into_decoder(self) -> D {
        self.decoder
    }
}

impl<D: FrameDecoder> ByteSource for PullAdapter<D> {
    fn read(&mut self, len: usize) -> Result<Pull, HarnessError> {
        while self.queue.len() < len && !self.exhausted {
            self.decode_one()?;
        }

        if self.queue.is_empty() && (self.exhausted || len > 0) {
            self.counters.add_end_of_stream();
            trace!(requested = len, "end of stream");
            return Ok(Pull::EndOfStream);
        }

        let n = len.min(self.queue.len());
        let bytes = self.queue.consume(n)?;
        self.counters.add_read(len, n);
        trace!(requested = len, served = n, buffered = self.queue.len(), "read");
        Ok(Pull::Data(bytes))
    }
}
