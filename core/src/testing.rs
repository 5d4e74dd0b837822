//! Shared test utilities for codec-regress integration tests.
//!
//! Available behind the `test-util` feature or in `#[cfg(test)]` within the
//! crate. Provides deterministic frame sources, a fixed-size pulling encoder
//! and a scripted backend whose collaborators can be told to fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use bytes::Bytes;

use crate::fixtures::FixtureRecord;
use crate::harness::CodecBackend;
use crate::media::{
    ChromaFormat, EncodeParams, EncodedLayer, EncodedLayerSet, Frame, FrameCallback, FrameDecoder, FrameEncoder,
    LayerCallback, Plane, PlaneKind,
};
use crate::stream::ByteSource;
use crate::types::HarnessError;

/// Initialise a tracing subscriber for tests.
///
/// Respects `RUST_LOG`, defaults to `debug`. Safe to call more than once.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Deterministic packed contents of frame `index`.
pub fn pattern_frame(width: usize, height: usize, chroma: ChromaFormat, index: usize) -> Vec<u8> {
    let len = chroma.frame_len(width, height);
    (0..len).map(|i| ((i * 7 + index * 31) % 251) as u8).collect()
}

/// `frames` pattern frames back to back.
pub fn pattern_stream(width: usize, height: usize, chroma: ChromaFormat, frames: usize) -> Vec<u8> {
    (0..frames)
        .flat_map(|i| pattern_frame(width, height, chroma, i))
        .collect()
}

/// In-memory decoder emitting pattern frames with padded rows.
#[derive(Debug, Clone)]
pub struct PatternDecoder {
    width: usize,
    height: usize,
    chroma: ChromaFormat,
    extra_stride: usize,
    frames: usize,
    fail_at: Option<usize>,
    produced: usize,
    calls: Arc<AtomicU64>,
}

impl PatternDecoder {
    pub fn new(width: usize, height: usize, frames: usize) -> Self {
        Self {
            width,
            height,
            chroma: ChromaFormat::Yuv420,
            extra_stride: 0,
            frames,
            fail_at: None,
            produced: 0,
            calls: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_chroma(mut self, chroma: ChromaFormat) -> Self {
        self.chroma = chroma;
        self
    }

    /// Pad every row by `extra` bytes of 0xEE.
    pub fn with_padding(mut self, extra: usize) -> Self {
        self.extra_stride = extra;
        self
    }

    /// Fail with a decode error instead of producing frame `index`.
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Shared count of `produce_next_frame` calls, readable after the decoder moves.
    pub fn call_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.calls)
    }

    pub fn frames_produced(&self) -> usize {
        self.produced
    }

    fn padded_plane(&self, kind: PlaneKind, packed: &[u8]) -> (Vec<u8>, usize, usize, usize) {
        let (w, h) = self.chroma.plane_dims(kind, self.width, self.height);
        let stride = w + self.extra_stride;
        let mut buf = vec![0xEE; stride * h];
        for (row, src) in packed.chunks(w.max(1)).take(h).enumerate() {
            buf[row * stride..row * stride + w].copy_from_slice(src);
        }
        (buf, w, h, stride)
    }
}

impl FrameDecoder for PatternDecoder {
    fn produce_next_frame(&mut self, on_frame: &mut FrameCallback<'_>) -> Result<bool, HarnessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(self.produced) {
            return Err(HarnessError::Decode(format!("scripted failure at frame {}", self.produced)));
        }
        if self.produced >= self.frames {
            return Ok(false);
        }

        let packed = pattern_frame(self.width, self.height, self.chroma, self.produced);
        let mut off = 0;
        let mut bufs = Vec::with_capacity(3);
        for kind in PlaneKind::ORDER {
            let (w, h) = self.chroma.plane_dims(kind, self.width, self.height);
            bufs.push(self.padded_plane(kind, &packed[off..off + w * h]));
            off += w * h;
        }

        let frame = Frame::new(
            padded_view(PlaneKind::Y, &bufs[0])?,
            padded_view(PlaneKind::U, &bufs[1])?,
            padded_view(PlaneKind::V, &bufs[2])?,
        );
        on_frame(&frame)?;

        self.produced += 1;
        Ok(true)
    }
}

fn padded_view(kind: PlaneKind, (buf, w, h, stride): &(Vec<u8>, usize, usize, usize)) -> Result<Plane<'_>, HarnessError> {
    Ok(Plane::new(kind, buf, *w, *h, *stride)?)
}

/// Pulls `read_size` bytes at a time and emits each read as one layer set of
/// two layers, the second split into two chunks.
#[derive(Debug, Clone, Default)]
pub struct FixedPullEncoder {
    read_size: usize,
    max_reads: Option<usize>,
    reads: Vec<usize>,
}

impl FixedPullEncoder {
    pub fn new(read_size: usize) -> Self {
        Self {
            read_size,
            max_reads: None,
            reads: Vec::new(),
        }
    }

    /// Stop after `n` reads even if more data is available.
    pub fn with_max_reads(mut self, n: usize) -> Self {
        self.max_reads = Some(n);
        self
    }

    /// Lengths of the data the encoder received, in order.
    pub fn reads(&self) -> &[usize] {
        &self.reads
    }
}

impl FrameEncoder for FixedPullEncoder {
    fn run(
        &mut self,
        input: &mut dyn ByteSource,
        _params: &EncodeParams,
        on_output: &mut LayerCallback<'_>,
    ) -> Result<(), HarnessError> {
        loop {
            if self.max_reads.is_some_and(|n| self.reads.len() >= n) {
                return Ok(());
            }
            let Some(data) = input.read(self.read_size)?.into_bytes() else {
                return Ok(());
            };
            self.reads.push(data.len());

            let mid = data.len() / 2;
            let header = EncodedLayer::from_chunks(vec![Bytes::copy_from_slice(&(data.len() as u32).to_be_bytes())]);
            let body = EncodedLayer::from_chunks(vec![data.slice(..mid), data.slice(mid..)]);
            on_output(&EncodedLayerSet::new(vec![header, body]))?;

            if data.len() < self.read_size {
                return Ok(());
            }
        }
    }
}

/// What a scripted source does when decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Produce this many pattern frames.
    Frames(usize),
    /// Produce frames up to this index, then fail.
    FailAt(usize),
}

/// Backend handing out `PatternDecoder`s and `FixedPullEncoder`s per source.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    scripts: HashMap<String, Script>,
    read_size: Option<usize>,
    padding: usize,
    fail_setup: bool,
    pub setups: usize,
    pub teardowns: usize,
    pub decoders_opened: usize,
    pub encoders_opened: usize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, source: impl Into<String>, script: Script) -> Self {
        self.scripts.insert(source.into(), script);
        self
    }

    /// Read size for encoders. Defaults to the fixture's frame size.
    pub fn with_read_size(mut self, n: usize) -> Self {
        self.read_size = Some(n);
        self
    }

    pub fn with_padding(mut self, extra: usize) -> Self {
        self.padding = extra;
        self
    }

    pub fn failing_setup(mut self) -> Self {
        self.fail_setup = true;
        self
    }

    /// Digest the scripted source would produce under `fixture`, computed
    /// directly over the packed bytes without the pull adapter.
    pub fn reference_hex(&self, fixture: &FixtureRecord) -> Option<String> {
        let frames = match self.scripts.get(&fixture.source)? {
            Script::Frames(n) => *n,
            Script::FailAt(_) => return None,
        };
        let (w, h) = (fixture.width as usize, fixture.height as usize);
        let raw = pattern_stream(w, h, fixture.chroma, frames);
        let read = self.read_size.unwrap_or_else(|| fixture.chroma.frame_len(w, h));

        let mut acc = crate::digest::HashAccumulator::new(fixture.digest_alg);
        for piece in raw.chunks(read) {
            acc.update(&(piece.len() as u32).to_be_bytes());
            acc.update(piece);
        }
        Some(acc.finalize().to_hex())
    }
}

impl CodecBackend for ScriptedBackend {
    type Decoder = PatternDecoder;
    type Encoder = FixedPullEncoder;

    fn setup(&mut self) -> Result<(), HarnessError> {
        self.setups += 1;
        if self.fail_setup {
            return Err(HarnessError::Validation("scripted setup failure".into()));
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.teardowns += 1;
    }

    fn open_decoder(&mut self, fixture: &FixtureRecord) -> Result<Self::Decoder, HarnessError> {
        let script = self
            .scripts
            .get(&fixture.source)
            .copied()
            .ok_or_else(|| HarnessError::SourceNotFound(fixture.source.clone()))?;
        self.decoders_opened += 1;

        let base = PatternDecoder::new(fixture.width as usize, fixture.height as usize, usize::MAX)
            .with_chroma(fixture.chroma)
            .with_padding(self.padding);
        Ok(match script {
            Script::Frames(n) => PatternDecoder { frames: n, ..base },
            Script::FailAt(i) => base.failing_at(i),
        })
    }

    fn open_encoder(&mut self, fixture: &FixtureRecord) -> Result<Self::Encoder, HarnessError> {
        self.encoders_opened += 1;
        let read = self
            .read_size
            .unwrap_or_else(|| fixture.chroma.frame_len(fixture.width as usize, fixture.height as usize));
        Ok(FixedPullEncoder::new(read))
    }
}
