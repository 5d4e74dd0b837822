//! media/encoder.rs
//! Byte-pull encoder seam and its output units.

use std::fmt;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::media::frame::ChromaFormat;
use crate::stream::ByteSource;
use crate::types::HarnessError;

/// Slicing mode requested from the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceMode {
    /// One slice per picture.
    #[default]
    Single,
    /// Fixed number of slices per picture.
    FixedCount(u32),
}

impl SliceMode {
    pub fn slice_count(&self) -> u32 {
        match self {
            SliceMode::Single => 1,
            SliceMode::FixedCount(n) => *n,
        }
    }
}

impl fmt::Display for SliceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceMode::Single => f.write_str("single-slice"),
            SliceMode::FixedCount(n) => write!(f, "fixed-{}-slices", n),
        }
    }
}

/// Encoder configuration for one fixture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodeParams {
    pub width: usize,
    pub height: usize,
    pub frame_rate: f32,
    pub mode: SliceMode,
    pub chroma: ChromaFormat,
}

impl EncodeParams {
    pub fn new(width: usize, height: usize, frame_rate: f32) -> Self {
        Self {
            width,
            height,
            frame_rate,
            mode: SliceMode::default(),
            chroma: ChromaFormat::default(),
        }
    }

    pub fn with_mode(mut self, mode: SliceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_chroma(mut self, chroma: ChromaFormat) -> Self {
        self.chroma = chroma;
        self
    }

    /// Bytes of one tightly packed input frame.
    pub fn frame_len(&self) -> usize {
        self.chroma.frame_len(self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.width == 0 || self.height == 0 {
            return Err(HarnessError::Validation(format!(
                "frame dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(HarnessError::Validation(format!(
                "frame rate must be positive, got {}",
                self.frame_rate
            )));
        }
        if self.mode.slice_count() == 0 {
            return Err(HarnessError::Validation("slice count must be at least 1".into()));
        }
        Ok(())
    }
}

/// One encoder output unit: ordered chunks, each with its own length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedLayer {
    chunks: Vec<Bytes>,
}

impl EncodedLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chunks(chunks: Vec<Bytes>) -> Self {
        Self { chunks }
    }

    pub fn push_chunk(&mut self, chunk: impl Into<Bytes>) {
        self.chunks.push(chunk.into());
    }

    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    /// Sum of all chunk lengths.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything the encoder emitted for one input picture, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedLayerSet {
    pub layers: Vec<EncodedLayer>,
}

impl EncodedLayerSet {
    pub fn new(layers: Vec<EncodedLayer>) -> Self {
        Self { layers }
    }

    pub fn chunk_count(&self) -> usize {
        self.layers.iter().map(|l| l.chunks().len()).sum()
    }

    pub fn byte_len(&self) -> usize {
        self.layers.iter().map(|l| l.len()).sum()
    }
}

/// Callback receiving one encoded unit. Its error aborts `run`.
pub type LayerCallback<'c> = dyn FnMut(&EncodedLayerSet) -> Result<(), HarnessError> + 'c;

/// Byte-pull side of the pipeline.
///
/// `run` pulls raw frames from `input` until it sees EndOfStream or a short
/// read, and hands every encoded unit to `on_output` synchronously, in order.
pub trait FrameEncoder {
    fn run(
        &mut self,
        input: &mut dyn ByteSource,
        params: &EncodeParams,
        on_output: &mut LayerCallback<'_>,
    ) -> Result<(), HarnessError>;
}

impl<E: FrameEncoder + ?Sized> FrameEncoder for Box<E> {
    fn run(
        &mut self,
        input: &mut dyn ByteSource,
        params: &EncodeParams,
        on_output: &mut LayerCallback<'_>,
    ) -> Result<(), HarnessError> {
        (**self).run(input, params, on_output)
    }
}
