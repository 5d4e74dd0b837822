//! harness/backend.rs
//! Per-fixture factory for decoder and encoder collaborators.

use std::collections::HashMap;
use std::path::PathBuf;
use bytes::Bytes;
use tracing::debug;

use crate::fixtures::FixtureRecord;
use crate::media::{FrameCodec, FrameDecoder, FrameEncoder, LosslessEncoder, RawYuvDecoder, RowPadding};
use crate::stream::io::InputSource;
use crate::types::HarnessError;

/// Supplies fresh collaborators for each fixture.
///
/// `setup` runs once before a batch and `teardown` once after it, whatever the
/// fixtures' outcomes. Nothing opened for one fixture is reused by another.
pub trait CodecBackend {
    type Decoder: FrameDecoder;
    type Encoder: FrameEncoder;

    fn setup(&mut self) -> Result<(), HarnessError> {
        Ok(())
    }

    fn teardown(&mut self) {}

    fn open_decoder(&mut self, fixture: &FixtureRecord) -> Result<Self::Decoder, HarnessError>;

    fn open_encoder(&mut self, fixture: &FixtureRecord) -> Result<Self::Encoder, HarnessError>;
}

/// Where fixture `source` identifiers are looked up.
#[derive(Debug, Clone)]
pub enum SourceResolver {
    /// `source` is a path relative to this directory.
    Directory(PathBuf),
    /// `source` is a key into in-memory streams.
    Memory(HashMap<String, Bytes>),
}

impl SourceResolver {
    pub fn resolve(&self, source: &str) -> Result<InputSource, HarnessError> {
        match self {
            SourceResolver::Directory(root) => Ok(InputSource::File(root.join(source))),
            SourceResolver::Memory(map) => map
                .get(source)
                .cloned()
                .map(InputSource::Memory)
                .ok_or_else(|| HarnessError::SourceNotFound(source.to_string())),
        }
    }
}

/// Raw YUV in, lossless encoder out.
#[derive(Debug, Clone)]
pub struct RawYuvBackend {
    sources: SourceResolver,
    padding: RowPadding,
    codec: FrameCodec,
    level: u32,
}

impl RawYuvBackend {
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self::with_resolver(SourceResolver::Directory(root.into()))
    }

    pub fn in_memory() -> Self {
        Self::with_resolver(SourceResolver::Memory(HashMap::new()))
    }

    fn with_resolver(sources: SourceResolver) -> Self {
        Self {
            sources,
            padding: RowPadding::None,
            codec: FrameCodec::default(),
            level: 6,
        }
    }

    /// Register an in-memory stream. Switches a directory-backed backend to memory.
    pub fn with_source(mut self, name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        if let SourceResolver::Directory(_) = self.sources {
            self.sources = SourceResolver::Memory(HashMap::new());
        }
        if let SourceResolver::Memory(map) = &mut self.sources {
            map.insert(name.into(), data.into());
        }
        self
    }

    pub fn with_padding(mut self, padding: RowPadding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_codec(mut self, codec: FrameCodec, level: u32) -> Self {
        self.codec = codec;
        self.level = level;
        self
    }
}

impl CodecBackend for RawYuvBackend {
    type Decoder = RawYuvDecoder;
    type Encoder = LosslessEncoder;

    fn open_decoder(&mut self, fixture: &FixtureRecord) -> Result<Self::Decoder, HarnessError> {
        let input = self.sources.resolve(&fixture.source)?;
        debug!(source = %fixture.source, ?input, "opening raw yuv source");
        Ok(RawYuvDecoder::new(input, fixture.width as usize, fixture.height as usize, fixture.chroma)?
            .with_padding(self.padding))
    }

    fn open_encoder(&mut self, _fixture: &FixtureRecord) -> Result<Self::Encoder, HarnessError> {
        Ok(LosslessEncoder::new(self.codec).with_level(self.level))
    }
}
