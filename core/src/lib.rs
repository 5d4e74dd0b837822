//! codec-regress
//!
//! Golden-digest regression harness for a decode -> re-encode pipeline.
//! A reference stream is decoded frame by frame, the frames are pulled by an
//! encoder as a flat byte stream, and the encoder output is folded into a
//! digest that is compared against a recorded value.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Collaborators and fixtures
pub mod media;
pub mod fixtures;
pub mod digest;
pub mod telemetry;

// Byte-stream bridge
pub mod stream;

// Orchestration
pub mod harness;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::digest::{Digest, DigestAlg, ExpectedDigest, HashAccumulator};
    pub use crate::fixtures::{FixtureRecord, FixtureTable};
    pub use crate::harness::{
        BatchReport, CodecBackend, FixtureOutcome, FixtureStatus, HarnessConfig, RawYuvBackend, Verifier,
    };
    pub use crate::media::{
        ChromaFormat, EncodeParams, EncodedLayer, EncodedLayerSet, Frame, FrameDecoder, FrameEncoder, Plane,
        SliceMode,
    };
    pub use crate::stream::{ByteQueue, ByteSource, PlaneSerializer, Pull, PullAdapter};
    pub use crate::types::HarnessError;
}
