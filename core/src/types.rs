use std::io;
use thiserror::Error;

use crate::{
    digest::DigestError,
    fixtures::FixtureError,
    harness::DigestMismatch,
    media::FrameError,
    stream::QueueError,
};

/// Unified harness error covering the pull loop, collaborators, digests and fixtures.
/// - `#[from]` conversions let `?` cross module boundaries.
/// - Only `DigestMismatch` is non-fatal; everything else aborts the current fixture.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Byte queue could not grow, or was asked for more than it holds.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    /// Frame handed over by a decoder violates its own geometry.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Decoder collaborator failed.
    #[error("decode error: {0}")]
    Decode(String),

    /// Encoder collaborator failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Digest parsing or rendering failure.
    #[error("digest error: {0}")]
    Digest(#[from] DigestError),

    /// Fixture table could not be loaded or is invalid.
    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureError),

    /// Source named by a fixture does not exist in the backend.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// Recorded and computed digests differ.
    #[error("{0}")]
    DigestMismatch(DigestMismatch),

    /// Report could not be serialized.
    #[error("report error: {0}")]
    Report(#[from] serde_json::Error),

    /// I/O error while opening or reading a source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic validation with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}

impl HarnessError {
    /// Fatal errors abort the fixture that raised them; mismatches are recorded and reported.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, HarnessError::DigestMismatch(_))
    }

    /// Short kind label used in reports and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::Queue(QueueError::AllocationError { .. }) => "allocation",
            HarnessError::Queue(QueueError::Underflow { .. }) => "underflow",
            HarnessError::Frame(_) => "frame",
            HarnessError::Decode(_) => "decode",
            HarnessError::Encode(_) => "encode",
            HarnessError::Digest(_) => "digest",
            HarnessError::Fixture(_) => "fixture",
            HarnessError::SourceNotFound(_) => "source",
            HarnessError::DigestMismatch(_) => "mismatch",
            HarnessError::Report(_) => "report",
            HarnessError::Io(_) => "io",
            HarnessError::Validation(_) => "validation",
        }
    }
}
