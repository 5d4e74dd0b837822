//! harness: drives fixtures end to end and reports verdicts.
//!
//! A `CodecBackend` hands out independent decoder and encoder collaborators per fixture, the
//! `PullAdapter` plays the byte source, and a `HashAccumulator` sits behind
//! the encoder's output callback.

pub mod config;
pub mod backend;
pub mod report;
pub mod verifier;

pub use config::HarnessConfig;
pub use backend::{CodecBackend, RawYuvBackend, SourceResolver};
pub use report::{BatchReport, DigestMismatch, FixtureOutcome, FixtureStatus, OutcomeSummary};
pub use verifier::{compute_digest, DigestRun, Verifier};
