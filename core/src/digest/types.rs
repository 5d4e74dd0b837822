use std::fmt;
use serde::{Deserialize, Serialize};
use sha1::Digest as _;
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use thiserror::Error;

use crate::constants::DEFAULT_DIGEST_ALG;

/// Digest-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("invalid hex digest {input:?}: {reason}")]
    InvalidHex { input: String, reason: String },

    #[error("{alg} digest must be {expected} bytes, got {actual}")]
    InvalidLength { alg: DigestAlg, expected: usize, actual: usize },

    #[error("digest algorithm mismatch: expected {expected}, computed {actual}")]
    AlgorithmMismatch { expected: DigestAlg, actual: DigestAlg },
}

/// Supported digest algorithms (extensible).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlg {
    Sha1,
    Sha256,
    Sha512,
    Blake3, // UNKEYED Blake3
}

impl Default for DigestAlg {
    fn default() -> Self {
        DEFAULT_DIGEST_ALG
    }
}

impl DigestAlg {
    /// Digest length in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            DigestAlg::Sha1 => 20,
            DigestAlg::Sha256 => 32,
            DigestAlg::Sha512 => 64,
            DigestAlg::Blake3 => 32,
        }
    }
}

impl fmt::Display for DigestAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DigestAlg::Sha1 => "sha1",
            DigestAlg::Sha256 => "sha256",
            DigestAlg::Sha512 => "sha512",
            DigestAlg::Blake3 => "blake3",
        };
        f.write_str(name)
    }
}

/// Internal hashing state.
pub enum DigestState {
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
    Blake3(blake3::Hasher),
}

impl DigestState {
    pub fn new(alg: DigestAlg) -> Self {
        match alg {
            DigestAlg::Sha1 => DigestState::Sha1(Sha1::new()),
            DigestAlg::Sha256 => DigestState::Sha256(Sha256::new()),
            DigestAlg::Sha512 => DigestState::Sha512(Sha512::new()),
            DigestAlg::Blake3 => DigestState::Blake3(blake3::Hasher::new()),
        }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        match self {
            DigestState::Sha1(h) => h.update(data),
            DigestState::Sha256(h) => h.update(data),
            DigestState::Sha512(h) => h.update(data),
            DigestState::Blake3(h) => {
                h.update(data);
            }
        }
    }

    #[inline]
    pub fn finalize(self) -> Vec<u8> {
        match self {
            DigestState::Sha1(h) => h.finalize().to_vec(),
            DigestState::Sha256(h) => h.finalize().to_vec(),
            DigestState::Sha512(h) => h.finalize().to_vec(),
            DigestState::Blake3(h) => h.finalize().as_bytes().to_vec(),
        }
    }
}

/// Finalized digest of an ordered byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    alg: DigestAlg,
    bytes: Vec<u8>,
}

impl Digest {
    pub fn new(alg: DigestAlg, bytes: Vec<u8>) -> Result<Self, DigestError> {
        if bytes.len() != alg.output_len() {
            return Err(DigestError::InvalidLength {
                alg,
                expected: alg.output_len(),
                actual: bytes.len(),
            });
        }
        Ok(Self { alg, bytes })
    }

    /// One-shot digest of a contiguous buffer.
    pub fn of(alg: DigestAlg, data: &[u8]) -> Self {
        let mut state = DigestState::new(alg);
        state.update(data);
        Self::from_state(alg, state)
    }

    /// Length is fixed by the algorithm, so no check is needed here.
    pub(crate) fn from_state(alg: DigestAlg, state: DigestState) -> Self {
        Self { alg, bytes: state.finalize() }
    }

    pub fn alg(&self) -> DigestAlg {
        self.alg
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Recorded digest, parsed once up front so comparison is byte-exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDigest {
    alg: DigestAlg,
    bytes: Vec<u8>,
}

impl ExpectedDigest {
    /// Parse a hex string (either case, surrounding whitespace ignored).
    pub fn parse(alg: DigestAlg, hex_str: &str) -> Result<Self, DigestError> {
        let trimmed = hex_str.trim();
        let bytes = hex::decode(trimmed).map_err(|e| DigestError::InvalidHex {
            input: trimmed.to_string(),
            reason: e.to_string(),
        })?;
        if bytes.len() != alg.output_len() {
            return Err(DigestError::InvalidLength {
                alg,
                expected: alg.output_len(),
                actual: bytes.len(),
            });
        }
        Ok(Self { alg, bytes })
    }

    pub fn alg(&self) -> DigestAlg {
        self.alg
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Exact comparison against a computed digest.
    pub fn verify(&self, actual: &Digest) -> Result<bool, DigestError> {
        if self.alg != actual.alg() {
            return Err(DigestError::AlgorithmMismatch {
                expected: self.alg,
                actual: actual.alg(),
            });
        }
        Ok(self.bytes == actual.as_bytes())
    }
}

impl fmt::Display for ExpectedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
