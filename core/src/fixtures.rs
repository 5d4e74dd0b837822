//! fixtures.rs
//! Externally supplied fixture table.
//!
//! ```json
//! { "fixtures": [
//!     { "source": "res/test_vd_1d.264",
//!       "expected_digest": "c04a5978eb715837c29463e79b6598a05136829f",
//!       "width": 320, "height": 192, "frame_rate": 12.0 }
//! ] }
//! ```
//!
//! `mode`, `chroma`, `digest_alg` and `name` are optional.

use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::digest::{DigestAlg, DigestError, ExpectedDigest};
use crate::media::{ChromaFormat, EncodeParams, SliceMode};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("cannot read fixture table {path}: {source}")]
    Read { path: String, source: std::io::Error },

    #[error("malformed fixture table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fixture {name}: {msg}")]
    Invalid { name: String, msg: String },

    #[error("fixture {name}: {source}")]
    Digest { name: String, source: DigestError },

    #[error("duplicate fixture name {0}")]
    Duplicate(String),
}

/// One configured test case. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub source: String,
    pub expected_digest: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f32,
    #[serde(default)]
    pub mode: SliceMode,
    #[serde(default)]
    pub chroma: ChromaFormat,
    #[serde(default)]
    pub digest_alg: DigestAlg,
}

impl FixtureRecord {
    pub fn new(
        source: impl Into<String>,
        expected_digest: impl Into<String>,
        width: u32,
        height: u32,
        frame_rate: f32,
    ) -> Self {
        Self {
            name: None,
            source: source.into(),
            expected_digest: expected_digest.into(),
            width,
            height,
            frame_rate,
            mode: SliceMode::default(),
            chroma: ChromaFormat::default(),
            digest_alg: DigestAlg::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_mode(mut self, mode: SliceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_chroma(mut self, chroma: ChromaFormat) -> Self {
        self.chroma = chroma;
        self
    }

    pub fn with_digest_alg(mut self, alg: DigestAlg) -> Self {
        self.digest_alg = alg;
        self
    }

    /// Explicit name, else the source's file name.
    pub fn name(&self) -> &str {
        if let Some(name) = &self.name {
            return name;
        }
        Path::new(&self.source)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(self.source.as_str())
    }

    pub fn encode_params(&self) -> EncodeParams {
        EncodeParams::new(self.width as usize, self.height as usize, self.frame_rate)
            .with_mode(self.mode)
            .with_chroma(self.chroma)
    }

    pub fn expected(&self) -> Result<ExpectedDigest, FixtureError> {
        ExpectedDigest::parse(self.digest_alg, &self.expected_digest).map_err(|source| FixtureError::Digest {
            name: self.name().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), FixtureError> {
        let invalid = |msg: String| FixtureError::Invalid { name: self.name().to_string(), msg };
        if self.source.trim().is_empty() {
            return Err(invalid("empty source".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!("dimensions must be non-zero, got {}x{}", self.width, self.height)));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(invalid(format!("frame rate must be positive, got {}", self.frame_rate)));
        }
        if self.mode.slice_count() == 0 {
            return Err(invalid("slice count must be at least 1".into()));
        }
        self.expected()?;
        Ok(())
    }
}

/// Ordered list of fixtures; each one drives an independent run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureTable {
    pub fixtures: Vec<FixtureRecord>,
}

impl FixtureTable {
    pub fn new(fixtures: Vec<FixtureRecord>) -> Result<Self, FixtureError> {
        let table = Self { fixtures };
        table.validate()?;
        Ok(table)
    }

    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        let table: FixtureTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, FixtureError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every name unique. Record contents are checked when each fixture runs,
    /// so one bad record fails only itself.
    pub fn validate(&self) -> Result<(), FixtureError> {
        let mut seen = std::collections::HashSet::new();
        for f in &self.fixtures {
            if !seen.insert(f.name()) {
                return Err(FixtureError::Duplicate(f.name().to_string()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FixtureRecord> {
        self.fixtures.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FixtureRecord> {
        self.fixtures.iter().find(|f| f.name() == name)
    }
}

impl IntoIterator for FixtureTable {
    type Item = FixtureRecord;
    type IntoIter = std::vec::IntoIter<FixtureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.fixtures.into_iter()
    }
}

impl<'a> IntoIterator for &'a FixtureTable {
    type Item = &'a FixtureRecord;
    type IntoIter = std::slice::Iter<'a, FixtureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.fixtures.iter()
    }
}
