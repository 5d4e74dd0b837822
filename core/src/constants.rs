//! Harness-wide defaults.

use crate::digest::DigestAlg;

/// Upper bound on bytes the pull queue may hold at once (256 MiB).
///
/// A single 4:4:4 8K frame is ~100 MiB, so this leaves room for one frame of
/// lookahead plus the queue residue.
pub const DEFAULT_QUEUE_LIMIT: usize = 256 * 1024 * 1024;

/// Golden digests are recorded as SHA-1 unless a fixture says otherwise.
pub const DEFAULT_DIGEST_ALG: DigestAlg = DigestAlg::Sha1;

/// Magic prefix of the lossless encoder's parameter-set chunk.
pub const LOSSLESS_MAGIC: [u8; 4] = *b"LLV1";
pub const LOSSLESS_VERSION: u8 = 1;

/// Slice header: slice_index (u16) + raw_len (u32) + crc32 (u32).
pub const SLICE_HEADER_LEN: usize = 2 + 4 + 4;

/// Upper bound on slices per frame.
pub const MAX_SLICES: u32 = 64;
