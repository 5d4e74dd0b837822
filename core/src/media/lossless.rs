//! media/lossless.rs
//! Deterministic lossless reference encoder.
//!
//! Pulls exactly one packed frame per read and stops at the first short read
//! or EndOfStream. Output per picture is one layer set:
//! - first picture only: a parameter-set layer (sequence chunk + picture chunk)
//! - every picture: a slice layer, one chunk per slice
//!
//! Slice chunk layout (little-endian):
//!
//! ```text
//! slice_index (u16)
//! raw_len     (u32)
//! crc32       (u32)   of the raw slice bytes
//! payload     (N bytes, stored / lz4 block / zlib)
//! ```

use std::io::Write;
use bytes::{BufMut, Bytes, BytesMut};
use flate2::{write::ZlibEncoder, Compression};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::constants::{LOSSLESS_MAGIC, LOSSLESS_VERSION, MAX_SLICES, SLICE_HEADER_LEN};
use crate::media::encoder::{EncodeParams, EncodedLayer, EncodedLayerSet, FrameEncoder, LayerCallback};
use crate::stream::pull::{ByteSource, Pull};
use crate::types::HarnessError;
use crate::utils::compute_crc32;

/// Per-slice payload codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameCodec {
    Stored,
    #[default]
    Lz4,
    Deflate,
}

impl FrameCodec {
    pub fn id(&self) -> u8 {
        match self {
            FrameCodec::Stored => 0,
            FrameCodec::Lz4 => 1,
            FrameCodec::Deflate => 2,
        }
    }

    fn compress(&self, raw: &[u8], level: u32) -> Result<Vec<u8>, HarnessError> {
        match self {
            FrameCodec::Stored => Ok(raw.to_vec()),
            FrameCodec::Lz4 => Ok(lz4_flex::block::compress(raw)),
            FrameCodec::Deflate => {
                let mut enc = ZlibEncoder::new(Vec::new(), Compression::new(level));
                enc.write_all(raw)
                    .map_err(|e| HarnessError::Encode(format!("deflate: {}", e)))?;
                enc.finish()
                    .map_err(|e| HarnessError::Encode(format!("deflate: {}", e)))
            }
        }
    }
}

pub struct LosslessEncoder {
    codec: FrameCodec,
    level: u32,
    pictures: u64,
}

impl Default for LosslessEncoder {
    fn default() -> Self {
        Self::new(FrameCodec::default())
    }
}

impl LosslessEncoder {
    pub fn new(codec: FrameCodec) -> Self {
        Self { codec, level: 6, pictures: 0 }
    }

    /// Deflate level, clamped to 0..=9. Ignored by the other codecs.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.min(9);
        self
    }

    pub fn pictures_encoded(&self) -> u64 {
        self.pictures
    }

    fn parameter_set(&self, params: &EncodeParams, slices: u32) -> EncodedLayer {
        let mut seq = BytesMut::with_capacity(8);
        seq.put_slice(&LOSSLESS_MAGIC);
        seq.put_u8(LOSSLESS_VERSION);
        seq.put_u8(self.codec.id());
        seq.put_u8(params.chroma.id());
        seq.put_u8(0); // reserved

        let mut pic = BytesMut::with_capacity(14);
        pic.put_u32_le(params.width as u32);
        pic.put_u32_le(params.height as u32);
        pic.put_u32_le(params.frame_rate.to_bits());
        pic.put_u16_le(slices as u16);

        EncodedLayer::from_chunks(vec![seq.freeze(), pic.freeze()])
    }

    fn encode_picture(&self, raw: &[u8], slices: u32) -> Result<EncodedLayer, HarnessError> {
        let mut layer = EncodedLayer::new();
        for (index, range) in slice_ranges(raw.len(), slices).into_iter().enumerate() {
            let slice = &raw[range];
            let payload = self.codec.compress(slice, self.level)?;

            let mut chunk = BytesMut::with_capacity(SLICE_HEADER_LEN + payload.len());
            chunk.put_u16_le(index as u16);
            chunk.put_u32_le(slice.len() as u32);
            chunk.put_u32_le(compute_crc32(slice));
            chunk.put_slice(&payload);
            layer.push_chunk(chunk.freeze());
        }
        Ok(layer)
    }
}

/// Split `len` bytes into `count` contiguous, near-equal ranges
/// (the first `len % count` ranges are one byte longer).
fn slice_ranges(len: usize, count: u32) -> Vec<std::ops::Range<usize>> {
    let count = (count as usize).clamp(1, len.max(1));
    let base = len / count;
    let rem = len % count;

    let mut out = Vec::with_capacity(count);
    let mut start = 0;
    for i in 0..count {
        let n = base + usize::from(i < rem);
        out.push(start..start + n);
        start += n;
    }
    out
}

impl FrameEncoder for LosslessEncoder {
    fn run(
        &mut self,
        input: &mut dyn ByteSource,
        params: &EncodeParams,
        on_output: &mut LayerCallback<'_>,
    ) -> Result<(), HarnessError> {
        params.validate()?;
        let slices = params.mode.slice_count();
        if slices > MAX_SLICES {
            return Err(HarnessError::Encode(format!(
                "slice count {} exceeds maximum {}",
                slices, MAX_SLICES
            )));
        }

        let frame_len = params.frame_len();
        let mut first = true;

        loop {
            let raw: Bytes = match input.read(frame_len)? {
                Pull::Data(b) if b.len() == frame_len => b,
                Pull::Data(b) => {
                    debug!(got = b.len(), want = frame_len, "short read, stopping encode");
                    break;
                }
                Pull::EndOfStream => break,
            };

            let mut layers = Vec::with_capacity(2);
            if first {
                layers.push(self.parameter_set(params, slices));
                first = false;
            }
            layers.push(self.encode_picture(&raw, slices)?);

            on_output(&EncodedLayerSet::new(layers))?;
            self.pictures += 1;
            trace!(picture = self.pictures, "encoded picture");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_ranges_cover_input() {
        let ranges = slice_ranges(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn slice_ranges_clamp_to_len() {
        assert_eq!(slice_ranges(2, 5).len(), 2);
        assert_eq!(slice_ranges(7, 0), vec![0..7]);
    }

    #[test]
    fn lz4_payload_roundtrips() {
        let raw: Vec<u8> = (0..1000u32).map(|i| (i % 7) as u8).collect();
        let packed = FrameCodec::Lz4.compress(&raw, 6).unwrap();
        let back = lz4_flex::block::decompress(&packed, raw.len()).unwrap();
        assert_eq!(back, raw);
    }
}
