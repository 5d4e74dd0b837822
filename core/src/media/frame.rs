//! media/frame.rs
//! Decoded picture model: three strided planes borrowed from the decoder.
//!
//! A `Frame<'a>` only lives for the duration of the decoder callback that
//! receives it; anything kept past the callback must be copied out.

use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::div_round_up;

/// Plane identity, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneKind {
    Y,
    U,
    V,
}

impl PlaneKind {
    pub const ORDER: [PlaneKind; 3] = [PlaneKind::Y, PlaneKind::U, PlaneKind::V];
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaneKind::Y => "Y",
            PlaneKind::U => "U",
            PlaneKind::V => "V",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("plane {plane}: stride {stride} is smaller than width {width}")]
    StrideTooSmall { plane: PlaneKind, width: usize, stride: usize },

    #[error("plane {plane}: buffer holds {have} bytes, geometry needs {need}")]
    Truncated { plane: PlaneKind, need: usize, have: usize },

    #[error("invalid frame geometry: {0}")]
    Geometry(String),
}

/// Chroma subsampling of a planar YUV picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromaFormat {
    /// 1 Cb & Cr sample per 2x2 Y samples.
    #[default]
    Yuv420,
    /// 1 Cb & Cr sample per 2x1 Y samples.
    Yuv422,
    /// No subsampling.
    Yuv444,
}

impl ChromaFormat {
    /// Subsampling factors (horizontal, vertical).
    pub fn subsampling(&self) -> (usize, usize) {
        match self {
            ChromaFormat::Yuv420 => (2, 2),
            ChromaFormat::Yuv422 => (2, 1),
            ChromaFormat::Yuv444 => (1, 1),
        }
    }

    /// Width and height of the given plane for a picture of `width` x `height`.
    /// Odd luma dimensions round the chroma planes up.
    pub fn plane_dims(&self, plane: PlaneKind, width: usize, height: usize) -> (usize, usize) {
        match plane {
            PlaneKind::Y => (width, height),
            PlaneKind::U | PlaneKind::V => {
                let (hs, vs) = self.subsampling();
                (div_round_up(width, hs), div_round_up(height, vs))
            }
        }
    }

    /// Tightly packed byte length of one frame (all three planes).
    pub fn frame_len(&self, width: usize, height: usize) -> usize {
        PlaneKind::ORDER
            .iter()
            .map(|p| {
                let (w, h) = self.plane_dims(*p, width, height);
                w * h
            })
            .sum()
    }

    pub fn id(&self) -> u8 {
        match self {
            ChromaFormat::Yuv420 => 0,
            ChromaFormat::Yuv422 => 1,
            ChromaFormat::Yuv444 => 2,
        }
    }
}

impl fmt::Display for ChromaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChromaFormat::Yuv420 => "yuv420",
            ChromaFormat::Yuv422 => "yuv422",
            ChromaFormat::Yuv444 => "yuv444",
        };
        f.write_str(name)
    }
}

/// Single-channel 2-D sample array; rows start every `stride` bytes.
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    pub kind: PlaneKind,
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
    pub stride: usize,
}

impl<'a> Plane<'a> {
    /// Validate geometry against the borrowed buffer.
    ///
    /// The last row only needs `width` bytes, so decoders that trim the final
    /// row's padding are accepted.
    pub fn new(
        kind: PlaneKind,
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self, FrameError> {
        if stride < width {
            return Err(FrameError::StrideTooSmall { plane: kind, width, stride });
        }
        let need = Self::min_buffer_len(width, height, stride);
        if data.len() < need {
            return Err(FrameError::Truncated { plane: kind, need, have: data.len() });
        }
        Ok(Self { kind, data, width, height, stride })
    }

    #[inline]
    pub fn min_buffer_len(width: usize, height: usize, stride: usize) -> usize {
        if height == 0 {
            0
        } else {
            (height - 1) * stride + width
        }
    }

    /// Visible bytes of row `i` (padding excluded).
    #[inline]
    pub fn row(&self, i: usize) -> &'a [u8] {
        let base = i * self.stride;
        &self.data[base..base + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.height).map(move |i| self.row(i))
    }

    /// Byte length once row padding is stripped.
    #[inline]
    pub fn packed_len(&self) -> usize {
        self.width * self.height
    }

    /// Padding bytes skipped when packing this plane.
    #[inline]
    pub fn padding_len(&self) -> usize {
        (self.stride - self.width) * self.height
    }
}

/// One decoded picture: Y, U and V planes.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub y: Plane<'a>,
    pub u: Plane<'a>,
    pub v: Plane<'a>,
}

impl<'a> Frame<'a> {
    pub fn new(y: Plane<'a>, u: Plane<'a>, v: Plane<'a>) -> Self {
        Self { y, u, v }
    }

    /// Planes in fixed serialization order {Y, U, V}.
    pub fn planes(&self) -> [&Plane<'a>; 3] {
        [&self.y, &self.u, &self.v]
    }

    pub fn packed_len(&self) -> usize {
        self.planes().iter().map(|p| p.packed_len()).sum()
    }

    pub fn padding_len(&self) -> usize {
        self.planes().iter().map(|p| p.padding_len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuv420_frame_len_matches_i420() {
        assert_eq!(ChromaFormat::Yuv420.frame_len(320, 192), 320 * 192 * 3 / 2);
    }

    #[test]
    fn odd_dimensions_round_chroma_up() {
        assert_eq!(ChromaFormat::Yuv420.plane_dims(PlaneKind::U, 5, 3), (3, 2));
        assert_eq!(ChromaFormat::Yuv422.plane_dims(PlaneKind::V, 5, 3), (3, 3));
        assert_eq!(ChromaFormat::Yuv444.plane_dims(PlaneKind::V, 5, 3), (5, 3));
    }

    #[test]
    fn plane_rejects_short_stride() {
        let buf = [0u8; 16];
        let err = Plane::new(PlaneKind::Y, &buf, 4, 2, 3).unwrap_err();
        assert!(matches!(err, FrameError::StrideTooSmall { .. }));
    }

    #[test]
    fn plane_accepts_trimmed_last_row() {
        // two rows of width 4 with stride 6: last row needs only 4 bytes
        let buf = [0u8; 10];
        let plane = Plane::new(PlaneKind::U, &buf, 4, 2, 6).unwrap();
        assert_eq!(plane.packed_len(), 8);
        assert_eq!(plane.padding_len(), 4);
    }

    #[test]
    fn plane_rejects_truncated_buffer() {
        let buf = [0u8; 9];
        let err = Plane::new(PlaneKind::V, &buf, 4, 2, 6).unwrap_err();
        assert_eq!(err, FrameError::Truncated { plane: PlaneKind::V, need: 10, have: 9 });
    }
}
