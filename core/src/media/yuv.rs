//! media/yuv.rs
//! Raw planar YUV source presented through the decoder seam.
//!
//! Frames are read tightly packed from the source and scattered into
//! row-padded picture buffers that are reused from frame to frame, the way a
//! real decoder hands out its internal picture memory.

use std::io::Read;
use tracing::{debug, trace};

use crate::media::decoder::{FrameCallback, FrameDecoder};
use crate::media::frame::{ChromaFormat, Frame, Plane, PlaneKind};
use crate::stream::io::{open_input, read_exact_or_eof, InputSource};
use crate::types::HarnessError;
use crate::utils::align_up;

/// Row padding applied to the decoder's picture buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPadding {
    /// stride == width
    #[default]
    None,
    /// stride == width + n
    Extra(usize),
    /// stride == width rounded up to a multiple of n
    Align(usize),
}

impl RowPadding {
    pub fn stride(&self, width: usize) -> usize {
        match self {
            RowPadding::None => width,
            RowPadding::Extra(n) => width + n,
            RowPadding::Align(n) => align_up(width, *n),
        }
    }
}

/// Padding byte written into the unused tail of each row.
const PAD_BYTE: u8 = 0xA5;

pub struct RawYuvDecoder {
    reader: Box<dyn Read + Send>,
    width: usize,
    height: usize,
    chroma: ChromaFormat,
    padding: RowPadding,
    packed: Vec<u8>,
    planes: [Vec<u8>; 3],
    strides: [usize; 3],
    frames: u64,
    exhausted: bool,
}

impl RawYuvDecoder {
    pub fn new(
        source: InputSource,
        width: usize,
        height: usize,
        chroma: ChromaFormat,
    ) -> Result<Self, HarnessError> {
        if width == 0 || height == 0 {
            return Err(HarnessError::Validation(format!(
                "raw yuv dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        let reader = open_input(source)?;
        let mut dec = Self {
            reader,
            width,
            height,
            chroma,
            padding: RowPadding::None,
            packed: vec![0u8; chroma.frame_len(width, height)],
            planes: [Vec::new(), Vec::new(), Vec::new()],
            strides: [0; 3],
            frames: 0,
            exhausted: false,
        };
        dec.allocate_planes();
        Ok(dec)
    }

    pub fn with_padding(mut self, padding: RowPadding) -> Self {
        self.padding = padding;
        self.allocate_planes();
        self
    }

    fn allocate_planes(&mut self) {
        for (i, kind) in PlaneKind::ORDER.iter().enumerate() {
            let (w, h) = self.chroma.plane_dims(*kind, self.width, self.height);
            let stride = self.padding.stride(w);
            self.strides[i] = stride;
            self.planes[i] = vec![PAD_BYTE; stride * h];
        }
    }

    pub fn frames_decoded(&self) -> u64 {
        self.frames
    }

    pub fn stride(&self, plane: PlaneKind) -> usize {
        match plane {
            PlaneKind::Y => self.strides[0],
            PlaneKind::U => self.strides[1],
            PlaneKind::V => self.strides[2],
        }
    }

    fn scatter_packed(&mut self) {
        let mut off = 0;
        for (i, kind) in PlaneKind::ORDER.iter().enumerate() {
            let (w, h) = self.chroma.plane_dims(*kind, self.width, self.height);
            let stride = self.strides[i];
            for row in 0..h {
                let base = row * stride;
                self.planes[i][base..base + w].copy_from_slice(&self.packed[off..off + w]);
                off += w;
            }
        }
    }

    fn plane(&self, i: usize) -> Result<Plane<'_>, HarnessError> {
        let kind = PlaneKind::ORDER[i];
        let (w, h) = self.chroma.plane_dims(kind, self.width, self.height);
        Ok(Plane::new(kind, &self.planes[i], w, h, self.strides[i])?)
    }
}

impl FrameDecoder for RawYuvDecoder {
    fn produce_next_frame(&mut self, on_frame: &mut FrameCallback<'_>) -> Result<bool, HarnessError> {
        if self.exhausted {
            return Ok(false);
        }

        let want = self.packed.len();
        let got = read_exact_or_eof(&mut self.reader, &mut self.packed)?;
        if got == 0 {
            debug!(frames = self.frames, "raw yuv source exhausted");
            self.exhausted = true;
            return Ok(false);
        }
        if got < want {
            self.exhausted = true;
            return Err(HarnessError::Decode(format!(
                "truncated frame {}: {} of {} bytes",
                self.frames, got, want
            )));
        }

        self.scatter_packed();
        let frame = Frame::new(self.plane(0)?, self.plane(1)?, self.plane(2)?);
        on_frame(&frame)?;

        self.frames += 1;
        trace!(frame = self.frames, "decoded raw yuv frame");
        Ok(true)
    }
}
