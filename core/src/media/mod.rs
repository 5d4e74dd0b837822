//! media: the decoder/encoder collaborator contracts and the frame model.
//!
//! Responsibilities:
//! - Describe decoded frames as borrowed, strided planes
//! - Define the frame-push decoder and byte-pull encoder seams
//! - Ship raw-YUV and lossless reference collaborators
//!
//! Non-responsibilities:
//! - Buffering between the two seams (see `stream`)
//! - Digests and verdicts

pub mod frame;
pub mod decoder;
pub mod encoder;
pub mod yuv;
pub mod lossless;

pub use frame::{ChromaFormat, Frame, FrameError, Plane, PlaneKind};
pub use decoder::{FrameCallback, FrameDecoder};
pub use encoder::{EncodeParams, EncodedLayer, EncodedLayerSet, FrameEncoder, LayerCallback, SliceMode};
pub use yuv::{RawYuvDecoder, RowPadding};
pub use lossless::{FrameCodec, LosslessEncoder};
