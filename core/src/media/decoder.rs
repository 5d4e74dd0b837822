use crate::media::frame::Frame;
use crate::types::HarnessError;

/// Callback receiving one borrowed frame. Its error short-circuits the decode step.
pub type FrameCallback<'c> = dyn FnMut(&Frame<'_>) -> Result<(), HarnessError> + 'c;

/// Frame-push side of the pipeline.
///
/// Each call decodes at most one frame:
/// - `Ok(true)`: a frame was handed to `on_frame` (exactly once).
/// - `Ok(false)`: the stream is exhausted; `on_frame` was not called.
/// - `Err(_)`: fatal decode failure, or the callback's own error passed through.
///
/// The frame's plane buffers belong to the decoder and are only valid inside
/// `on_frame`.
pub trait FrameDecoder {
    fn produce_next_frame(&mut self, on_frame: &mut FrameCallback<'_>) -> Result<bool, HarnessError>;
}

impl<D: FrameDecoder + ?Sized> FrameDecoder for Box<D> {
    fn produce_next_frame(&mut self, on_frame: &mut FrameCallback<'_>) -> Result<bool, HarnessError> {
        (**self).produce_next_frame(on_frame)
    }
}

impl<D: FrameDecoder + ?Sized> FrameDecoder for &mut D {
    fn produce_next_frame(&mut self, on_frame: &mut FrameCallback<'_>) -> Result<bool, HarnessError> {
        (**self).produce_next_frame(on_frame)
    }
}
