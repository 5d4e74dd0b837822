use crate::media::frame::{Frame, Plane};
use crate::stream::queue::{ByteQueue, QueueError};

/// Flattens a frame's planes, in {Y, U, V} order, into tightly packed rows.
///
/// Only `width` bytes of each row are copied; the `stride - width` padding is
/// dropped. The frame buffer is borrowed, so everything is copied out before
/// the decoder callback returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaneSerializer;

impl PlaneSerializer {
    /// Append one plane row by row. Returns bytes appended.
    pub fn write_plane(plane: &Plane<'_>, out: &mut ByteQueue) -> Result<usize, QueueError> {
        out.ensure_room(plane.packed_len())?;
        for row in plane.rows() {
            out.append(row)?;
        }
        Ok(plane.packed_len())
    }

    /// Append a whole frame. The room check covers all three planes up front,
    /// so a frame is either fully queued or not at all.
    pub fn write_frame(frame: &Frame<'_>, out: &mut ByteQueue) -> Result<usize, QueueError> {
        out.ensure_room(frame.packed_len())?;
        let mut written = 0;
        for plane in frame.planes() {
            written += Self::write_plane(plane, out)?;
        }
        Ok(written)
    }

    /// Packed representation as an owned buffer.
    pub fn to_vec(frame: &Frame<'_>) -> Vec<u8> {
        let mut out = Vec::with_capacity(frame.packed_len());
        for plane in frame.planes() {
            for row in plane.rows() {
                out.extend_from_slice(row);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::frame::PlaneKind;

    #[test]
    fn strips_padding_per_row() {
        // width 2, stride 3: '.' is padding
        let y = b"ab.cd.";
        let u = b"e";
        let v = b"f";
        let frame = Frame::new(
            Plane::new(PlaneKind::Y, y, 2, 2, 3).unwrap(),
            Plane::new(PlaneKind::U, u, 1, 1, 1).unwrap(),
            Plane::new(PlaneKind::V, v, 1, 1, 1).unwrap(),
        );

        let mut q = ByteQueue::new();
        assert_eq!(PlaneSerializer::write_frame(&frame, &mut q).unwrap(), 6);
        assert_eq!(&q.consume(6).unwrap()[..], b"abcdef");
        assert_eq!(PlaneSerializer::to_vec(&frame), b"abcdef".to_vec());
    }

    #[test]
    fn frame_that_does_not_fit_leaves_queue_untouched() {
        let y = [1u8; 4];
        let c = [2u8; 1];
        let frame = Frame::new(
            Plane::new(PlaneKind::Y, &y, 2, 2, 2).unwrap(),
            Plane::new(PlaneKind::U, &c, 1, 1, 1).unwrap(),
            Plane::new(PlaneKind::V, &c, 1, 1, 1).unwrap(),
        );

        let mut q = ByteQueue::with_limit(5);
        assert!(PlaneSerializer::write_frame(&frame, &mut q).is_err());
        assert!(q.is_empty());
    }
}
