#[cfg(test)]
mod tests {
    use codec_regress::media::{Frame, Plane, PlaneKind};
    use codec_regress::stream::{ByteQueue, PlaneSerializer, QueueError};

    #[test]
    fn padded_plane_rows_are_stripped() {
        // width 2, stride 4: "AAxx" "BBxx"
        let data = b"AAxxBBxx";
        let plane = Plane::new(PlaneKind::Y, data, 2, 2, 4).unwrap();
        let mut q = ByteQueue::new();

        let n = PlaneSerializer::write_plane(&plane, &mut q).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&q.consume(4).unwrap()[..], b"AABB");
    }

    #[test]
    fn frame_is_y_then_u_then_v() {
        let y = [1u8, 1, 0, 0, 1, 1, 0, 0];
        let u = [2u8, 9];
        let v = [3u8, 9];
        let frame = Frame::new(
            Plane::new(PlaneKind::Y, &y, 2, 2, 4).unwrap(),
            Plane::new(PlaneKind::U, &u, 1, 1, 2).unwrap(),
            Plane::new(PlaneKind::V, &v, 1, 1, 2).unwrap(),
        );

        assert_eq!(PlaneSerializer::to_vec(&frame), vec![1, 1, 1, 1, 2, 3]);
        assert_eq!(frame.packed_len(), 6);
    }

    #[test]
    fn unpadded_plane_copies_verbatim() {
        let data: Vec<u8> = (0..12).collect();
        let plane = Plane::new(PlaneKind::U, &data, 4, 3, 4).unwrap();
        let mut q = ByteQueue::new();
        PlaneSerializer::write_plane(&plane, &mut q).unwrap();
        assert_eq!(&q.consume(12).unwrap()[..], &data[..]);
    }

    #[test]
    fn frame_over_limit_appends_nothing() {
        let y = [7u8; 16];
        let c = [8u8; 4];
        let frame = Frame::new(
            Plane::new(PlaneKind::Y, &y, 4, 4, 4).unwrap(),
            Plane::new(PlaneKind::U, &c, 2, 2, 2).unwrap(),
            Plane::new(PlaneKind::V, &c, 2, 2, 2).unwrap(),
        );

        let mut q = ByteQueue::with_limit(20);
        let err = PlaneSerializer::write_frame(&frame, &mut q).unwrap_err();
        assert!(matches!(err, QueueError::AllocationError { requested: 24, .. }));
        assert!(q.is_empty());
    }

    #[test]
    fn stride_smaller_than_width_is_rejected() {
        assert!(Plane::new(PlaneKind::Y, &[0u8; 8], 4, 2, 3).is_err());
    }
}
