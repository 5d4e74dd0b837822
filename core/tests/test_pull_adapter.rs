#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use proptest::prelude::*;

    use codec_regress::media::ChromaFormat;
    use codec_regress::stream::{ByteQueue, ByteSource, Pull, PullAdapter, QueueError};
    use codec_regress::testing::{init_test_tracing, pattern_stream, PatternDecoder};
    use codec_regress::types::HarnessError;

    // 4x2 4:2:0 -> 8 + 2 + 2 = 12 bytes per frame
    const W: usize = 4;
    const H: usize = 2;
    const FRAME: usize = 12;

    fn drain(adapter: &mut impl ByteSource, chunk: usize) -> Vec<u8> {
        let mut out = Vec::new();
        while let Pull::Data(b) = adapter.read(chunk).unwrap() {
            out.extend_from_slice(&b);
        }
        out
    }

    #[test]
    fn reads_reproduce_packed_frames() {
        init_test_tracing();
        let mut adapter = PullAdapter::new(PatternDecoder::new(W, H, 3).with_padding(5));
        let got = drain(&mut adapter, 7);
        assert_eq!(got, pattern_stream(W, H, ChromaFormat::Yuv420, 3));
        assert_eq!(adapter.counters().frames_decoded, 3);
        assert_eq!(adapter.counters().bytes_padding, 3 * (2 * 5 + 5 + 5));
        assert_eq!(adapter.into_decoder().frames_produced(), 3);
    }

    #[test]
    fn decodes_only_what_is_demanded() {
        let dec = PatternDecoder::new(W, H, 10);
        let calls = dec.call_counter();
        let mut adapter = PullAdapter::new(dec);

        let first = adapter.read(5).unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.buffered(), FRAME - 5);

        // still covered by the buffered remainder
        adapter.read(7).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // spans two more frames
        let r = adapter.read(FRAME + 1).unwrap();
        assert_eq!(r.len(), FRAME + 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn short_read_then_end_of_stream() {
        let mut adapter = PullAdapter::new(PatternDecoder::new(W, H, 1));
        let r = adapter.read(100).unwrap();
        assert_eq!(r.len(), FRAME);
        assert!(adapter.is_exhausted());
        assert_eq!(adapter.read(100).unwrap(), Pull::EndOfStream);
    }

    #[test]
    fn end_of_stream_is_terminal_and_decoder_is_left_alone() {
        let dec = PatternDecoder::new(W, H, 0);
        let calls = dec.call_counter();
        let mut adapter = PullAdapter::new(dec);

        assert_eq!(adapter.read(1).unwrap(), Pull::EndOfStream);
        assert_eq!(adapter.read(1).unwrap(), Pull::EndOfStream);
        assert_eq!(adapter.read(0).unwrap(), Pull::EndOfStream);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.counters().end_of_stream, 3);
    }

    #[test]
    fn zero_length_read_before_exhaustion_is_empty_data() {
        let dec = PatternDecoder::new(W, H, 2);
        let calls = dec.call_counter();
        let mut adapter = PullAdapter::new(dec);

        let r = adapter.read(0).unwrap();
        assert_eq!(r.len(), 0);
        assert!(!r.is_end());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn decode_error_propagates_unchanged() {
        let mut adapter = PullAdapter::new(PatternDecoder::new(W, H, 5).failing_at(1));
        assert_eq!(adapter.read(FRAME).unwrap().len(), FRAME);

        let err = adapter.read(FRAME).unwrap_err();
        assert!(matches!(err, HarnessError::Decode(ref m) if m.contains("frame 1")));
    }

    #[test]
    fn queue_limit_surfaces_as_allocation_error() {
        let dec = PatternDecoder::new(W, H, 2);
        let mut adapter = PullAdapter::with_queue(dec, ByteQueue::with_limit(FRAME - 1));

        let err = adapter.read(1).unwrap_err();
        assert!(matches!(err, HarnessError::Queue(QueueError::AllocationError { .. })));
        assert!(err.is_fatal());
        assert_eq!(err.kind(), "allocation");
        assert_eq!(adapter.buffered(), 0);
    }

    #[test]
    fn counters_track_requests_and_service() {
        let mut adapter = PullAdapter::new(PatternDecoder::new(W, H, 2));
        adapter.read(10).unwrap();
        adapter.read(20).unwrap();
        assert_eq!(adapter.read(20).unwrap(), Pull::EndOfStream);

        let c = adapter.counters();
        assert_eq!(c.reads, 2);
        assert_eq!(c.bytes_requested, 30);
        assert_eq!(c.bytes_served, 2 * FRAME as u64);
        assert_eq!(c.short_reads, 1);
        assert_eq!(c.bytes_unread(), 0);
    }

    proptest! {
        #[test]
        fn prop_any_read_pattern_yields_same_bytes(
            frames in 0usize..6,
            pad in 0usize..4,
            sizes in prop::collection::vec(1usize..40, 1..24),
        ) {
            let mut adapter = PullAdapter::new(PatternDecoder::new(W, H, frames).with_padding(pad));
            let mut got = Vec::new();
            let mut i = 0;
            loop {
                match adapter.read(sizes[i % sizes.len()]).unwrap() {
                    Pull::Data(b) => got.extend_from_slice(&b),
                    Pull::EndOfStream => break,
                }
                i += 1;
            }
            prop_assert_eq!(got, pattern_stream(W, H, ChromaFormat::Yuv420, frames));
        }
    }
}
