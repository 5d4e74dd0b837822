#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use codec_regress::stream::{ByteQueue, QueueError};

    #[test]
    fn rows_come_out_in_append_order() {
        let mut q = ByteQueue::new();
        q.append(b"AABB").unwrap();
        q.append(b"CCDD").unwrap();

        assert_eq!(&q.consume(5).unwrap()[..], b"AABBC");
        assert_eq!(q.len(), 3);
        assert_eq!(&q.consume(3).unwrap()[..], b"CDD");
        assert!(q.is_empty());
    }

    #[test]
    fn empty_append_is_noop() {
        let mut q = ByteQueue::new();
        q.append(&[]).unwrap();
        assert!(q.is_empty());
        assert_eq!(q.total_appended(), 0);
    }

    #[test]
    fn consume_zero_on_empty_queue() {
        let mut q = ByteQueue::new();
        assert!(q.consume(0).unwrap().is_empty());
    }

    #[test]
    fn underflow_leaves_queue_untouched() {
        let mut q = ByteQueue::new();
        q.append(b"xyz").unwrap();
        let err = q.consume(4).unwrap_err();
        assert_eq!(err, QueueError::Underflow { requested: 4, available: 3 });
        assert_eq!(q.len(), 3);
        assert_eq!(&q.consume(3).unwrap()[..], b"xyz");
    }

    #[test]
    fn limit_rejects_whole_append() {
        let mut q = ByteQueue::with_limit(6);
        q.append(b"abcd").unwrap();
        let err = q.append(b"efg").unwrap_err();
        assert_eq!(err, QueueError::AllocationError { requested: 3, buffered: 4, limit: 6 });
        assert_eq!(q.len(), 4);

        // room frees up once the head is consumed
        q.consume(2).unwrap();
        q.append(b"efg").unwrap();
        assert_eq!(&q.consume(5).unwrap()[..], b"cdefg");
    }

    proptest! {
        #[test]
        fn prop_fifo_concatenation(
            chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..16),
            take in prop::collection::vec(1usize..48, 0..32),
        ) {
            let mut q = ByteQueue::new();
            let mut expected = Vec::new();
            for c in &chunks {
                q.append(c).unwrap();
                expected.extend_from_slice(c);
            }

            let mut got = Vec::new();
            for n in take {
                let n = n.min(q.len());
                got.extend_from_slice(&q.consume(n).unwrap());
            }
            let rest = q.len();
            got.extend_from_slice(&q.consume(rest).unwrap());

            prop_assert_eq!(got, expected);
        }

        #[test]
        fn prop_len_conserved(
            ops in prop::collection::vec((any::<bool>(), 0usize..32), 0..64),
        ) {
            let mut q = ByteQueue::new();
            for (is_append, n) in ops {
                if is_append {
                    q.append(&vec![0x5A; n]).unwrap();
                } else {
                    let n = n.min(q.len());
                    q.consume(n).unwrap();
                }
                prop_assert_eq!(q.len() as u64, q.total_appended() - q.total_consumed());
            }
        }
    }
}
