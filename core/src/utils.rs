/// CRC32 (IEEE) of a byte slice.
pub fn compute_crc32(data: &[u8]) -> u32 {
    use crc32fast::Hasher;
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Round `value` up to the next multiple of `align` (`align == 0` leaves it unchanged).
#[inline]
pub fn align_up(value: usize, align: usize) -> usize {
    if align <= 1 {
        return value;
    }
    value.div_ceil(align) * align
}

/// `ceil(value / divisor)` for plane dimensions.
#[inline]
pub fn div_round_up(value: usize, divisor: usize) -> usize {
    debug_assert!(divisor > 0);
    value.div_ceil(divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_multiple() {
        assert_eq!(align_up(320, 32), 320);
        assert_eq!(align_up(321, 32), 352);
        assert_eq!(align_up(7, 0), 7);
        assert_eq!(align_up(7, 1), 7);
    }

    #[test]
    fn crc32_known_vector() {
        assert_eq!(compute_crc32(b"123456789"), 0xCBF4_3926);
    }
}
