//! Integer helpers used throughout the address computations.
//!
//! All alignment helpers require the alignment to be a power of two unless
//! stated otherwise.

/// Returns `true` if `x` is a non-zero power of two.
#[inline]
pub const fn is_pow2(x: u32) -> bool {
    x != 0 && (x & (x - 1)) == 0
}

/// Floor of log2 of `x`. Returns 0 for 0.
#[inline]
pub const fn log2(x: u32) -> u32 {
    if x == 0 {
        0
    } else {
        31 - x.leading_zeros()
    }
}

/// Aligns `x` up to `align`, which must be a power of two.
#[inline]
pub const fn pow_two_align(x: u32, align: u32) -> u32 {
    debug_assert!(is_pow2(align));
    (x + (align - 1)) & !(align - 1)
}

/// Aligns `x` up to `align`, which must be a power of two.
#[inline]
pub const fn pow_two_align_u64(x: u64, align: u64) -> u64 {
    debug_assert!(align != 0 && (align & (align - 1)) == 0);
    (x + (align - 1)) & !(align - 1)
}

/// Aligns `x` down to `align`, which must be a power of two.
#[inline]
pub const fn pow_two_align_down(x: u32, align: u32) -> u32 {
    debug_assert!(is_pow2(align));
    x & !(align - 1)
}

/// Integer division rounding up. `b` may be any non-zero value.
#[inline]
pub const fn round_up_quotient(a: u32, b: u32) -> u32 {
    (a + b - 1) / b
}

/// `ceil(a / 2^b)`.
#[inline]
pub const fn shift_ceil(a: u32, b: u32) -> u32 {
    if b >= 32 {
        return (a != 0) as u32;
    }
    (a >> b) + (((a & ((1u32 << b) - 1)) != 0) as u32)
}

/// `max(a >> b, 1)`, the extent of a dimension at mip level `b`.
#[inline]
pub const fn shift_right(a: u32, b: u32) -> u32 {
    let shifted = if b >= 32 { 0 } else { a >> b };
    if shifted > 1 {
        shifted
    } else {
        1
    }
}

/// Single bit of `v` at position `bit`, as 0 or 1.
#[inline]
pub const fn get_bit(v: u32, bit: u32) -> u32 {
    (v >> bit) & 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(3, 1)]
    #[case(4096, 12)]
    #[case(u32::MAX, 31)]
    fn log2_floors(#[case] x: u32, #[case] expected: u32) {
        assert_eq!(log2(x), expected);
    }

    #[rstest]
    #[case(0, 128, 0)]
    #[case(1, 128, 128)]
    #[case(128, 128, 128)]
    #[case(129, 32, 160)]
    fn aligns_up(#[case] x: u32, #[case] align: u32, #[case] expected: u32) {
        assert_eq!(pow_two_align(x, align), expected);
        assert_eq!(pow_two_align_u64(x as u64, align as u64), expected as u64);
    }

    #[rstest]
    #[case(7, 2, 2)]
    #[case(8, 2, 2)]
    #[case(9, 3, 2)]
    #[case(0, 4, 0)]
    #[case(1, 0, 1)]
    fn shift_ceil_rounds_up(#[case] a: u32, #[case] b: u32, #[case] expected: u32) {
        assert_eq!(shift_ceil(a, b), expected);
    }

    #[test]
    fn shift_right_clamps_to_one() {
        assert_eq!(shift_right(64, 3), 8);
        assert_eq!(shift_right(64, 10), 1);
        assert_eq!(shift_right(0, 0), 1);
    }

    #[test]
    fn round_up_quotient_handles_non_pow2() {
        assert_eq!(round_up_quotient(10, 3), 4);
        assert_eq!(round_up_quotient(9, 3), 3);
        assert_eq!(pow_two_align_down(37, 8), 32);
        assert!(is_pow2(64) && !is_pow2(96) && !is_pow2(0));
        assert_eq!(get_bit(0b100, 2), 1);
    }
}
