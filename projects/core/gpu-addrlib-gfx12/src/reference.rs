//! Independent model of block and mip chain layout.
//!
//! This is a second derivation of the same geometry the surface driver
//! computes, written in terms of signed block counts rather than aligned
//! extents. The driver uses it to cross check slice sizes in debug builds,
//! and the tests use it to validate the fast path.
//!
//! All values are log2 unless the name says otherwise. Mip extents are
//! rounded up (`ceil(w / 2^mip)`), unlike the driver which rounds down.

use crate::block::MAX_MIP_LEVELS;
use crate::swizzle_mode::SwizzleMode;

/// Sentinel returned by [`calc_mip_in_tail`] for mips outside the tail.
pub const MIP_NOT_IN_TAIL: i32 = MAX_MIP_LEVELS as i32;

/// Highest mip level the model considers.
const MAX_POSSIBLE_MIP_LEVEL: i32 = MAX_MIP_LEVELS as i32 - 1;

/// Block arrangement understood by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefSwizzle {
    /// Linear.
    L,
    /// 2D blocks.
    D2d,
    /// 3D blocks.
    S3d,
}

/// Surface parameters in the form the model works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddrParams {
    /// Block arrangement.
    pub sw: RefSwizzle,
    /// Log2 of the element size in bytes.
    pub bpp_log2: i32,
    /// Log2 of the sample count.
    pub num_samples_log2: i32,
    /// Log2 of the block size used for slices.
    pub slice_block_size_log2: i32,
    /// Log2 of the block size used for pitch.
    pub pitch_block_size_log2: i32,
    /// Width of mip 0 in elements.
    pub width: i32,
    /// Height of mip 0 in elements.
    pub height: i32,
    /// Index of the last mip level.
    pub maxmip: i32,
}

impl AddrParams {
    /// Describes a surface of the given mode.
    pub fn new(
        mode: SwizzleMode,
        bpp_log2: u32,
        num_samples_log2: u32,
        width: u32,
        height: u32,
        num_mips: u32,
    ) -> Self {
        let sw = if mode.is_linear() {
            RefSwizzle::L
        } else if mode.is_3d() {
            RefSwizzle::S3d
        } else {
            RefSwizzle::D2d
        };
        Self {
            sw,
            bpp_log2: bpp_log2 as i32,
            num_samples_log2: num_samples_log2 as i32,
            slice_block_size_log2: mode.block_size_log2(false) as i32,
            pitch_block_size_log2: mode.block_size_log2(false) as i32,
            width: width as i32,
            height: height as i32,
            maxmip: num_mips.max(1) as i32 - 1,
        }
    }
}

/// Log2 extent of a block of `block_size_log2` bytes.
pub fn calc_block_size(p: &AddrParams, block_size_log2: i32) -> (i32, i32, i32) {
    match p.sw {
        RefSwizzle::L => (block_size_log2 - p.bpp_log2, 0, 0),
        RefSwizzle::D2d => {
            let half = block_size_log2 >> 1;
            let s = p.num_samples_log2;
            (
                half - (p.bpp_log2 >> 1) - (s >> 1) - (p.bpp_log2 & s & 1),
                half - (p.bpp_log2 >> 1) - (s >> 1) - ((p.bpp_log2 | s) & 1),
                0,
            )
        }
        RefSwizzle::S3d => {
            let base = block_size_log2 / 3 - p.bpp_log2 / 3;
            let (mut x, y, mut z) = (base, base, base);
            if block_size_log2 % 3 > 0 {
                x += 1;
            }
            if block_size_log2 % 3 > 1 {
                z += 1;
            }
            if p.bpp_log2 % 3 > 0 {
                x -= 1;
            }
            if p.bpp_log2 % 3 > 1 {
                z -= 1;
            }
            (x, y, z)
        }
    }
}

/// Log2 extent of the slice block.
pub fn block_size_slice(p: &AddrParams) -> (i32, i32, i32) {
    calc_block_size(p, p.slice_block_size_log2)
}

/// Log2 extent of the pitch block.
pub fn block_size_pitch(p: &AddrParams) -> (i32, i32, i32) {
    calc_block_size(p, p.pitch_block_size_log2)
}

/// Log2 width and height of the largest mip that fits into the tail.
pub fn mip_in_tail_max_size(p: &AddrParams) -> (i32, i32) {
    let (mut w, mut h, _) = block_size_slice(p);
    if p.sw == RefSwizzle::S3d {
        match p.slice_block_size_log2 % 3 {
            0 => h -= 1,
            _ => w -= 1,
        }
    } else if p.slice_block_size_log2 % 2 == 0 {
        w -= 1;
    } else {
        h -= 1;
    }
    (w, h)
}

/// `ceil(a / 2^b)` on signed values.
#[inline]
fn shift_ceil(a: i32, b: i32) -> i32 {
    let mask = !(!0i32 << b);
    (a >> b) + ((a & mask) != 0) as i32
}

/// Extent of mip `mip`, rounded up.
pub fn mip_size_2d(p: &AddrParams, mip: i32) -> (i32, i32) {
    let width = if p.width <= 0 { 1 } else { p.width };
    let height = if p.height <= 0 { 1 } else { p.height };
    (shift_ceil(width, mip), shift_ceil(height, mip))
}

/// Position of `mip` inside the tail, or [`MIP_NOT_IN_TAIL`].
pub fn calc_mip_in_tail(p: &AddrParams, mip: i32, first_mip_in_tail: i32) -> i32 {
    let mip_in_tail = mip - first_mip_in_tail;
    if mip_in_tail < 0 || p.maxmip == 0 || p.slice_block_size_log2 <= 8 {
        MIP_NOT_IN_TAIL
    } else {
        mip_in_tail
    }
}

/// Maximum number of mips sharing the tail block.
pub fn num_mips_in_tail(p: &AddrParams) -> i32 {
    let blk = p.slice_block_size_log2;
    let effective = if p.sw == RefSwizzle::S3d {
        blk - (blk - 8) / 3
    } else {
        blk
    };

    if effective <= 8 {
        1
    } else if effective <= 11 {
        1 + (1 << (effective - 9))
    } else {
        effective - 11 + 7
    }
}

/// Result of [`mip_offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipOffset {
    /// Byte offset of the mip within one slice of the chain.
    pub data_offset: i64,
    /// Position inside the tail, or [`MIP_NOT_IN_TAIL`].
    pub mip_in_tail: i32,
    /// Bytes of one slice of the whole chain.
    pub data_chain_size: i64,
    /// First mip packed into the tail.
    pub first_mip_in_tail: i32,
}

/// Lays out the chain in whole blocks, tail first, and returns where `mip`
/// lands.
///
/// Block counts are derived from the tail upwards: a mip covers four times
/// the blocks of the next smaller one, minus the row and column that do not
/// exist when its block extent is odd.
pub fn mip_offset(p: &AddrParams, mip: i32) -> MipOffset {
    let (block_width_log2, block_height_log2, _) = block_size_slice(p);
    let mut mip_block_width = [0i64; MAX_MIP_LEVELS];
    let mut mip_block_height = [0i64; MAX_MIP_LEVELS];

    let mut first_mip_in_tail = p.maxmip;
    let tail_mips = num_mips_in_tail(p);
    let (tail_width_log2, tail_height_log2) = mip_in_tail_max_size(p);

    for i in (0..=MAX_POSSIBLE_MIP_LEVEL).rev() {
        let (w, h) = mip_size_2d(p, i);
        if w <= (1 << tail_width_log2) && h <= (1 << tail_height_log2) && p.maxmip - i < tail_mips
        {
            first_mip_in_tail = i;
        }
        mip_block_width[i as usize] = shift_ceil(w, block_width_log2) as i64;
        mip_block_height[i as usize] = shift_ceil(h, block_height_log2) as i64;
    }

    let mip_in_tail = calc_mip_in_tail(p, mip, first_mip_in_tail);

    let mut last_mip_size = 1i64;
    let mut data_offset = 0i64;
    let mut data_chain_size = 0i64;

    let mut i = first_mip_in_tail - 1;
    while i >= -1 {
        if i < p.maxmip {
            if i >= mip {
                data_offset += last_mip_size;
            }
            data_chain_size += last_mip_size;
        }

        if i >= 0 {
            let bw = mip_block_width[i as usize];
            let bh = mip_block_height[i as usize];
            last_mip_size = 4 * last_mip_size
                - if bw & 1 != 0 { bh } else { 0 }
                - if bh & 1 != 0 { bw } else { 0 }
                - (bw & bh & 1);
        }
        i -= 1;
    }

    MipOffset {
        data_offset: data_offset << p.slice_block_size_log2,
        mip_in_tail,
        data_chain_size: data_chain_size << p.slice_block_size_log2,
        first_mip_in_tail,
    }
}

/// Byte offset of a tail mip inside the tail block.
pub fn calc_byte_offset(p: &AddrParams, mip_in_tail: i32) -> i32 {
    let m = (num_mips_in_tail(p) - 1 - mip_in_tail).max(0);
    if m > 6 {
        16 << m
    } else {
        m << 8
    }
}

/// Log2 extent of the 256 byte micro block.
pub fn micro_block_size(p: &AddrParams) -> (i32, i32, i32) {
    let bits = 8 - p.bpp_log2;
    match p.sw {
        RefSwizzle::L => (bits, 0, 0),
        RefSwizzle::D2d => ((bits >> 1) + (bits & 1), bits >> 1, 0),
        RefSwizzle::S3d => (
            bits / 3 + (bits % 3 > 1) as i32,
            bits / 3,
            bits / 3 + (bits % 3 > 0) as i32,
        ),
    }
}

/// Element coordinates of a tail mip inside the tail block.
pub fn mip_origin(p: &AddrParams, mip_in_tail: i32) -> (i32, i32, i32) {
    let offset = calc_byte_offset(p, mip_in_tail);
    let (mut x, mut y) = (0, 0);
    match p.sw {
        RefSwizzle::D2d | RefSwizzle::S3d => {
            for bit in 0..6 {
                x |= (offset >> (9 + bit)) & (1 << bit);
                y |= (offset >> (8 + bit)) & (1 << bit);
            }
        }
        RefSwizzle::L => x = offset >> 8,
    }

    let (uw, uh, _) = micro_block_size(p);
    (x << uw, y << uh, 0)
}

/// Offset coordinates and tail origin of an element: `(offset, origin)`.
pub fn xyz_offsets(
    p: &AddrParams,
    x: i32,
    y: i32,
    z: i32,
    mip_in_tail: i32,
) -> ((i32, i32, i32), (i32, i32, i32)) {
    let origin = mip_origin(p, mip_in_tail);
    ((x + origin.0, y + origin.1, z + origin.2), origin)
}

/// Macro block indices `(z, yx)` of an element.
///
/// `pitch_in_elements` is the mip pitch and `slice_in_elements` the element
/// count of one slice.
pub fn xyz_block_indexes(
    p: &AddrParams,
    x: i32,
    y: i32,
    z: i32,
    mip_in_tail: i32,
    pitch_in_elements: i32,
    slice_in_elements: i64,
) -> (i64, i64) {
    let (sw_log2, sh_log2, sd_log2) = block_size_slice(p);
    let (pw_log2, ph_log2, _) = block_size_pitch(p);
    let ((x_offset, y_offset, z_offset), _) = xyz_offsets(p, x, y, z, mip_in_tail);

    let pitch_in_macro_blocks = (pitch_in_elements >> pw_log2) as i64;
    let slice_in_macro_blocks = (slice_in_elements >> sh_log2) >> sw_log2;

    let x_block_units = (x_offset >> pw_log2) as i64;
    let y_block_units = (y_offset >> ph_log2) as i64;
    let z_block_units = (z_offset >> sd_log2) as i64;

    (
        slice_in_macro_blocks * z_block_units,
        pitch_in_macro_blocks * y_block_units + x_block_units,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{calc_block_size_log2, max_num_mips_in_tail, micro_block_size as fast_micro};
    use crate::test_prelude::*;

    fn params(mode: SwizzleMode, bpp_log2: u32, width: u32, height: u32, mips: u32) -> AddrParams {
        AddrParams::new(mode, bpp_log2, 0, width, height, mips)
    }

    #[test]
    fn agrees_with_block_engine() {
        for mode in SwizzleMode::all_values().iter().copied() {
            for bpp_log2 in 0..5 {
                let p = params(mode, bpp_log2, 64, 64, 1);
                let fast = calc_block_size_log2(mode, mode.block_size_log2(false), bpp_log2, 0);
                let (w, h, d) = block_size_slice(&p);
                assert_eq!((w as u32, h as u32, d as u32), (fast.width, fast.height, fast.depth));
                assert_eq!(num_mips_in_tail(&p) as u32, max_num_mips_in_tail(mode));

                let micro = fast_micro(mode, bpp_log2);
                let (uw, uh, ud) = micro_block_size(&p);
                assert_eq!((1 << uw, 1 << uh, 1 << ud), (micro.width, micro.height, micro.depth));
            }
        }
    }

    #[test]
    fn chain_of_2048_surface() {
        // 64KB 2D, 32bpp: 128x128 blocks, tail holds mips of at most 64x128.
        let p = params(SwizzleMode::Sw64Kb2d, 2, 2048, 2048, 8);
        let base = mip_offset(&p, 0);
        assert_eq!(base.first_mip_in_tail, 5);
        assert_eq!(base.mip_in_tail, MIP_NOT_IN_TAIL);
        // 256 + 64 + 16 + 4 + 1 blocks for mips 0-4, plus the tail block.
        assert_eq!(base.data_chain_size, (256 + 64 + 16 + 4 + 1 + 1) << 16);
        assert_eq!(base.data_offset, (64 + 16 + 4 + 1 + 1) << 16);

        let tail = mip_offset(&p, 6);
        assert_eq!(tail.mip_in_tail, 1);
        assert_eq!(tail.data_offset, 0);
    }

    #[test]
    fn odd_block_counts_shrink_the_chain() {
        // 3x3 blocks at mip 0 of a 4KB 32bpp surface, 2x2 at mip 1.
        let p = params(SwizzleMode::Sw4Kb2d, 2, 96, 96, 2);
        let result = mip_offset(&p, 0);
        // Mip 3 would be the first to fit; the chain simply ends before it.
        assert_eq!(result.first_mip_in_tail, 3);
        assert_eq!(result.data_chain_size, (9 + 4) << 12);
    }

    #[rstest]
    #[case(11, 0, (0, 0))]
    #[case(10, 1, (0, 8))]
    #[case(9, 2, (8, 0))]
    #[case(8, 3, (8, 8))]
    #[case(0, 11, (64, 0))]
    fn tail_origins_of_64kb_2d(#[case] mip_in_tail: i32, #[case] m: i32, #[case] origin: (i32, i32)) {
        let p = params(SwizzleMode::Sw64Kb2d, 2, 1, 1, 12);
        let expected = if m > 6 { 16 << m } else { m << 8 };
        assert_eq!(calc_byte_offset(&p, mip_in_tail), expected);
        let (x, y, z) = mip_origin(&p, mip_in_tail);
        assert_eq!((x, y, z), (origin.0, origin.1, 0));
    }

    #[test]
    fn block_indexes_of_an_element() {
        let p = params(SwizzleMode::Sw4Kb2d, 2, 128, 128, 1);
        let (z, yx) = xyz_block_indexes(&p, 70, 40, 0, MIP_NOT_IN_TAIL, 128, 128 * 128);
        assert_eq!(z, 0);
        assert_eq!(yx, 4 + 2);
    }
}
