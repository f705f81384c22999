//! Block and mip tail geometry.
//!
//! A swizzle block holds `2^blockSizeLog2` bytes. Its shape in elements
//! follows from how many address bits each axis receives. Mips small enough
//! to fit inside half a block are packed into a single "tail" block.

use crate::swizzle_mode::{SwizzleMode, LOG2_SIZE_256, SWIZZLE_MODE_COUNT};
use gpu_addrlib_common::types::Extent3d;

/// Number of MSAA rates (1, 2, 4 and 8 samples).
pub const MAX_MSAA_RATE_LOG2: usize = 4;

/// Number of element sizes (1 to 16 bytes).
pub const MAX_ELEMENT_BYTES_LOG2: usize = 5;

/// Maximum number of mip levels of a surface.
pub const MAX_MIP_LEVELS: usize = 16;

/// Number of address bits given to each axis of a block.
///
/// Returns log2 extents. Linear blocks are one row; 2D blocks split the
/// element bits between x and y (x receives the odd bit); 3D blocks spread
/// them over x, y and z.
pub fn calc_block_size_log2(
    mode: SwizzleMode,
    block_size_log2: u32,
    bpp_log2: u32,
    samples_log2: u32,
) -> Extent3d {
    if mode.is_linear() {
        return Extent3d::new(block_size_log2 - bpp_log2, 0, 0);
    }

    if mode.is_3d() {
        let base = block_size_log2 / 3 - bpp_log2 / 3;
        let mut width = base;
        let height = base;
        let mut depth = base;

        if block_size_log2 % 3 > 0 {
            width += 1;
        }
        if block_size_log2 % 3 > 1 {
            depth += 1;
        }
        if bpp_log2 % 3 > 0 {
            width -= 1;
        }
        if bpp_log2 % 3 > 1 {
            depth -= 1;
        }
        return Extent3d::new(width, height, depth);
    }

    let half = block_size_log2 >> 1;
    let width = half - (bpp_log2 >> 1) - (samples_log2 >> 1) - (bpp_log2 & samples_log2 & 1);
    let height = half - (bpp_log2 >> 1) - (samples_log2 >> 1) - ((bpp_log2 | samples_log2) & 1);
    Extent3d::new(width, height, 0)
}

/// Block extent in elements. See [`calc_block_size_log2`].
pub fn calc_block_size(mode: SwizzleMode, bpp_log2: u32, samples_log2: u32) -> Extent3d {
    let log2 = calc_block_size_log2(mode, mode.block_size_log2(false), bpp_log2, samples_log2);
    Extent3d::new(1 << log2.width, 1 << log2.height, 1 << log2.depth)
}

/// Extent of the 256 byte micro block in elements.
pub fn micro_block_size(mode: SwizzleMode, bpp_log2: u32) -> Extent3d {
    let bits = LOG2_SIZE_256 - bpp_log2;
    let (w, h, d) = if mode.is_linear() {
        (bits, 0, 0)
    } else if mode.is_2d() {
        ((bits >> 1) + (bits & 1), bits >> 1, 0)
    } else {
        (
            bits / 3 + (bits % 3 > 1) as u32,
            bits / 3,
            bits / 3 + (bits % 3 > 0) as u32,
        )
    };
    Extent3d::new(1 << w, 1 << h, 1 << d)
}

/// Largest extent of a mip that still fits into the tail block.
///
/// One axis of the block is halved: the one that received the most recent
/// address bit.
pub fn mip_in_tail_max_size(mode: SwizzleMode, block: Extent3d) -> Extent3d {
    let blk = mode.block_size_log2(false);
    let mut dim = block;

    if mode.is_3d() {
        match blk % 3 {
            0 => dim.height >>= 1,
            1 => dim.width >>= 1,
            _ => dim.depth >>= 1,
        }
    } else if blk & 1 == 0 {
        dim.width >>= 1;
    } else {
        dim.height >>= 1;
    }
    dim
}

/// Maximum number of mips packed into one tail block.
pub fn max_num_mips_in_tail(mode: SwizzleMode) -> u32 {
    let blk = mode.block_size_log2(false);
    let effective = if mode.is_3d() {
        blk - (blk - LOG2_SIZE_256) / 3
    } else {
        blk
    };

    if effective <= LOG2_SIZE_256 {
        1
    } else if effective <= 11 {
        1 + (1 << (effective - 9))
    } else {
        effective - 4
    }
}

/// Block extents per swizzle mode, MSAA rate and element size.
///
/// Built once when the library is constructed. MSAA rates only apply to 2D
/// modes; the other modes fill the single sample row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDimensionTable {
    dims: [[[Extent3d; MAX_ELEMENT_BYTES_LOG2]; MAX_MSAA_RATE_LOG2]; SWIZZLE_MODE_COUNT],
}

impl BlockDimensionTable {
    /// Computes the extents of every combination.
    pub fn new() -> Self {
        let mut dims = [[[Extent3d::default(); MAX_ELEMENT_BYTES_LOG2]; MAX_MSAA_RATE_LOG2];
            SWIZZLE_MODE_COUNT];

        for mode in SwizzleMode::all_values().iter().copied() {
            let max_msaa = if mode.is_2d() { MAX_MSAA_RATE_LOG2 } else { 1 };
            for (msaa_log2, row) in dims[mode.index()].iter_mut().take(max_msaa).enumerate() {
                for (elem_log2, entry) in row.iter_mut().enumerate() {
                    *entry = calc_block_size(mode, elem_log2 as u32, msaa_log2 as u32);
                }
            }
        }

        Self { dims }
    }

    /// Extent of one block, in elements.
    #[inline]
    pub fn get(&self, mode: SwizzleMode, samples_log2: u32, elem_log2: u32) -> Extent3d {
        let samples_log2 = if mode.is_2d() { samples_log2 } else { 0 };
        self.dims[mode.index()][samples_log2 as usize][elem_log2 as usize]
    }
}

impl Default for BlockDimensionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(SwizzleMode::Linear, 2, 0, (64, 1, 1))]
    #[case(SwizzleMode::Sw256B2d, 2, 0, (8, 8, 1))]
    #[case(SwizzleMode::Sw256B2d, 0, 0, (16, 16, 1))]
    #[case(SwizzleMode::Sw4Kb2d, 2, 0, (32, 32, 1))]
    #[case(SwizzleMode::Sw4Kb2d, 3, 0, (32, 16, 1))]
    #[case(SwizzleMode::Sw64Kb2d, 2, 0, (128, 128, 1))]
    #[case(SwizzleMode::Sw64Kb2d, 2, 2, (64, 64, 1))]
    #[case(SwizzleMode::Sw64Kb2d, 2, 3, (64, 32, 1))]
    #[case(SwizzleMode::Sw256Kb2d, 4, 0, (128, 128, 1))]
    #[case(SwizzleMode::Sw4Kb3d, 0, 0, (16, 16, 16))]
    #[case(SwizzleMode::Sw64Kb3d, 0, 0, (64, 32, 32))]
    #[case(SwizzleMode::Sw64Kb3d, 2, 0, (32, 32, 16))]
    #[case(SwizzleMode::Sw256Kb3d, 4, 0, (16, 32, 32))]
    fn block_extents(
        #[case] mode: SwizzleMode,
        #[case] elem_log2: u32,
        #[case] samples_log2: u32,
        #[case] expected: (u32, u32, u32),
    ) {
        let table = BlockDimensionTable::new();
        let extent = table.get(mode, samples_log2, elem_log2);
        assert_eq!((extent.width, extent.height, extent.depth), expected);
    }

    #[test]
    fn block_bits_add_up() {
        for mode in SwizzleMode::all_values().iter().copied().filter(|m| !m.is_linear()) {
            let blk = mode.block_size_log2(false);
            let max_msaa = if mode.is_2d() { 4 } else { 1 };
            for samples_log2 in 0..max_msaa {
                for elem_log2 in 0..5 {
                    let e = calc_block_size_log2(mode, blk, elem_log2, samples_log2);
                    assert_eq!(e.width + e.height + e.depth, blk - elem_log2 - samples_log2);
                }
            }
        }
    }

    #[rstest]
    #[case(SwizzleMode::Linear, 0, (256, 1, 1))]
    #[case(SwizzleMode::Sw4Kb2d, 2, (8, 8, 1))]
    #[case(SwizzleMode::Sw4Kb2d, 3, (8, 4, 1))]
    #[case(SwizzleMode::Sw64Kb3d, 0, (8, 4, 8))]
    #[case(SwizzleMode::Sw64Kb3d, 2, (4, 4, 4))]
    fn micro_blocks(#[case] mode: SwizzleMode, #[case] elem_log2: u32, #[case] expected: (u32, u32, u32)) {
        let e = micro_block_size(mode, elem_log2);
        assert_eq!((e.width, e.height, e.depth), expected);
    }

    #[rstest]
    #[case(SwizzleMode::Sw256B2d, 1)]
    #[case(SwizzleMode::Sw4Kb2d, 8)]
    #[case(SwizzleMode::Sw64Kb2d, 12)]
    #[case(SwizzleMode::Sw256Kb2d, 14)]
    #[case(SwizzleMode::Sw4Kb3d, 5)]
    #[case(SwizzleMode::Sw64Kb3d, 10)]
    #[case(SwizzleMode::Sw256Kb3d, 11)]
    fn mips_in_tail(#[case] mode: SwizzleMode, #[case] expected: u32) {
        assert_eq!(max_num_mips_in_tail(mode), expected);
    }

    #[test]
    fn tail_halves_one_axis() {
        let table = BlockDimensionTable::new();
        let tail = mip_in_tail_max_size(SwizzleMode::Sw64Kb2d, table.get(SwizzleMode::Sw64Kb2d, 0, 2));
        assert_eq!(tail, Extent3d::new(64, 128, 1));
        let tail = mip_in_tail_max_size(SwizzleMode::Sw4Kb3d, table.get(SwizzleMode::Sw4Kb3d, 0, 0));
        assert_eq!(tail, Extent3d::new(16, 8, 16));
        let tail = mip_in_tail_max_size(SwizzleMode::Sw256Kb3d, table.get(SwizzleMode::Sw256Kb3d, 0, 0));
        assert_eq!(tail, Extent3d::new(64, 32, 64));
    }
}
