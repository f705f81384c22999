//! Mip chain layout.
//!
//! Mips are stored smallest first. For tiled surfaces, every mip that fits
//! into the tail shares one block placed at the very start of the chain;
//! the remaining mips follow it in order of increasing size. Linear chains
//! have no tail.

use crate::block::{max_num_mips_in_tail, micro_block_size, mip_in_tail_max_size, MAX_MIP_LEVELS};
use crate::surface::{SurfaceInfoInput, SurfaceInfoOutput};
use crate::swizzle_mode::{SwizzleMode, LOG2_SIZE_256};
use gpu_addrlib_common::math::{pow_two_align, pow_two_align_u64};
use gpu_addrlib_common::types::Extent3d;

/// Sentinel for mips that are not in the tail.
pub const MIP_NOT_IN_TAIL: u32 = MAX_MIP_LEVELS as u32;

/// Layout of one mip level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MipInfo {
    /// Row pitch in elements.
    pub pitch: u32,
    /// Pitch the slice size is computed from. Differs from `pitch` only for
    /// linear surfaces.
    pub pitch_for_slice: u32,
    /// Height in elements, block aligned.
    pub height: u32,
    /// Depth in elements, block aligned.
    pub depth: u32,
    /// Pitch in pixels of the original format.
    pub pixel_pitch: u32,
    /// Height in pixels of the original format.
    pub pixel_height: u32,
    /// Offset of the mip from the start of the surface.
    pub offset: u64,
    /// Offset of the mip's first block within one hardware slice.
    pub macro_block_offset: u64,
    /// Offset inside the tail block, for mips in the tail.
    pub mip_tail_offset: u32,
    /// X of the mip's origin inside the tail block, in elements.
    pub mip_tail_coord_x: u32,
    /// Y of the mip's origin inside the tail block, in elements.
    pub mip_tail_coord_y: u32,
    /// Z of the mip's origin inside the tail block, in elements.
    pub mip_tail_coord_z: u32,
}

/// Extent of `mip`, never below one element.
#[inline]
pub fn mip_extent(base: Extent3d, mip: u32) -> Extent3d {
    Extent3d::new(
        (base.width >> mip).max(1),
        (base.height >> mip).max(1),
        (base.depth >> mip).max(1),
    )
}

/// Whether a mip of `extent` with `mips_to_end` mips from it to the end of
/// the chain (itself included) goes into the tail.
///
/// Only width and height are compared.
#[inline]
pub fn is_in_mip_tail(
    tail_max_dim: Extent3d,
    extent: Extent3d,
    max_mips_in_tail: u32,
    mips_to_end: u32,
) -> bool {
    extent.width <= tail_max_dim.width
        && extent.height <= tail_max_dim.height
        && mips_to_end <= max_mips_in_tail
}

/// Position of `mip` inside the tail, or [`MIP_NOT_IN_TAIL`].
pub fn calc_mip_in_tail(
    mode: SwizzleMode,
    num_mip_levels: u32,
    first_mip_in_tail: u32,
    mip: u32,
) -> u32 {
    if num_mip_levels == 1 || mode.block_size_log2(false) <= LOG2_SIZE_256 || mip < first_mip_in_tail
    {
        return MIP_NOT_IN_TAIL;
    }
    mip - first_mip_in_tail
}

/// Byte offset of the `mip_in_tail`-th tail mip inside the tail block.
///
/// The smallest mips sit in the first 256 byte micro blocks; the largest
/// ones take power of two sized regions at the end.
pub fn calc_mip_offset(mode: SwizzleMode, mip_in_tail: u32) -> u32 {
    let max_mips_in_tail = max_num_mips_in_tail(mode) as i32;
    let m = (max_mips_in_tail - 1 - mip_in_tail as i32).max(0) as u32;
    if m > 6 {
        16 << m
    } else {
        m << 8
    }
}

/// Origin of a tail mip inside the tail block, in elements.
///
/// The offset is split into micro blocks whose index bits alternate between
/// y (even) and x (odd).
pub fn mip_tail_origin(mode: SwizzleMode, elem_log2: u32, mip_offset: u32) -> Extent3d {
    if mode.is_linear() {
        return Extent3d::new(mip_offset >> 8, 0, 0);
    }

    let micro = micro_block_size(mode, elem_log2);
    let mut x = 0;
    let mut y = 0;
    for bit in 0..6 {
        x |= (mip_offset >> (9 + bit)) & (1 << bit);
        y |= (mip_offset >> (8 + bit)) & (1 << bit);
    }
    Extent3d::new(x * micro.width, y * micro.height, 0)
}

/// Largest mip extent that fits into the tail of this surface.
#[inline]
pub(crate) fn tail_max_dim(mode: SwizzleMode, block: Extent3d) -> Extent3d {
    mip_in_tail_max_size(mode, block)
}

/// Fills the mip chain of `out`.
///
/// Expects `out.block_extent`, `out.num_slices` and, for surfaces with a
/// custom pitch or height, `out.pitch` and `out.height` to be set.
pub(crate) fn compute_mip_chain(input: &SurfaceInfoInput, out: &mut SurfaceInfoOutput) {
    let mode = input.swizzle_mode;
    let bytes_per_elem = input.bpp >> 3;
    let block_size = mode.block_size(false);
    let block = out.block_extent;
    let tail_dim = tail_max_dim(mode, block);
    let base = input.base_mip_extents();
    let max_mips_in_tail = max_num_mips_in_tail(mode);
    let is_linear = mode.is_linear();
    let custom_pitch = input.use_custom_pitch();
    let custom_height = input.use_custom_height();
    let can_trim = input.can_trim_linear_padding();
    let num_mips = input.num_mip_levels;

    let mut first_mip_in_tail = num_mips;
    let mut chain_slice_size = 0u64;
    let mut chain_slice_size_dense = 0u64;
    let mut mip_size = [0u64; MAX_MIP_LEVELS];
    let mut mip_slice_size = [0u64; MAX_MIP_LEVELS];

    for mip in 0..num_mips {
        let extent = mip_extent(base, mip);
        if mode.supports_mip_tail()
            && num_mips > 1
            && is_in_mip_tail(tail_dim, extent, max_mips_in_tail, num_mips - mip)
        {
            first_mip_in_tail = mip;
            chain_slice_size += (block_size / block.depth) as u64;
            chain_slice_size_dense += (block_size / block.depth) as u64;
            break;
        }

        let (pitch_img, mut pitch_slice) = if is_linear {
            // Rendering pitch is 128 byte aligned, slices are sized as if the
            // pitch were block aligned.
            let pitch = if custom_pitch {
                out.pitch
            } else {
                pow_two_align(extent.width, 128 / bytes_per_elem)
            };
            (pitch, pow_two_align(pitch, block_size / bytes_per_elem))
        } else {
            let pitch = pow_two_align(extent.width, block.width);
            (pitch, pitch)
        };

        let mut height = if custom_height {
            out.height
        } else {
            pow_two_align(extent.height, block.height)
        };
        let depth = pow_two_align(extent.depth, block.depth);

        if is_linear && input.flags.dense_slice_exact() && pitch_img % block_size != 0 {
            height = pow_two_align(height, block_size / 128);
        }

        let size_except_pitch = height as u64 * input.num_samples as u64 * bytes_per_elem as u64;
        let mut slice_size = pitch_slice as u64 * size_except_pitch;
        let slice_data_size =
            pow_two_align_u64(pitch_img as u64 * size_except_pitch, block_size as u64);
        let mut hw_slice_size = slice_size * block.depth as u64;
        debug_assert_eq!(pow_two_align_u64(hw_slice_size, block_size as u64), hw_slice_size);

        if mip == 0 && can_trim {
            // Nothing follows the data of a single slice linear surface.
            pitch_slice = pitch_img;
            slice_size = if custom_height {
                input.slice_align as u64
            } else {
                slice_data_size
            };
            hw_slice_size = slice_size;
        }

        mip_size[mip as usize] = slice_size * depth as u64;
        mip_slice_size[mip as usize] = hw_slice_size;
        chain_slice_size += slice_size;
        chain_slice_size_dense += if mip == 0 { slice_data_size } else { slice_size };

        let info = &mut out.mip_info[mip as usize];
        info.pitch = pitch_img;
        info.pitch_for_slice = pitch_slice;
        info.height = height;
        info.depth = depth;
    }

    out.slice_size = chain_slice_size;
    out.slice_size_dense_packed = chain_slice_size_dense;
    out.surf_size = chain_slice_size * out.num_slices as u64;
    out.mip_chain_in_tail = first_mip_in_tail == 0;
    out.first_mip_id_in_tail = first_mip_in_tail;

    if is_linear {
        debug_assert_eq!(first_mip_in_tail, num_mips);
        let mut offset = 0u64;
        for mip in (0..num_mips as usize).rev() {
            let info = &mut out.mip_info[mip];
            info.offset = offset;
            info.macro_block_offset = offset;
            info.mip_tail_offset = 0;
            offset += mip_slice_size[mip];
        }
        return;
    }

    let mut offset = 0u64;
    let mut macro_block_offset = 0u64;
    if first_mip_in_tail != num_mips {
        let first_in_tail = mip_extent(base, first_mip_in_tail);
        // With 2D modes on volumes every slice of the tail mip is a block.
        let hw_slices = pow_two_align(first_in_tail.depth, block.depth) / block.depth;
        offset = block_size as u64 * hw_slices as u64;
        macro_block_offset = block_size as u64;
        layout_mip_tail(input, out, first_in_tail);
    }

    for mip in (0..first_mip_in_tail as usize).rev() {
        let info = &mut out.mip_info[mip];
        info.offset = offset;
        info.macro_block_offset = macro_block_offset;
        info.mip_tail_offset = 0;
        offset += mip_size[mip];
        macro_block_offset += mip_slice_size[mip];
    }
}

/// Places the mips of the tail inside the tail block.
fn layout_mip_tail(input: &SurfaceInfoInput, out: &mut SurfaceInfoOutput, first_in_tail: Extent3d) {
    let mode = input.swizzle_mode;
    let elem_log2 = input.elem_log2();
    let is_3d = input.is_tex3d();
    let micro = micro_block_size(mode, elem_log2);
    let tail_dim = tail_max_dim(mode, out.block_extent);

    let mut pitch = tail_dim.width;
    let mut height = tail_dim.height;
    let mut depth = if is_3d {
        pow_two_align(first_in_tail.depth, micro.depth)
    } else {
        1
    };
    let tail_max_depth = if is_3d { depth / micro.depth } else { 1 };

    for mip in out.first_mip_id_in_tail..input.num_mip_levels {
        let mip_in_tail = calc_mip_in_tail(mode, input.num_mip_levels, out.first_mip_id_in_tail, mip);
        let mip_offset = calc_mip_offset(mode, mip_in_tail);
        let origin = mip_tail_origin(mode, elem_log2, mip_offset);

        let info = &mut out.mip_info[mip as usize];
        info.offset = mip_offset as u64 * tail_max_depth as u64;
        info.mip_tail_offset = mip_offset;
        info.macro_block_offset = 0;
        info.mip_tail_coord_x = origin.width;
        info.mip_tail_coord_y = origin.height;
        info.mip_tail_coord_z = origin.depth;

        info.pitch = pow_two_align(pitch, micro.width);
        info.pitch_for_slice = info.pitch;
        info.height = pow_two_align(height, micro.height);
        info.depth = pow_two_align(depth, micro.depth);
        pitch = (pitch >> 1).max(1);
        height = (height >> 1).max(1);
        depth = (depth >> 1).max(1);
    }
}
