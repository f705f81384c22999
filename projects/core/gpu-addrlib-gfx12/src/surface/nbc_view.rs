use crate::block::MAX_MIP_LEVELS;
use crate::gfx12_lib::Gfx12Lib;
use crate::surface::{SlicePipeBankXorInput, SurfaceInfoInput};
use crate::swizzle_mode::SwizzleMode;
use gpu_addrlib_common::format::ElemFormat;
use gpu_addrlib_common::math::{pow_two_align, round_up_quotient, shift_ceil, shift_right};
use gpu_addrlib_common::types::{Extent3d, ResourceType, SurfaceFlags};
use gpu_addrlib_common::AddrError;

/// Input of [`Gfx12Lib::compute_non_block_compressed_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NbcViewInput {
    /// Usage flags of the compressed surface.
    pub flags: SurfaceFlags,
    /// Tiling scheme.
    pub swizzle_mode: SwizzleMode,
    /// Dimensionality.
    pub resource_type: ResourceType,
    /// Compressed format of the surface.
    pub format: ElemFormat,
    /// Size of mip 0 in texels, and slice count.
    pub unaligned_dims: Extent3d,
    /// Number of mip levels.
    pub num_mip_levels: u32,
    /// Pipe/bank xor of the compressed surface.
    pub pipe_bank_xor: u32,
    /// Slice to view.
    pub slice: u32,
    /// Mip to view.
    pub mip: u32,
}

/// An uncompressed view of one mip and slice of a compressed surface.
///
/// Creating a surface of `unaligned_dims` with `num_mip_levels` mips at
/// `offset` and viewing mip `mip_id` addresses the same memory as the
/// requested sub-resource, one element per compressed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NbcViewOutput {
    /// Byte offset of the view from the surface base.
    pub offset: u64,
    /// Pipe/bank xor of the view.
    pub pipe_bank_xor: u32,
    /// Size of mip 0 of the view, in elements.
    pub unaligned_dims: Extent3d,
    /// Mip of the view holding the requested data.
    pub mip_id: u32,
    /// Mips of the view.
    pub num_mip_levels: u32,
}

impl Gfx12Lib {
    /// Views one sub-resource of a block compressed surface as an
    /// uncompressed surface of the compressed block size.
    ///
    /// # Errors
    ///
    /// - [`AddrError::NotSupported`] for formats that are not block
    ///   compressed.
    /// - [`AddrError::InvalidParams`] when `mip` is out of range.
    pub fn compute_non_block_compressed_view(
        &self,
        input: &NbcViewInput,
    ) -> Result<NbcViewOutput, AddrError> {
        if !input.format.is_block_compressed() {
            return Err(AddrError::NotSupported("views of uncompressed formats"));
        }

        let (bc_width, bc_height) = input.format.block_footprint();
        let dims = input.unaligned_dims;
        let info_in = SurfaceInfoInput {
            flags: input.flags,
            swizzle_mode: input.swizzle_mode,
            resource_type: input.resource_type,
            format: None,
            bpp: input.format.bits_per_element(),
            width: round_up_quotient(dims.width, bc_width).max(1),
            height: round_up_quotient(dims.height, bc_height).max(1),
            num_slices: dims.depth.max(1),
            num_mip_levels: input.num_mip_levels.max(1),
            num_samples: 1,
            ..Default::default()
        };
        if input.mip >= info_in.num_mip_levels || info_in.num_mip_levels as usize > MAX_MIP_LEVELS {
            return Err(AddrError::InvalidParams("mip out of range"));
        }

        let info = self.compute_surface_info_unchecked(&info_in)?;
        let mip = input.mip;
        let offset = input.slice as u64 * info.slice_size + info.mip_info[mip as usize].macro_block_offset;
        let pipe_bank_xor = self.compute_slice_pipe_bank_xor(&SlicePipeBankXorInput {
            swizzle_mode: input.swizzle_mode,
            bpe: info_in.bpp,
            slice: input.slice,
            base_pipe_bank_xor: input.pipe_bank_xor,
            num_samples: 1,
        })?;

        let block = info.block_extent;
        let tiled = !input.swizzle_mode.is_linear();
        let in_tail = tiled && mip >= info.first_mip_id_in_tail;
        let request_width = round_up_quotient((dims.width >> mip).max(1), bc_width);
        let request_height = round_up_quotient((dims.height >> mip).max(1), bc_height);

        let (mip_id, num_mip_levels, width, height) = if in_tail {
            // The tail is viewed as a short chain that fits the tail block.
            let mip_id = mip - info.first_mip_id_in_tail;
            (
                mip_id,
                (info_in.num_mip_levels - info.first_mip_id_in_tail).max(2),
                (request_width << mip_id).min(block.width / 2),
                (request_height << mip_id).min(block.height),
            )
        } else if request_width << mip == info_in.width {
            (0, 1, request_width, request_height)
        } else {
            // Rounding lost elements. A single mip view could get a smaller
            // pitch than the mip has in the full chain, so the view is a two
            // mip chain whose second mip lands on the requested one.
            let upper_width = round_up_quotient((dims.width >> (mip - 1)).max(1), bc_width);
            let upper_height = round_up_quotient((dims.height >> (mip - 1)).max(1), bc_height);
            let avoid_tail = tiled && request_width <= block.width / 2 && request_height <= block.height;

            let hw_width = pow_two_align(shift_ceil(info_in.width, mip), block.width);
            let hw_height = pow_two_align(shift_ceil(info_in.height, mip), block.height);
            let extra_width = upper_width < request_width * 2
                || (upper_width == request_width * 2
                    && (avoid_tail || hw_width > pow_two_align(request_width, block.width)));
            let extra_height = upper_height < request_height * 2
                || (upper_height == request_height * 2
                    && (avoid_tail || hw_height > pow_two_align(request_height, block.height)));

            (
                1,
                2,
                upper_width + extra_width as u32,
                upper_height + extra_height as u32,
            )
        };

        debug_assert_eq!(shift_right(width, mip_id), request_width);
        debug_assert_eq!(shift_right(height, mip_id), request_height);

        Ok(NbcViewOutput {
            offset,
            pipe_bank_xor,
            unaligned_dims: Extent3d::new(width, height, dims.depth),
            mip_id,
            num_mip_levels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn view(mode: SwizzleMode, format: ElemFormat, width: u32, height: u32, mips: u32, mip: u32) -> NbcViewInput {
        NbcViewInput {
            flags: SurfaceFlags::default(),
            swizzle_mode: mode,
            resource_type: ResourceType::Tex2d,
            format,
            unaligned_dims: Extent3d::new(width, height, 1),
            num_mip_levels: mips,
            pipe_bank_xor: 0,
            slice: 0,
            mip,
        }
    }

    #[test]
    fn base_mip_is_a_plain_view() {
        let out = lib()
            .compute_non_block_compressed_view(&view(SwizzleMode::Sw64Kb2d, ElemFormat::Bc1, 1024, 512, 1, 0))
            .unwrap();
        assert_eq!(out.offset, 0);
        assert_eq!(out.unaligned_dims, Extent3d::new(256, 128, 1));
        assert_eq!((out.mip_id, out.num_mip_levels), (0, 1));
    }

    #[test]
    fn exact_mips_become_single_mip_views() {
        let lib = lib();
        let out = lib
            .compute_non_block_compressed_view(&view(SwizzleMode::Sw64Kb2d, ElemFormat::Bc7, 4096, 4096, 4, 2))
            .unwrap();
        assert_eq!(out.unaligned_dims, Extent3d::new(256, 256, 1));
        assert_eq!((out.mip_id, out.num_mip_levels), (0, 1));

        let info = lib
            .compute_surface_info(&SurfaceInfoInput {
                num_mip_levels: 4,
                ..surface(SwizzleMode::Sw64Kb2d, 128, 1024, 1024)
            })
            .unwrap();
        assert_eq!(out.offset, info.mips()[2].macro_block_offset);
    }

    #[test]
    fn lossy_mips_become_two_mip_views() {
        // 1025 texels wide: mip 1 holds 512 texels, 128 blocks, while the
        // whole chain starts at 257 blocks.
        let out = lib()
            .compute_non_block_compressed_view(&view(SwizzleMode::Sw64Kb2d, ElemFormat::Bc1, 1025, 1024, 3, 1))
            .unwrap();
        assert_eq!((out.mip_id, out.num_mip_levels), (1, 2));
        assert_eq!(shift_right(out.unaligned_dims.width, 1), 128);
        assert_eq!(shift_right(out.unaligned_dims.height, 1), 128);
    }

    #[test]
    fn tail_mips_view_the_tail_as_a_chain() {
        let lib = lib();
        let input = view(SwizzleMode::Sw64Kb2d, ElemFormat::Bc1, 256, 256, 7, 6);
        let info = lib
            .compute_surface_info(&SurfaceInfoInput {
                num_mip_levels: 7,
                ..surface(SwizzleMode::Sw64Kb2d, 64, 64, 64)
            })
            .unwrap();
        let out = lib.compute_non_block_compressed_view(&input).unwrap();
        assert!(info.first_mip_id_in_tail <= 6);
        assert_eq!(out.mip_id, 6 - info.first_mip_id_in_tail);
        assert_eq!(out.num_mip_levels, (7 - info.first_mip_id_in_tail).max(2));
        assert!(out.unaligned_dims.width <= info.block_extent.width / 2);
        assert_eq!(out.offset, 0);
    }

    #[test]
    fn volumes_are_viewed_slice_by_slice() {
        let lib = lib();
        let input = NbcViewInput {
            resource_type: ResourceType::Tex3d,
            unaligned_dims: Extent3d::new(256, 256, 32),
            pipe_bank_xor: 1,
            slice: 5,
            ..view(SwizzleMode::Sw64Kb3d, ElemFormat::Bc1, 256, 256, 1, 0)
        };
        let out = lib.compute_non_block_compressed_view(&input).unwrap();
        assert_eq!(out.unaligned_dims, Extent3d::new(64, 64, 32));
        assert_eq!((out.mip_id, out.num_mip_levels), (0, 1));

        let info = lib
            .compute_surface_info(&SurfaceInfoInput {
                resource_type: ResourceType::Tex3d,
                num_slices: 32,
                ..surface(SwizzleMode::Sw64Kb3d, 64, 64, 64)
            })
            .unwrap();
        assert_eq!(out.offset, 5 * info.slice_size);
        let slice_xor = lib
            .compute_slice_pipe_bank_xor(&SlicePipeBankXorInput {
                swizzle_mode: SwizzleMode::Sw64Kb3d,
                bpe: 64,
                slice: 5,
                base_pipe_bank_xor: 1,
                num_samples: 1,
            })
            .unwrap();
        assert_eq!(out.pipe_bank_xor, slice_xor);
    }

    #[test]
    fn volume_mips_in_the_tail() {
        let lib = lib();
        let input = NbcViewInput {
            resource_type: ResourceType::Tex3d,
            unaligned_dims: Extent3d::new(256, 256, 16),
            ..view(SwizzleMode::Sw64Kb3d, ElemFormat::Bc7, 256, 256, 5, 4)
        };
        let out = lib.compute_non_block_compressed_view(&input).unwrap();
        // 128bpp blocks are 16x16x16 elements, so the tail starts at mip 3.
        assert_eq!((out.mip_id, out.num_mip_levels), (1, 2));
        assert_eq!(out.unaligned_dims, Extent3d::new(8, 8, 16));
        assert_eq!(out.offset, 0);
    }

    #[test]
    fn rejects_unsupported_views() {
        let lib = lib();
        assert!(matches!(
            lib.compute_non_block_compressed_view(&view(SwizzleMode::Sw64Kb2d, ElemFormat::R32, 64, 64, 1, 0)),
            Err(AddrError::NotSupported(_))
        ));
        assert!(matches!(
            lib.compute_non_block_compressed_view(&view(SwizzleMode::Sw64Kb2d, ElemFormat::Bc1, 64, 64, 2, 2)),
            Err(AddrError::InvalidParams(_))
        ));
    }
}
