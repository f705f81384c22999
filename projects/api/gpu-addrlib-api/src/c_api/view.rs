//! Uncompressed views of block compressed surfaces.

use crate::c_api::surface::Addr3Extent3d;
use crate::c_api::{AbiStruct, AddrHandle, AddrReturnCode, decode_format, decode_resource_type, decode_swizzle_mode, run};
use gpu_addrlib_common::AddrError;
use gpu_addrlib_common::types::{Extent3d, SurfaceFlags};
use gpu_addrlib_gfx12::NbcViewInput;

/// Input of [`addr3_compute_non_block_compressed_view()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3NbcViewInput {
    /// `sizeof(Addr3NbcViewInput)`
    pub size: u32,
    /// Raw surface flag bits
    pub flags: u32,
    /// Swizzle mode discriminant
    pub swizzle_mode: u32,
    /// Resource type discriminant
    pub resource_type: u32,
    /// Compressed format code; must not be 0
    pub format: u32,
    /// Size of mip 0 in texels, and slice count
    pub unaligned_dims: Addr3Extent3d,
    /// Number of mip levels
    pub num_mip_levels: u32,
    /// Pipe/bank xor of the compressed surface
    pub pipe_bank_xor: u32,
    /// Slice to view
    pub slice: u32,
    /// Mip to view
    pub mip: u32,
}

/// Output of [`addr3_compute_non_block_compressed_view()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3NbcViewOutput {
    /// `sizeof(Addr3NbcViewOutput)`
    pub size: u32,
    /// Pipe/bank xor of the view
    pub pipe_bank_xor: u32,
    /// Byte offset of the view from the surface base
    pub offset: u64,
    /// Size of mip 0 of the view, in elements
    pub unaligned_dims: Addr3Extent3d,
    /// Mip of the view holding the requested data
    pub mip_id: u32,
    /// Mips of the view
    pub num_mip_levels: u32,
}

/// Compute an uncompressed view of one mip and slice of a block compressed
/// surface.
///
/// # Safety
/// - `handle` must be a live handle from [`addr_create()`](crate::c_api::handle::addr_create)
/// - `input` must point to a valid [`Addr3NbcViewInput`]
/// - `output` must point to an initialised [`Addr3NbcViewOutput`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr3_compute_non_block_compressed_view(
    handle: *const AddrHandle,
    input: *const Addr3NbcViewInput,
    output: *mut Addr3NbcViewOutput,
) -> AddrReturnCode {
    unsafe {
        run(handle, input, output, |lib, input| {
            let format = decode_format(input.format)?
                .ok_or(AddrError::InvalidParams("views need a compressed format"))?;
            let dims = input.unaligned_dims;
            let view = lib.compute_non_block_compressed_view(&NbcViewInput {
                flags: SurfaceFlags::from_bits(input.flags),
                swizzle_mode: decode_swizzle_mode(input.swizzle_mode)?,
                resource_type: decode_resource_type(input.resource_type)?,
                format,
                unaligned_dims: Extent3d::new(dims.width, dims.height, dims.depth),
                num_mip_levels: input.num_mip_levels,
                pipe_bank_xor: input.pipe_bank_xor,
                slice: input.slice,
                mip: input.mip,
            })?;
            Ok(Addr3NbcViewOutput {
                size: Addr3NbcViewOutput::abi_size(),
                pipe_bank_xor: view.pipe_bank_xor,
                offset: view.offset,
                unaligned_dims: view.unaligned_dims.into(),
                mip_id: view.mip_id,
                num_mip_levels: view.num_mip_levels,
            })
        })
    }
}

impl AbiStruct for Addr3NbcViewInput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3NbcViewOutput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}
