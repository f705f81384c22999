//! Surface layout and addressing.

use crate::c_api::{AbiStruct, Addr3Surface, AddrHandle, AddrReturnCode, run};
use gpu_addrlib_common::types::Extent3d;
use gpu_addrlib_gfx12::{
    AddrFromCoordInput, CoordFromAddrInput, MipInfo, SubResourceOffsetInput, SurfaceInfoOutput,
};

/// FFI-safe version of [`Extent3d`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Addr3Extent3d {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
    /// Depth
    pub depth: u32,
}

impl From<Extent3d> for Addr3Extent3d {
    fn from(e: Extent3d) -> Self {
        Self {
            width: e.width,
            height: e.height,
            depth: e.depth,
        }
    }
}

/// FFI-safe version of [`MipInfo`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3MipInfo {
    /// Row pitch in elements
    pub pitch: u32,
    /// Pitch used for slice sizing
    pub pitch_for_slice: u32,
    /// Height in elements
    pub height: u32,
    /// Depth in elements
    pub depth: u32,
    /// Pitch in pixels of the original format
    pub pixel_pitch: u32,
    /// Height in pixels of the original format
    pub pixel_height: u32,
    /// Offset of the mip from the surface base
    pub offset: u64,
    /// Offset of the mip's first block within one slice
    pub macro_block_offset: u64,
    /// Offset inside the tail block
    pub mip_tail_offset: u32,
    /// Origin of the mip inside the tail block
    pub mip_tail_coord: Addr3Extent3d,
}

impl From<&MipInfo> for Addr3MipInfo {
    fn from(m: &MipInfo) -> Self {
        Self {
            pitch: m.pitch,
            pitch_for_slice: m.pitch_for_slice,
            height: m.height,
            depth: m.depth,
            pixel_pitch: m.pixel_pitch,
            pixel_height: m.pixel_height,
            offset: m.offset,
            macro_block_offset: m.macro_block_offset,
            mip_tail_offset: m.mip_tail_offset,
            mip_tail_coord: Extent3d::new(m.mip_tail_coord_x, m.mip_tail_coord_y, m.mip_tail_coord_z)
                .into(),
        }
    }
}

/// Input of [`addr3_compute_surface_info()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3SurfaceInfoInput {
    /// `sizeof(Addr3SurfaceInfoInput)`
    pub size: u32,
    /// The surface
    pub surface: Addr3Surface,
}

/// Output of [`addr3_compute_surface_info()`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Addr3SurfaceInfoOutput {
    /// `sizeof(Addr3SurfaceInfoOutput)`
    pub size: u32,
    /// Bits per element
    pub bpp: u32,
    /// Row pitch of mip 0 in elements
    pub pitch: u32,
    /// Pitch of mip 0 used for slice sizing
    pub pitch_for_slice: u32,
    /// Height of mip 0 in elements
    pub height: u32,
    /// Pitch in pixels of the original format
    pub pixel_pitch: u32,
    /// Height in pixels of the original format
    pub pixel_height: u32,
    /// Bits per pixel of the original format
    pub pixel_bits: u32,
    /// Slice count aligned to the block depth
    pub num_slices: u32,
    /// Required base alignment
    pub base_align: u32,
    /// Bytes of one slice
    pub slice_size: u64,
    /// Bytes of one slice when packed without trailing padding
    pub slice_size_dense_packed: u64,
    /// Bytes of the surface
    pub surf_size: u64,
    /// Block extent in elements
    pub block_extent: Addr3Extent3d,
    /// First mip in the tail
    pub first_mip_id_in_tail: u32,
    /// Whether the whole chain lives in the tail
    pub mip_chain_in_tail: bool,
    /// Pitch of the mip chain
    pub mip_chain_pitch: u32,
    /// Height of the mip chain
    pub mip_chain_height: u32,
    /// Slices of the mip chain
    pub mip_chain_slice: u32,
    /// Address equation index, `0xFFFFFFFF` for none
    pub equation_index: u32,
    /// Height of one eye of a stereo surface
    pub stereo_eye_height: u32,
    /// Byte offset of the right eye
    pub stereo_right_offset: u32,
    /// Pipe/bank xor of the right eye
    pub stereo_right_swizzle: u32,
    /// Caller owned array receiving one entry per mip, or null. Must hold
    /// at least `num_mip_levels` entries. Left unchanged by the call.
    pub mip_info: *mut Addr3MipInfo,
}

impl Default for Addr3SurfaceInfoOutput {
    fn default() -> Self {
        Self::new(&SurfaceInfoOutput::default(), core::ptr::null_mut())
    }
}

impl Addr3SurfaceInfoOutput {
    fn new(info: &SurfaceInfoOutput, mip_info: *mut Addr3MipInfo) -> Self {
        Self {
            size: Self::abi_size(),
            bpp: info.bpp,
            pitch: info.pitch,
            pitch_for_slice: info.pitch_for_slice,
            height: info.height,
            pixel_pitch: info.pixel_pitch,
            pixel_height: info.pixel_height,
            pixel_bits: info.pixel_bits,
            num_slices: info.num_slices,
            base_align: info.base_align,
            slice_size: info.slice_size,
            slice_size_dense_packed: info.slice_size_dense_packed,
            surf_size: info.surf_size,
            block_extent: info.block_extent.into(),
            first_mip_id_in_tail: info.first_mip_id_in_tail,
            mip_chain_in_tail: info.mip_chain_in_tail,
            mip_chain_pitch: info.mip_chain_pitch,
            mip_chain_height: info.mip_chain_height,
            mip_chain_slice: info.mip_chain_slice,
            equation_index: info.equation_index,
            stereo_eye_height: info.stereo.eye_height,
            stereo_right_offset: info.stereo.right_offset,
            stereo_right_swizzle: info.stereo.right_swizzle,
            mip_info,
        }
    }
}

/// Compute the layout of a surface.
///
/// # Safety
/// - `handle` must be a live handle from [`addr_create()`](crate::c_api::handle::addr_create)
/// - `input` must point to a valid [`Addr3SurfaceInfoInput`]
/// - `output` must point to an initialised [`Addr3SurfaceInfoOutput`]
/// - `output.mip_info` must be null or valid for `num_mip_levels` writes
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr3_compute_surface_info(
    handle: *const AddrHandle,
    input: *const Addr3SurfaceInfoInput,
    output: *mut Addr3SurfaceInfoOutput,
) -> AddrReturnCode {
    let mip_out = if output.is_null() {
        core::ptr::null_mut()
    } else {
        unsafe { (*output).mip_info }
    };

    unsafe {
        run(handle, input, output, |lib, input| {
            let info = lib.compute_surface_info(&input.surface.to_surface_info_input()?)?;
            if !mip_out.is_null() {
                for (index, mip) in info.mips().iter().enumerate() {
                    mip_out.add(index).write(mip.into());
                }
            }
            Ok(Addr3SurfaceInfoOutput::new(&info, mip_out))
        })
    }
}

/// Input of [`addr3_compute_surface_addr_from_coord()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3AddrFromCoordInput {
    /// `sizeof(Addr3AddrFromCoordInput)`
    pub size: u32,
    /// The surface. Dimensions are in elements.
    pub surface: Addr3Surface,
    /// X in elements, relative to the mip
    pub x: u32,
    /// Y in elements, relative to the mip
    pub y: u32,
    /// Array slice, or depth slice of a volume mip
    pub slice: u32,
    /// Sample index
    pub sample: u32,
    /// Mip level
    pub mip: u32,
}

/// Output of [`addr3_compute_surface_addr_from_coord()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3AddrFromCoordOutput {
    /// `sizeof(Addr3AddrFromCoordOutput)`
    pub size: u32,
    /// Bit position inside the byte
    pub bit_position: u32,
    /// Byte address relative to the surface base
    pub addr: u64,
    /// Index of the 64KiB tile holding the element
    pub prt_block_index: u32,
}

/// Compute the byte address of an element.
///
/// # Safety
/// - `handle` must be a live handle from [`addr_create()`](crate::c_api::handle::addr_create)
/// - `input` must point to a valid [`Addr3AddrFromCoordInput`]
/// - `output` must point to an initialised [`Addr3AddrFromCoordOutput`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr3_compute_surface_addr_from_coord(
    handle: *const AddrHandle,
    input: *const Addr3AddrFromCoordInput,
    output: *mut Addr3AddrFromCoordOutput,
) -> AddrReturnCode {
    unsafe {
        run(handle, input, output, |lib, input| {
            let out = lib.compute_surface_addr_from_coord(&AddrFromCoordInput {
                surface: input.surface.to_addr_surface()?,
                x: input.x,
                y: input.y,
                slice: input.slice,
                sample: input.sample,
                mip: input.mip,
            })?;
            Ok(Addr3AddrFromCoordOutput {
                size: Addr3AddrFromCoordOutput::abi_size(),
                bit_position: out.bit_position,
                addr: out.addr,
                prt_block_index: out.prt_block_index,
            })
        })
    }
}

/// Input of [`addr3_compute_surface_coord_from_addr()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3CoordFromAddrInput {
    /// `sizeof(Addr3CoordFromAddrInput)`
    pub size: u32,
    /// The surface. Dimensions are in elements.
    pub surface: Addr3Surface,
    /// Byte address relative to the surface base
    pub addr: u64,
}

/// Output of [`addr3_compute_surface_coord_from_addr()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3CoordFromAddrOutput {
    /// `sizeof(Addr3CoordFromAddrOutput)`
    pub size: u32,
    /// X in elements, relative to the mip
    pub x: u32,
    /// Y in elements, relative to the mip
    pub y: u32,
    /// Array slice, or depth slice of a volume mip
    pub slice: u32,
    /// Sample index
    pub sample: u32,
    /// Mip level
    pub mip: u32,
}

/// Compute the element at a byte address.
///
/// # Safety
/// - `handle` must be a live handle from [`addr_create()`](crate::c_api::handle::addr_create)
/// - `input` must point to a valid [`Addr3CoordFromAddrInput`]
/// - `output` must point to an initialised [`Addr3CoordFromAddrOutput`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr3_compute_surface_coord_from_addr(
    handle: *const AddrHandle,
    input: *const Addr3CoordFromAddrInput,
    output: *mut Addr3CoordFromAddrOutput,
) -> AddrReturnCode {
    unsafe {
        run(handle, input, output, |lib, input| {
            let out = lib.compute_surface_coord_from_addr(&CoordFromAddrInput {
                surface: input.surface.to_addr_surface()?,
                addr: input.addr,
            })?;
            Ok(Addr3CoordFromAddrOutput {
                size: Addr3CoordFromAddrOutput::abi_size(),
                x: out.x,
                y: out.y,
                slice: out.slice,
                sample: out.sample,
                mip: out.mip,
            })
        })
    }
}

/// Input of [`addr3_compute_sub_resource_offset_for_swizzle_pattern()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3SubResourceOffsetInput {
    /// `sizeof(Addr3SubResourceOffsetInput)`
    pub size: u32,
    /// The surface
    pub surface: Addr3Surface,
    /// Slice of the sub-resource
    pub slice: u32,
    /// Mip of the sub-resource
    pub mip: u32,
}

/// Output of [`addr3_compute_sub_resource_offset_for_swizzle_pattern()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3SubResourceOffsetOutput {
    /// `sizeof(Addr3SubResourceOffsetOutput)`
    pub size: u32,
    /// Byte offset of the sub-resource from the surface base
    pub offset: u64,
}

/// Compute the byte offset of a sub-resource.
///
/// # Safety
/// - `handle` must be a live handle from [`addr_create()`](crate::c_api::handle::addr_create)
/// - `input` must point to a valid [`Addr3SubResourceOffsetInput`]
/// - `output` must point to an initialised [`Addr3SubResourceOffsetOutput`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr3_compute_sub_resource_offset_for_swizzle_pattern(
    handle: *const AddrHandle,
    input: *const Addr3SubResourceOffsetInput,
    output: *mut Addr3SubResourceOffsetOutput,
) -> AddrReturnCode {
    unsafe {
        run(handle, input, output, |lib, input| {
            let offset = lib.compute_sub_resource_offset_for_swizzle_pattern(&SubResourceOffsetInput {
                surface: input.surface.to_surface_info_input()?,
                slice: input.slice,
                mip: input.mip,
            })?;
            Ok(Addr3SubResourceOffsetOutput {
                size: Addr3SubResourceOffsetOutput::abi_size(),
                offset,
            })
        })
    }
}

impl AbiStruct for Addr3SurfaceInfoInput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3SurfaceInfoOutput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3AddrFromCoordInput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3AddrFromCoordOutput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3CoordFromAddrInput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3CoordFromAddrOutput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3SubResourceOffsetInput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3SubResourceOffsetOutput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}
