//! Copies between linear memory and mapped surfaces.

use crate::c_api::surface::Addr3Extent3d;
use crate::c_api::handle::{AddrContext, get_context};
use crate::c_api::{
    AbiStruct, Addr3Surface, AddrHandle, AddrReturnCode, buffer, buffer_mut, check_sizes, decode_format,
    decode_resource_type, decode_swizzle_mode,
};
use alloc::vec::Vec;
use core::ffi::c_void;
use gpu_addrlib_common::types::{Extent3d, SurfaceFlags};
use gpu_addrlib_gfx12::{CopyRegion, CopySurfaceInput};

/// Surface side of a copy.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3CopyMemSurfInput {
    /// `sizeof(Addr3CopyMemSurfInput)`
    pub size: u32,
    /// The surface. `slice_align` does not take part.
    pub surface: Addr3Surface,
    /// Pipe/bank xor of the surface
    pub pb_xor: u32,
    /// The mapped buffer holds only the sub-resource every region targets
    pub single_subres: bool,
}

/// One box copied between linear memory and a surface.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Addr3CopyMemSurfRegion {
    /// `sizeof(Addr3CopyMemSurfRegion)`
    pub size: u32,
    /// X of the box in the mip, in elements
    pub x: u32,
    /// Y of the box in the mip, in elements
    pub y: u32,
    /// First slice of the box
    pub slice: u32,
    /// Mip level
    pub mip: u32,
    /// Size of the box in elements and slices
    pub copy_dims: Addr3Extent3d,
    /// Bytes between rows in `mem`
    pub mem_row_pitch: u64,
    /// Bytes between slices in `mem`
    pub mem_slice_pitch: u64,
    /// Linear memory holding the box
    pub mem: *mut c_void,
    /// Length of `mem` in bytes
    pub mem_len: usize,
}

impl Default for Addr3CopyMemSurfRegion {
    fn default() -> Self {
        Self {
            size: Self::abi_size(),
            x: 0,
            y: 0,
            slice: 0,
            mip: 0,
            copy_dims: Addr3Extent3d::default(),
            mem_row_pitch: 0,
            mem_slice_pitch: 0,
            mem: core::ptr::null_mut(),
            mem_len: 0,
        }
    }
}

impl Addr3CopyMemSurfInput {
    fn to_copy_input(self) -> Result<CopySurfaceInput, AddrReturnCode> {
        let s = self.surface;
        Ok(CopySurfaceInput {
            swizzle_mode: decode_swizzle_mode(s.swizzle_mode)?,
            flags: SurfaceFlags::from_bits(s.flags),
            resource_type: decode_resource_type(s.resource_type)?,
            format: decode_format(s.format)?,
            bpp: s.bpp,
            unaligned_dims: Extent3d::new(s.width, s.height, s.num_slices),
            num_mip_levels: s.num_mip_levels,
            num_samples: s.num_samples,
            pitch_in_element: s.pitch_in_element,
            pb_xor: self.pb_xor,
            single_subres: self.single_subres,
        })
    }
}

impl Addr3CopyMemSurfRegion {
    fn to_region<B>(self, mem: B) -> CopyRegion<B> {
        let dims = self.copy_dims;
        CopyRegion {
            x: self.x,
            y: self.y,
            slice: self.slice,
            mip: self.mip,
            extent: Extent3d::new(dims.width, dims.height, dims.depth),
            mem_row_pitch: self.mem_row_pitch,
            mem_slice_pitch: self.mem_slice_pitch,
            mem,
        }
    }
}

/// Validated pointers and sizes shared by both copy directions.
///
/// # Safety
/// See [`addr3_copy_mem_to_surface()`].
unsafe fn prepare<'a>(
    handle: *const AddrHandle,
    input: *const Addr3CopyMemSurfInput,
    regions: *const Addr3CopyMemSurfRegion,
    num_regions: u32,
) -> Result<(&'a AddrContext, CopySurfaceInput, &'a [Addr3CopyMemSurfRegion]), AddrReturnCode> {
    if handle.is_null() {
        return Err(AddrReturnCode::NullHandle);
    }
    if input.is_null() {
        return Err(AddrReturnCode::NullInput);
    }
    if regions.is_null() && num_regions != 0 {
        return Err(AddrReturnCode::NullBuffer);
    }

    let context = unsafe { get_context(handle) };
    let input = unsafe { &*input };
    let regions: &[Addr3CopyMemSurfRegion] = match num_regions {
        0 => &[],
        n => unsafe { core::slice::from_raw_parts(regions, n as usize) },
    };
    check_sizes::<Addr3CopyMemSurfInput>(context.fill_size_fields, input.size)?;
    for region in regions {
        check_sizes::<Addr3CopyMemSurfRegion>(context.fill_size_fields, region.size)?;
    }
    Ok((context, input.to_copy_input()?, regions))
}

/// Copy boxes of linear memory into a mapped surface.
///
/// Every region is checked against both buffers before any byte is
/// written.
///
/// # Parameters
/// - `handle`: The library handle
/// - `input`: The surface
/// - `regions`: `num_regions` boxes to copy
/// - `mapped_surface`: The surface memory, `surface_len` bytes long
///
/// # Safety
/// - `handle` must be a live handle from [`addr_create()`](crate::c_api::handle::addr_create)
/// - `input` must point to a valid [`Addr3CopyMemSurfInput`]
/// - `regions` must point to `num_regions` valid regions, each `mem`
///   readable for `mem_len` bytes
/// - `mapped_surface` must be writable for `surface_len` bytes and must not
///   overlap any region's memory
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr3_copy_mem_to_surface(
    handle: *const AddrHandle,
    input: *const Addr3CopyMemSurfInput,
    regions: *const Addr3CopyMemSurfRegion,
    num_regions: u32,
    mapped_surface: *mut c_void,
    surface_len: usize,
) -> AddrReturnCode {
    let result = (|| {
        let (context, copy_input, regions) = unsafe { prepare(handle, input, regions, num_regions)? };
        let surface = unsafe { buffer_mut(mapped_surface, surface_len)? };
        let mut boxes = Vec::with_capacity(regions.len());
        for region in regions {
            let mem = unsafe { buffer(region.mem, region.mem_len)? };
            boxes.push(region.to_region(mem));
        }
        context
            .lib
            .copy_mem_to_surface(&copy_input, &boxes, surface)
            .map_err(AddrReturnCode::from)
    })();
    result.map_or_else(|code| code, |_| AddrReturnCode::Ok)
}

/// Copy boxes of a mapped surface into linear memory.
///
/// # Parameters
/// - `handle`: The library handle
/// - `input`: The surface
/// - `regions`: `num_regions` boxes to copy
/// - `mapped_surface`: The surface memory, `surface_len` bytes long
///
/// # Safety
/// - `handle` must be a live handle from [`addr_create()`](crate::c_api::handle::addr_create)
/// - `input` must point to a valid [`Addr3CopyMemSurfInput`]
/// - `regions` must point to `num_regions` valid regions, each `mem`
///   writable for `mem_len` bytes, none overlapping another or the surface
/// - `mapped_surface` must be readable for `surface_len` bytes
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr3_copy_surface_to_mem(
    handle: *const AddrHandle,
    input: *const Addr3CopyMemSurfInput,
    regions: *const Addr3CopyMemSurfRegion,
    num_regions: u32,
    mapped_surface: *const c_void,
    surface_len: usize,
) -> AddrReturnCode {
    let result = (|| {
        let (context, copy_input, regions) = unsafe { prepare(handle, input, regions, num_regions)? };
        let surface = unsafe { buffer(mapped_surface, surface_len)? };
        let mut boxes = Vec::with_capacity(regions.len());
        for region in regions {
            let mem = unsafe { buffer_mut(region.mem, region.mem_len)? };
            boxes.push(region.to_region(mem));
        }
        context
            .lib
            .copy_surface_to_mem(&copy_input, &mut boxes, surface)
            .map_err(AddrReturnCode::from)
    })();
    result.map_or_else(|code| code, |_| AddrReturnCode::Ok)
}

impl AbiStruct for Addr3CopyMemSurfInput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3CopyMemSurfRegion {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c_api::handle::{addr_destroy, test_support};
    use crate::test_prelude::*;
    use core::ptr;

    fn input(mode: SwizzleMode) -> Addr3CopyMemSurfInput {
        Addr3CopyMemSurfInput {
            size: Addr3CopyMemSurfInput::abi_size(),
            surface: Addr3Surface {
                swizzle_mode: mode as u32,
                resource_type: ResourceType::Tex2d as u32,
                bpp: 32,
                width: 64,
                height: 64,
                num_slices: 1,
                num_mip_levels: 1,
                num_samples: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn region(mem: &mut [u8], width: u32, height: u32) -> Addr3CopyMemSurfRegion {
        Addr3CopyMemSurfRegion {
            x: 3,
            y: 5,
            copy_dims: Addr3Extent3d {
                width,
                height,
                depth: 1,
            },
            mem_row_pitch: width as u64 * 4,
            mem_slice_pitch: (width * height) as u64 * 4,
            mem: mem.as_mut_ptr().cast(),
            mem_len: mem.len(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(SwizzleMode::Linear)]
    #[case(SwizzleMode::Sw4Kb2d)]
    #[case(SwizzleMode::Sw64Kb2d)]
    fn copies_round_trip(#[case] mode: SwizzleMode) {
        let handle = test_support::create(true);
        let input = input(mode);
        let mut surface = vec![0u8; 64 * 1024];
        let mut source: Vec<u8> = (0..16 * 8 * 4).map(|i| i as u8).collect();
        let mut restored = vec![0u8; source.len()];

        let up = [region(&mut source, 16, 8)];
        let code = unsafe {
            addr3_copy_mem_to_surface(handle, &input, up.as_ptr(), 1, surface.as_mut_ptr().cast(), surface.len())
        };
        assert_eq!(code, AddrReturnCode::Ok);

        let down = [region(&mut restored, 16, 8)];
        let code = unsafe {
            addr3_copy_surface_to_mem(handle, &input, down.as_ptr(), 1, surface.as_ptr().cast(), surface.len())
        };
        assert_eq!(code, AddrReturnCode::Ok);
        assert_eq!(restored, source);
        unsafe { addr_destroy(handle) };
    }

    #[test]
    fn bad_copies_are_reported() {
        let handle = test_support::create(true);
        let input = input(SwizzleMode::Sw4Kb2d);
        let mut surface = vec![0u8; 4096];
        let mut small = vec![0u8; 16];
        let regions = [region(&mut small, 16, 8)];

        let code = unsafe {
            addr3_copy_mem_to_surface(handle, &input, regions.as_ptr(), 1, surface.as_mut_ptr().cast(), surface.len())
        };
        assert_eq!(code, AddrReturnCode::InvalidParams);
        assert!(surface.iter().all(|b| *b == 0));

        let code = unsafe {
            addr3_copy_mem_to_surface(handle, &input, ptr::null(), 1, surface.as_mut_ptr().cast(), surface.len())
        };
        assert_eq!(code, AddrReturnCode::NullBuffer);

        let unsized_region = [Addr3CopyMemSurfRegion {
            size: 0,
            ..regions[0]
        }];
        let code = unsafe {
            addr3_copy_mem_to_surface(handle, &input, unsized_region.as_ptr(), 1, surface.as_mut_ptr().cast(), surface.len())
        };
        assert_eq!(code, AddrReturnCode::ParamSizeMismatch);
        unsafe { addr_destroy(handle) };
    }
}
