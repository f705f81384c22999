//! # C API (FFI)
//!
//! *Note: The C API is only available when the `c-exports` feature is enabled.*
//!
//! The C API exposes every library operation through an opaque
//! [`AddrHandle`] and `#[repr(C)]` structures.
//!
//! ## Lifecycle
//!
//! - **`addr_create(input, &handle)`** - Create a library instance
//! - **`addr_destroy(handle)`** - Free it
//!
//! ## Operations
//!
//! - **`addr3_compute_surface_info`**
//! - **`addr3_compute_surface_addr_from_coord`** / **`addr3_compute_surface_coord_from_addr`**
//! - **`addr3_compute_pipe_bank_xor`** / **`addr3_compute_slice_pipe_bank_xor`**
//! - **`addr3_compute_sub_resource_offset_for_swizzle_pattern`**
//! - **`addr3_compute_non_block_compressed_view`**
//! - **`addr3_get_possible_swizzle_modes`**
//! - **`addr3_copy_mem_to_surface`** / **`addr3_copy_surface_to_mem`**
//!
//! Each operation takes a handle, a pointer to its input structure and a
//! pointer to its output structure, and returns an [`AddrReturnCode`]. The
//! output is written only when the call succeeds.
//!
//! ## Structure sizes
//!
//! Every structure starts with a `size` field. When the library was created
//! with `fill_size_fields` set, callers must set `size` to `sizeof` the
//! structure on both inputs and outputs; any other value fails the call with
//! [`AddrReturnCode::ParamSizeMismatch`]. Outputs always come back with
//! `size` filled in.
//!
//! ## Enumerations
//!
//! Swizzle modes, resource types and chip families are passed as their
//! Rust discriminants. Formats are passed as `0` for "no format" or one plus
//! the index of the format in [`ElemFormat::all_values`]. Surface flags are
//! the raw bits of [`SurfaceFlags`].

pub mod copy;
pub mod error;
pub mod handle;
pub mod pipe_bank_xor;
pub mod surface;
pub mod swizzle_modes;
pub mod view;

pub use error::AddrReturnCode;
pub use handle::AddrHandle;

use crate::AddrLib;
use core::ffi::c_void;
use gpu_addrlib_common::AddrError;
use gpu_addrlib_common::format::ElemFormat;
use gpu_addrlib_common::types::{Extent3d, ResourceType, SurfaceFlags};
use gpu_addrlib_gfx12::{AddrSurface, SurfaceInfoInput, SwizzleMode};

/// A structure carrying its own `size` field.
pub(crate) trait AbiStruct: Sized {
    /// The size the caller declared.
    fn declared_size(&self) -> u32;

    /// The compiled size of the structure.
    fn abi_size() -> u32 {
        size_of::<Self>() as u32
    }
}

/// Description of a surface, shared by the surface level operations.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3Surface {
    /// Raw [`SurfaceFlags`] bits.
    pub flags: u32,
    /// [`SwizzleMode`] discriminant.
    pub swizzle_mode: u32,
    /// [`ResourceType`] discriminant.
    pub resource_type: u32,
    /// Element format code, 0 for none.
    pub format: u32,
    /// Bits per element.
    pub bpp: u32,
    /// Width of mip 0.
    pub width: u32,
    /// Height of mip 0.
    pub height: u32,
    /// Array slices, or depth of a volume.
    pub num_slices: u32,
    /// Number of mip levels.
    pub num_mip_levels: u32,
    /// MSAA sample count.
    pub num_samples: u32,
    /// Caller chosen pitch in elements, 0 to let the library choose.
    pub pitch_in_element: u32,
    /// Caller chosen slice size in bytes, 0 to let the library choose.
    pub slice_align: u32,
}

impl Addr3Surface {
    pub(crate) fn to_surface_info_input(self) -> Result<SurfaceInfoInput, AddrError> {
        Ok(SurfaceInfoInput {
            flags: SurfaceFlags::from_bits(self.flags),
            swizzle_mode: decode_swizzle_mode(self.swizzle_mode)?,
            resource_type: decode_resource_type(self.resource_type)?,
            format: decode_format(self.format)?,
            bpp: self.bpp,
            width: self.width,
            height: self.height,
            num_slices: self.num_slices,
            num_mip_levels: self.num_mip_levels,
            num_samples: self.num_samples,
            pitch_in_element: self.pitch_in_element,
            slice_align: self.slice_align,
        })
    }

    /// The addressing view of the surface. Dimensions are in elements, so
    /// `format` and `slice_align` do not take part.
    pub(crate) fn to_addr_surface(self) -> Result<AddrSurface, AddrError> {
        Ok(AddrSurface {
            swizzle_mode: decode_swizzle_mode(self.swizzle_mode)?,
            flags: SurfaceFlags::from_bits(self.flags),
            resource_type: decode_resource_type(self.resource_type)?,
            bpp: self.bpp,
            unaligned_dims: Extent3d::new(self.width, self.height, self.num_slices),
            num_mip_levels: self.num_mip_levels,
            num_samples: self.num_samples,
            pitch_in_element: self.pitch_in_element,
        })
    }
}

pub(crate) fn decode_swizzle_mode(value: u32) -> Result<SwizzleMode, AddrError> {
    SwizzleMode::from_u32(value).ok_or(AddrError::InvalidParams("unknown swizzle mode"))
}

pub(crate) fn decode_resource_type(value: u32) -> Result<ResourceType, AddrError> {
    ResourceType::from_u32(value).ok_or(AddrError::InvalidParams("unknown resource type"))
}

pub(crate) fn decode_format(value: u32) -> Result<Option<ElemFormat>, AddrError> {
    match value {
        0 => Ok(None),
        code => ElemFormat::all_values()
            .get(code as usize - 1)
            .copied()
            .map(Some)
            .ok_or(AddrError::InvalidParams("unknown element format")),
    }
}

/// Format code of `format`, as accepted by [`decode_format`].
pub fn format_code(format: ElemFormat) -> u32 {
    ElemFormat::all_values()
        .iter()
        .position(|f| *f == format)
        .map_or(0, |index| index as u32 + 1)
}

/// Runs one operation: checks pointers and structure sizes, then writes the
/// output on success.
///
/// # Safety
///
/// - `handle` must be null or a live handle from `addr_create`
/// - `input` must be null or point to a valid `I`
/// - `output` must be null or point to a writable, initialised `O`
pub(crate) unsafe fn run<I: AbiStruct, O: AbiStruct>(
    handle: *const AddrHandle,
    input: *const I,
    output: *mut O,
    op: impl FnOnce(&AddrLib, &I) -> Result<O, AddrError>,
) -> AddrReturnCode {
    if handle.is_null() {
        return AddrReturnCode::NullHandle;
    }
    if input.is_null() {
        return AddrReturnCode::NullInput;
    }
    if output.is_null() {
        return AddrReturnCode::NullOutput;
    }

    let context = unsafe { handle::get_context(handle) };
    let input = unsafe { &*input };
    let declared_out = unsafe { &*output }.declared_size();
    let result = check_sizes::<I>(context.fill_size_fields, input.declared_size())
        .and_then(|_| check_sizes::<O>(context.fill_size_fields, declared_out))
        .and_then(|_| op(&context.lib, input));

    match result {
        Ok(value) => {
            unsafe { output.write(value) };
            AddrReturnCode::Ok
        }
        Err(e) => e.into(),
    }
}

pub(crate) fn check_sizes<T: AbiStruct>(enabled: bool, declared: u32) -> Result<(), AddrError> {
    AddrError::check_size(enabled, T::abi_size() as usize, declared)
}

/// Borrows a caller buffer, treating a zero length buffer as empty whatever
/// its pointer.
///
/// # Safety
///
/// When `len` is non-zero, `ptr` must be valid for `len` bytes of reads for
/// the returned lifetime.
pub(crate) unsafe fn buffer<'a>(ptr: *const c_void, len: usize) -> Result<&'a [u8], AddrReturnCode> {
    match (ptr.is_null(), len) {
        (_, 0) => Ok(&[]),
        (true, _) => Err(AddrReturnCode::NullBuffer),
        (false, _) => Ok(unsafe { core::slice::from_raw_parts(ptr as *const u8, len) }),
    }
}

/// Mutable counterpart of [`buffer`].
///
/// # Safety
///
/// When `len` is non-zero, `ptr` must be valid for `len` bytes of reads and
/// writes for the returned lifetime, and not aliased.
pub(crate) unsafe fn buffer_mut<'a>(ptr: *mut c_void, len: usize) -> Result<&'a mut [u8], AddrReturnCode> {
    match (ptr.is_null(), len) {
        (_, 0) => Ok(&mut []),
        (true, _) => Err(AddrReturnCode::NullBuffer),
        (false, _) => Ok(unsafe { core::slice::from_raw_parts_mut(ptr as *mut u8, len) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(ElemFormat::R8))]
    #[case(7, Some(ElemFormat::Bc1))]
    fn format_codes(#[case] code: u32, #[case] format: Option<ElemFormat>) {
        assert_eq!(decode_format(code), Ok(format));
        if let Some(format) = format {
            assert_eq!(format_code(format), code);
        }
    }

    #[test]
    fn unknown_enumerations_are_invalid() {
        assert!(decode_format(1000).is_err());
        assert!(decode_swizzle_mode(8).is_err());
        assert!(decode_resource_type(3).is_err());
    }

    #[test]
    fn empty_buffers_accept_null() {
        assert_eq!(unsafe { buffer(core::ptr::null(), 0) }, Ok(&[][..]));
        assert_eq!(
            unsafe { buffer(core::ptr::null(), 4) },
            Err(AddrReturnCode::NullBuffer)
        );
    }
}
