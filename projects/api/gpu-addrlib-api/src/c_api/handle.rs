//! Library handle management.

use crate::c_api::{AbiStruct, AddrReturnCode, check_sizes};
use crate::{AddrLib, AddrLibBuilder, ChipFamily};
use alloc::boxed::Box;
use gpu_addrlib_common::AddrError;

/// Opaque library handle.
///
/// - Created with [`addr_create()`]
/// - Passed to every `addr3_*` operation
/// - Freed with [`addr_destroy()`] when no longer needed
///
/// A handle is immutable after creation and may be used from several
/// threads at once.
#[repr(C)]
pub struct AddrHandle {
    // Private field to ensure it's opaque
    _private: [u8; 0],
}

/// Internal representation of the handle
pub(crate) struct AddrContext {
    pub(crate) lib: AddrLib,
    pub(crate) fill_size_fields: bool,
}

/// Input of [`addr_create()`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AddrCreateInput {
    /// `sizeof(AddrCreateInput)`
    pub size: u32,
    /// [`ChipFamily`] discriminant.
    pub chip_family: u32,
    /// Number of pipes. A power of two between 1 and 64.
    pub num_pipes: u32,
    /// Pipe interleave in bytes: 256, 512, 1024 or 2048.
    pub pipe_interleave_bytes: u32,
    /// Check the `size` field of every structure passed to this handle.
    pub fill_size_fields: bool,
}

impl AbiStruct for AddrCreateInput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl Default for AddrCreateInput {
    fn default() -> Self {
        Self {
            size: Self::abi_size(),
            chip_family: ChipFamily::Gfx12 as u32,
            num_pipes: 16,
            pipe_interleave_bytes: 256,
            fill_size_fields: false,
        }
    }
}

/// Create a library instance.
///
/// Diagnostics are reported through `tracing`.
///
/// # Parameters
/// - `input`: The chip configuration
/// - `handle`: Receives the new handle on success
///
/// # Safety
/// - `input` must be null or point to a valid [`AddrCreateInput`]
/// - `handle` must be null or point to writable storage for a pointer
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr_create(
    input: *const AddrCreateInput,
    handle: *mut *mut AddrHandle,
) -> AddrReturnCode {
    if input.is_null() {
        return AddrReturnCode::NullInput;
    }
    if handle.is_null() {
        return AddrReturnCode::NullOutput;
    }

    let input = unsafe { &*input };
    match create_context(input) {
        Ok(context) => {
            unsafe { handle.write(Box::into_raw(Box::new(context)) as *mut AddrHandle) };
            AddrReturnCode::Ok
        }
        Err(e) => e.into(),
    }
}

fn create_context(input: &AddrCreateInput) -> Result<AddrContext, AddrError> {
    check_sizes::<AddrCreateInput>(input.fill_size_fields, input.size)?;
    let family = ChipFamily::from_u32(input.chip_family)
        .ok_or(AddrError::InvalidParams("unknown chip family"))?;
    let lib = AddrLibBuilder::new()
        .chip_family(family)
        .num_pipes(input.num_pipes)
        .pipe_interleave_bytes(input.pipe_interleave_bytes)
        .fill_size_fields(input.fill_size_fields)
        .build()?;
    Ok(AddrContext {
        lib,
        fill_size_fields: input.fill_size_fields,
    })
}

/// Free a library instance.
///
/// # Safety
/// - `handle` must be null or a pointer returned by [`addr_create()`]
/// - `handle` must not have been freed already
/// - After calling this function, `handle` becomes invalid
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr_destroy(handle: *mut AddrHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle as *mut AddrContext));
        }
    }
}

/// Get the context behind a handle.
///
/// # Safety
/// - `handle` must be a live pointer returned by [`addr_create()`]
pub(crate) unsafe fn get_context<'a>(handle: *const AddrHandle) -> &'a AddrContext {
    debug_assert!(!handle.is_null());
    unsafe { &*(handle as *const AddrContext) }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use core::ptr;

    #[test]
    fn create_and_destroy() {
        let handle = test_support::create(true);
        let context = unsafe { get_context(handle) };
        assert!(context.fill_size_fields);
        assert_eq!(context.lib.chip_family(), ChipFamily::Gfx12);
        unsafe { addr_destroy(handle) };
        unsafe { addr_destroy(ptr::null_mut()) };
    }

    #[rstest]
    #[case(AddrCreateInput { num_pipes: 3, ..Default::default() }, AddrReturnCode::InvalidParams)]
    #[case(AddrCreateInput { chip_family: 9, ..Default::default() }, AddrReturnCode::InvalidParams)]
    #[case(AddrCreateInput { size: 4, fill_size_fields: true, ..Default::default() }, AddrReturnCode::ParamSizeMismatch)]
    #[case(AddrCreateInput { size: 4, ..Default::default() }, AddrReturnCode::Ok)]
    fn create_validates_input(#[case] input: AddrCreateInput, #[case] expected: AddrReturnCode) {
        let mut handle = ptr::null_mut();
        assert_eq!(unsafe { addr_create(&input, &mut handle) }, expected);
        assert_eq!(handle.is_null(), expected != AddrReturnCode::Ok);
        unsafe { addr_destroy(handle) };
    }

    #[test]
    fn create_rejects_null_pointers() {
        let mut handle = ptr::null_mut();
        assert_eq!(
            unsafe { addr_create(ptr::null(), &mut handle) },
            AddrReturnCode::NullInput
        );
        assert_eq!(
            unsafe { addr_create(&AddrCreateInput::default(), ptr::null_mut()) },
            AddrReturnCode::NullOutput
        );
    }
}
