//! C API error handling.

use core::ffi::c_char;
use gpu_addrlib_common::AddrError;

/// C-compatible return codes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrReturnCode {
    /// Operation succeeded
    Ok = 0,
    /// Unspecified failure
    Error = 1,
    /// Memory allocation failed
    OutOfMemory = 2,
    /// Parameters outside the domain of the operation
    InvalidParams = 3,
    /// The hardware does not support the operation for these parameters
    NotSupported = 4,
    /// The operation is not implemented for these parameters
    NotImplemented = 5,
    /// A structure's `size` field does not match its compiled size
    ParamSizeMismatch = 6,
    /// Null pointer provided for the library handle
    NullHandle = 7,
    /// Null pointer provided for an input structure
    NullInput = 8,
    /// Null pointer provided for an output structure
    NullOutput = 9,
    /// Null pointer provided for a memory buffer
    NullBuffer = 10,
}

impl From<AddrError> for AddrReturnCode {
    fn from(error: AddrError) -> Self {
        match error {
            AddrError::InvalidParams(_) => Self::InvalidParams,
            AddrError::NotSupported(_) => Self::NotSupported,
            AddrError::NotImplemented(_) => Self::NotImplemented,
            AddrError::ParamSizeMismatch { .. } => Self::ParamSizeMismatch,
        }
    }
}

impl<T> From<Result<T, AddrError>> for AddrReturnCode {
    fn from(result: Result<T, AddrError>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) => e.into(),
        }
    }
}

/// Human readable description of a return code.
///
/// The returned string is static and NUL terminated; it must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn addr_error_message(code: AddrReturnCode) -> *const c_char {
    let message = match code {
        AddrReturnCode::Ok => c"Operation succeeded",
        AddrReturnCode::Error => c"Operation failed",
        AddrReturnCode::OutOfMemory => c"Memory allocation failed",
        AddrReturnCode::InvalidParams => c"Invalid parameters",
        AddrReturnCode::NotSupported => c"Operation not supported",
        AddrReturnCode::NotImplemented => c"Operation not implemented",
        AddrReturnCode::ParamSizeMismatch => c"Structure size mismatch",
        AddrReturnCode::NullHandle => c"Null library handle",
        AddrReturnCode::NullInput => c"Null input structure",
        AddrReturnCode::NullOutput => c"Null output structure",
        AddrReturnCode::NullBuffer => c"Null memory buffer",
    };
    message.as_ptr()
}
