//! Error types shared by every layer of the address library.

use thiserror::Error;

/// Errors returned by address library operations.
///
/// Every public computation either fully succeeds or returns one of these;
/// output values are never partially filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddrError {
    /// The combination of parameters is outside the domain of the operation.
    /// This includes swizzle modes, sample counts and element sizes that have
    /// no address equation.
    #[error("Invalid parameters: {0}")]
    InvalidParams(&'static str),

    /// The hardware does not support the requested operation for these
    /// parameters.
    #[error("Operation not supported: {0}")]
    NotSupported(&'static str),

    /// The operation is valid but has not been implemented for these parameters.
    #[error("Operation not implemented: {0}")]
    NotImplemented(&'static str),

    /// A caller supplied structure declared a size that differs from the
    /// compiled structure size.
    #[error("Structure size mismatch: expected {expected} bytes, got {actual} bytes")]
    ParamSizeMismatch {
        /// The compiled size of the structure, in bytes
        expected: u32,
        /// The size the caller declared, in bytes
        actual: u32,
    },
}

impl AddrError {
    /// Checks a caller declared structure size against the compiled size.
    ///
    /// Only performed when size checking is enabled, mirroring the
    /// `fill_size_fields` library option.
    pub fn check_size(enabled: bool, expected: usize, actual: u32) -> Result<(), AddrError> {
        if enabled && expected as u32 != actual {
            return Err(AddrError::ParamSizeMismatch {
                expected: expected as u32,
                actual,
            });
        }
        Ok(())
    }
}
