//! Pipe/bank xor.

use crate::c_api::{AbiStruct, AddrHandle, AddrReturnCode, decode_swizzle_mode, run};
use gpu_addrlib_gfx12::{PipeBankXorInput, SlicePipeBankXorInput};

/// Input of [`addr3_compute_pipe_bank_xor()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3PipeBankXorInput {
    /// `sizeof(Addr3PipeBankXorInput)`
    pub size: u32,
    /// Index of the surface among those the caller allocates
    pub surf_index: u32,
    /// Swizzle mode discriminant
    pub swizzle_mode: u32,
}

/// Input of [`addr3_compute_slice_pipe_bank_xor()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3SlicePipeBankXorInput {
    /// `sizeof(Addr3SlicePipeBankXorInput)`
    pub size: u32,
    /// Swizzle mode discriminant
    pub swizzle_mode: u32,
    /// Bits per element
    pub bpe: u32,
    /// Slice whose xor is wanted
    pub slice: u32,
    /// Pipe/bank xor of the whole surface
    pub base_pipe_bank_xor: u32,
    /// MSAA sample count
    pub num_samples: u32,
}

/// Output of both pipe/bank xor operations.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3PipeBankXorOutput {
    /// `sizeof(Addr3PipeBankXorOutput)`
    pub size: u32,
    /// The pipe/bank xor
    pub pipe_bank_xor: u32,
}

impl Addr3PipeBankXorOutput {
    fn new(pipe_bank_xor: u32) -> Self {
        Self {
            size: Self::abi_size(),
            pipe_bank_xor,
        }
    }
}

/// Compute the pipe/bank xor of a surface.
///
/// # Safety
/// - `handle` must be a live handle from [`addr_create()`](crate::c_api::handle::addr_create)
/// - `input` must point to a valid [`Addr3PipeBankXorInput`]
/// - `output` must point to an initialised [`Addr3PipeBankXorOutput`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr3_compute_pipe_bank_xor(
    handle: *const AddrHandle,
    input: *const Addr3PipeBankXorInput,
    output: *mut Addr3PipeBankXorOutput,
) -> AddrReturnCode {
    unsafe {
        run(handle, input, output, |lib, input| {
            let xor = lib.compute_pipe_bank_xor(&PipeBankXorInput {
                surf_index: input.surf_index,
                swizzle_mode: decode_swizzle_mode(input.swizzle_mode)?,
            });
            Ok(Addr3PipeBankXorOutput::new(xor))
        })
    }
}

/// Compute the pipe/bank xor of one slice of a surface.
///
/// # Safety
/// - `handle` must be a live handle from [`addr_create()`](crate::c_api::handle::addr_create)
/// - `input` must point to a valid [`Addr3SlicePipeBankXorInput`]
/// - `output` must point to an initialised [`Addr3PipeBankXorOutput`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr3_compute_slice_pipe_bank_xor(
    handle: *const AddrHandle,
    input: *const Addr3SlicePipeBankXorInput,
    output: *mut Addr3PipeBankXorOutput,
) -> AddrReturnCode {
    unsafe {
        run(handle, input, output, |lib, input| {
            let xor = lib.compute_slice_pipe_bank_xor(&SlicePipeBankXorInput {
                swizzle_mode: decode_swizzle_mode(input.swizzle_mode)?,
                bpe: input.bpe,
                slice: input.slice,
                base_pipe_bank_xor: input.base_pipe_bank_xor,
                num_samples: input.num_samples,
            })?;
            Ok(Addr3PipeBankXorOutput::new(xor))
        })
    }
}

impl AbiStruct for Addr3PipeBankXorInput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3SlicePipeBankXorInput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3PipeBankXorOutput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c_api::handle::{addr_destroy, test_support};
    use crate::test_prelude::*;

    #[rstest]
    #[case(SwizzleMode::Linear, 5, 0)]
    #[case(SwizzleMode::Sw256B2d, 5, 0)]
    #[case(SwizzleMode::Sw64Kb2d, 5, 1)]
    #[case(SwizzleMode::Sw4Kb2d, 6, 2)]
    fn surface_xor(#[case] mode: SwizzleMode, #[case] index: u32, #[case] expected: u32) {
        let handle = test_support::create(false);
        let input = Addr3PipeBankXorInput {
            surf_index: index,
            swizzle_mode: mode as u32,
            ..Default::default()
        };
        let mut output = Addr3PipeBankXorOutput::default();
        assert_eq!(
            unsafe { addr3_compute_pipe_bank_xor(handle, &input, &mut output) },
            AddrReturnCode::Ok
        );
        assert_eq!(output.pipe_bank_xor, expected);
        unsafe { addr_destroy(handle) };
    }

    #[test]
    fn slice_xor_reports_bad_element_sizes() {
        let handle = test_support::create(false);
        let mut input = Addr3SlicePipeBankXorInput {
            swizzle_mode: SwizzleMode::Sw64Kb3d as u32,
            bpe: 32,
            slice: 0,
            base_pipe_bank_xor: 3,
            num_samples: 1,
            ..Default::default()
        };
        let mut output = Addr3PipeBankXorOutput::default();
        assert_eq!(
            unsafe { addr3_compute_slice_pipe_bank_xor(handle, &input, &mut output) },
            AddrReturnCode::Ok
        );
        assert_eq!(output.pipe_bank_xor, 3);

        input.bpe = 24;
        assert_eq!(
            unsafe { addr3_compute_slice_pipe_bank_xor(handle, &input, &mut output) },
            AddrReturnCode::InvalidParams
        );
        unsafe { addr_destroy(handle) };
    }
}
