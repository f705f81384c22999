//! Swizzle mode selection.

use crate::c_api::{AbiStruct, AddrHandle, AddrReturnCode, decode_resource_type, run};
use gpu_addrlib_common::types::SurfaceFlags;
use gpu_addrlib_gfx12::PossibleSwizzleModesInput;

/// Input of [`addr3_get_possible_swizzle_modes()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3PossibleSwizzleModesInput {
    /// `sizeof(Addr3PossibleSwizzleModesInput)`
    pub size: u32,
    /// Raw surface flag bits
    pub flags: u32,
    /// Resource type discriminant
    pub resource_type: u32,
    /// Bits per element
    pub bpp: u32,
    /// Width of mip 0
    pub width: u32,
    /// Height of mip 0
    pub height: u32,
    /// Array slices, or depth of a volume
    pub num_slices: u32,
    /// Number of mip levels
    pub num_mip_levels: u32,
    /// MSAA sample count
    pub num_samples: u32,
    /// Largest base alignment accepted, 0 for no limit
    pub max_align: u32,
}

/// Output of [`addr3_get_possible_swizzle_modes()`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Addr3PossibleSwizzleModesOutput {
    /// `sizeof(Addr3PossibleSwizzleModesOutput)`
    pub size: u32,
    /// Bit `n` is set when the swizzle mode with discriminant `n` is usable
    pub valid_modes: u32,
}

/// List the swizzle modes a surface may use.
///
/// # Safety
/// - `handle` must be a live handle from [`addr_create()`](crate::c_api::handle::addr_create)
/// - `input` must point to a valid [`Addr3PossibleSwizzleModesInput`]
/// - `output` must point to an initialised [`Addr3PossibleSwizzleModesOutput`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn addr3_get_possible_swizzle_modes(
    handle: *const AddrHandle,
    input: *const Addr3PossibleSwizzleModesInput,
    output: *mut Addr3PossibleSwizzleModesOutput,
) -> AddrReturnCode {
    unsafe {
        run(handle, input, output, |lib, input| {
            let modes = lib.get_possible_swizzle_modes(&PossibleSwizzleModesInput {
                flags: SurfaceFlags::from_bits(input.flags),
                resource_type: decode_resource_type(input.resource_type)?,
                bpp: input.bpp,
                width: input.width,
                height: input.height,
                num_slices: input.num_slices,
                num_mip_levels: input.num_mip_levels,
                num_samples: input.num_samples,
                max_align: input.max_align,
            })?;
            Ok(Addr3PossibleSwizzleModesOutput {
                size: Addr3PossibleSwizzleModesOutput::abi_size(),
                valid_modes: modes.bits(),
            })
        })
    }
}

impl AbiStruct for Addr3PossibleSwizzleModesInput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

impl AbiStruct for Addr3PossibleSwizzleModesOutput {
    fn declared_size(&self) -> u32 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c_api::handle::{addr_destroy, test_support};
    use crate::test_prelude::*;

    fn query(input: &Addr3PossibleSwizzleModesInput) -> (AddrReturnCode, u32) {
        let handle = test_support::create(false);
        let mut output = Addr3PossibleSwizzleModesOutput::default();
        let code = unsafe { addr3_get_possible_swizzle_modes(handle, input, &mut output) };
        unsafe { addr_destroy(handle) };
        (code, output.valid_modes)
    }

    #[test]
    fn modes_come_back_as_bits() {
        let input = Addr3PossibleSwizzleModesInput {
            resource_type: ResourceType::Tex3d as u32,
            bpp: 32,
            width: 64,
            height: 64,
            num_slices: 64,
            num_mip_levels: 1,
            num_samples: 1,
            ..Default::default()
        };
        let expected = [
            SwizzleMode::Linear,
            SwizzleMode::Sw4Kb3d,
            SwizzleMode::Sw64Kb3d,
            SwizzleMode::Sw256Kb3d,
        ]
        .iter()
        .fold(0, |bits, mode| bits | 1 << *mode as u32);
        assert_eq!(query(&input), (AddrReturnCode::Ok, expected));
    }

    #[test]
    fn invalid_surfaces_are_rejected() {
        let input = Addr3PossibleSwizzleModesInput {
            resource_type: ResourceType::Tex3d as u32,
            bpp: 32,
            width: 64,
            height: 64,
            num_slices: 1,
            num_mip_levels: 1,
            num_samples: 4,
            ..Default::default()
        };
        assert_eq!(query(&input).0, AddrReturnCode::InvalidParams);
    }
}
