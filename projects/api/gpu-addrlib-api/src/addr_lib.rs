//! The library instance, dispatching to the hardware generation it was
//! built for.

use crate::builder::{ChipFamily, LibConfig};
use alloc::boxed::Box;
use gpu_addrlib_common::AddrError;
use gpu_addrlib_common::diagnostics::DiagnosticSink;
use gpu_addrlib_common::equation::Equation;
use gpu_addrlib_gfx12::{
    AddrFromCoordInput, AddrFromCoordOutput, CoordFromAddrInput, CoordFromAddrOutput,
    CopyRegion, CopySurfaceInput, Gfx12Config, Gfx12Lib, NbcViewInput, NbcViewOutput,
    PipeBankXorInput, PossibleSwizzleModesInput, SlicePipeBankXorInput, SubResourceOffsetInput,
    SurfaceInfoInput, SurfaceInfoOutput, SwizzleMode, SwizzleModeSet,
};

/// An address library instance.
///
/// Built once by [`AddrLibBuilder`](crate::AddrLibBuilder) and read-only
/// afterwards; every query is a pure function of its input and the tables
/// built at construction.
#[derive(Debug)]
#[non_exhaustive]
pub enum AddrLib {
    /// Gfx12 hardware.
    Gfx12(Gfx12Lib),
}

impl AddrLib {
    /// Creates a library for `config`, reporting diagnostics to `sink`.
    ///
    /// # Errors
    ///
    /// [`AddrError::InvalidParams`] when the configuration is not one the
    /// hardware supports.
    pub fn new(config: LibConfig, sink: Box<dyn DiagnosticSink>) -> Result<Self, AddrError> {
        match config.chip_family {
            ChipFamily::Gfx12 => {
                let gfx12 = Gfx12Config {
                    num_pipes: config.num_pipes,
                    pipe_interleave_bytes: config.pipe_interleave_bytes,
                };
                Ok(Self::Gfx12(Gfx12Lib::new(gfx12, sink)?))
            }
        }
    }

    /// Hardware generation of this instance.
    pub fn chip_family(&self) -> ChipFamily {
        match self {
            Self::Gfx12(_) => ChipFamily::Gfx12,
        }
    }

    /// Layout of a surface.
    ///
    /// # Errors
    ///
    /// See [`Gfx12Lib::compute_surface_info`].
    pub fn compute_surface_info(&self, input: &SurfaceInfoInput) -> Result<SurfaceInfoOutput, AddrError> {
        match self {
            Self::Gfx12(lib) => lib.compute_surface_info(input),
        }
    }

    /// Byte address of an element.
    ///
    /// # Errors
    ///
    /// See [`Gfx12Lib::compute_surface_addr_from_coord`].
    pub fn compute_surface_addr_from_coord(
        &self,
        input: &AddrFromCoordInput,
    ) -> Result<AddrFromCoordOutput, AddrError> {
        match self {
            Self::Gfx12(lib) => lib.compute_surface_addr_from_coord(input),
        }
    }

    /// Element at a byte address.
    ///
    /// # Errors
    ///
    /// See [`Gfx12Lib::compute_surface_coord_from_addr`].
    pub fn compute_surface_coord_from_addr(
        &self,
        input: &CoordFromAddrInput,
    ) -> Result<CoordFromAddrOutput, AddrError> {
        match self {
            Self::Gfx12(lib) => lib.compute_surface_coord_from_addr(input),
        }
    }

    /// Pipe/bank xor of a surface.
    pub fn compute_pipe_bank_xor(&self, input: &PipeBankXorInput) -> u32 {
        match self {
            Self::Gfx12(lib) => lib.compute_pipe_bank_xor(input),
        }
    }

    /// Pipe/bank xor of one slice of a surface.
    ///
    /// # Errors
    ///
    /// See [`Gfx12Lib::compute_slice_pipe_bank_xor`].
    pub fn compute_slice_pipe_bank_xor(&self, input: &SlicePipeBankXorInput) -> Result<u32, AddrError> {
        match self {
            Self::Gfx12(lib) => lib.compute_slice_pipe_bank_xor(input),
        }
    }

    /// Byte offset of a sub-resource from the surface base.
    ///
    /// # Errors
    ///
    /// See [`Gfx12Lib::compute_sub_resource_offset_for_swizzle_pattern`].
    pub fn compute_sub_resource_offset_for_swizzle_pattern(
        &self,
        input: &SubResourceOffsetInput,
    ) -> Result<u64, AddrError> {
        match self {
            Self::Gfx12(lib) => lib.compute_sub_resource_offset_for_swizzle_pattern(input),
        }
    }

    /// Uncompressed view of one sub-resource of a block compressed surface.
    ///
    /// # Errors
    ///
    /// See [`Gfx12Lib::compute_non_block_compressed_view`].
    pub fn compute_non_block_compressed_view(&self, input: &NbcViewInput) -> Result<NbcViewOutput, AddrError> {
        match self {
            Self::Gfx12(lib) => lib.compute_non_block_compressed_view(input),
        }
    }

    /// Swizzle modes a surface may use.
    ///
    /// # Errors
    ///
    /// See [`Gfx12Lib::get_possible_swizzle_modes`].
    pub fn get_possible_swizzle_modes(
        &self,
        input: &PossibleSwizzleModesInput,
    ) -> Result<SwizzleModeSet, AddrError> {
        match self {
            Self::Gfx12(lib) => lib.get_possible_swizzle_modes(input),
        }
    }

    /// Copies boxes of linear memory into a mapped surface.
    ///
    /// # Errors
    ///
    /// See [`Gfx12Lib::copy_mem_to_surface`].
    pub fn copy_mem_to_surface(
        &self,
        input: &CopySurfaceInput,
        regions: &[CopyRegion<&[u8]>],
        surface: &mut [u8],
    ) -> Result<(), AddrError> {
        match self {
            Self::Gfx12(lib) => lib.copy_mem_to_surface(input, regions, surface),
        }
    }

    /// Copies boxes of a mapped surface into linear memory.
    ///
    /// # Errors
    ///
    /// See [`Gfx12Lib::copy_surface_to_mem`].
    pub fn copy_surface_to_mem(
        &self,
        input: &CopySurfaceInput,
        regions: &mut [CopyRegion<&mut [u8]>],
        surface: &[u8],
    ) -> Result<(), AddrError> {
        match self {
            Self::Gfx12(lib) => lib.copy_surface_to_mem(input, regions, surface),
        }
    }

    /// Address equation of a swizzle mode, sample count and element size,
    /// with its table index.
    ///
    /// `None` for linear surfaces and combinations without an equation.
    pub fn equation(&self, mode: SwizzleMode, samples_log2: u32, elem_log2: u32) -> Option<(u32, &Equation)> {
        match self {
            Self::Gfx12(lib) => {
                let index = lib.equation_index(mode, samples_log2, elem_log2);
                lib.equation(index).map(|eq| (index, eq))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn dispatches_to_gfx12() {
        let lib = lib();
        assert_eq!(lib.chip_family(), ChipFamily::Gfx12);

        let input = SurfaceInfoInput {
            swizzle_mode: SwizzleMode::Sw4Kb2d,
            resource_type: ResourceType::Tex2d,
            bpp: 32,
            width: 64,
            height: 64,
            num_slices: 1,
            num_mip_levels: 1,
            num_samples: 1,
            ..Default::default()
        };
        let info = lib.compute_surface_info(&input).unwrap();
        assert_eq!(info.base_align, 4096);
        assert_eq!(info.block_extent, Extent3d::new(32, 32, 1));
    }

    #[rstest]
    #[case(SwizzleMode::Sw4Kb2d, 0, 2, true)]
    #[case(SwizzleMode::Sw256Kb3d, 0, 4, true)]
    #[case(SwizzleMode::Linear, 0, 2, false)]
    #[case(SwizzleMode::Sw64Kb3d, 2, 2, false)]
    fn equation_lookup(
        #[case] mode: SwizzleMode,
        #[case] samples_log2: u32,
        #[case] elem_log2: u32,
        #[case] found: bool,
    ) {
        assert_eq!(lib().equation(mode, samples_log2, elem_log2).is_some(), found);
    }
}
