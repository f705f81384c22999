use crate::gfx12_lib::Gfx12Lib;
use crate::surface::SurfaceInfoInput;
use crate::swizzle_mode::SwizzleMode;
use gpu_addrlib_common::equation::INVALID_EQUATION_INDEX;
use gpu_addrlib_common::math::{is_pow2, log2};
use gpu_addrlib_common::AddrError;

/// Input of [`Gfx12Lib::compute_pipe_bank_xor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipeBankXorInput {
    /// Index of the surface among the surfaces the caller allocates. Spreads
    /// consecutive surfaces across pipes.
    pub surf_index: u32,
    /// Swizzle mode of the surface.
    pub swizzle_mode: SwizzleMode,
}

/// Input of [`Gfx12Lib::compute_slice_pipe_bank_xor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlicePipeBankXorInput {
    /// Swizzle mode of the surface.
    pub swizzle_mode: SwizzleMode,
    /// Bits per element.
    pub bpe: u32,
    /// Slice whose xor is wanted.
    pub slice: u32,
    /// Pipe/bank xor of the whole surface.
    pub base_pipe_bank_xor: u32,
    /// MSAA sample count.
    pub num_samples: u32,
}

/// Input of [`Gfx12Lib::compute_sub_resource_offset_for_swizzle_pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubResourceOffsetInput {
    /// The surface.
    pub surface: SurfaceInfoInput,
    /// Slice of the sub-resource.
    pub slice: u32,
    /// Mip of the sub-resource.
    pub mip: u32,
}

impl Gfx12Lib {
    /// Pipe/bank xor of a surface.
    ///
    /// Zero for linear and 256B surfaces, and on chips without swizzle bits.
    pub fn compute_pipe_bank_xor(&self, input: &PipeBankXorInput) -> u32 {
        let bits = self.num_swizzle_bits();
        let mode = input.swizzle_mode;
        if bits == 0 || mode.is_linear() || mode.is_256b() {
            return 0;
        }
        input.surf_index % (1 << bits)
    }

    /// Pipe/bank xor of one slice of a surface.
    ///
    /// # Errors
    ///
    /// - [`AddrError::InvalidParams`] for element sizes other than 8 to 128
    ///   bits in powers of two, and for sample counts that are not a power
    ///   of two.
    /// - [`AddrError::NotSupported`] when the mode has no pattern for the
    ///   element size.
    pub fn compute_slice_pipe_bank_xor(&self, input: &SlicePipeBankXorInput) -> Result<u32, AddrError> {
        let mode = input.swizzle_mode;
        if mode.is_linear() || mode.is_256b() {
            return Ok(0);
        }
        if input.bpe == 0 {
            return Err(AddrError::InvalidParams("element size must not be zero"));
        }
        if !matches!(input.bpe, 8 | 16 | 32 | 64 | 128) {
            return Err(AddrError::InvalidParams("element size must be 8 to 128 bits"));
        }

        let elem_log2 = log2(input.bpe >> 3);
        if self.equation_index(mode, 0, elem_log2) == INVALID_EQUATION_INDEX {
            return Err(AddrError::NotSupported("no swizzle pattern for this element size"));
        }

        let samples = input.num_samples.max(1);
        if !is_pow2(samples) {
            return Err(AddrError::InvalidParams("sample count must be a power of two"));
        }
        let samples_log2 = log2(samples);
        let eq = self
            .equation(self.equation_index(mode, samples_log2, elem_log2))
            .ok_or(AddrError::InvalidParams("no equation for this sample count"))?;

        let offset = eq.compute_offset(0, 0, input.slice, 0);
        let interleave_log2 = self.pipe_interleave_log2();
        let xor = offset >> interleave_log2;
        if xor << interleave_log2 != offset {
            self.sink().warn(format_args!(
                "slice {} offset {:#x} has bits below the pipe interleave",
                input.slice, offset
            ));
        }
        Ok(input.base_pipe_bank_xor ^ xor)
    }

    /// Byte offset of a sub-resource from the surface base, as used when
    /// binding it with its own swizzle pattern.
    ///
    /// # Errors
    ///
    /// Any error of [`Gfx12Lib::compute_surface_info`], and
    /// [`AddrError::InvalidParams`] when `mip` is out of range.
    pub fn compute_sub_resource_offset_for_swizzle_pattern(
        &self,
        input: &SubResourceOffsetInput,
    ) -> Result<u64, AddrError> {
        let info = self.compute_surface_info(&input.surface)?;
        let mip = info
            .mips()
            .get(input.mip as usize)
            .ok_or(AddrError::InvalidParams("mip out of range"))?;
        Ok(input.slice as u64 * info.slice_size + mip.macro_block_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx12_lib::Gfx12Config;
    use crate::test_prelude::*;

    fn lib_with_pipes(num_pipes: u32) -> Gfx12Lib {
        Gfx12Lib::new(
            Gfx12Config {
                num_pipes,
                ..Default::default()
            },
            Box::new(NullSink),
        )
        .unwrap()
    }

    #[rstest]
    #[case(SwizzleMode::Linear)]
    #[case(SwizzleMode::Sw256B2d)]
    fn small_blocks_never_get_an_xor(#[case] mode: SwizzleMode) {
        let lib = lib();
        for surf_index in 0..64 {
            let input = PipeBankXorInput {
                surf_index,
                swizzle_mode: mode,
            };
            assert_eq!(lib.compute_pipe_bank_xor(&input), 0);
        }
    }

    #[rstest]
    #[case(16, 5, 1)]
    #[case(16, 7, 3)]
    #[case(64, 21, 5)]
    #[case(4, 7, 0)]
    fn surface_xor_wraps_at_swizzle_bits(#[case] pipes: u32, #[case] index: u32, #[case] expected: u32) {
        let input = PipeBankXorInput {
            surf_index: index,
            swizzle_mode: SwizzleMode::Sw64Kb2d,
        };
        assert_eq!(lib_with_pipes(pipes).compute_pipe_bank_xor(&input), expected);
    }

    // 32bpp 64KB 3D blocks put z0..z3 at address bits 5, 7, 10 and 13, so
    // only z2 and z3 reach above the 256 byte interleave.
    #[rstest]
    #[case(0, 3)]
    #[case(4, 7)]
    #[case(8, 35)]
    #[case(12, 39)]
    #[case(16, 3)]
    #[case(28, 39)]
    fn slice_xor_of_64kb_volumes(#[case] slice: u32, #[case] expected: u32) {
        let sink = RecordingSink::default();
        let lib = lib_with_sink(sink.clone());
        let input = SlicePipeBankXorInput {
            swizzle_mode: SwizzleMode::Sw64Kb3d,
            bpe: 32,
            slice,
            base_pipe_bank_xor: 3,
            num_samples: 1,
        };
        assert_eq!(lib.compute_slice_pipe_bank_xor(&input), Ok(expected));
        assert!(sink.warnings().is_empty());
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    fn slices_below_the_interleave_are_reported(#[case] slice: u32) {
        let sink = RecordingSink::default();
        let lib = lib_with_sink(sink.clone());
        let input = SlicePipeBankXorInput {
            swizzle_mode: SwizzleMode::Sw64Kb3d,
            bpe: 32,
            slice,
            base_pipe_bank_xor: 3,
            num_samples: 1,
        };
        let expected = if slice == 5 { 7 } else { 3 };
        assert_eq!(lib.compute_slice_pipe_bank_xor(&input), Ok(expected));
        assert_eq!(sink.warnings().len(), 1);
    }

    #[rstest]
    #[case(3)]
    #[case(6)]
    fn slice_xor_rejects_odd_sample_counts(#[case] num_samples: u32) {
        let input = SlicePipeBankXorInput {
            swizzle_mode: SwizzleMode::Sw64Kb2d,
            bpe: 32,
            slice: 1,
            base_pipe_bank_xor: 0,
            num_samples,
        };
        assert!(matches!(
            lib().compute_slice_pipe_bank_xor(&input),
            Err(AddrError::InvalidParams(_))
        ));
    }

    #[test]
    fn slice_xor_rejects_bad_elements() {
        let lib = lib();
        let mut input = SlicePipeBankXorInput {
            swizzle_mode: SwizzleMode::Sw4Kb2d,
            bpe: 0,
            slice: 1,
            base_pipe_bank_xor: 0,
            num_samples: 1,
        };
        assert!(matches!(
            lib.compute_slice_pipe_bank_xor(&input),
            Err(AddrError::InvalidParams(_))
        ));
        input.bpe = 24;
        assert!(lib.compute_slice_pipe_bank_xor(&input).is_err());
        input.swizzle_mode = SwizzleMode::Linear;
        assert_eq!(lib.compute_slice_pipe_bank_xor(&input), Ok(0));
    }

    #[test]
    fn sub_resource_offset() {
        let lib = lib();
        let surface = SurfaceInfoInput {
            num_mip_levels: 8,
            num_slices: 4,
            ..surface(SwizzleMode::Sw64Kb2d, 32, 2048, 2048)
        };
        let info = lib.compute_surface_info(&surface).unwrap();
        let input = SubResourceOffsetInput { surface, slice: 2, mip: 1 };
        assert_eq!(
            lib.compute_sub_resource_offset_for_swizzle_pattern(&input).unwrap(),
            2 * info.slice_size + info.mips()[1].macro_block_offset
        );
        let out_of_range = SubResourceOffsetInput { mip: 8, ..input };
        assert!(lib
            .compute_sub_resource_offset_for_swizzle_pattern(&out_of_range)
            .is_err());
    }
}
