//! The Gfx12 library instance: chip configuration plus the tables built
//! from it.

use crate::block::BlockDimensionTable;
use crate::equation_table::EquationTable;
use crate::swizzle_mode::SwizzleMode;
use alloc::boxed::Box;
use core::fmt;
use gpu_addrlib_common::diagnostics::DiagnosticSink;
use gpu_addrlib_common::equation::Equation;
use gpu_addrlib_common::math::{is_pow2, log2};
use gpu_addrlib_common::types::Extent3d;
use gpu_addrlib_common::AddrError;

/// Chip configuration of a Gfx12 part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gfx12Config {
    /// Number of pipes. A power of two between 1 and 64.
    pub num_pipes: u32,
    /// Pipe interleave in bytes: 256, 512, 1024 or 2048.
    pub pipe_interleave_bytes: u32,
}

impl Default for Gfx12Config {
    fn default() -> Self {
        Self {
            num_pipes: 16,
            pipe_interleave_bytes: 256,
        }
    }
}

/// Gfx12 address library.
///
/// Owns the block dimension and equation tables. They are built in
/// [`Gfx12Lib::new`] and never change afterwards, so a single instance can
/// serve queries from any number of threads.
pub struct Gfx12Lib {
    pipes_log2: u32,
    pipe_interleave_log2: u32,
    num_swizzle_bits: u32,
    block_dims: BlockDimensionTable,
    equations: EquationTable,
    sink: Box<dyn DiagnosticSink>,
}

impl Gfx12Lib {
    /// Creates a library for the given chip configuration.
    ///
    /// # Errors
    ///
    /// [`AddrError::InvalidParams`] when the pipe count or pipe interleave
    /// is not one the hardware supports.
    pub fn new(config: Gfx12Config, sink: Box<dyn DiagnosticSink>) -> Result<Self, AddrError> {
        if !is_pow2(config.num_pipes) || config.num_pipes > 64 {
            return Err(AddrError::InvalidParams(
                "pipe count must be a power of two between 1 and 64",
            ));
        }
        if !matches!(config.pipe_interleave_bytes, 256 | 512 | 1024 | 2048) {
            return Err(AddrError::InvalidParams(
                "pipe interleave must be 256, 512, 1024 or 2048 bytes",
            ));
        }

        let pipes_log2 = log2(config.num_pipes);
        let pipe_interleave_log2 = log2(config.pipe_interleave_bytes);
        let num_swizzle_bits = if pipes_log2 >= 3 { pipes_log2 - 2 } else { 0 };

        let block_dims = BlockDimensionTable::new();
        let equations = EquationTable::new();
        sink.info(format_args!(
            "built {} address equations for {} pipes, {} byte interleave",
            equations.len(),
            config.num_pipes,
            config.pipe_interleave_bytes
        ));

        Ok(Self {
            pipes_log2,
            pipe_interleave_log2,
            num_swizzle_bits,
            block_dims,
            equations,
            sink,
        })
    }

    /// Log2 of the pipe count.
    #[inline]
    pub fn pipes_log2(&self) -> u32 {
        self.pipes_log2
    }

    /// Log2 of the pipe interleave in bytes.
    #[inline]
    pub fn pipe_interleave_log2(&self) -> u32 {
        self.pipe_interleave_log2
    }

    /// Number of pipe/bank xor bits a surface can be given.
    #[inline]
    pub fn num_swizzle_bits(&self) -> u32 {
        self.num_swizzle_bits
    }

    /// The equation table.
    #[inline]
    pub fn equation_table(&self) -> &EquationTable {
        &self.equations
    }

    /// Equation index for a combination, or
    /// [`INVALID_EQUATION_INDEX`](gpu_addrlib_common::equation::INVALID_EQUATION_INDEX).
    #[inline]
    pub fn equation_index(&self, mode: SwizzleMode, samples_log2: u32, elem_log2: u32) -> u32 {
        self.equations.index(mode, samples_log2, elem_log2)
    }

    /// Equation stored at `index`.
    #[inline]
    pub fn equation(&self, index: u32) -> Option<&Equation> {
        self.equations.get(index)
    }

    /// Extent of one block, in elements.
    #[inline]
    pub fn block_extent(&self, mode: SwizzleMode, samples_log2: u32, elem_log2: u32) -> Extent3d {
        self.block_dims.get(mode, samples_log2, elem_log2)
    }

    pub(crate) fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }
}

impl fmt::Debug for Gfx12Lib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gfx12Lib")
            .field("pipes_log2", &self.pipes_log2)
            .field("pipe_interleave_log2", &self.pipe_interleave_log2)
            .field("num_swizzle_bits", &self.num_swizzle_bits)
            .field("equations", &self.equations.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(1, 256, 0, 8, 0)]
    #[case(4, 512, 2, 9, 0)]
    #[case(8, 256, 3, 8, 1)]
    #[case(16, 2048, 4, 11, 2)]
    #[case(64, 1024, 6, 10, 4)]
    fn derives_global_parameters(
        #[case] num_pipes: u32,
        #[case] interleave: u32,
        #[case] pipes_log2: u32,
        #[case] interleave_log2: u32,
        #[case] swizzle_bits: u32,
    ) {
        let lib = Gfx12Lib::new(
            Gfx12Config {
                num_pipes,
                pipe_interleave_bytes: interleave,
            },
            Box::new(NullSink),
        )
        .unwrap();
        assert_eq!(lib.pipes_log2(), pipes_log2);
        assert_eq!(lib.pipe_interleave_log2(), interleave_log2);
        assert_eq!(lib.num_swizzle_bits(), swizzle_bits);
    }

    #[rstest]
    #[case(0, 256)]
    #[case(12, 256)]
    #[case(128, 256)]
    #[case(16, 128)]
    #[case(16, 4096)]
    fn rejects_unsupported_configurations(#[case] num_pipes: u32, #[case] interleave: u32) {
        let result = Gfx12Lib::new(
            Gfx12Config {
                num_pipes,
                pipe_interleave_bytes: interleave,
            },
            Box::new(NullSink),
        );
        assert!(matches!(result, Err(AddrError::InvalidParams(_))));
    }

    #[test]
    fn reports_table_construction() {
        let sink = RecordingSink::default();
        let lib = Gfx12Lib::new(Gfx12Config::default(), Box::new(sink.clone())).unwrap();
        assert_eq!(lib.equation_table().len(), 95);
        assert_eq!(sink.infos(), 1);
        assert!(sink.warnings().is_empty());
    }
}
