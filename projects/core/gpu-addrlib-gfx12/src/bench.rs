//! Internal routines exposed for benchmarks.
//!
//! Not part of the stable API.

use crate::surface::{SurfaceInfoInput, SurfaceInfoOutput};
use crate::Gfx12Lib;
use gpu_addrlib_common::AddrError;

/// Lays out the mip chain of an already computed surface again.
pub fn compute_mip_chain(input: &SurfaceInfoInput, out: &mut SurfaceInfoOutput) {
    crate::mip::compute_mip_chain(input, out)
}

/// Surface layout without parameter validation.
pub fn compute_surface_info_unchecked(
    lib: &Gfx12Lib,
    input: &SurfaceInfoInput,
) -> Result<SurfaceInfoOutput, AddrError> {
    lib.compute_surface_info_unchecked(input)
}
