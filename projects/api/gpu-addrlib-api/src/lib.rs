#![doc = include_str!("../README.MD")]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! Safe, high-level API for GPU surface addressing.
//!
//! Build an [`AddrLib`] once per chip with [`AddrLibBuilder`] and query it
//! from any number of threads.
//!
//! ```
//! use gpu_addrlib_api::*;
//!
//! let lib = AddrLibBuilder::new().num_pipes(16).build()?;
//! let info = lib.compute_surface_info(&SurfaceInfoInput {
//!     swizzle_mode: SwizzleMode::Sw64Kb2d,
//!     resource_type: ResourceType::Tex2d,
//!     bpp: 32,
//!     width: 2048,
//!     height: 2048,
//!     num_slices: 1,
//!     num_mip_levels: 8,
//!     num_samples: 1,
//!     ..Default::default()
//! })?;
//! assert_eq!(info.first_mip_id_in_tail, 5);
//! # Ok::<(), AddrError>(())
//! ```

extern crate alloc;

// Module declarations
pub mod addr_lib;
pub mod builder;

#[cfg(feature = "c-exports")]
pub mod c_api;

// Re-export main functionality at crate root
pub use addr_lib::AddrLib;
pub use builder::{AddrLibBuilder, ChipFamily, LibConfig};

// Re-export the types queries are made with
pub use gpu_addrlib_common::AddrError;
pub use gpu_addrlib_common::diagnostics::{DiagnosticSink, NullSink, TracingSink};
pub use gpu_addrlib_common::equation::Equation;
pub use gpu_addrlib_common::format::ElemFormat;
pub use gpu_addrlib_common::types::{Extent3d, ResourceType, SurfaceFlags};
pub use gpu_addrlib_gfx12::{
    AddrFromCoordInput, AddrFromCoordOutput, AddrSurface, CoordFromAddrInput, CoordFromAddrOutput,
    CopyRegion, CopySurfaceInput, MipInfo, NbcViewInput, NbcViewOutput, PipeBankXorInput,
    PossibleSwizzleModesInput, SlicePipeBankXorInput, StereoInfo, SubResourceOffsetInput,
    SurfaceInfoInput, SurfaceInfoOutput, SwizzleMode, SwizzleModeSet,
};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
