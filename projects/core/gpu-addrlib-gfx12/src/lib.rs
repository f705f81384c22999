#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod block;
pub mod equation_table;
mod gfx12_lib;
pub mod mip;
pub mod pattern;
pub mod reference;
pub mod surface;
pub mod swizzle_mode;

#[cfg(feature = "bench")]
pub mod bench;

pub use gfx12_lib::{Gfx12Config, Gfx12Lib};
pub use mip::MipInfo;
pub use surface::*;
pub use swizzle_mode::{SwizzleMode, SwizzleModeSet};

// Re-export the shared vocabulary so callers need a single dependency
pub use gpu_addrlib_common::diagnostics::{DiagnosticSink, NullSink, TracingSink};
pub use gpu_addrlib_common::format::ElemFormat;
pub use gpu_addrlib_common::types::{Extent3d, ResourceType, SurfaceFlags};
pub use gpu_addrlib_common::AddrError;

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
