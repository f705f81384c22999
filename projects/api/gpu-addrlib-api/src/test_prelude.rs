//! Test prelude for API tests.
//!
//! This module provides common test utilities used across multiple test
//! modules to reduce code duplication.
#![allow(unused_imports)]

pub use alloc::{boxed::Box, vec, vec::Vec};
pub use rstest::rstest;

pub use crate::{AddrLib, AddrLibBuilder};
pub use gpu_addrlib_common::AddrError;
pub use gpu_addrlib_common::diagnostics::NullSink;
pub use gpu_addrlib_common::types::{Extent3d, ResourceType, SurfaceFlags};
pub use gpu_addrlib_gfx12::{SurfaceInfoInput, SwizzleMode};

/// A library with the default configuration that discards diagnostics.
pub fn lib() -> AddrLib {
    AddrLibBuilder::new().sink(Box::new(NullSink)).build().unwrap()
}
