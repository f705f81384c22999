//! Common test imports and utilities for the Gfx12 crate
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.
#![allow(unused_imports)]

// Re-export commonly used alloc types for tests
pub use alloc::{boxed::Box, string::String, string::ToString, vec, vec::Vec};

// External crates commonly used in tests
pub use rstest::rstest;

// Shared building blocks
pub use gpu_addrlib_common::coord::CoordEq;
pub use gpu_addrlib_common::diagnostics::{DiagnosticSink, NullSink};
pub use gpu_addrlib_common::format::ElemFormat;
pub use gpu_addrlib_common::types::{Extent3d, ResourceType, SurfaceFlags};
pub use gpu_addrlib_common::AddrError;

// Core functionality from this crate
pub use crate::gfx12_lib::{Gfx12Config, Gfx12Lib};
pub use crate::reference::{self, AddrParams};
pub use crate::surface::SurfaceInfoInput;
pub use crate::swizzle_mode::SwizzleMode;

use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A library with the default chip configuration that discards diagnostics.
pub fn lib() -> Gfx12Lib {
    Gfx12Lib::new(Gfx12Config::default(), Box::new(NullSink)).unwrap()
}

/// A library with the default chip configuration reporting into `sink`.
pub fn lib_with_sink(sink: RecordingSink) -> Gfx12Lib {
    Gfx12Lib::new(Gfx12Config::default(), Box::new(sink)).unwrap()
}

/// A single sample, single mip, single slice 2D surface.
pub fn surface(swizzle_mode: SwizzleMode, bpp: u32, width: u32, height: u32) -> SurfaceInfoInput {
    SurfaceInfoInput {
        swizzle_mode,
        resource_type: ResourceType::Tex2d,
        bpp,
        width,
        height,
        num_slices: 1,
        num_mip_levels: 1,
        num_samples: 1,
        ..Default::default()
    }
}

/// Sink that remembers what it was told. Clones share the same record.
#[derive(Clone, Default)]
pub struct RecordingSink {
    warnings: Arc<Mutex<Vec<String>>>,
    infos: Arc<AtomicUsize>,
}

impl RecordingSink {
    /// Warnings received so far.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    /// Number of informational messages received so far.
    pub fn infos(&self) -> usize {
        self.infos.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for RecordingSink {
    fn warn(&self, args: fmt::Arguments<'_>) {
        self.warnings.lock().unwrap().push(args.to_string());
    }

    fn info(&self, _args: fmt::Arguments<'_>) {
        self.infos.fetch_add(1, Ordering::Relaxed);
    }
}
