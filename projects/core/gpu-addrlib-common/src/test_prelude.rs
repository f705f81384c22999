//! Common test imports and utilities for the shared address library code
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.
#![allow(unused_imports)]

// Re-export commonly used alloc types for tests
pub use alloc::{vec, vec::Vec};

// External crates commonly used in tests
pub use rstest::rstest;

// Core functionality from this crate
pub use crate::coord::{CoordEq, CoordTerm, Coordinate, Dim};
pub use crate::equation::{Channel, ChannelSetting, Equation};

/// Builds a coordinate vector indexed by [`Dim`].
pub fn coords(x: u32, y: u32, z: u32, s: u32, m: u32) -> [u32; Dim::COUNT] {
    [x, y, z, s, m]
}
