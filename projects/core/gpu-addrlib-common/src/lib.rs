#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod coord;
pub mod diagnostics;
pub mod equation;
pub mod error;
pub mod format;
pub mod math;
pub mod types;

pub use error::AddrError;

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
