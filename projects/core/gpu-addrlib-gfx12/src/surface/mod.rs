//! Surface level operations: layout, addressing, pipe/bank xor, views and
//! copies.
//!
//! Every operation is a method of [`Gfx12Lib`](crate::Gfx12Lib) taking an
//! input description and returning a freshly computed output. Nothing is
//! cached between calls.

mod addr;
mod copy;
mod info;
mod nbc_view;
mod pipe_bank_xor;
mod swizzle_modes;

pub use addr::*;
pub use copy::*;
pub use info::*;
pub use nbc_view::*;
pub use pipe_bank_xor::*;
pub use swizzle_modes::*;
