//! Symbolic bit equations.
//!
//! An address bit is described as the XOR of a small set of coordinate bits,
//! for example `x3 ^ y4`. [`Coordinate`] names one such bit, [`CoordTerm`] is
//! the ordered set of bits XORed together for one address bit, and
//! [`CoordEq`] is the full equation, one term per address bit starting at
//! bit 0.
//!
//! Equations can be evaluated forwards ([`CoordEq::solve`], coordinates to
//! address) and backwards ([`CoordEq::solve_addr`], address to coordinates),
//! and can be rearranged with structural operations such as
//! [`CoordEq::filter`], [`CoordEq::shift`] or [`CoordEq::mort2d`].

mod coord_eq;
mod coordinate;
mod term;

pub use coord_eq::CoordEq;
pub use coordinate::{Coordinate, Dim};
pub use term::{CoordTerm, FilterOp};
