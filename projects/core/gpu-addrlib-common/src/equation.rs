//! Compiled per-bit address equations.
//!
//! An [`Equation`] is the compact form of a swizzle pattern: for every
//! address bit it lists up to [`MAX_EQUATION_COMP`] coordinate bits that are
//! XORed together. Bit `i` of the offset inside a swizzle block is
//! `comps[0][i] ^ comps[1][i] ^ ...`, where each component names a channel
//! (x in bytes, y, z or sample) and a bit index.

use crate::coord::{CoordEq, Coordinate, Dim};
use crate::math::get_bit;
use bitfield::bitfield;
use core::fmt;

/// Maximum number of address bits an equation describes.
pub const MAX_EQUATION_BIT: usize = 20;

/// Maximum number of coordinate bits XORed into one address bit.
pub const MAX_EQUATION_COMP: usize = 5;

/// Sentinel for combinations without an equation.
pub const INVALID_EQUATION_INDEX: u32 = u32::MAX;

/// Channel a [`ChannelSetting`] reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// X coordinate in bytes.
    X = 0,
    /// Y coordinate.
    Y = 1,
    /// Z coordinate (slice).
    Z = 2,
    /// Sample index.
    S = 3,
}

impl Channel {
    /// Decodes the 2 bit channel field.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Channel::X,
            1 => Channel::Y,
            2 => Channel::Z,
            _ => Channel::S,
        }
    }

    /// The coordinate axis this channel corresponds to.
    pub const fn dim(self) -> Dim {
        match self {
            Channel::X => Dim::X,
            Channel::Y => Dim::Y,
            Channel::Z => Dim::Z,
            Channel::S => Dim::S,
        }
    }
}

bitfield! {
    /// One contributor to an address bit.
    ///
    /// Bit layout:
    /// - Bit 0: Valid flag (1 bit)
    /// - Bits 1-2: Channel (2 bits), see [`Channel`]
    /// - Bits 3-7: Bit index within the channel (5 bits)
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChannelSetting(u8);
    impl Debug;
    u8;

    /// Whether this contributor is used
    pub valid, set_valid: 0;
    /// Raw channel field
    pub channel_bits, set_channel_bits: 2, 1;
    /// Bit index within the channel
    pub index, set_index: 7, 3;
}

impl ChannelSetting {
    /// Creates a valid setting reading bit `index` of `channel`.
    pub fn init(channel: Channel, index: u32) -> Self {
        debug_assert!(index < 32);
        let mut setting = Self::default();
        setting.set_valid(true);
        setting.set_channel_bits(channel as u8);
        setting.set_index(index as u8);
        setting
    }

    /// The channel this setting reads from.
    #[inline]
    pub fn channel(&self) -> Channel {
        Channel::from_bits(self.channel_bits())
    }
}

impl fmt::Display for ChannelSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid() {
            return f.write_str("-");
        }
        write!(f, "{}{}", self.channel().dim().letter(), self.index())
    }
}

/// A compiled address equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Equation {
    /// Per component, per bit contributors. `comps[0]` is the primary
    /// ("addr") component, the others are XORed on top.
    pub comps: [[ChannelSetting; MAX_EQUATION_BIT]; MAX_EQUATION_COMP],
    /// Number of address bits described.
    pub num_bits: u32,
    /// Number of components in use.
    pub num_bit_components: u32,
    /// Whether depth slices are stacked inside one block.
    pub stacked_depth_slices: bool,
}

impl Equation {
    /// The primary component of each bit.
    #[inline]
    pub fn addr(&self) -> &[ChannelSetting; MAX_EQUATION_BIT] {
        &self.comps[0]
    }

    /// Evaluates the equation. `x` is in bytes.
    pub fn compute_offset(&self, x: u32, y: u32, z: u32, s: u32) -> u32 {
        let mut offset = 0;
        for i in 0..self.num_bits as usize {
            let mut v = 0;
            for comp in self.comps.iter().take(self.num_bit_components as usize) {
                let setting = comp[i];
                if setting.valid() {
                    let source = match setting.channel() {
                        Channel::X => x,
                        Channel::Y => y,
                        Channel::Z => z,
                        Channel::S => s,
                    };
                    v ^= get_bit(source, setting.index() as u32);
                }
            }
            offset |= v << i;
        }
        offset
    }

    /// Highest bit index of `channel` referenced by any contributor, if any.
    pub fn max_index(&self, channel: Channel) -> Option<u32> {
        self.comps
            .iter()
            .take(self.num_bit_components as usize)
            .flat_map(|comp| comp.iter().take(self.num_bits as usize))
            .filter(|s| s.valid() && s.channel() == channel)
            .map(|s| s.index() as u32)
            .max()
    }
}

/// Evaluates `eq` for the given coordinates. `x` is in bytes.
#[inline]
pub fn compute_offset_from_equation(eq: &Equation, x: u32, y: u32, z: u32, s: u32) -> u32 {
    eq.compute_offset(x, y, z, s)
}

impl From<&Equation> for CoordEq {
    fn from(eq: &Equation) -> Self {
        let mut out = CoordEq::with_bits(eq.num_bits as usize);
        for i in 0..eq.num_bits as usize {
            for comp in eq.comps.iter().take(eq.num_bit_components as usize) {
                let setting = comp[i];
                if setting.valid() {
                    out[i].add(Coordinate::new(
                        setting.channel().dim(),
                        setting.index() as u32,
                    ));
                }
            }
        }
        out
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.num_bits as usize).rev() {
            write!(f, "[{i:2}] ")?;
            let mut first = true;
            for comp in self.comps.iter().take(self.num_bit_components as usize) {
                if comp[i].valid() {
                    if !first {
                        f.write_str("^")?;
                    }
                    write!(f, "{}", comp[i])?;
                    first = false;
                }
            }
            if i != 0 {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    /// 4 bit equation: `y1 x1^y0 y0 x0` with x in bytes.
    fn small_equation() -> Equation {
        let mut eq = Equation {
            num_bits: 4,
            num_bit_components: 2,
            ..Default::default()
        };
        eq.comps[0][0] = ChannelSetting::init(Channel::X, 0);
        eq.comps[0][1] = ChannelSetting::init(Channel::Y, 0);
        eq.comps[0][2] = ChannelSetting::init(Channel::X, 1);
        eq.comps[1][2] = ChannelSetting::init(Channel::Y, 0);
        eq.comps[0][3] = ChannelSetting::init(Channel::Y, 1);
        eq
    }

    #[test]
    fn channel_setting_layout() {
        let setting = ChannelSetting::init(Channel::Z, 17);
        assert_eq!(setting.0, 1 | (2 << 1) | (17 << 3));
        assert!(setting.valid());
        assert_eq!(setting.channel(), Channel::Z);
        assert_eq!(setting.index(), 17);
        assert!(!ChannelSetting::default().valid());
    }

    #[rstest]
    #[case(0, 0, 0b0000)]
    #[case(1, 0, 0b0001)]
    #[case(0, 1, 0b0110)]
    #[case(2, 1, 0b0010)]
    #[case(3, 3, 0b1011)]
    fn evaluates_with_xor(#[case] x: u32, #[case] y: u32, #[case] expected: u32) {
        assert_eq!(compute_offset_from_equation(&small_equation(), x, y, 0, 0), expected);
    }

    #[test]
    fn converts_to_coord_eq() {
        let eq = small_equation();
        let coord_eq = CoordEq::from(&eq);
        assert_eq!(coord_eq.len(), 4);
        assert_eq!(coord_eq[2].len(), 2);
        for x in 0..4 {
            for y in 0..4 {
                let c = coords(x, y, 0, 0, 0);
                assert_eq!(coord_eq.solve(&c), eq.compute_offset(x, y, 0, 0) as u64);
                assert_eq!(coord_eq.solve_addr(coord_eq.solve(&c), 0), c);
            }
        }
    }

    #[test]
    fn max_index_per_channel() {
        let eq = small_equation();
        assert_eq!(eq.max_index(Channel::Y), Some(1));
        assert_eq!(eq.max_index(Channel::Z), None);
    }
}
