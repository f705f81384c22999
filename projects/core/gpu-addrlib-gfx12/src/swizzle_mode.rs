//! Gfx12 swizzle modes and their classification.

use bitfield::bitfield;
use derive_enum_all_values::AllValues;

/// Log2 of a 128 byte linear block.
pub const LOG2_SIZE_128: u32 = 7;
/// Log2 of a 256 byte block.
pub const LOG2_SIZE_256: u32 = 8;
/// Log2 of a 4KiB block.
pub const LOG2_SIZE_4K: u32 = 12;
/// Log2 of a 64KiB block.
pub const LOG2_SIZE_64K: u32 = 16;
/// Log2 of a 256KiB block, the largest block the hardware knows.
pub const LOG2_SIZE_256K: u32 = 18;

/// Tiling scheme of a surface.
///
/// The discriminants match the hardware encoding and index every per-mode
/// table in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, AllValues)]
#[repr(u32)]
pub enum SwizzleMode {
    /// Untiled, rows laid out one after another.
    #[default]
    Linear = 0,
    /// 256 byte 2D blocks.
    Sw256B2d = 1,
    /// 4KiB 2D blocks.
    Sw4Kb2d = 2,
    /// 64KiB 2D blocks.
    Sw64Kb2d = 3,
    /// 256KiB 2D blocks.
    Sw256Kb2d = 4,
    /// 4KiB blocks spanning several slices.
    Sw4Kb3d = 5,
    /// 64KiB blocks spanning several slices.
    Sw64Kb3d = 6,
    /// 256KiB blocks spanning several slices.
    Sw256Kb3d = 7,
}

/// Number of swizzle modes.
pub const SWIZZLE_MODE_COUNT: usize = 8;

bitfield! {
    /// Classification of a swizzle mode.
    ///
    /// Bit layout:
    /// - Bit 0: Linear
    /// - Bit 1: 2D block
    /// - Bit 2: 3D block
    /// - Bit 3: 256B block
    /// - Bit 4: 4KB block
    /// - Bit 5: 64KB block
    /// - Bit 6: 256KB block
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SwizzleModeFlags(u8);
    impl Debug;

    /// Untiled
    pub is_linear, _: 0;
    /// One block per slice
    pub is_2d, _: 1;
    /// Blocks span slices
    pub is_3d, _: 2;
    /// 256 byte block
    pub is_256b, _: 3;
    /// 4KiB block
    pub is_4kb, _: 4;
    /// 64KiB block
    pub is_64kb, _: 5;
    /// 256KiB block
    pub is_256kb, _: 6;
}

const SWIZZLE_MODE_TABLE: [SwizzleModeFlags; SWIZZLE_MODE_COUNT] = [
    //                   256K 64K 4K 256B 3D 2D Lin
    SwizzleModeFlags(0b0_0_0_0_0_0_1), // Linear
    SwizzleModeFlags(0b0_0_0_1_0_1_0), // 256B_2D
    SwizzleModeFlags(0b0_0_1_0_0_1_0), // 4KB_2D
    SwizzleModeFlags(0b0_1_0_0_0_1_0), // 64KB_2D
    SwizzleModeFlags(0b1_0_0_0_0_1_0), // 256KB_2D
    SwizzleModeFlags(0b0_0_1_0_1_0_0), // 4KB_3D
    SwizzleModeFlags(0b0_1_0_0_1_0_0), // 64KB_3D
    SwizzleModeFlags(0b1_0_0_0_1_0_0), // 256KB_3D
];

impl SwizzleMode {
    /// Decodes the hardware value.
    pub const fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => SwizzleMode::Linear,
            1 => SwizzleMode::Sw256B2d,
            2 => SwizzleMode::Sw4Kb2d,
            3 => SwizzleMode::Sw64Kb2d,
            4 => SwizzleMode::Sw256Kb2d,
            5 => SwizzleMode::Sw4Kb3d,
            6 => SwizzleMode::Sw64Kb3d,
            7 => SwizzleMode::Sw256Kb3d,
            _ => return None,
        })
    }

    /// Table index of this mode.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Classification flags of this mode.
    #[inline]
    pub fn flags(self) -> SwizzleModeFlags {
        SWIZZLE_MODE_TABLE[self.index()]
    }

    /// Untiled.
    #[inline]
    pub fn is_linear(self) -> bool {
        self.flags().is_linear()
    }

    /// One block per slice.
    #[inline]
    pub fn is_2d(self) -> bool {
        self.flags().is_2d()
    }

    /// Blocks span several slices.
    #[inline]
    pub fn is_3d(self) -> bool {
        self.flags().is_3d()
    }

    /// 256 byte blocks.
    #[inline]
    pub fn is_256b(self) -> bool {
        self.flags().is_256b()
    }

    /// Log2 of the block size in bytes.
    ///
    /// Linear surfaces use 256 byte blocks, or 128 bytes when `for_pitch` is
    /// set (the pitch and trimmed slice granularity of linear surfaces).
    pub fn block_size_log2(self, for_pitch: bool) -> u32 {
        let flags = self.flags();
        if flags.is_linear() {
            if for_pitch {
                LOG2_SIZE_128
            } else {
                LOG2_SIZE_256
            }
        } else if flags.is_256b() {
            LOG2_SIZE_256
        } else if flags.is_4kb() {
            LOG2_SIZE_4K
        } else if flags.is_64kb() {
            LOG2_SIZE_64K
        } else {
            LOG2_SIZE_256K
        }
    }

    /// Block size in bytes. See [`SwizzleMode::block_size_log2`].
    #[inline]
    pub fn block_size(self, for_pitch: bool) -> u32 {
        1 << self.block_size_log2(for_pitch)
    }

    /// Whether small mips of this mode are packed into a tail block.
    #[inline]
    pub fn supports_mip_tail(self) -> bool {
        !self.is_linear() && !self.is_256b()
    }

    /// Short name, as used by the tools.
    pub const fn name(self) -> &'static str {
        match self {
            SwizzleMode::Linear => "linear",
            SwizzleMode::Sw256B2d => "256b_2d",
            SwizzleMode::Sw4Kb2d => "4kb_2d",
            SwizzleMode::Sw64Kb2d => "64kb_2d",
            SwizzleMode::Sw256Kb2d => "256kb_2d",
            SwizzleMode::Sw4Kb3d => "4kb_3d",
            SwizzleMode::Sw64Kb3d => "64kb_3d",
            SwizzleMode::Sw256Kb3d => "256kb_3d",
        }
    }

    /// Parses a name produced by [`SwizzleMode::name`], ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all_values()
            .iter()
            .copied()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
    }
}

impl core::fmt::Display for SwizzleMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of swizzle modes, one bit per [`SwizzleMode`] discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwizzleModeSet(u32);

impl SwizzleModeSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Creates a set from its raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Adds `mode`.
    #[inline]
    pub fn insert(&mut self, mode: SwizzleMode) {
        self.0 |= 1 << mode as u32;
    }

    /// Removes `mode`.
    #[inline]
    pub fn remove(&mut self, mode: SwizzleMode) {
        self.0 &= !(1 << mode as u32);
    }

    /// Whether `mode` is in the set.
    #[inline]
    pub fn contains(&self, mode: SwizzleMode) -> bool {
        self.0 & (1 << mode as u32) != 0
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates the members in ascending mode order.
    pub fn iter(&self) -> impl Iterator<Item = SwizzleMode> + '_ {
        SwizzleMode::all_values()
            .iter()
            .copied()
            .filter(move |mode| self.contains(*mode))
    }
}

impl FromIterator<SwizzleMode> for SwizzleModeSet {
    fn from_iter<T: IntoIterator<Item = SwizzleMode>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for mode in iter {
            set.insert(mode);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(SwizzleMode::Linear, false, 8)]
    #[case(SwizzleMode::Linear, true, 7)]
    #[case(SwizzleMode::Sw256B2d, true, 8)]
    #[case(SwizzleMode::Sw4Kb2d, false, 12)]
    #[case(SwizzleMode::Sw64Kb3d, false, 16)]
    #[case(SwizzleMode::Sw256Kb2d, true, 18)]
    fn block_size_per_mode(#[case] mode: SwizzleMode, #[case] for_pitch: bool, #[case] log2: u32) {
        assert_eq!(mode.block_size_log2(for_pitch), log2);
    }

    #[test]
    fn every_mode_has_exactly_one_kind_and_size() {
        for mode in SwizzleMode::all_values().iter().copied() {
            let flags = mode.flags();
            let kinds = [flags.is_linear(), flags.is_2d(), flags.is_3d()];
            assert_eq!(kinds.iter().filter(|k| **k).count(), 1, "{mode}");
            let sizes = [flags.is_256b(), flags.is_4kb(), flags.is_64kb(), flags.is_256kb()];
            assert_eq!(
                sizes.iter().filter(|s| **s).count(),
                !mode.is_linear() as usize,
                "{mode}"
            );
            assert_eq!(SwizzleMode::from_u32(mode as u32), Some(mode));
            assert_eq!(SwizzleMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(SwizzleMode::from_u32(8), None);
    }

    #[test]
    fn mip_tail_support() {
        let supported: Vec<_> = SwizzleMode::all_values()
            .iter()
            .copied()
            .filter(|m| m.supports_mip_tail())
            .collect();
        assert_eq!(supported.len(), 6);
        assert!(!SwizzleMode::Linear.supports_mip_tail());
        assert!(!SwizzleMode::Sw256B2d.supports_mip_tail());
    }

    #[test]
    fn mode_set_operations() {
        let mut set: SwizzleModeSet = [SwizzleMode::Linear, SwizzleMode::Sw64Kb3d]
            .into_iter()
            .collect();
        assert_eq!(set.bits(), 0b0100_0001);
        assert!(set.contains(SwizzleMode::Sw64Kb3d));
        set.remove(SwizzleMode::Linear);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![SwizzleMode::Sw64Kb3d]);
        set.remove(SwizzleMode::Sw64Kb3d);
        assert!(set.is_empty());
    }
}
