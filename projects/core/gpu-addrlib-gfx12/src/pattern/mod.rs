//! Swizzle pattern lookup and reconstruction.
//!
//! A swizzle pattern names, for every address bit inside a block, the
//! coordinate bit that feeds it. Patterns are stored compressed: a
//! [`PatInfo`] record per (mode, sample count, element size) holds indices
//! into four shared nibble tables, one per address bit range.

mod tables;

use crate::swizzle_mode::{SwizzleMode, LOG2_SIZE_256K};
use bitfield::bitfield;
use tables::*;

/// Number of address bits a reconstructed pattern covers.
pub const PATTERN_BITS: usize = LOG2_SIZE_256K as usize;

bitfield! {
    /// Coordinate bits feeding one address bit.
    ///
    /// Bit layout (one 16 bit mask per channel, bit `i` set selects bit `i`
    /// of that coordinate):
    /// - Bits 0-15: X mask (in elements)
    /// - Bits 16-31: Y mask
    /// - Bits 32-47: Z mask
    /// - Bits 48-63: Sample mask
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BitSetting(u64);
    impl Debug;
    u16;

    /// X mask
    pub x, set_x: 15, 0;
    /// Y mask
    pub y, set_y: 31, 16;
    /// Z mask
    pub z, set_z: 47, 32;
    /// Sample mask
    pub s, set_s: 63, 48;
}

impl BitSetting {
    /// Raw bits.
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Whether no coordinate feeds this bit.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Compressed swizzle pattern record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatInfo {
    /// Maximum number of coordinate bits XORed into one address bit.
    pub max_item_count: u8,
    /// Index into the bits 0-7 table.
    pub nibble01_idx: u16,
    /// Index into the bits 8-11 table.
    pub nibble2_idx: u16,
    /// Index into the bits 12-15 table.
    pub nibble3_idx: u16,
    /// Index into the bits 16-17 table.
    pub nibble4_idx: u16,
}

/// Returns the pattern record for `mode`, or `None` when the combination
/// does not exist.
///
/// `elem_log2` is log2 of the element size in bytes (0..=4) and `num_frag`
/// the number of MSAA fragments. 3D modes are single sampled only; linear
/// surfaces have no pattern.
pub fn swizzle_pattern_info(
    mode: SwizzleMode,
    elem_log2: u32,
    num_frag: u32,
) -> Option<&'static PatInfo> {
    if elem_log2 > 4 {
        return None;
    }

    let table: &'static [PatInfo; 5] = if mode.is_3d() {
        if num_frag != 1 {
            return None;
        }
        match mode {
            SwizzleMode::Sw4Kb3d => &SW_4KB_3D_PATINFO,
            SwizzleMode::Sw64Kb3d => &SW_64KB_3D_PATINFO,
            _ => &SW_256KB_3D_PATINFO,
        }
    } else {
        match (mode, num_frag) {
            (SwizzleMode::Sw256B2d, 1) => &SW_256B_2D_1XAA_PATINFO,
            (SwizzleMode::Sw256B2d, 2) => &SW_256B_2D_2XAA_PATINFO,
            (SwizzleMode::Sw256B2d, 4) => &SW_256B_2D_4XAA_PATINFO,
            (SwizzleMode::Sw256B2d, 8) => &SW_256B_2D_8XAA_PATINFO,
            (SwizzleMode::Sw4Kb2d, 1) => &SW_4KB_2D_1XAA_PATINFO,
            (SwizzleMode::Sw4Kb2d, 2) => &SW_4KB_2D_2XAA_PATINFO,
            (SwizzleMode::Sw4Kb2d, 4) => &SW_4KB_2D_4XAA_PATINFO,
            (SwizzleMode::Sw4Kb2d, 8) => &SW_4KB_2D_8XAA_PATINFO,
            (SwizzleMode::Sw64Kb2d, 1) => &SW_64KB_2D_1XAA_PATINFO,
            (SwizzleMode::Sw64Kb2d, 2) => &SW_64KB_2D_2XAA_PATINFO,
            (SwizzleMode::Sw64Kb2d, 4) => &SW_64KB_2D_4XAA_PATINFO,
            (SwizzleMode::Sw64Kb2d, 8) => &SW_64KB_2D_8XAA_PATINFO,
            (SwizzleMode::Sw256Kb2d, 1) => &SW_256KB_2D_1XAA_PATINFO,
            (SwizzleMode::Sw256Kb2d, 2) => &SW_256KB_2D_2XAA_PATINFO,
            (SwizzleMode::Sw256Kb2d, 4) => &SW_256KB_2D_4XAA_PATINFO,
            (SwizzleMode::Sw256Kb2d, 8) => &SW_256KB_2D_8XAA_PATINFO,
            _ => return None,
        }
    };

    Some(&table[elem_log2 as usize])
}

/// Expands a pattern record into one [`BitSetting`] per address bit.
pub fn pattern_from_info(info: &PatInfo) -> [BitSetting; PATTERN_BITS] {
    let mut pattern = [BitSetting::default(); PATTERN_BITS];
    pattern[0..8].copy_from_slice(&NIBBLE01[info.nibble01_idx as usize]);
    pattern[8..12].copy_from_slice(&NIBBLE2[info.nibble2_idx as usize]);
    pattern[12..16].copy_from_slice(&NIBBLE3[info.nibble3_idx as usize]);
    pattern[16..18].copy_from_slice(&NIBBLE4[info.nibble4_idx as usize]);
    pattern
}
