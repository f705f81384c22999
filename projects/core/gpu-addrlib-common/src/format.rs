//! Element formats.
//!
//! Only the properties the address computations need are modelled: the size
//! of one element in bits and, for block compressed formats, how many texels
//! one element covers.

use crate::math::round_up_quotient;
use derive_enum_all_values::AllValues;

/// How the texels of a format map onto addressable elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElemMode {
    /// One texel per element.
    Uncompressed,
    /// One texel is stored as several narrower elements (96 bit formats).
    Expanded,
    /// One element is a compressed block of texels.
    Packed,
}

/// Element formats understood by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
#[allow(missing_docs)]
pub enum ElemFormat {
    R8,
    R16,
    R32,
    R32G32,
    R32G32B32,
    R32G32B32A32,
    Bc1,
    Bc2,
    Bc3,
    Bc4,
    Bc5,
    Bc6,
    Bc7,
    Etc2_64bpp,
    Etc2_128bpp,
    Astc4x4,
    Astc5x4,
    Astc5x5,
    Astc6x5,
    Astc6x6,
    Astc8x5,
    Astc8x6,
    Astc8x8,
    Astc10x5,
    Astc10x6,
    Astc10x8,
    Astc10x10,
    Astc12x10,
    Astc12x12,
}

impl ElemFormat {
    /// Bits of one element as stored in memory, before any expansion.
    pub const fn bits_per_element(self) -> u32 {
        match self {
            ElemFormat::R8 => 8,
            ElemFormat::R16 => 16,
            ElemFormat::R32 => 32,
            ElemFormat::R32G32 => 64,
            ElemFormat::R32G32B32 => 96,
            ElemFormat::R32G32B32A32 => 128,
            ElemFormat::Bc1 | ElemFormat::Bc4 | ElemFormat::Etc2_64bpp => 64,
            _ => 128,
        }
    }

    /// Texels covered by one element, `(width, height)`.
    pub const fn block_footprint(self) -> (u32, u32) {
        match self {
            ElemFormat::Bc1
            | ElemFormat::Bc2
            | ElemFormat::Bc3
            | ElemFormat::Bc4
            | ElemFormat::Bc5
            | ElemFormat::Bc6
            | ElemFormat::Bc7
            | ElemFormat::Etc2_64bpp
            | ElemFormat::Etc2_128bpp
            | ElemFormat::Astc4x4 => (4, 4),
            ElemFormat::Astc5x4 => (5, 4),
            ElemFormat::Astc5x5 => (5, 5),
            ElemFormat::Astc6x5 => (6, 5),
            ElemFormat::Astc6x6 => (6, 6),
            ElemFormat::Astc8x5 => (8, 5),
            ElemFormat::Astc8x6 => (8, 6),
            ElemFormat::Astc8x8 => (8, 8),
            ElemFormat::Astc10x5 => (10, 5),
            ElemFormat::Astc10x6 => (10, 6),
            ElemFormat::Astc10x8 => (10, 8),
            ElemFormat::Astc10x10 => (10, 10),
            ElemFormat::Astc12x10 => (12, 10),
            ElemFormat::Astc12x12 => (12, 12),
            _ => (1, 1),
        }
    }

    /// How texels map onto elements for this format.
    pub const fn elem_mode(self) -> ElemMode {
        match self {
            ElemFormat::R32G32B32 => ElemMode::Expanded,
            _ if self.is_block_compressed() => ElemMode::Packed,
            _ => ElemMode::Uncompressed,
        }
    }

    /// BC1-7, ETC2 and ASTC formats.
    pub const fn is_block_compressed(self) -> bool {
        !matches!(
            self,
            ElemFormat::R8
                | ElemFormat::R16
                | ElemFormat::R32
                | ElemFormat::R32G32
                | ElemFormat::R32G32B32
                | ElemFormat::R32G32B32A32
        )
    }

    /// Converts texel dimensions into element dimensions.
    ///
    /// Returns `(bpp, width, height)`. Compressed formats divide the
    /// dimensions by the block footprint, rounding up. 96 bit formats are
    /// addressed as three 32 bit elements per texel.
    pub fn adjust_surface(self, width: u32, height: u32) -> (u32, u32, u32) {
        match self.elem_mode() {
            ElemMode::Uncompressed => (self.bits_per_element(), width, height),
            ElemMode::Expanded => (self.bits_per_element() / 3, width * 3, height),
            ElemMode::Packed => {
                let (bw, bh) = self.block_footprint();
                (
                    self.bits_per_element(),
                    round_up_quotient(width, bw),
                    round_up_quotient(height, bh),
                )
            }
        }
    }

    /// Converts element dimensions back into texel dimensions.
    ///
    /// Inverse of [`ElemFormat::adjust_surface`], returning
    /// `(bits, width, height)`. Compressed formats report the bits of one
    /// block; dimensions never drop below one.
    pub fn restore_surface(self, bpp: u32, width: u32, height: u32) -> (u32, u32, u32) {
        let (bits, width, height) = match self.elem_mode() {
            ElemMode::Uncompressed => (bpp, width, height),
            ElemMode::Expanded => (bpp * 3, width / 3, height),
            ElemMode::Packed => {
                let (bw, bh) = self.block_footprint();
                (self.bits_per_element(), width * bw, height * bh)
            }
        };
        (bits, width.max(1), height.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ElemFormat::R8, 256, 100, (8, 256, 100))]
    #[case(ElemFormat::R32G32B32, 10, 4, (32, 30, 4))]
    #[case(ElemFormat::Bc1, 17, 16, (64, 5, 4))]
    #[case(ElemFormat::Bc7, 4, 1, (128, 1, 1))]
    #[case(ElemFormat::Astc10x8, 100, 17, (128, 10, 3))]
    fn adjusts_dimensions(
        #[case] format: ElemFormat,
        #[case] width: u32,
        #[case] height: u32,
        #[case] expected: (u32, u32, u32),
    ) {
        assert_eq!(format.adjust_surface(width, height), expected);
    }

    #[rstest]
    #[case(ElemFormat::R16, (16, 64, 8), (16, 64, 8))]
    #[case(ElemFormat::R32G32B32, (32, 30, 4), (96, 10, 4))]
    #[case(ElemFormat::R32G32B32, (32, 2, 1), (96, 1, 1))]
    #[case(ElemFormat::Bc1, (64, 5, 4), (64, 20, 16))]
    #[case(ElemFormat::Astc10x8, (128, 10, 3), (128, 100, 24))]
    fn restores_dimensions(
        #[case] format: ElemFormat,
        #[case] adjusted: (u32, u32, u32),
        #[case] expected: (u32, u32, u32),
    ) {
        let (bpp, w, h) = adjusted;
        assert_eq!(format.restore_surface(bpp, w, h), expected);
    }

    #[test]
    fn compressed_formats_have_multi_texel_footprints() {
        for format in ElemFormat::all_values().iter().copied() {
            let (w, h) = format.block_footprint();
            assert_eq!(format.is_block_compressed(), w * h > 1, "{format:?}");
            assert!(format.bits_per_element() % 8 == 0);
        }
    }
}
