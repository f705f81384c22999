//! Swizzle pattern tables.
//!
//! Every `*_PATINFO` table is indexed by log2 of the element size in bytes.
//! Its entries point into the shared nibble tables below, which list the
//! coordinate bit feeding each address bit: `NIBBLE01` covers bits 0-7,
//! `NIBBLE2` bits 8-11, `NIBBLE3` bits 12-15 and `NIBBLE4` bits 16-17.
//! Byte-within-element bits are left empty.
//!
//! Single sample 2D modes use the hardware display layout and 3D modes the
//! hardware standard 3D layout, both without pipe xor terms; the pipe/bank
//! xor is applied separately at the surface base. MSAA 2D modes keep the
//! hardware MSAA micro tiles (samples in the lowest bits) and continue above
//! 256B with the same alternation the single sample layout uses: Y then X,
//! until the block's width and height bits are spent.

use super::{BitSetting, PatInfo};

const fn p(nibble01_idx: u16, nibble2_idx: u16, nibble3_idx: u16, nibble4_idx: u16) -> PatInfo {
    PatInfo {
        max_item_count: 1,
        nibble01_idx,
        nibble2_idx,
        nibble3_idx,
        nibble4_idx,
    }
}

const fn x(index: u32) -> BitSetting {
    BitSetting(1 << index)
}

const fn y(index: u32) -> BitSetting {
    BitSetting(1 << (16 + index))
}

const fn z(index: u32) -> BitSetting {
    BitSetting(1 << (32 + index))
}

const fn s(index: u32) -> BitSetting {
    BitSetting(1 << (48 + index))
}

const NONE: BitSetting = BitSetting(0);
const X0: BitSetting = x(0);
const X1: BitSetting = x(1);
const X2: BitSetting = x(2);
const X3: BitSetting = x(3);
const X4: BitSetting = x(4);
const X5: BitSetting = x(5);
const X6: BitSetting = x(6);
const X7: BitSetting = x(7);
const X8: BitSetting = x(8);
const Y0: BitSetting = y(0);
const Y1: BitSetting = y(1);
const Y2: BitSetting = y(2);
const Y3: BitSetting = y(3);
const Y4: BitSetting = y(4);
const Y5: BitSetting = y(5);
const Y6: BitSetting = y(6);
const Y7: BitSetting = y(7);
const Y8: BitSetting = y(8);
const Z0: BitSetting = z(0);
const Z1: BitSetting = z(1);
const Z2: BitSetting = z(2);
const Z3: BitSetting = z(3);
const Z4: BitSetting = z(4);
const Z5: BitSetting = z(5);
const S0: BitSetting = s(0);
const S1: BitSetting = s(1);
const S2: BitSetting = s(2);

pub(crate) const SW_256B_2D_1XAA_PATINFO: [PatInfo; 5] = [
    p(0, 0, 0, 0), // 1 bpe
    p(1, 0, 0, 0), // 2 bpe
    p(2, 0, 0, 0), // 4 bpe
    p(3, 0, 0, 0), // 8 bpe
    p(4, 0, 0, 0), // 16 bpe
];

pub(crate) const SW_256B_2D_2XAA_PATINFO: [PatInfo; 5] = [
    p(5, 0, 0, 0), // 1 bpe
    p(6, 0, 0, 0), // 2 bpe
    p(7, 0, 0, 0), // 4 bpe
    p(8, 0, 0, 0), // 8 bpe
    p(9, 0, 0, 0), // 16 bpe
];

pub(crate) const SW_256B_2D_4XAA_PATINFO: [PatInfo; 5] = [
    p(10, 0, 0, 0), // 1 bpe
    p(11, 0, 0, 0), // 2 bpe
    p(12, 0, 0, 0), // 4 bpe
    p(13, 0, 0, 0), // 8 bpe
    p(14, 0, 0, 0), // 16 bpe
];

pub(crate) const SW_256B_2D_8XAA_PATINFO: [PatInfo; 5] = [
    p(15, 0, 0, 0), // 1 bpe
    p(16, 0, 0, 0), // 2 bpe
    p(17, 0, 0, 0), // 4 bpe
    p(18, 0, 0, 0), // 8 bpe
    p(19, 0, 0, 0), // 16 bpe
];

pub(crate) const SW_4KB_2D_1XAA_PATINFO: [PatInfo; 5] = [
    p(0, 1, 0, 0), // 1 bpe
    p(1, 2, 0, 0), // 2 bpe
    p(2, 3, 0, 0), // 4 bpe
    p(3, 4, 0, 0), // 8 bpe
    p(4, 5, 0, 0), // 16 bpe
];

pub(crate) const SW_4KB_2D_2XAA_PATINFO: [PatInfo; 5] = [
    p(5, 2, 0, 0), // 1 bpe
    p(6, 3, 0, 0), // 2 bpe
    p(7, 4, 0, 0), // 4 bpe
    p(8, 5, 0, 0), // 8 bpe
    p(9, 6, 0, 0), // 16 bpe
];

pub(crate) const SW_4KB_2D_4XAA_PATINFO: [PatInfo; 5] = [
    p(10, 3, 0, 0), // 1 bpe
    p(11, 4, 0, 0), // 2 bpe
    p(12, 5, 0, 0), // 4 bpe
    p(13, 6, 0, 0), // 8 bpe
    p(14, 7, 0, 0), // 16 bpe
];

pub(crate) const SW_4KB_2D_8XAA_PATINFO: [PatInfo; 5] = [
    p(15, 4, 0, 0), // 1 bpe
    p(16, 5, 0, 0), // 2 bpe
    p(17, 6, 0, 0), // 4 bpe
    p(18, 7, 0, 0), // 8 bpe
    p(19, 8, 0, 0), // 16 bpe
];

pub(crate) const SW_64KB_2D_1XAA_PATINFO: [PatInfo; 5] = [
    p(0, 1, 1, 0), // 1 bpe
    p(1, 2, 2, 0), // 2 bpe
    p(2, 3, 3, 0), // 4 bpe
    p(3, 4, 4, 0), // 8 bpe
    p(4, 5, 5, 0), // 16 bpe
];

pub(crate) const SW_64KB_2D_2XAA_PATINFO: [PatInfo; 5] = [
    p(5, 2, 2, 0), // 1 bpe
    p(6, 3, 3, 0), // 2 bpe
    p(7, 4, 4, 0), // 4 bpe
    p(8, 5, 5, 0), // 8 bpe
    p(9, 6, 6, 0), // 16 bpe
];

pub(crate) const SW_64KB_2D_4XAA_PATINFO: [PatInfo; 5] = [
    p(10, 3, 3, 0), // 1 bpe
    p(11, 4, 4, 0), // 2 bpe
    p(12, 5, 5, 0), // 4 bpe
    p(13, 6, 6, 0), // 8 bpe
    p(14, 7, 7, 0), // 16 bpe
];

pub(crate) const SW_64KB_2D_8XAA_PATINFO: [PatInfo; 5] = [
    p(15, 4, 4, 0), // 1 bpe
    p(16, 5, 5, 0), // 2 bpe
    p(17, 6, 6, 0), // 4 bpe
    p(18, 7, 7, 0), // 8 bpe
    p(19, 8, 8, 0), // 16 bpe
];

pub(crate) const SW_256KB_2D_1XAA_PATINFO: [PatInfo; 5] = [
    p(0, 1, 1, 1), // 1 bpe
    p(1, 2, 2, 2), // 2 bpe
    p(2, 3, 3, 3), // 4 bpe
    p(3, 4, 4, 4), // 8 bpe
    p(4, 5, 5, 5), // 16 bpe
];

pub(crate) const SW_256KB_2D_2XAA_PATINFO: [PatInfo; 5] = [
    p(5, 2, 2, 2), // 1 bpe
    p(6, 3, 3, 3), // 2 bpe
    p(7, 4, 4, 4), // 4 bpe
    p(8, 5, 5, 5), // 8 bpe
    p(9, 6, 6, 6), // 16 bpe
];

pub(crate) const SW_256KB_2D_4XAA_PATINFO: [PatInfo; 5] = [
    p(10, 3, 3, 3), // 1 bpe
    p(11, 4, 4, 4), // 2 bpe
    p(12, 5, 5, 5), // 4 bpe
    p(13, 6, 6, 6), // 8 bpe
    p(14, 7, 7, 7), // 16 bpe
];

pub(crate) const SW_256KB_2D_8XAA_PATINFO: [PatInfo; 5] = [
    p(15, 4, 4, 4), // 1 bpe
    p(16, 5, 5, 5), // 2 bpe
    p(17, 6, 6, 6), // 4 bpe
    p(18, 7, 7, 7), // 8 bpe
    p(19, 8, 8, 8), // 16 bpe
];

pub(crate) const SW_4KB_3D_PATINFO: [PatInfo; 5] = [
    p(20, 9, 0, 0), // 1 bpe
    p(21, 10, 0, 0), // 2 bpe
    p(22, 11, 0, 0), // 4 bpe
    p(23, 12, 0, 0), // 8 bpe
    p(24, 13, 0, 0), // 16 bpe
];

pub(crate) const SW_64KB_3D_PATINFO: [PatInfo; 5] = [
    p(20, 9, 9, 0), // 1 bpe
    p(21, 10, 10, 0), // 2 bpe
    p(22, 11, 11, 0), // 4 bpe
    p(23, 12, 12, 0), // 8 bpe
    p(24, 13, 13, 0), // 16 bpe
];

pub(crate) const SW_256KB_3D_PATINFO: [PatInfo; 5] = [
    p(20, 9, 9, 9), // 1 bpe
    p(21, 10, 10, 9), // 2 bpe
    p(22, 11, 11, 10), // 4 bpe
    p(23, 12, 12, 11), // 8 bpe
    p(24, 13, 13, 11), // 16 bpe
];

pub(crate) const NIBBLE01: [[BitSetting; 8]; 25] = [
    [X0, X1, Y0, X2, Y1, Y2, X3, Y3], // 0
    [NONE, X0, Y0, X1, Y1, X2, Y2, X3], // 1
    [NONE, NONE, X0, Y0, X1, Y1, X2, Y2], // 2
    [NONE, NONE, NONE, X0, Y0, X1, X2, Y1], // 3
    [NONE, NONE, NONE, NONE, X0, Y0, X1, Y1], // 4
    [S0, X0, Y0, X1, Y1, X2, Y2, X3], // 5
    [NONE, S0, X0, Y0, X1, Y1, X2, Y2], // 6
    [NONE, NONE, S0, X0, Y0, X1, Y1, X2], // 7
    [NONE, NONE, NONE, S0, X0, Y0, X1, Y1], // 8
    [NONE, NONE, NONE, NONE, S0, X0, Y0, X1], // 9
    [S0, S1, X0, Y0, X1, Y1, X2, Y2], // 10
    [NONE, S0, S1, X0, Y0, X1, Y1, X2], // 11
    [NONE, NONE, S0, S1, X0, Y0, X1, Y1], // 12
    [NONE, NONE, NONE, S0, S1, X0, Y0, X1], // 13
    [NONE, NONE, NONE, NONE, S0, S1, X0, Y0], // 14
    [S0, S1, S2, X0, Y0, X1, Y1, X2], // 15
    [NONE, S0, S1, S2, X0, Y0, X1, Y1], // 16
    [NONE, NONE, S0, S1, S2, X0, Y0, X1], // 17
    [NONE, NONE, NONE, S0, S1, S2, X0, Y0], // 18
    [NONE, NONE, NONE, NONE, S0, S1, S2, X0], // 19
    [X0, X1, Z0, Y0, Y1, Z1, X2, Z2], // 20
    [NONE, X0, Z0, Y0, X1, Z1, Y1, Z2], // 21
    [NONE, NONE, X0, Y0, X1, Z0, Y1, Z1], // 22
    [NONE, NONE, NONE, X0, Y0, Z0, X1, Z1], // 23
    [NONE, NONE, NONE, NONE, X0, Z0, Y0, Z1], // 24
];

pub(crate) const NIBBLE2: [[BitSetting; 4]; 14] = [
    [NONE, NONE, NONE, NONE], // 0
    [Y4, X4, Y5, X5], // 1
    [Y3, X4, Y4, X5], // 2
    [Y3, X3, Y4, X4], // 3
    [Y2, X3, Y3, X4], // 4
    [Y2, X2, Y3, X3], // 5
    [Y1, X2, Y2, X3], // 6
    [Y1, X1, Y2, X2], // 7
    [Y0, X1, Y1, X2], // 8
    [Y2, X3, Z3, Y3], // 9
    [Y2, X2, Z3, Y3], // 10
    [Y2, X2, Z2, Y3], // 11
    [Y1, X2, Z2, Y2], // 12
    [Y1, X1, Z2, Y2], // 13
];

pub(crate) const NIBBLE3: [[BitSetting; 4]; 14] = [
    [NONE, NONE, NONE, NONE], // 0
    [Y6, X6, Y7, X7], // 1
    [Y5, X6, Y6, X7], // 2
    [Y5, X5, Y6, X6], // 3
    [Y4, X5, Y5, X6], // 4
    [Y4, X4, Y5, X5], // 5
    [Y3, X4, Y4, X5], // 6
    [Y3, X3, Y4, X4], // 7
    [Y2, X3, Y3, X4], // 8
    [X4, Z4, Y4, X5], // 9
    [X3, Z4, Y4, X4], // 10
    [X3, Z3, Y4, X4], // 11
    [X3, Z3, Y3, X4], // 12
    [X2, Z3, Y3, X3], // 13
];

pub(crate) const NIBBLE4: [[BitSetting; 2]; 12] = [
    [NONE, NONE], // 0
    [Y8, X8], // 1
    [Y7, X8], // 2
    [Y7, X7], // 3
    [Y6, X7], // 4
    [Y6, X6], // 5
    [Y5, X6], // 6
    [Y5, X5], // 7
    [Y4, X5], // 8
    [Z5, Y5], // 9
    [Z4, Y5], // 10
    [Z4, Y4], // 11
];
