//! Compilation of swizzle patterns into address equations.

use crate::block::{MAX_ELEMENT_BYTES_LOG2, MAX_MSAA_RATE_LOG2};
use crate::pattern::{pattern_from_info, swizzle_pattern_info, BitSetting, PATTERN_BITS};
use crate::swizzle_mode::{SwizzleMode, SWIZZLE_MODE_COUNT};
use alloc::vec::Vec;
use gpu_addrlib_common::equation::{
    Channel, ChannelSetting, Equation, INVALID_EQUATION_INDEX, MAX_EQUATION_BIT,
};
use gpu_addrlib_common::math::{is_pow2, log2};

/// Converts an expanded swizzle pattern into an equation.
///
/// Bits below `elem_log2` address bytes within an element and become x
/// bits; x bits of the pattern are in elements and get shifted by
/// `elem_log2` so the equation reads x in bytes.
pub fn convert_swizzle_pattern_to_equation(
    elem_log2: u32,
    mode: SwizzleMode,
    pattern: &[BitSetting; PATTERN_BITS],
) -> Equation {
    let num_bits = mode.block_size_log2(true);
    let mut eq = Equation {
        num_bits,
        num_bit_components: 1,
        stacked_depth_slices: false,
        ..Default::default()
    };
    debug_assert!(num_bits as usize <= MAX_EQUATION_BIT);

    for (i, setting) in pattern.iter().enumerate().take(num_bits as usize) {
        let addr = &mut eq.comps[0][i];
        if (i as u32) < elem_log2 {
            *addr = ChannelSetting::init(Channel::X, i as u32);
        } else if setting.x() != 0 {
            debug_assert!(is_pow2(setting.x() as u32));
            *addr = ChannelSetting::init(Channel::X, log2(setting.x() as u32) + elem_log2);
        } else if setting.y() != 0 {
            debug_assert!(is_pow2(setting.y() as u32));
            *addr = ChannelSetting::init(Channel::Y, log2(setting.y() as u32));
        } else if setting.z() != 0 {
            debug_assert!(is_pow2(setting.z() as u32));
            *addr = ChannelSetting::init(Channel::Z, log2(setting.z() as u32));
        } else if setting.s() != 0 {
            debug_assert!(is_pow2(setting.s() as u32));
            *addr = ChannelSetting::init(Channel::S, log2(setting.s() as u32));
        } else {
            debug_assert!(false, "bit {i} of a {mode} pattern has no source");
        }
    }

    eq
}

/// Every address equation of the hardware, with an index lookup per
/// (mode, MSAA rate, element size).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationTable {
    equations: Vec<Equation>,
    lookup: [[[u32; MAX_ELEMENT_BYTES_LOG2]; MAX_MSAA_RATE_LOG2]; SWIZZLE_MODE_COUNT],
}

impl EquationTable {
    /// Builds the equations of all valid non-linear combinations.
    pub fn new() -> Self {
        let mut equations = Vec::new();
        let mut lookup =
            [[[INVALID_EQUATION_INDEX; MAX_ELEMENT_BYTES_LOG2]; MAX_MSAA_RATE_LOG2]; SWIZZLE_MODE_COUNT];

        for mode in SwizzleMode::all_values().iter().copied() {
            if mode.is_linear() {
                continue;
            }

            let max_msaa = if mode.is_2d() { MAX_MSAA_RATE_LOG2 } else { 1 };
            for msaa_log2 in 0..max_msaa {
                for elem_log2 in 0..MAX_ELEMENT_BYTES_LOG2 {
                    let Some(info) = swizzle_pattern_info(mode, elem_log2 as u32, 1 << msaa_log2)
                    else {
                        continue;
                    };
                    let pattern = pattern_from_info(info);
                    let eq = convert_swizzle_pattern_to_equation(elem_log2 as u32, mode, &pattern);
                    lookup[mode.index()][msaa_log2][elem_log2] = equations.len() as u32;
                    equations.push(eq);
                }
            }
        }

        Self { equations, lookup }
    }

    /// Equation index for the combination, or [`INVALID_EQUATION_INDEX`].
    pub fn index(&self, mode: SwizzleMode, msaa_log2: u32, elem_log2: u32) -> u32 {
        if mode.is_linear()
            || msaa_log2 as usize >= MAX_MSAA_RATE_LOG2
            || elem_log2 as usize >= MAX_ELEMENT_BYTES_LOG2
        {
            return INVALID_EQUATION_INDEX;
        }
        self.lookup[mode.index()][msaa_log2 as usize][elem_log2 as usize]
    }

    /// Equation stored at `index`.
    #[inline]
    pub fn get(&self, index: u32) -> Option<&Equation> {
        self.equations.get(index as usize)
    }

    /// Equation for the combination, if one exists.
    pub fn lookup(&self, mode: SwizzleMode, msaa_log2: u32, elem_log2: u32) -> Option<&Equation> {
        self.get(self.index(mode, msaa_log2, elem_log2))
    }

    /// Number of equations.
    #[inline]
    pub fn len(&self) -> usize {
        self.equations.len()
    }

    /// Whether the table holds no equation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// All equations, in index order.
    #[inline]
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }
}

impl Default for EquationTable {
    fn default() -> Self {
        Self::new()
    }
}
