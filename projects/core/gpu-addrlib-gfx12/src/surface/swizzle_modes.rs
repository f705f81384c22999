use crate::gfx12_lib::Gfx12Lib;
use crate::surface::SurfaceInfoInput;
use crate::swizzle_mode::{SwizzleMode, SwizzleModeSet};
use gpu_addrlib_common::types::{ResourceType, SurfaceFlags};
use gpu_addrlib_common::AddrError;

/// Surface properties that decide which swizzle modes are usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PossibleSwizzleModesInput {
    /// Usage flags.
    pub flags: SurfaceFlags,
    /// Dimensionality.
    pub resource_type: ResourceType,
    /// Bits per element.
    pub bpp: u32,
    /// Width of mip 0.
    pub width: u32,
    /// Height of mip 0.
    pub height: u32,
    /// Array slices, or depth of a volume.
    pub num_slices: u32,
    /// Number of mip levels.
    pub num_mip_levels: u32,
    /// MSAA sample count.
    pub num_samples: u32,
    /// Largest base alignment the caller accepts. Zero for no limit.
    pub max_align: u32,
}

impl From<&SurfaceInfoInput> for PossibleSwizzleModesInput {
    fn from(input: &SurfaceInfoInput) -> Self {
        Self {
            flags: input.flags,
            resource_type: input.resource_type,
            bpp: input.bpp,
            width: input.width,
            height: input.height,
            num_slices: input.num_slices,
            num_mip_levels: input.num_mip_levels,
            num_samples: input.num_samples,
            max_align: 0,
        }
    }
}

/// Checks the parameters of a surface that do not involve its swizzle
/// mode.
pub(crate) fn validate_non_sw_mode_params(input: &PossibleSwizzleModesInput) -> Result<(), AddrError> {
    let flags = input.flags;
    let is_msaa = input.num_samples > 1;
    let is_mipmap = input.num_mip_levels > 1;
    let is_stereo = flags.qb_stereo();
    let is_vrs = flags.is_vrs_image();
    let is_display = flags.display();

    if input.bpp == 0 || input.bpp > 128 || input.width == 0 || input.num_samples > 8 {
        return Err(AddrError::InvalidParams(
            "element size, width or sample count out of range",
        ));
    }

    let valid = match input.resource_type {
        ResourceType::Tex1d | ResourceType::Tex3d => !(is_msaa || is_stereo || is_vrs || is_display),
        // Variable rate shading images are 8 bit.
        ResourceType::Tex2d => {
            !((is_msaa && is_mipmap)
                || (is_stereo && is_msaa)
                || (is_stereo && is_mipmap)
                || (is_vrs && input.bpp != 8))
        }
    };
    if !valid {
        return Err(AddrError::InvalidParams(
            "flags, samples and mips cannot be combined for this resource type",
        ));
    }
    Ok(())
}

impl Gfx12Lib {
    /// Swizzle modes a surface may use.
    ///
    /// # Errors
    ///
    /// [`AddrError::InvalidParams`] when the surface description itself is
    /// invalid.
    pub fn get_possible_swizzle_modes(
        &self,
        input: &PossibleSwizzleModesInput,
    ) -> Result<SwizzleModeSet, AddrError> {
        validate_non_sw_mode_params(input)?;

        let flags = input.flags;
        let is_3d = input.resource_type == ResourceType::Tex3d;
        let mut modes = SwizzleModeSet::EMPTY;
        let all_2d = [
            SwizzleMode::Sw256B2d,
            SwizzleMode::Sw4Kb2d,
            SwizzleMode::Sw64Kb2d,
            SwizzleMode::Sw256Kb2d,
        ];

        if input.bpp == 96 {
            modes.insert(SwizzleMode::Linear);
        } else if flags.depth() || flags.stencil() {
            // The depth block only reads 64KB and 256KB 2D layouts.
            modes.insert(SwizzleMode::Sw64Kb2d);
            modes.insert(SwizzleMode::Sw256Kb2d);
        } else if flags.hi_z_hi_s() || input.num_samples > 1 {
            modes = all_2d.into_iter().collect();
        } else if flags.standard_prt() {
            if is_3d && !flags.view_3d_as_2d_array() {
                modes.insert(SwizzleMode::Sw64Kb3d);
            } else {
                modes.insert(SwizzleMode::Sw64Kb2d);
            }
        } else if flags.block_compressed()
            || !is_3d
            || flags.view_3d_as_2d_array()
            || flags.nv12()
            || flags.p010()
        {
            if !flags.is_vrs_image() {
                modes.insert(SwizzleMode::Linear);
            }
            for mode in all_2d {
                if mode != SwizzleMode::Sw256B2d || !is_3d {
                    modes.insert(mode);
                }
            }
        } else {
            modes.insert(SwizzleMode::Linear);
            modes.insert(SwizzleMode::Sw4Kb3d);
            modes.insert(SwizzleMode::Sw64Kb3d);
            modes.insert(SwizzleMode::Sw256Kb3d);
        }

        if input.max_align != 0 {
            modes = modes
                .iter()
                .filter(|mode| mode.is_linear() || mode.block_size(false) <= input.max_align)
                .collect();
        }
        Ok(modes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn input(resource_type: ResourceType, bpp: u32) -> PossibleSwizzleModesInput {
        PossibleSwizzleModesInput {
            resource_type,
            bpp,
            width: 256,
            height: 256,
            num_slices: 1,
            num_mip_levels: 1,
            num_samples: 1,
            ..Default::default()
        }
    }

    fn modes(input: &PossibleSwizzleModesInput) -> Vec<SwizzleMode> {
        lib().get_possible_swizzle_modes(input).unwrap().iter().collect()
    }

    #[test]
    fn plain_2d_surfaces_allow_linear_and_every_2d_mode() {
        assert_eq!(
            modes(&input(ResourceType::Tex2d, 32)),
            vec![
                SwizzleMode::Linear,
                SwizzleMode::Sw256B2d,
                SwizzleMode::Sw4Kb2d,
                SwizzleMode::Sw64Kb2d,
                SwizzleMode::Sw256Kb2d
            ]
        );
    }

    #[test]
    fn volumes_prefer_3d_modes() {
        assert_eq!(
            modes(&input(ResourceType::Tex3d, 32)),
            vec![
                SwizzleMode::Linear,
                SwizzleMode::Sw4Kb3d,
                SwizzleMode::Sw64Kb3d,
                SwizzleMode::Sw256Kb3d
            ]
        );

        let mut as_array = input(ResourceType::Tex3d, 32);
        as_array.flags.set_view_3d_as_2d_array(true);
        assert!(!modes(&as_array).contains(&SwizzleMode::Sw256B2d));
        assert!(modes(&as_array).contains(&SwizzleMode::Sw64Kb2d));
    }

    #[test]
    fn special_surfaces() {
        assert_eq!(modes(&input(ResourceType::Tex2d, 96)), vec![SwizzleMode::Linear]);

        let mut depth = input(ResourceType::Tex2d, 32);
        depth.flags.set_depth(true);
        assert_eq!(modes(&depth), vec![SwizzleMode::Sw64Kb2d, SwizzleMode::Sw256Kb2d]);

        let mut prt = input(ResourceType::Tex3d, 32);
        prt.flags.set_standard_prt(true);
        assert_eq!(modes(&prt), vec![SwizzleMode::Sw64Kb3d]);

        let msaa = PossibleSwizzleModesInput {
            num_samples: 4,
            ..input(ResourceType::Tex2d, 32)
        };
        assert!(!modes(&msaa).contains(&SwizzleMode::Linear));
        assert_eq!(modes(&msaa).len(), 4);

        let mut vrs = input(ResourceType::Tex2d, 8);
        vrs.flags.set_is_vrs_image(true);
        assert!(!modes(&vrs).contains(&SwizzleMode::Linear));
    }

    #[rstest]
    #[case(0, 5)]
    #[case(65536, 4)]
    #[case(4096, 3)]
    #[case(256, 2)]
    #[case(128, 1)]
    fn max_align_trims_large_blocks(#[case] max_align: u32, #[case] count: usize) {
        let limited = PossibleSwizzleModesInput {
            max_align,
            ..input(ResourceType::Tex2d, 32)
        };
        assert_eq!(modes(&limited).len(), count);
    }

    #[rstest]
    #[case(ResourceType::Tex1d, 4, 1, false, false)]
    #[case(ResourceType::Tex2d, 4, 2, false, false)]
    #[case(ResourceType::Tex2d, 1, 2, true, false)]
    #[case(ResourceType::Tex2d, 1, 1, true, true)]
    #[case(ResourceType::Tex3d, 1, 1, true, false)]
    #[case(ResourceType::Tex2d, 16, 1, false, false)]
    fn non_sw_mode_validation(
        #[case] resource_type: ResourceType,
        #[case] samples: u32,
        #[case] mips: u32,
        #[case] stereo: bool,
        #[case] ok: bool,
    ) {
        let mut params = PossibleSwizzleModesInput {
            num_samples: samples,
            num_mip_levels: mips,
            ..input(resource_type, 32)
        };
        params.flags.set_qb_stereo(stereo);
        assert_eq!(validate_non_sw_mode_params(&params).is_ok(), ok);
    }
}
