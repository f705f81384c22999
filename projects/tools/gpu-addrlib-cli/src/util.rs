use gpu_addrlib_api::{
    AddrLib, AddrLibBuilder, AddrSurface, ElemFormat, Extent3d, ResourceType, SurfaceFlags,
    SurfaceInfoInput, SwizzleMode, TracingSink,
};

/// Parses a swizzle mode by its name, e.g. `64KB_2D`.
pub fn parse_swizzle_mode(value: &str) -> Result<SwizzleMode, String> {
    SwizzleMode::from_name(value).ok_or_else(|| {
        let names: Vec<_> = SwizzleMode::all_values().iter().map(|m| m.name()).collect();
        format!("Invalid swizzle mode: {value}. Valid modes are: {}", names.join(", "))
    })
}

/// Parses a resource type: `1d`, `2d` or `3d`.
pub fn parse_resource_type(value: &str) -> Result<ResourceType, String> {
    match value.to_lowercase().as_str() {
        "1d" => Ok(ResourceType::Tex1d),
        "2d" => Ok(ResourceType::Tex2d),
        "3d" => Ok(ResourceType::Tex3d),
        _ => Err(format!(
            "Invalid resource type: {value}. Valid types are: 1d, 2d, 3d"
        )),
    }
}

/// Parses an element format by name, ignoring case, e.g. `bc1`.
pub fn parse_format(value: &str) -> Result<ElemFormat, String> {
    ElemFormat::all_values()
        .iter()
        .copied()
        .find(|f| format!("{f:?}").eq_ignore_ascii_case(value))
        .ok_or_else(|| format!("Invalid format: {value}"))
}

/// Parses a decimal or `0x` prefixed hexadecimal number.
pub fn parse_u64(value: &str) -> Result<u64, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("Invalid number {value}: {e}"))
}

/// Parses surface flags given as a comma separated list of names.
pub fn parse_flags(value: &str) -> Result<SurfaceFlags, String> {
    let mut flags = SurfaceFlags::default();
    for name in value.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match name {
            "color" => flags.set_color(true),
            "depth" => flags.set_depth(true),
            "stencil" => flags.set_stencil(true),
            "hiz" => flags.set_hi_z_hi_s(true),
            "bc" => flags.set_block_compressed(true),
            "nv12" => flags.set_nv12(true),
            "p010" => flags.set_p010(true),
            "view3das2d" => flags.set_view_3d_as_2d_array(true),
            "vrs" => flags.set_is_vrs_image(true),
            "prt" => flags.set_standard_prt(true),
            "stereo" => flags.set_qb_stereo(true),
            "display" => flags.set_display(true),
            _ => return Err(format!("Invalid flag: {name}")),
        }
    }
    Ok(flags)
}

/// Surface description shared by the surface level commands.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceOpts {
    pub mode: SwizzleMode,
    pub resource_type: ResourceType,
    pub flags: SurfaceFlags,
    pub format: Option<ElemFormat>,
    pub bpp: u32,
    pub width: u32,
    pub height: u32,
    pub slices: u32,
    pub mips: u32,
    pub samples: u32,
}

impl SurfaceOpts {
    pub fn info_input(&self) -> SurfaceInfoInput {
        SurfaceInfoInput {
            flags: self.flags,
            swizzle_mode: self.mode,
            resource_type: self.resource_type,
            format: self.format,
            bpp: self.bpp,
            width: self.width,
            height: self.height,
            num_slices: self.slices,
            num_mip_levels: self.mips,
            num_samples: self.samples,
            ..Default::default()
        }
    }

    pub fn addr_surface(&self) -> AddrSurface {
        AddrSurface {
            swizzle_mode: self.mode,
            flags: self.flags,
            resource_type: self.resource_type,
            bpp: self.bpp,
            unaligned_dims: Extent3d::new(self.width, self.height, self.slices),
            num_mip_levels: self.mips,
            num_samples: self.samples,
            pitch_in_element: 0,
        }
    }
}

/// Creates the library for the chip selected on the command line.
pub fn create_lib(pipes: u32, pipe_interleave: u32) -> Result<AddrLib, gpu_addrlib_api::AddrError> {
    AddrLibBuilder::new()
        .num_pipes(pipes)
        .pipe_interleave_bytes(pipe_interleave)
        .sink(Box::new(TracingSink))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("64KB_2D", SwizzleMode::Sw64Kb2d)]
    #[case("linear", SwizzleMode::Linear)]
    #[case("256b_2d", SwizzleMode::Sw256B2d)]
    fn parses_swizzle_modes(#[case] value: &str, #[case] mode: SwizzleMode) {
        assert_eq!(parse_swizzle_mode(value), Ok(mode));
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(parse_swizzle_mode("8KB_2D").is_err());
        assert!(parse_resource_type("4d").is_err());
        assert!(parse_format("bc9").is_err());
        assert!(parse_flags("depth,shiny").is_err());
    }

    #[rstest]
    #[case("4096", 4096)]
    #[case("0x1000", 4096)]
    #[case("0XfF", 255)]
    fn parses_numbers(#[case] value: &str, #[case] expected: u64) {
        assert_eq!(parse_u64(value), Ok(expected));
    }

    #[test]
    fn parses_flag_lists() {
        let flags = parse_flags("depth, stereo").unwrap();
        assert!(flags.depth() && flags.qb_stereo());
        assert!(!flags.color());
        assert_eq!(parse_format("BC1"), Ok(ElemFormat::Bc1));
    }
}
