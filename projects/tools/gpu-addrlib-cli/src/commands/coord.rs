use crate::error::CliError;
use crate::util::{parse_flags, parse_resource_type, parse_swizzle_mode, parse_u64, SurfaceOpts};
use argh::FromArgs;
use gpu_addrlib_api::{AddrLib, CoordFromAddrInput, ResourceType, SurfaceFlags, SwizzleMode};

#[derive(FromArgs, Debug)]
/// Find the element stored at a byte address
#[argh(subcommand, name = "coord")]
pub struct CoordCmd {
    /// swizzle mode, e.g. linear, 4kb_2d, 64kb_3d
    #[argh(option, from_str_fn(parse_swizzle_mode))]
    pub mode: SwizzleMode,

    /// resource type: 1d, 2d or 3d (default: 2d)
    #[argh(option, default = "ResourceType::Tex2d", from_str_fn(parse_resource_type))]
    pub resource: ResourceType,

    /// comma separated usage flags, e.g. depth,stereo
    #[argh(option, default = "SurfaceFlags::default()", from_str_fn(parse_flags))]
    pub flags: SurfaceFlags,

    /// bits per element (default: 32)
    #[argh(option, default = "32")]
    pub bpp: u32,

    /// width of mip 0 in elements
    #[argh(option)]
    pub width: u32,

    /// height of mip 0 in elements (default: 1)
    #[argh(option, default = "1")]
    pub height: u32,

    /// array slices, or depth of a volume (default: 1)
    #[argh(option, default = "1")]
    pub slices: u32,

    /// number of mip levels (default: 1)
    #[argh(option, default = "1")]
    pub mips: u32,

    /// MSAA sample count (default: 1)
    #[argh(option, default = "1")]
    pub samples: u32,

    /// byte address, decimal or 0x prefixed hex
    #[argh(option, from_str_fn(parse_u64))]
    pub addr: u64,
}

pub fn handle_coord_command(lib: &AddrLib, cmd: CoordCmd) -> Result<(), CliError> {
    let surface = SurfaceOpts {
        mode: cmd.mode,
        resource_type: cmd.resource,
        flags: cmd.flags,
        format: None,
        bpp: cmd.bpp,
        width: cmd.width,
        height: cmd.height,
        slices: cmd.slices,
        mips: cmd.mips,
        samples: cmd.samples,
    };
    let out = lib.compute_surface_coord_from_addr(&CoordFromAddrInput {
        surface: surface.addr_surface(),
        addr: cmd.addr,
    })?;

    println!("X:      {}", out.x);
    println!("Y:      {}", out.y);
    println!("Slice:  {}", out.slice);
    println!("Sample: {}", out.sample);
    println!("Mip:    {}", out.mip);
    Ok(())
}
