use crate::error::CliError;
use crate::util::{parse_flags, parse_resource_type, parse_swizzle_mode, SurfaceOpts};
use argh::FromArgs;
use gpu_addrlib_api::{AddrFromCoordInput, AddrLib, ResourceType, SurfaceFlags, SwizzleMode};

#[derive(FromArgs, Debug)]
/// Compute the byte address of an element
#[argh(subcommand, name = "addr")]
pub struct AddrCmd {
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

    /// x of the element
    #[argh(option, short = 'x')]
    pub x: u32,

    /// y of the element (default: 0)
    #[argh(option, short = 'y', default = "0")]
    pub y: u32,

    /// slice of the element (default: 0)
    #[argh(option, default = "0")]
    pub slice: u32,

    /// sample of the element (default: 0)
    #[argh(option, default = "0")]
    pub sample: u32,

    /// mip of the element (default: 0)
    #[argh(option, default = "0")]
    pub mip: u32,
}

pub fn handle_addr_command(lib: &AddrLib, cmd: AddrCmd) -> Result<(), CliError> {
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
    let out = lib.compute_surface_addr_from_coord(&AddrFromCoordInput {
        surface: surface.addr_surface(),
        x: cmd.x,
        y: cmd.y,
        slice: cmd.slice,
        sample: cmd.sample,
        mip: cmd.mip,
    })?;

    println!("Address:         {:#x}", out.addr);
    println!("Bit position:    {}", out.bit_position);
    println!("PRT block index: {}", out.prt_block_index);
    Ok(())
}
