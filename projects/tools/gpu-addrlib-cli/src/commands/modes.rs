use crate::error::CliError;
use crate::util::{parse_flags, parse_resource_type};
use argh::FromArgs;
use bytesize::ByteSize;
use gpu_addrlib_api::{AddrLib, PossibleSwizzleModesInput, ResourceType, SurfaceFlags};

#[derive(FromArgs, Debug)]
/// List the swizzle modes a surface may use
#[argh(subcommand, name = "modes")]
pub struct ModesCmd {
    /// resource type: 1d, 2d or 3d (default: 2d)
    #[argh(option, default = "ResourceType::Tex2d", from_str_fn(parse_resource_type))]
    pub resource: ResourceType,

    /// comma separated usage flags, e.g. depth,stereo
    #[argh(option, default = "SurfaceFlags::default()", from_str_fn(parse_flags))]
    pub flags: SurfaceFlags,

    /// bits per element (default: 32)
    #[argh(option, default = "32")]
    pub bpp: u32,

    /// width of mip 0
    #[argh(option)]
    pub width: u32,

    /// height of mip 0 (default: 1)
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

    /// largest base alignment in bytes, 0 for no limit (default: 0)
    #[argh(option, default = "0")]
    pub max_align: u32,
}

pub fn handle_modes_command(lib: &AddrLib, cmd: ModesCmd) -> Result<(), CliError> {
    let modes = lib.get_possible_swizzle_modes(&PossibleSwizzleModesInput {
        flags: cmd.flags,
        resource_type: cmd.resource,
        bpp: cmd.bpp,
        width: cmd.width,
        height: cmd.height,
        num_slices: cmd.slices,
        num_mip_levels: cmd.mips,
        num_samples: cmd.samples,
        max_align: cmd.max_align,
    })?;

    for mode in modes.iter() {
        if mode.is_linear() {
            println!("{mode}");
        } else {
            let block = mode.block_size(false);
            println!("{:<10} block {}", mode.name(), ByteSize(block as u64));
        }
    }
    Ok(())
}
