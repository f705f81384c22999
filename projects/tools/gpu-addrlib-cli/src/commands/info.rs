use crate::error::CliError;
use crate::util::{parse_flags, parse_format, parse_resource_type, parse_swizzle_mode, SurfaceOpts};
use argh::FromArgs;
use bytesize::ByteSize;
use gpu_addrlib_api::{AddrLib, ElemFormat, ResourceType, SurfaceFlags, SwizzleMode};

#[derive(FromArgs, Debug)]
/// Print the layout of a surface and its mip chain
#[argh(subcommand, name = "info")]
pub struct InfoCmd {
    /// swizzle mode, e.g. linear, 4kb_2d, 64kb_3d
    #[argh(option, from_str_fn(parse_swizzle_mode))]
    pub mode: SwizzleMode,

    /// resource type: 1d, 2d or 3d (default: 2d)
    #[argh(option, default = "ResourceType::Tex2d", from_str_fn(parse_resource_type))]
    pub resource: ResourceType,

    /// comma separated usage flags, e.g. depth,stereo
    #[argh(option, default = "SurfaceFlags::default()", from_str_fn(parse_flags))]
    pub flags: SurfaceFlags,

    /// element format; block compressed formats take texel dimensions
    #[argh(option, from_str_fn(parse_format))]
    pub format: Option<ElemFormat>,

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
}

impl InfoCmd {
    fn surface(&self) -> SurfaceOpts {
        SurfaceOpts {
            mode: self.mode,
            resource_type: self.resource,
            flags: self.flags,
            format: self.format,
            bpp: self.format.map_or(self.bpp, |f| f.bits_per_element()),
            width: self.width,
            height: self.height,
            slices: self.slices,
            mips: self.mips,
            samples: self.samples,
        }
    }
}

pub fn handle_info_command(lib: &AddrLib, cmd: InfoCmd) -> Result<(), CliError> {
    let info = lib.compute_surface_info(&cmd.surface().info_input())?;

    println!("Swizzle mode:     {}", cmd.mode);
    println!("Bits per element: {}", info.bpp);
    println!("Pitch:            {} elements", info.pitch);
    println!("Height:           {} elements", info.height);
    println!("Slices:           {}", info.num_slices);
    println!(
        "Block:            {}x{}x{}",
        info.block_extent.width, info.block_extent.height, info.block_extent.depth
    );
    println!("Base alignment:   {}", ByteSize(info.base_align as u64));
    println!("Slice size:       {}", ByteSize(info.slice_size));
    println!("Surface size:     {}", ByteSize(info.surf_size));
    if info.mip_chain_in_tail {
        println!("Mip tail:         whole chain");
    } else if (info.first_mip_id_in_tail as usize) < info.mips().len() {
        println!("Mip tail:         from mip {}", info.first_mip_id_in_tail);
    }
    if info.stereo.right_offset != 0 {
        println!("Right eye offset: {:#x}", info.stereo.right_offset);
    }

    println!();
    println!("mip      pitch     height      depth         offset   tail offset");
    for (mip, level) in info.mips().iter().enumerate() {
        println!(
            "{mip:>3} {:>10} {:>10} {:>10} {:>#14x} {:>#13x}",
            level.pitch, level.height, level.depth, level.offset, level.mip_tail_offset
        );
    }
    Ok(())
}
