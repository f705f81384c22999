use crate::error::CliError;
use crate::util::parse_swizzle_mode;
use argh::FromArgs;
use gpu_addrlib_api::{AddrLib, SwizzleMode};

#[derive(FromArgs, Debug)]
/// Print the address equation of a swizzle mode
#[argh(subcommand, name = "equation")]
pub struct EquationCmd {
    /// swizzle mode, e.g. 4kb_2d, 64kb_3d
    #[argh(option, from_str_fn(parse_swizzle_mode))]
    pub mode: SwizzleMode,

    /// bits per element: 8, 16, 32, 64 or 128 (default: 32)
    #[argh(option, default = "32")]
    pub bpp: u32,

    /// MSAA sample count (default: 1)
    #[argh(option, default = "1")]
    pub samples: u32,
}

pub fn handle_equation_command(lib: &AddrLib, cmd: EquationCmd) -> Result<(), CliError> {
    let no_equation = || CliError::NoEquation {
        mode: cmd.mode,
        bpp: cmd.bpp,
        samples: cmd.samples,
    };
    if !matches!(cmd.bpp, 8 | 16 | 32 | 64 | 128) || !cmd.samples.is_power_of_two() || cmd.samples > 8 {
        return Err(no_equation());
    }

    let elem_log2 = (cmd.bpp >> 3).trailing_zeros();
    let samples_log2 = cmd.samples.trailing_zeros();
    let (index, eq) = lib
        .equation(cmd.mode, samples_log2, elem_log2)
        .ok_or_else(no_equation)?;

    println!("Equation {index} ({} bpp, {} samples, {})", cmd.bpp, cmd.samples, cmd.mode);
    println!("{eq}");
    Ok(())
}
